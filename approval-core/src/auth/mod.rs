//! 认证与授权
//!
//! - [`session`]: 已认证会话与每次调用时解析的 [`Actor`]
//! - [`permissions`]: 纯函数授权策略 (谁可以对哪张单做什么)
//! - [`credential`]: argon2 密码哈希

pub mod credential;
pub mod permissions;
pub mod session;

pub use permissions::{Denial, Transition, can_transition, can_view, check};
pub use session::{Actor, Session};
