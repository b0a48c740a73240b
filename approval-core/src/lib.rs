//! Approval Core - 请款 / 采购单两级签核引擎
//!
//! # 架构概述
//!
//! - **Identity Store** (`identity`): 人员帐号、登入、密码
//! - **Record Store** (`store`): 平面档案表，整表读取、原子改写
//! - **Authorization Policy** (`auth::permissions`): 纯函数授权判断
//! - **Sequence Allocator** (`requests::sequence`): `YYYYMMDD-NN` 单号
//! - **Workflow Engine** (`requests`): 单据状态机与各转换动作
//!
//! # 模块结构
//!
//! ```text
//! approval-core/src/
//! ├── core/          # 配置、装配
//! ├── auth/          # 会话、授权策略、密码哈希
//! ├── identity/      # 人员表
//! ├── store/         # 档案表、编码、行编解码
//! ├── requests/      # 状态机、动作、单号、查询
//! └── utils/         # 日志、时间、校验
//! ```
//!
//! # Example
//!
//! ```no_run
//! use approval_core::{Config, DeskState};
//!
//! let config = Config::from_env();
//! approval_core::init_from_config(&config);
//! let state = DeskState::open(config).unwrap();
//! state.identity.seed_from_config().unwrap();
//! let session = state.identity.authenticate("Eve", "0000").unwrap();
//! let pending = state.requests.pending_for(&session).unwrap();
//! println!("{} requests waiting", pending.len());
//! ```

pub mod auth;
pub mod core;
pub mod identity;
pub mod requests;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use auth::{Actor, Session, Transition};
pub use core::{Config, DeskState};
pub use identity::{IdentityError, IdentityStore};
pub use requests::{RequestsManager, WorkflowError};
pub use store::StoreError;

// Re-export logger functions
pub use utils::logger::{init_from_config, init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
