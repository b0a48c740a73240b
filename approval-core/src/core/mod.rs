//! 核心模块 - 配置与引擎装配
//!
//! # 模块结构
//!
//! - [`Config`] - 引擎配置
//! - [`DeskState`] - 装配好的 Identity Store + Workflow Engine

pub mod config;
pub mod state;

pub use config::Config;
pub use state::DeskState;
