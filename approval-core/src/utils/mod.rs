//! 工具模块 - 日志、时间、输入校验
//!
//! # 内容
//!
//! - [`logger`] - tracing 初始化
//! - [`time`] - 业务时区时钟与时间戳格式
//! - [`validation`] - 文本字段校验

pub mod logger;
pub mod time;
pub mod validation;

pub use time::{Clock, FixedClock, SystemClock};
pub use validation::InvalidField;
