//! 错误处理模块
//!
//! 按概念分离的错误类型定义，遵循一个文件一个核心概念的原则

// 子模块声明
mod base_error;
mod config_error;

// 导出公共 API
pub use base_error::{BaseError, Result};
pub use config_error::ConfigError;
