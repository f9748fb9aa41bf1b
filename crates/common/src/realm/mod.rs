//! Realm 值类型模块
//!
//! 定义 Realm 注册协议的核心值类型与寻址校验规则
//!
//! 按照概念独立性原则组织，每个概念都有独立的文件：
//! - `model.rs` - 核心值类型（路径、用户、Realm 标识）
//! - `validation.rs` - 寻址格式校验
//! - `error.rs` - 协议错误分类

// 子模块
pub mod error;
pub mod model;
pub mod validation;

// 公共API导出
pub use error::RealmError;
pub use model::{RealmId, RealmInfoBundle, RealmPath, RealmSet, UserId};
