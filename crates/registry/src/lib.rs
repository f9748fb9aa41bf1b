//! Realm 注册服务
//!
//! 将网关送来的 (path, user) 注册请求解析为授权的 Realm 集合，
//! 并异步向网关回推每个 Realm 的初始化数据
//!
//! # 模块结构
//!
//! ## 核心模块
//! - [`resolver`]: 路径到 Realm 集合的解析与授权
//! - [`dispatcher`]: 按 Realm 并发分发初始化数据
//! - [`families`]: 封闭的 Realm 族匹配表
//!
//! ## 扩展模块
//! - [`acl`] - 授权能力检查
//! - [`providers`] - 按 Realm 类别注册的初始化数据 Provider
//! - [`outbound`] - 朝向网关多路复用器的出站通道
//! - [`proto`] - 带版本号的标签化 JSON 线格式

pub mod acl;
pub mod dispatcher;
pub mod families;
pub mod outbound;
pub mod providers;
pub mod proto;
pub mod resolver;
pub mod server;

// Axum router integration
pub mod axum_router;

pub use axum_router::{create_registry_router, create_registry_router_with_config};

// Re-export commonly used types
pub use acl::{AccessPolicy, StaticAccessPolicy};
pub use dispatcher::{DispatchOutcome, DispatchReport, InfoDispatcher};
pub use families::{FamilyMatch, RealmClass, RealmFamily};
pub use outbound::{GatewaySink, OutboundSink, SinkClosed};
pub use providers::{InfoPayload, InfoProvider, ProviderError, ProviderRegistry, StaticInfoProvider};
pub use resolver::RealmResolver;
pub use server::{RegistryServer, RegistryServerHandle};
