//! 服务管理模块
//!
//! 管理 HTTP 路由服务的生命周期
//!
//! ## 核心概念
//!
//! - `HttpRouterService`: HTTP路由服务的核心 trait，提供 axum 路由器
//! - `ServiceManager`: 服务管理器，负责合并路由并托管 HTTP 服务器

pub mod manager;
pub mod registry;

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use realmgate_common::ServiceInfo;
use std::fmt::Debug;

// 重新导出核心组件
pub use manager::ServiceManager;
pub use registry::RegistryService;

/// HTTP 路由服务抽象
///
/// 每个服务提供一个可挂载的 axum Router 与路由前缀，
/// 由 ServiceManager 合并到同一个 HTTP 服务器。
#[async_trait]
pub trait HttpRouterService: Send + Sync + Debug {
    fn info(&self) -> &ServiceInfo;

    fn info_mut(&mut self) -> &mut ServiceInfo;

    async fn build_router(&mut self) -> Result<Router>;

    fn route_prefix(&self) -> &str;
}
