//! Registry HTTP 服务实现

use crate::service::HttpRouterService;
use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use realmgate_common::config::RealmgateConfig;
use realmgate_common::{ServiceInfo, ServiceType};
use registry::create_registry_router_with_config;
use tracing::info;

/// Realm 注册 HTTP 服务实现
#[derive(Debug)]
pub struct RegistryService {
    info: ServiceInfo,
    route_prefix: String,
    config: RealmgateConfig,
}

impl RegistryService {
    pub fn new(config: RealmgateConfig) -> Self {
        Self {
            info: ServiceInfo::new(
                "Registry Service",
                ServiceType::Registry,
                Some("Realm registration service with async bootstrap dispatch".to_string()),
                &config,
            ),
            route_prefix: config.registry.route_prefix.clone(),
            config,
        }
    }
}

#[async_trait]
impl HttpRouterService for RegistryService {
    fn info(&self) -> &ServiceInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut ServiceInfo {
        &mut self.info
    }

    async fn build_router(&mut self) -> Result<Router> {
        info!("Building Registry router");
        let router = create_registry_router_with_config(&self.config).await?;

        info!("Registry router built successfully");
        Ok(router)
    }

    fn route_prefix(&self) -> &str {
        &self.route_prefix
    }
}
