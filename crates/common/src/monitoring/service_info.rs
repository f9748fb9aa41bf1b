//! Service information
//!
//! Defines the basic information structure for services

use crate::config::RealmgateConfig;
use crate::monitoring::{ServiceState, service_type::ServiceType};
use serde::{Deserialize, Serialize};

/// Basic service information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service type
    pub service_type: ServiceType,
    pub domain_name: String,
    pub port_info: String,
    /// Service status
    pub status: ServiceState,
    /// Service description
    pub description: Option<String>,
}

impl ServiceInfo {
    pub fn new(
        name: impl Into<String>,
        service_type: ServiceType,
        description: Option<String>,
        config: &RealmgateConfig,
    ) -> Self {
        let domain_name = format!("http://{}", config.bind.domain_name);
        let port_info = config.bind.port.to_string();

        Self {
            name: name.into(),
            service_type,
            domain_name,
            port_info,
            status: ServiceState::Unknown,
            description,
        }
    }

    /// 标记服务为运行中
    pub fn mark_running(&mut self, detail: impl Into<String>) {
        self.status = ServiceState::Running(detail.into());
    }

    /// 标记服务为错误状态
    pub fn mark_error(&mut self, detail: impl Into<String>) {
        self.status = ServiceState::Error(detail.into());
    }
}
