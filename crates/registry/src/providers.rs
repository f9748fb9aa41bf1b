//! 初始化数据 Provider
//!
//! 每个 Realm 类别对应一个外部数据源（活跃对局列表、聊天回溯等），
//! Provider 返回的内容对本协议不透明

use crate::families::RealmClass;
use async_trait::async_trait;
use realmgate_common::realm::{RealmId, UserId};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Realm 初始化数据载荷（对本协议不透明）
pub type InfoPayload = serde_json::Value;

/// Provider 层错误
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 后端数据源不可用
    #[error("provider backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// Provider 不认识该 Realm
    #[error("realm '{realm}' has no data source")]
    UnknownRealm { realm: String },
}

impl ProviderError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// 按 Realm 拉取初始化数据的协作方接口
///
/// 实现方自行决定重试策略；本协议不在此层自动重试。
#[async_trait]
pub trait InfoProvider: Send + Sync {
    async fn fetch_info(
        &self,
        realm: &RealmId,
        user: &UserId,
    ) -> Result<InfoPayload, ProviderError>;
}

/// Provider 注册表
///
/// 分发器按 Realm 类别选择 Provider；未注册的类别
/// 在分发阶段表现为该 Realm 的局部失败。
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<RealmClass, Arc<dyn InfoProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册某个类别的 Provider（重复注册时后者覆盖前者）
    pub fn register(&mut self, class: RealmClass, provider: Arc<dyn InfoProvider>) {
        self.providers.insert(class, provider);
    }

    pub fn get(&self, class: RealmClass) -> Option<Arc<dyn InfoProvider>> {
        self.providers.get(&class).cloned()
    }

    /// 为全部 Realm 类别装配内存 Provider 的默认注册表
    ///
    /// 用于未接入真实数据源的部署与测试。
    pub fn with_static_defaults() -> Self {
        let mut registry = Self::new();
        let provider: Arc<dyn InfoProvider> = Arc::new(StaticInfoProvider::new());
        for class in [
            RealmClass::Lobby,
            RealmClass::Notifications,
            RealmClass::Game,
            RealmClass::GameWatch,
            RealmClass::Tournament,
            RealmClass::Chat,
            RealmClass::Moderation,
        ] {
            registry.register(class, provider.clone());
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// 内存表驱动的 Provider
///
/// 为登记过的 Realm 返回配置的载荷，其余 Realm 返回空的初始化骨架。
/// 用于默认装配与测试替身。
#[derive(Debug, Default)]
pub struct StaticInfoProvider {
    payloads: HashMap<String, InfoPayload>,
}

impl StaticInfoProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(mut self, realm: impl Into<String>, payload: InfoPayload) -> Self {
        self.payloads.insert(realm.into(), payload);
        self
    }
}

#[async_trait]
impl InfoProvider for StaticInfoProvider {
    async fn fetch_info(
        &self,
        realm: &RealmId,
        _user: &UserId,
    ) -> Result<InfoPayload, ProviderError> {
        if let Some(payload) = self.payloads.get(realm.as_str()) {
            return Ok(payload.clone());
        }

        // 空骨架：网关据此初始化一个无内容的视图
        Ok(json!({
            "realm": realm.as_str(),
            "entries": [],
        }))
    }
}
