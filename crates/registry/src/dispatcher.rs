//! Realm 初始化数据分发器
//!
//! 对一个 RealmInfoBundle 内的每个 Realm 独立并发拉取并出站投递；
//! 单 Realm 失败不阻塞也不失败其余 Realm

use crate::families::RealmClass;
use crate::outbound::OutboundSink;
use crate::providers::ProviderRegistry;
use futures_util::future::join_all;
use realmgate_common::realm::{RealmError, RealmId, RealmInfoBundle, UserId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 单个 Realm 的分发结局
#[derive(Debug)]
pub struct DispatchOutcome {
    pub realm: RealmId,
    pub result: Result<(), RealmError>,
}

impl DispatchOutcome {
    fn delivered(realm: RealmId) -> Self {
        Self {
            realm,
            result: Ok(()),
        }
    }

    fn failed(realm: RealmId, error: RealmError) -> Self {
        Self {
            realm,
            result: Err(error),
        }
    }
}

/// 一次分发的部分结果集合
///
/// 状态机只有 "pending → 按 Realm 终态 (success|failure)"；
/// 每个 Realm 的结局相互独立且终定。
#[derive(Debug, Default)]
pub struct DispatchReport {
    outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    pub fn outcomes(&self) -> &[DispatchOutcome] {
        &self.outcomes
    }

    /// 成功投递的 Realm 数
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// 局部失败的 Realm 数
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// 失败 Realm 的错误视图（降级提示用）
    pub fn failures(&self) -> impl Iterator<Item = (&RealmId, &RealmError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.realm, e)))
    }
}

/// 初始化数据分发器
///
/// 与注册响应并发运行；一次 dispatch 只读后端状态、
/// 只写自己的出站通道，不同用户的分发之间无共享可变状态。
pub struct InfoDispatcher {
    providers: Arc<ProviderRegistry>,
    sink: Arc<dyn OutboundSink>,
    fetch_deadline: Duration,
}

impl InfoDispatcher {
    pub fn new(
        providers: Arc<ProviderRegistry>,
        sink: Arc<dyn OutboundSink>,
        fetch_deadline: Duration,
    ) -> Self {
        Self {
            providers,
            sink,
            fetch_deadline,
        }
    }

    /// 为 bundle 内的每个 Realm 独立拉取并投递初始化数据
    ///
    /// 空集合是无操作（零投递、零错误）。整个调用总是返回报告，
    /// 不会因单 Realm 失败而整体出错。
    pub async fn dispatch(&self, bundle: RealmInfoBundle) -> DispatchReport {
        if bundle.realms.is_empty() {
            debug!(user = %bundle.user, "empty realm set, nothing to dispatch");
            return DispatchReport::default();
        }

        // 每个 Realm 一个独立任务，无 Realm 间顺序依赖
        let fetches = bundle
            .realms
            .iter()
            .map(|realm| self.dispatch_realm(&bundle.user, realm.clone()));
        let outcomes = join_all(fetches).await;

        let report = DispatchReport { outcomes };
        info!(
            user = %bundle.user,
            delivered = report.delivered(),
            failed = report.failed(),
            "realm info dispatch finished"
        );

        report
    }

    async fn dispatch_realm(&self, user: &UserId, realm: RealmId) -> DispatchOutcome {
        let Some(class) = RealmClass::classify(&realm) else {
            warn!(user = %user, realm = %realm, "realm matches no provider class");
            return DispatchOutcome::failed(
                realm.clone(),
                RealmError::info_unavailable(realm.as_str(), "no provider class for realm"),
            );
        };

        let Some(provider) = self.providers.get(class) else {
            warn!(user = %user, realm = %realm, class = %class, "no provider registered");
            return DispatchOutcome::failed(
                realm.clone(),
                RealmError::info_unavailable(
                    realm.as_str(),
                    format!("no provider registered for class '{class}'"),
                ),
            );
        };

        let payload = match tokio::time::timeout(
            self.fetch_deadline,
            provider.fetch_info(&realm, user),
        )
        .await
        {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => {
                warn!(user = %user, realm = %realm, error = %e, "realm info fetch failed");
                return DispatchOutcome::failed(
                    realm.clone(),
                    RealmError::info_unavailable(realm.as_str(), e.to_string()),
                );
            }
            Err(_) => {
                warn!(
                    user = %user,
                    realm = %realm,
                    deadline_ms = self.fetch_deadline.as_millis() as u64,
                    "realm info fetch deadline exceeded"
                );
                return DispatchOutcome::failed(
                    realm.clone(),
                    RealmError::info_unavailable(realm.as_str(), "fetch deadline exceeded"),
                );
            }
        };

        // 连接在分发完成前关闭时静默丢弃：载荷无需到达已关闭的连接
        if self.sink.deliver(user, &realm, payload).await.is_err() {
            debug!(user = %user, realm = %realm, "outbound channel closed, payload dropped");
        }

        DispatchOutcome::delivered(realm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::GatewaySink;
    use crate::providers::{InfoProvider, ProviderError, StaticInfoProvider};
    use async_trait::async_trait;
    use realmgate_common::realm::RealmSet;
    use serde_json::json;

    /// 始终失败的 Provider 测试替身
    struct FailingProvider;

    #[async_trait]
    impl InfoProvider for FailingProvider {
        async fn fetch_info(
            &self,
            _realm: &RealmId,
            _user: &UserId,
        ) -> Result<serde_json::Value, ProviderError> {
            Err(ProviderError::unavailable("backend down"))
        }
    }

    /// 永不完成的 Provider 测试替身
    struct StalledProvider;

    #[async_trait]
    impl InfoProvider for StalledProvider {
        async fn fetch_info(
            &self,
            _realm: &RealmId,
            _user: &UserId,
        ) -> Result<serde_json::Value, ProviderError> {
            std::future::pending().await
        }
    }

    fn bundle(user: &str, realms: &[&str]) -> RealmInfoBundle {
        RealmInfoBundle::new(
            UserId::new(user),
            RealmSet::new(realms.iter().map(|r| RealmId::new(*r)).collect()),
        )
    }

    #[tokio::test]
    async fn test_empty_bundle_is_noop() {
        let (sink, mut rx) = GatewaySink::channel();
        let dispatcher = InfoDispatcher::new(
            Arc::new(ProviderRegistry::new()),
            Arc::new(sink),
            Duration::from_millis(500),
        );

        let report = dispatcher.dispatch(bundle("u1", &[])).await;
        assert!(report.is_empty());
        assert_eq!(report.failed(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_block_other_realms() {
        let mut providers = ProviderRegistry::new();
        providers.register(
            RealmClass::Lobby,
            Arc::new(StaticInfoProvider::new().with_payload(
                "lobby-global",
                json!({"active_games": []}),
            )),
        );
        providers.register(RealmClass::Notifications, Arc::new(FailingProvider));

        let (sink, mut rx) = GatewaySink::channel();
        let dispatcher = InfoDispatcher::new(
            Arc::new(providers),
            Arc::new(sink),
            Duration::from_millis(500),
        );

        let report = dispatcher
            .dispatch(bundle("u1", &["lobby-global", "u1-notifications"]))
            .await;

        assert_eq!(report.delivered(), 1);
        assert_eq!(report.failed(), 1);

        let failures: Vec<&str> = report.failures().map(|(r, _)| r.as_str()).collect();
        assert_eq!(failures, vec!["u1-notifications"]);

        // 成功的 Realm 仍然投递
        let item = rx.recv().await.unwrap();
        assert_eq!(item.realm, "lobby-global");
        assert_eq!(item.user_id, "u1");
    }

    #[tokio::test]
    async fn test_missing_provider_is_partial_failure() {
        let (sink, _rx) = GatewaySink::channel();
        let dispatcher = InfoDispatcher::new(
            Arc::new(ProviderRegistry::new()),
            Arc::new(sink),
            Duration::from_millis(500),
        );

        let report = dispatcher.dispatch(bundle("u1", &["lobby-global"])).await;
        assert_eq!(report.failed(), 1);

        let (_, error) = report.failures().next().unwrap();
        assert!(matches!(error, RealmError::InfoUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_slow_provider_bounded_by_deadline() {
        let mut providers = ProviderRegistry::new();
        providers.register(RealmClass::Lobby, Arc::new(StalledProvider));
        providers.register(RealmClass::Notifications, Arc::new(StaticInfoProvider::new()));

        let (sink, mut rx) = GatewaySink::channel();
        let dispatcher = InfoDispatcher::new(
            Arc::new(providers),
            Arc::new(sink),
            Duration::from_millis(50),
        );

        let report = dispatcher
            .dispatch(bundle("u1", &["lobby-global", "u1-notifications"]))
            .await;

        // 卡死的 Provider 超时，不拖垮另一个 Realm
        assert_eq!(report.delivered(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(rx.recv().await.unwrap().realm, "u1-notifications");
    }

    #[tokio::test]
    async fn test_closed_connection_drops_silently() {
        let mut providers = ProviderRegistry::new();
        providers.register(RealmClass::Lobby, Arc::new(StaticInfoProvider::new()));

        let (sink, rx) = GatewaySink::channel();
        drop(rx); // 连接已关闭

        let dispatcher = InfoDispatcher::new(
            Arc::new(providers),
            Arc::new(sink),
            Duration::from_millis(500),
        );

        // 丢弃不是错误
        let report = dispatcher.dispatch(bundle("u1", &["lobby-global"])).await;
        assert_eq!(report.failed(), 0);
    }

    #[tokio::test]
    async fn test_unclassifiable_realm_is_partial_failure() {
        let (sink, _rx) = GatewaySink::channel();
        let dispatcher = InfoDispatcher::new(
            Arc::new(ProviderRegistry::new()),
            Arc::new(sink),
            Duration::from_millis(500),
        );

        let report = dispatcher.dispatch(bundle("u1", &["mystery-realm"])).await;
        assert_eq!(report.failed(), 1);
    }
}
