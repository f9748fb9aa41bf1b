//! Axum Router 集成
//!
//! 提供 RegistryServer 的 Axum Router 适配器

use crate::acl::StaticAccessPolicy;
use crate::dispatcher::InfoDispatcher;
use crate::outbound::GatewaySink;
use crate::providers::ProviderRegistry;
use crate::proto::{InitRealmInfo, RegisterRealmRequest};
use crate::resolver::RealmResolver;
use crate::server::RegistryServer;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use realmgate_common::RealmgateConfig;
use realmgate_common::realm::RealmError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Registry Server 状态（用于 Axum State）
#[derive(Clone)]
pub struct RegistryState {
    pub server: Arc<RegistryServer>,
}

/// 创建 Registry Axum Router
///
/// 返回一个可以挂载到主 HTTP 服务器的 Router。
/// 默认装配：空授权表 + 内存 Provider + 日志出站端。
pub async fn create_registry_router() -> Result<Router> {
    info!("Creating Registry Axum router");

    let server = build_default_server(&RealmgateConfig::default());
    let router = build_router(server);

    info!("Registry Axum router created successfully");
    Ok(router)
}

/// 创建 Registry Axum Router（带配置）
///
/// 授权表与拉取期限取自配置文件。
pub async fn create_registry_router_with_config(config: &RealmgateConfig) -> Result<Router> {
    info!("Creating Registry Axum router with config");

    let server = build_default_server(config);
    let router = build_router(server);

    info!("Registry Axum router created successfully");
    Ok(router)
}

/// 以外部装配好的服务器创建 Router
///
/// 网关进程自带出站通道与 Provider 装配时使用。
pub fn create_registry_router_with_server(server: Arc<RegistryServer>) -> Router {
    build_router(server)
}

fn build_default_server(config: &RealmgateConfig) -> Arc<RegistryServer> {
    let policy = Arc::new(StaticAccessPolicy::new(config.registry.access.clone()));
    let resolver = Arc::new(RealmResolver::new(policy));

    // 默认出站端没有真实网关接收者：挂一个排空任务记录投递
    let (sink, mut outbound_rx) = GatewaySink::channel();
    tokio::spawn(async move {
        while let Some(item) = outbound_rx.recv().await {
            debug!(
                user = %item.user_id,
                realm = %item.realm,
                "outbound realm info (no gateway attached)"
            );
        }
    });

    let dispatcher = Arc::new(InfoDispatcher::new(
        Arc::new(ProviderRegistry::with_static_defaults()),
        Arc::new(sink),
        Duration::from_millis(config.registry.fetch_deadline_ms),
    ));

    Arc::new(RegistryServer::new(resolver, dispatcher))
}

fn build_router(server: Arc<RegistryServer>) -> Router {
    let state = RegistryState { server };

    Router::new()
        .route("/health", get(|| async { "Registry is healthy" }))
        .route("/api/register", post(register_handler))
        .route("/api/init-info", post(init_info_handler))
        .with_state(state)
}

/// Realm 注册处理器
///
/// 解析错误整体终止本次交换；成功时初始化数据在响应之外异步推送。
async fn register_handler(
    State(state): State<RegistryState>,
    Json(request): Json<RegisterRealmRequest>,
) -> Response {
    let handle = state.server.handle();

    match handle.handle_register(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => realm_error_response(&e),
    }
}

/// 初始化数据重推处理器
///
/// 接受后立即返回 202；分发结果仅体现在出站通道与日志中。
async fn init_info_handler(
    State(state): State<RegistryState>,
    Json(request): Json<InitRealmInfo>,
) -> Response {
    let handle = state.server.handle();

    match handle.handle_init_info(request).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => realm_error_response(&e),
    }
}

/// 将协议错误映射为 HTTP 状态码与稳定原因码
///
/// 网关依赖原因码区分 "unknown_destination" 与 "access_denied"。
fn realm_error_response(error: &RealmError) -> Response {
    let status = match error {
        RealmError::MalformedInput { .. } => StatusCode::BAD_REQUEST,
        RealmError::NotFound { .. } => StatusCode::NOT_FOUND,
        RealmError::AccessDenied { .. } => StatusCode::FORBIDDEN,
        RealmError::InfoUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };

    let body = Json(json!({
        "error": error.reason_code(),
        "message": error.to_string(),
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (RealmError::malformed("bad"), StatusCode::BAD_REQUEST),
            (RealmError::not_found("/x"), StatusCode::NOT_FOUND),
            (RealmError::access_denied("u", "game"), StatusCode::FORBIDDEN),
            (
                RealmError::info_unavailable("r", "down"),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            let response = realm_error_response(&error);
            assert_eq!(response.status(), expected, "{error}");
        }
    }
}
