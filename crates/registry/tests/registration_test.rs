//! Registry 服务集成测试
//!
//! 测试核心注册流程，确保路径解析、授权、错误映射等功能正常

use realmgate_common::RealmgateConfig;
use registry::create_registry_router_with_config;
use tokio::net::TcpListener;

/// 测试辅助：创建最小配置
fn create_test_config() -> RealmgateConfig {
    RealmgateConfig::from_toml(
        r#"
        name = "test-registry"
        env = "test"

        [registry]
        fetch_deadline_ms = 500

        [registry.access]
        moderators = ["mod1"]

        [[registry.access.games]]
        game_id = "abc123"
        participants = ["u1"]
        allow_spectators = false

        [[registry.access.games]]
        game_id = "open456"
        participants = ["u1"]
        allow_spectators = true
    "#,
    )
    .expect("Failed to parse test config")
}

/// 测试辅助：创建注册服务器
async fn create_test_server() -> (String, tokio::task::JoinHandle<()>) {
    let config = create_test_config();
    let app = create_registry_router_with_config(&config)
        .await
        .expect("Failed to create router");

    // 绑定到随机端口
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (base_url, handle)
}

async fn post_register(
    base_url: &str,
    path: &str,
    user_id: &str,
) -> (reqwest::StatusCode, serde_json::Value) {
    let response = reqwest::Client::new()
        .post(format!("{base_url}/api/register"))
        .json(&serde_json::json!({ "path": path, "user_id": user_id }))
        .send()
        .await
        .expect("register request failed");

    let status = response.status();
    let body = response.json().await.expect("response body is not JSON");
    (status, body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (base_url, _handle) = create_test_server().await;

    let response = reqwest::get(format!("{base_url}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Registry is healthy");
}

#[tokio::test]
async fn test_lobby_registration_primary_first() {
    let (base_url, _handle) = create_test_server().await;

    let (status, body) = post_register(&base_url, "/lobby", "u1").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(
        body["realms"],
        serde_json::json!(["lobby-global", "u1-notifications"])
    );
}

#[tokio::test]
async fn test_anonymous_lobby_registration() {
    let (base_url, _handle) = create_test_server().await;

    let (status, body) = post_register(&base_url, "/lobby", "anon-3f2a").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["realms"], serde_json::json!(["lobby-global"]));
}

#[tokio::test]
async fn test_game_participant_allowed() {
    let (base_url, _handle) = create_test_server().await;

    let (status, body) = post_register(&base_url, "/game/abc123", "u1").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(
        body["realms"],
        serde_json::json!(["game-abc123", "chat-game-abc123"])
    );
}

#[tokio::test]
async fn test_game_non_participant_denied() {
    let (base_url, _handle) = create_test_server().await;

    let (status, body) = post_register(&base_url, "/game/abc123", "u2").await;
    assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "access_denied");
}

#[tokio::test]
async fn test_spectator_eligible_game_allowed() {
    let (base_url, _handle) = create_test_server().await;

    let (status, _body) = post_register(&base_url, "/game/open456", "u2").await;
    assert_eq!(status, reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_is_unknown_destination() {
    let (base_url, _handle) = create_test_server().await;

    let (status, body) = post_register(&base_url, "/unknown/xyz", "u1").await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    // 网关依赖此原因码区分 "不存在" 与 "无权限"
    assert_eq!(body["error"], "unknown_destination");
}

#[tokio::test]
async fn test_malformed_input_rejected() {
    let (base_url, _handle) = create_test_server().await;

    let (status, body) = post_register(&base_url, "", "u1").await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformed_input");

    let (status, _) = post_register(&base_url, "/lobby?x=1", "u1").await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_static_page_returns_empty_realm_list() {
    let (base_url, _handle) = create_test_server().await;

    let (status, body) = post_register(&base_url, "/settings", "u1").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["realms"], serde_json::json!([]));
}

#[tokio::test]
async fn test_moderation_requires_role() {
    let (base_url, _handle) = create_test_server().await;

    let (status, body) = post_register(&base_url, "/admin", "u1").await;
    assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "access_denied");

    let (status, body) = post_register(&base_url, "/admin", "mod1").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["realms"], serde_json::json!(["moderation"]));
}

#[tokio::test]
async fn test_registration_is_idempotent() {
    let (base_url, _handle) = create_test_server().await;

    let (_, first) = post_register(&base_url, "/tournament/weekly", "u1").await;
    let (_, second) = post_register(&base_url, "/tournament/weekly", "u1").await;
    assert_eq!(first["realms"], second["realms"]);
}
