//! Realm 注册服务配置

use serde::{Deserialize, Serialize};

/// Realm 注册服务配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RegistryConfig {
    /// 注册服务 HTTP 路由前缀
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// 单个 Realm 初始化数据拉取的期限（毫秒）
    ///
    /// 防止单个慢 Provider 无限拖住整次分发。
    #[serde(default = "default_fetch_deadline_ms")]
    pub fetch_deadline_ms: u64,

    /// 授权表配置
    #[serde(default)]
    pub access: AccessConfig,
}

/// 静态授权表配置
///
/// 权限数据对本协议只读；这里的表驱动内置的 StaticAccessPolicy。
/// 提升权限的族（对局、锦标赛、管理）默认拒绝未列出的用户。
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AccessConfig {
    /// 具有管理/仲裁角色的用户标识
    #[serde(default)]
    pub moderators: Vec<String>,

    /// 私有（仅受邀可观察）锦标赛标识
    #[serde(default)]
    pub private_tournaments: Vec<String>,

    /// 私有锦标赛的受邀用户表：tournament_slug -> user ids
    #[serde(default)]
    pub tournament_invitees: std::collections::HashMap<String, Vec<String>>,

    /// 对局访问表
    #[serde(default)]
    pub games: Vec<GameAccessConfig>,
}

/// 单个对局的访问规则
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GameAccessConfig {
    /// 对局标识（路径中嵌入的 ID）
    pub game_id: String,

    /// 参与者用户标识
    #[serde(default)]
    pub participants: Vec<String>,

    /// 是否允许旁观者进入对局 Realm
    #[serde(default = "default_true")]
    pub allow_spectators: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            fetch_deadline_ms: default_fetch_deadline_ms(),
            access: AccessConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// 验证注册服务配置
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // 前缀用于 Router::nest，"/" 与尾随斜杠都不被接受
        if !self.route_prefix.starts_with('/')
            || self.route_prefix.len() < 2
            || self.route_prefix.ends_with('/')
        {
            errors.push(format!(
                "registry.route_prefix must be of the form '/name', got '{}'",
                self.route_prefix
            ));
        }

        if !(50..=60_000).contains(&self.fetch_deadline_ms) {
            errors.push(format!(
                "registry.fetch_deadline_ms must be between 50 and 60000, got {}",
                self.fetch_deadline_ms
            ));
        }

        for game in &self.access.games {
            if game.game_id.trim().is_empty() {
                errors.push("registry.access.games entries require a non-empty game_id".to_string());
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// 单次 Provider 拉取期限
    pub fn fetch_deadline(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.fetch_deadline_ms)
    }
}

// 默认值函数
fn default_route_prefix() -> String {
    "/registry".to_string()
}

fn default_fetch_deadline_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.route_prefix, "/registry");
        assert_eq!(config.fetch_deadline_ms, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_deadline() {
        let mut config = RegistryConfig::default();
        config.fetch_deadline_ms = 10;

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("fetch_deadline_ms")));
    }

    #[test]
    fn test_access_table_from_toml() {
        let config: RegistryConfig = toml::from_str(
            r#"
            fetch_deadline_ms = 500

            [access]
            moderators = ["mod1"]
            private_tournaments = ["invitational"]

            [access.tournament_invitees]
            invitational = ["u1", "u2"]

            [[access.games]]
            game_id = "abc123"
            participants = ["u1", "u2"]
            allow_spectators = false
        "#,
        )
        .expect("access table should parse");

        assert_eq!(config.access.moderators, vec!["mod1"]);
        assert_eq!(config.access.games.len(), 1);
        assert!(!config.access.games[0].allow_spectators);
        assert_eq!(
            config.access.tournament_invitees.get("invitational").unwrap(),
            &vec!["u1".to_string(), "u2".to_string()]
        );
    }
}
