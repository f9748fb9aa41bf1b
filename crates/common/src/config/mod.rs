//! 统一配置管理系统
//!
//! 本模块是 realmgate 服务配置的"单一真理之源"。
//! 所有配置项的定义、文档、默认值都在这里统一管理。

pub mod bind;
pub mod observability;
pub mod registry;

pub use bind::HttpBindConfig;
pub use observability::{LogConfig, ObservabilityConfig};
pub use registry::RegistryConfig;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// realmgate 服务的主配置结构体
///
/// 这是系统的核心配置，包含了网关注册服务的全部配置信息。
/// 配置文件使用 TOML 格式，支持完整的类型安全加载。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RealmgateConfig {
    /// 服务器实例名称
    ///
    /// 用于标识不同的服务器实例，在集群部署中用于区分节点。
    /// 建议使用有意义的命名规则，如：realmgate-01, realmgate-prod-east-1 等。
    pub name: String,

    /// 运行环境标识
    ///
    /// 指定当前运行环境，影响默认行为：
    /// - "dev": 开发环境
    /// - "prod": 生产环境
    /// - "test": 测试环境，用于自动化测试
    pub env: String,

    /// HTTP 服务绑定配置
    #[serde(default)]
    pub bind: HttpBindConfig,

    /// Realm 注册服务配置
    ///
    /// 族授权表、初始化数据拉取期限等注册服务专用配置。
    #[serde(default)]
    pub registry: RegistryConfig,

    /// 可观测性配置
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for RealmgateConfig {
    fn default() -> Self {
        Self {
            name: "realmgate-default".to_string(),
            env: "dev".to_string(),
            bind: HttpBindConfig::default(),
            registry: RegistryConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RealmgateConfig {
    /// 返回可观测性配置引用
    pub fn observability_config(&self) -> &ObservabilityConfig {
        &self.observability
    }

    /// 返回日志配置引用
    pub fn log_config(&self) -> &LogConfig {
        &self.observability.log
    }

    /// 检查是否使用控制台日志输出
    pub fn is_console_logging(&self) -> bool {
        self.observability.log.output == "console"
    }

    /// 检查是否应该轮转日志
    pub fn should_rotate_logs(&self) -> bool {
        self.observability.log.output == "file" && self.observability.log.rotate
    }

    /// 获取日志过滤级别，优先使用 RUST_LOG
    pub fn get_filter_level(&self) -> String {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|v| {
                let trimmed = v.trim().to_string();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            })
            .unwrap_or_else(|| self.observability.filter_level.clone())
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::error::Result<Self> {
        let path_ref = path.as_ref();

        // Check if file exists
        if !path_ref.exists() {
            return Err(ConfigError::FileNotFound {
                path: path_ref.display().to_string(),
            }
            .into());
        }

        // Check if path is a file, not a directory
        if !path_ref.is_file() {
            return Err(ConfigError::InvalidValue {
                field: "config path".to_string(),
                value: path_ref.display().to_string(),
            }
            .into());
        }

        // Read file content
        let content = std::fs::read_to_string(path_ref)?;

        // Parse TOML content
        let config: RealmgateConfig = toml::from_str(&content).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// 从 TOML 字符串加载配置
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 将配置序列化为 TOML 字符串
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// 验证配置有效性
    ///
    /// 检查所有配置项的合法性，包括：
    /// - 必需字段是否存在
    /// - 数值范围是否合理
    /// - 服务配置是否一致
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // 验证实例名称
        if self.name.trim().is_empty() {
            errors.push("Instance name cannot be empty".to_string());
        }

        // 验证环境
        if !["dev", "prod", "test"].contains(&self.env.as_str()) {
            errors.push(format!(
                "Invalid environment '{}', must be one of: dev, prod, test",
                self.env
            ));
        }

        // 验证过滤级别（EnvFilter 语法）
        {
            let main_level = self
                .observability
                .filter_level
                .split(',')
                .next()
                .unwrap_or("")
                .trim();
            if !["trace", "debug", "info", "warn", "error"].contains(&main_level) {
                errors.push(format!(
                    "Invalid filter level '{}', must start with one of: trace, debug, info, warn, error",
                    self.observability.filter_level
                ));
            }
        }

        // 验证日志输出
        if !["console", "file"].contains(&self.observability.log.output.as_str()) {
            errors.push(format!(
                "Invalid log output '{}' (observability.log.output), must be 'console' or 'file'",
                self.observability.log.output
            ));
        }

        // 验证绑定端口
        if self.bind.port == 0 {
            errors.push("bind.port cannot be 0".to_string());
        }

        // 验证注册服务配置
        if let Err(registry_errors) = self.registry.validate() {
            errors.extend(registry_errors);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
