//! HTTP 服务绑定配置

use serde::{Deserialize, Serialize};

/// HTTP 服务绑定配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HttpBindConfig {
    /// 域名
    ///
    /// 服务对外宣告的域名，用于生成正确的 URL。
    #[serde(default = "default_domain_name")]
    pub domain_name: String,

    /// 绑定 IP 地址
    ///
    /// 服务实际绑定的网络接口 IP 地址。
    /// 通常使用 "0.0.0.0" 监听所有接口。
    #[serde(default = "default_ip")]
    pub ip: String,

    /// 绑定端口
    ///
    /// HTTP 服务监听的端口号。
    #[serde(default = "default_port")]
    pub port: u16,
}

impl HttpBindConfig {
    /// 返回 "ip:port" 形式的绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

impl Default for HttpBindConfig {
    fn default() -> Self {
        Self {
            domain_name: default_domain_name(),
            ip: default_ip(),
            port: default_port(),
        }
    }
}

fn default_domain_name() -> String {
    "localhost".to_string()
}

fn default_ip() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}
