//! 注册协议线格式
//!
//! 带版本号的标签化 JSON 编码：纯值类型 + 显式 `schema_version`，
//! 不依赖任何反射式消息注册表

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 当前线格式版本
pub const SCHEMA_VERSION: u32 = 1;

/// 注册请求：网关代连接发起
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRealmRequest {
    pub path: String,
    pub user_id: String,
}

/// 注册响应：有序 Realm 列表
///
/// 族定义主 Realm 时排在首位；空列表是合法的非错误响应。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRealmResponse {
    pub realms: Vec<String>,
}

/// 初始化数据请求：要求后端将这些 Realm 的信息推回给该用户
///
/// 例如大厅 Realm 需要活跃对局列表与聊天，对局 Realm 需要对局历史。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitRealmInfo {
    pub user_id: String,
    pub realms: Vec<String>,
}

/// 单个 Realm 的初始化数据推送（朝向网关）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmInfoPayload {
    pub user_id: String,
    pub realm: String,
    /// 载荷内容由外部 Provider 定义，对本协议不透明
    pub payload: serde_json::Value,
}

/// 协议帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum Frame {
    RegisterRealmRequest(RegisterRealmRequest),
    RegisterRealmResponse(RegisterRealmResponse),
    InitRealmInfo(InitRealmInfo),
    RealmInfoPayload(RealmInfoPayload),
}

/// 协议信封
///
/// 每帧携带版本号、信封标识与时间戳；`reply_for` 关联请求信封。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub schema_version: u32,
    pub envelope_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_for: Option<String>,
    #[serde(flatten)]
    pub frame: Frame,
}

/// 线格式错误
#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("unsupported schema version: {got} (supported: {SCHEMA_VERSION})")]
    UnsupportedVersion { got: u32 },

    #[error("frame decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Envelope {
    /// 创建新信封
    pub fn new(frame: Frame) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            envelope_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            reply_for: None,
            frame,
        }
    }

    /// 创建应答信封，关联请求信封标识
    pub fn reply_to(frame: Frame, request: &Envelope) -> Self {
        let mut envelope = Self::new(frame);
        envelope.reply_for = Some(request.envelope_id.clone());
        envelope
    }

    /// 编码为 JSON 文本
    pub fn encode(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从 JSON 文本解码，拒绝不支持的版本
    pub fn decode(raw: &str) -> Result<Self, ProtoError> {
        let envelope: Envelope = serde_json::from_str(raw)?;
        if envelope.schema_version != SCHEMA_VERSION {
            return Err(ProtoError::UnsupportedVersion {
                got: envelope.schema_version,
            });
        }
        Ok(envelope)
    }
}
