//! 出站通道
//!
//! 朝向网关连接多路复用器的发送端；最终投递（或连接已关闭时的
//! 静默丢弃）由网关负责

use crate::proto::RealmInfoPayload;
use crate::providers::InfoPayload;
use async_trait::async_trait;
use realmgate_common::realm::{RealmId, UserId};
use thiserror::Error;
use tokio::sync::mpsc;

/// 出站通道已关闭（对端连接不复存在）
#[derive(Debug, Error)]
#[error("outbound channel closed")]
pub struct SinkClosed;

/// 出站通道接口
///
/// 接受 (user, realm, payload) 三元组；投递语义是尽力而为，
/// 调用方不应将 `SinkClosed` 视为致命错误。
#[async_trait]
pub trait OutboundSink: Send + Sync {
    async fn deliver(
        &self,
        user: &UserId,
        realm: &RealmId,
        payload: InfoPayload,
    ) -> Result<(), SinkClosed>;
}

/// mpsc 通道承载的网关出站端
///
/// 发送端交给分发器，接收端由网关的连接多路复用器持有。
#[derive(Debug, Clone)]
pub struct GatewaySink {
    tx: mpsc::UnboundedSender<RealmInfoPayload>,
}

impl GatewaySink {
    /// 创建出站通道对：(发送端, 网关侧接收端)
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RealmInfoPayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl OutboundSink for GatewaySink {
    async fn deliver(
        &self,
        user: &UserId,
        realm: &RealmId,
        payload: InfoPayload,
    ) -> Result<(), SinkClosed> {
        let item = RealmInfoPayload {
            user_id: user.as_str().to_string(),
            realm: realm.as_str().to_string(),
            payload,
        };

        self.tx.send(item).map_err(|_| SinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_delivery_reaches_receiver() {
        let (sink, mut rx) = GatewaySink::channel();

        sink.deliver(
            &UserId::new("u1"),
            &RealmId::new("lobby-global"),
            json!({"entries": []}),
        )
        .await
        .unwrap();

        let item = rx.recv().await.unwrap();
        assert_eq!(item.user_id, "u1");
        assert_eq!(item.realm, "lobby-global");
    }

    #[tokio::test]
    async fn test_closed_receiver_reports_sink_closed() {
        let (sink, rx) = GatewaySink::channel();
        drop(rx);

        let result = sink
            .deliver(&UserId::new("u1"), &RealmId::new("lobby-global"), json!({}))
            .await;
        assert!(result.is_err());
    }
}
