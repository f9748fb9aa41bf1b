//! 授权能力检查
//!
//! 解析器对每个匹配到的族执行 allow/deny 能力检查；
//! 权限数据对本协议只读，默认拒绝提升权限的族

use crate::families::RealmFamily;
use async_trait::async_trait;
use realmgate_common::config::registry::AccessConfig;
use realmgate_common::realm::UserId;
use tracing::debug;

/// 授权检查协作方接口
///
/// `key` 是路径中嵌入的对象标识（对局 ID、锦标赛 slug）。
/// 实现方只回答 allow/deny，不产生副作用。
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    async fn is_authorized(&self, user: &UserId, family: RealmFamily, key: Option<&str>) -> bool;
}

/// 配置表驱动的授权策略
///
/// 开放族（大厅、旁观、静态页面）对所有用户放行；
/// 提升权限的族在表中无规则时拒绝（secure by default）。
#[derive(Debug, Default)]
pub struct StaticAccessPolicy {
    access: AccessConfig,
}

impl StaticAccessPolicy {
    pub fn new(access: AccessConfig) -> Self {
        Self { access }
    }

    fn game_allowed(&self, user: &UserId, game_id: &str) -> bool {
        match self
            .access
            .games
            .iter()
            .find(|game| game.game_id == game_id)
        {
            Some(game) => {
                if game.participants.iter().any(|p| p == user.as_str()) {
                    return true;
                }
                game.allow_spectators
            }
            // 未登记的对局没有参与者信息，拒绝（默认策略）
            None => false,
        }
    }

    fn tournament_allowed(&self, user: &UserId, slug: &str) -> bool {
        if !self
            .access
            .private_tournaments
            .iter()
            .any(|t| t == slug)
        {
            // 公开锦标赛对所有用户开放
            return true;
        }

        self.access
            .tournament_invitees
            .get(slug)
            .map(|invitees| invitees.iter().any(|i| i == user.as_str()))
            .unwrap_or(false)
    }

    fn moderation_allowed(&self, user: &UserId) -> bool {
        self.access.moderators.iter().any(|m| m == user.as_str())
    }
}

#[async_trait]
impl AccessPolicy for StaticAccessPolicy {
    async fn is_authorized(&self, user: &UserId, family: RealmFamily, key: Option<&str>) -> bool {
        let allowed = match family {
            RealmFamily::Lobby | RealmFamily::GameWatch | RealmFamily::Static => true,
            RealmFamily::Game => key.map(|id| self.game_allowed(user, id)).unwrap_or(false),
            RealmFamily::Tournament => key
                .map(|slug| self.tournament_allowed(user, slug))
                .unwrap_or(false),
            RealmFamily::Moderation => self.moderation_allowed(user),
        };

        debug!(
            user = %user,
            family = %family,
            key = key.unwrap_or("-"),
            allowed,
            "access policy decision"
        );

        allowed
    }
}
