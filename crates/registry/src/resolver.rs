//! Realm 解析器
//!
//! 注册交换的同步半程：校验 → 族匹配 → Realm 派生 → 授权，
//! 全程无副作用，不触碰任何成员关系记录

use crate::acl::AccessPolicy;
use crate::families;
use realmgate_common::realm::validation::{validate_path, validate_user_id};
use realmgate_common::realm::{RealmError, RealmPath, RealmSet, UserId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Realm 解析器
///
/// 除授权查找（有界、只读）外是 (path, user) 的纯函数；
/// 后端状态不变时重复调用返回相同的有序集合。
pub struct RealmResolver {
    policy: Arc<dyn AccessPolicy>,
}

impl RealmResolver {
    pub fn new(policy: Arc<dyn AccessPolicy>) -> Self {
        Self { policy }
    }

    /// 将请求路径解析为该用户被授权观察的 Realm 集合
    ///
    /// 错误即整体失败：不返回部分集合。
    /// - `MalformedInput`: 在任何查找之前拒绝
    /// - `NotFound`: 路径未命中任何族（先于授权判定）
    /// - `AccessDenied`: 族命中但用户被拒绝
    pub async fn resolve(&self, path: &RealmPath, user: &UserId) -> Result<RealmSet, RealmError> {
        validate_path(path)?;
        validate_user_id(user)?;

        let matched = families::match_path(path, user)
            .ok_or_else(|| RealmError::not_found(path.as_str()))?;

        if !self
            .policy
            .is_authorized(user, matched.family, matched.key.as_deref())
            .await
        {
            warn!(
                user = %user,
                path = %path,
                family = %matched.family,
                "realm registration denied"
            );
            return Err(RealmError::access_denied(
                user.as_str(),
                matched.family.to_string(),
            ));
        }

        debug!(
            user = %user,
            path = %path,
            family = %matched.family,
            realms = matched.realms.len(),
            "realm path resolved"
        );

        Ok(RealmSet::new(matched.realms))
    }
}
