//! Realm 协议核心值类型
//!
//! 全部为不可变的纯值类型，生命周期仅覆盖一次注册交换

use serde::{Deserialize, Serialize};
use std::fmt;

/// 匿名用户标识前缀
///
/// 网关为未登录会话分配 `anon-` 前缀的用户标识，
/// 部分 Realm 族对匿名用户派生较少的 Realm。
pub const ANONYMOUS_USER_PREFIX: &str = "anon-";

/// 客户端请求观察的路由键（例如大厅 URL 段、对局引用）
///
/// 对协议本身不透明，含义由解析规则表决定。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealmPath(String);

impl RealmPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RealmPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RealmPath {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

/// 已认证用户的不透明标识，由可信调用方提供（此处不再验证）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为匿名会话标识
    pub fn is_anonymous(&self) -> bool {
        self.0.starts_with(ANONYMOUS_USER_PREFIX)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// 逻辑频道标识
///
/// 仅由解析器产生；同一 (path, user) 在一次注册生命周期内保持稳定。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealmId(String);

impl RealmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RealmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RealmId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// 一次解析调用的结果：有序的 Realm 集合
///
/// 空集合是合法的非错误结果（路径解析成功但无需实时视图）。
/// 顺序仅对遗留调用方有意义：族定义主 Realm 时排在首位。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealmSet(Vec<RealmId>);

impl RealmSet {
    pub fn new(realms: Vec<RealmId>) -> Self {
        Self(realms)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// 遗留兼容：族声明的"主" Realm（集合首元素）
    ///
    /// 旧网关把首元素当作单数 "the realm" 使用。新集成方应将
    /// 集合视为无序整体，此方法仅为向后兼容保留。
    #[deprecated(note = "treat the realm set as a whole; ordering is legacy compatibility only")]
    pub fn primary(&self) -> Option<&RealmId> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RealmId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, realm: &RealmId) -> bool {
        self.0.contains(realm)
    }

    pub fn into_vec(self) -> Vec<RealmId> {
        self.0
    }

    pub fn as_slice(&self) -> &[RealmId] {
        &self.0
    }
}

impl IntoIterator for RealmSet {
    type Item = RealmId;
    type IntoIter = std::vec::IntoIter<RealmId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RealmSet {
    type Item = &'a RealmId;
    type IntoIter = std::slice::Iter<'a, RealmId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<RealmId> for RealmSet {
    fn from_iter<T: IntoIterator<Item = RealmId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 分发单元："该用户应收到这些 Realm 的初始化数据"
///
/// 在解析成功后构造，由 Info Dispatcher 消费。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmInfoBundle {
    pub user: UserId,
    pub realms: RealmSet,
}

impl RealmInfoBundle {
    pub fn new(user: UserId, realms: RealmSet) -> Self {
        Self { user, realms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_detection() {
        assert!(UserId::new("anon-3f2a").is_anonymous());
        assert!(!UserId::new("u1").is_anonymous());
        // 前缀必须位于开头
        assert!(!UserId::new("user-anon-1").is_anonymous());
    }

    #[test]
    fn test_realm_set_ordering_preserved() {
        let set = RealmSet::new(vec![
            RealmId::new("lobby-global"),
            RealmId::new("u1-notifications"),
        ]);

        let ids: Vec<&str> = set.iter().map(|r| r.as_str()).collect();
        assert_eq!(ids, vec!["lobby-global", "u1-notifications"]);
        #[allow(deprecated)]
        {
            assert_eq!(set.primary().unwrap().as_str(), "lobby-global");
        }
    }

    #[test]
    fn test_empty_set_is_valid() {
        let set = RealmSet::empty();
        assert!(set.is_empty());
        #[allow(deprecated)]
        {
            assert!(set.primary().is_none());
        }
    }

    #[test]
    fn test_realm_set_serde_transparent() {
        let set = RealmSet::new(vec![RealmId::new("game-abc123")]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["game-abc123"]"#);

        let parsed: RealmSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }
}
