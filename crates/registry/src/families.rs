//! Realm 族匹配表
//!
//! 路径按固定顺序与封闭的族列表匹配，新增族是编译期检查的修改
//! 而不是运行时注册表的动态扩展

use realmgate_common::realm::{RealmId, RealmPath, UserId};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Realm 族枚举
///
/// 每个族对应一种路径形状与一条 Realm 派生规则。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum RealmFamily {
    /// 大厅：`/` 或 `/lobby`
    Lobby,
    /// 对局房间：`/game/{id}`
    Game,
    /// 对局旁观：`/gametv/{id}`
    GameWatch,
    /// 锦标赛房间：`/tournament/{slug}`
    Tournament,
    /// 仲裁频道：`/admin`
    Moderation,
    /// 已知的无实时视图页面（`/about` 等），解析为空集合
    Static,
}

/// 已知的无实时视图页面
const STATIC_PAGES: &[&str] = &["/about", "/settings", "/terms", "/password"];

/// 一次成功的族匹配结果
///
/// `key` 是路径中嵌入的对象标识（对局 ID、锦标赛 slug），
/// 供授权检查使用；`realms` 按族声明的顺序排列，主 Realm 在首位。
#[derive(Debug, Clone)]
pub struct FamilyMatch {
    pub family: RealmFamily,
    pub key: Option<String>,
    pub realms: Vec<RealmId>,
}

/// 将路径归类到 Realm 族并派生 Realm 集合
///
/// 返回 `None` 表示路径未命中任何族（调用方应报 NotFound）。
/// 派生是 (path, user) 的纯函数：相同输入产生相同的有序集合。
pub fn match_path(path: &RealmPath, user: &UserId) -> Option<FamilyMatch> {
    let raw = path.as_str();

    // 大厅：认证用户额外获得个人通知 Realm
    if raw == "/" || raw == "/lobby" {
        let mut realms = vec![RealmId::new("lobby-global")];
        if !user.is_anonymous() {
            realms.push(RealmId::new(format!("{user}-notifications")));
        }
        return Some(FamilyMatch {
            family: RealmFamily::Lobby,
            key: None,
            realms,
        });
    }

    if let Some(id) = single_segment(raw, "/game/") {
        return Some(FamilyMatch {
            family: RealmFamily::Game,
            key: Some(id.to_string()),
            realms: vec![
                RealmId::new(format!("game-{id}")),
                RealmId::new(format!("chat-game-{id}")),
            ],
        });
    }

    if let Some(id) = single_segment(raw, "/gametv/") {
        return Some(FamilyMatch {
            family: RealmFamily::GameWatch,
            key: Some(id.to_string()),
            realms: vec![
                RealmId::new(format!("gametv-{id}")),
                RealmId::new(format!("chat-gametv-{id}")),
            ],
        });
    }

    if let Some(slug) = single_segment(raw, "/tournament/") {
        return Some(FamilyMatch {
            family: RealmFamily::Tournament,
            key: Some(slug.to_string()),
            realms: vec![
                RealmId::new(format!("tournament-{slug}")),
                RealmId::new(format!("chat-tournament-{slug}")),
            ],
        });
    }

    if raw == "/admin" {
        return Some(FamilyMatch {
            family: RealmFamily::Moderation,
            key: None,
            realms: vec![RealmId::new("moderation")],
        });
    }

    if STATIC_PAGES.contains(&raw) {
        return Some(FamilyMatch {
            family: RealmFamily::Static,
            key: None,
            realms: Vec::new(),
        });
    }

    None
}

/// 提取 `prefix` 之后的单段标识；多段或空段视为未命中
fn single_segment<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = raw.strip_prefix(prefix)?;
    if rest.is_empty() || rest.contains('/') {
        return None;
    }
    Some(rest)
}

/// Realm 类别
///
/// 分发阶段按 Realm 标识的前缀方案归类，选择对应的 Info Provider。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum RealmClass {
    Lobby,
    Notifications,
    Game,
    GameWatch,
    Tournament,
    Chat,
    Moderation,
}

impl RealmClass {
    /// 按前缀方案归类 Realm 标识
    pub fn classify(realm: &RealmId) -> Option<Self> {
        let raw = realm.as_str();

        if raw == "lobby-global" {
            Some(Self::Lobby)
        } else if raw.ends_with("-notifications") {
            Some(Self::Notifications)
        } else if raw.starts_with("chat-") {
            Some(Self::Chat)
        } else if raw.starts_with("gametv-") {
            Some(Self::GameWatch)
        } else if raw.starts_with("game-") {
            Some(Self::Game)
        } else if raw.starts_with("tournament-") {
            Some(Self::Tournament)
        } else if raw == "moderation" {
            Some(Self::Moderation)
        } else {
            None
        }
    }
}
