//! Realm 协议错误类型定义
//!
//! 注册阶段的错误会整体终止本次交换；分发阶段的错误按 Realm 隔离

use thiserror::Error;

/// Realm 注册协议错误
///
/// `MalformedInput` / `NotFound` / `AccessDenied` 属于解析阶段错误，
/// 同步返回给调用方；`InfoUnavailable` 属于分发阶段的单 Realm 局部失败。
#[derive(Debug, Error)]
pub enum RealmError {
    /// 请求形状非法（空字段、非法寻址字符），在任何查找之前拒绝
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    /// 路径未命中任何已知 Realm 族
    #[error("No realm family matches path: {path}")]
    NotFound { path: String },

    /// 族匹配成功但用户被拒绝
    #[error("Access denied for user '{user}' on family '{family}'")]
    AccessDenied { user: String, family: String },

    /// 单个 Realm 的初始化数据获取失败（不影响同批其他 Realm）
    #[error("Realm info unavailable for '{realm}': {reason}")]
    InfoUnavailable { realm: String, reason: String },
}

impl RealmError {
    /// 创建格式错误
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    /// 创建未知目的地错误
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// 创建拒绝访问错误
    pub fn access_denied(user: impl Into<String>, family: impl Into<String>) -> Self {
        Self::AccessDenied {
            user: user.into(),
            family: family.into(),
        }
    }

    /// 创建初始化数据不可用错误
    pub fn info_unavailable(realm: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InfoUnavailable {
            realm: realm.into(),
            reason: reason.into(),
        }
    }

    /// 稳定的机器可读原因码，供网关区分 "不存在" 与 "无权限"
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::NotFound { .. } => "unknown_destination",
            Self::AccessDenied { .. } => "access_denied",
            Self::InfoUnavailable { .. } => "info_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_distinct() {
        let errors = [
            RealmError::malformed("empty path"),
            RealmError::not_found("/unknown/xyz"),
            RealmError::access_denied("u2", "game"),
            RealmError::info_unavailable("lobby-global", "provider down"),
        ];

        let codes: std::collections::HashSet<_> =
            errors.iter().map(|e| e.reason_code()).collect();
        assert_eq!(codes.len(), errors.len());
    }
}
