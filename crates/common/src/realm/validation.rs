//! Realm 寻址校验逻辑
//!
//! 在任何族匹配或权限查找之前执行的结构校验

use super::error::RealmError;
use super::model::{RealmPath, UserId};

/// 路径长度上限
pub const MAX_PATH_LEN: usize = 256;

/// 用户标识长度上限
pub const MAX_USER_ID_LEN: usize = 64;

/// 校验请求路径的寻址格式
///
/// 规则：非空、以 `/` 开头、长度受限、仅允许寻址字符集
/// （字母数字与 `-` `_` `.` `/`）。
pub fn validate_path(path: &RealmPath) -> Result<(), RealmError> {
    let raw = path.as_str();

    if raw.is_empty() {
        return Err(RealmError::malformed("path must not be empty"));
    }
    if !raw.starts_with('/') {
        return Err(RealmError::malformed(format!(
            "path must be absolute, got '{raw}'"
        )));
    }
    if raw.len() > MAX_PATH_LEN {
        return Err(RealmError::malformed(format!(
            "path exceeds {MAX_PATH_LEN} bytes"
        )));
    }
    if let Some(bad) = raw.chars().find(|c| !is_path_char(*c)) {
        return Err(RealmError::malformed(format!(
            "path contains character outside addressing scheme: '{bad}'"
        )));
    }

    Ok(())
}

/// 校验用户标识的寻址格式
///
/// 用户标识同时用作回传通道地址，因此限制为字母数字与 `-` `_` `.`。
pub fn validate_user_id(user: &UserId) -> Result<(), RealmError> {
    let raw = user.as_str();

    if raw.is_empty() {
        return Err(RealmError::malformed("user_id must not be empty"));
    }
    if raw.len() > MAX_USER_ID_LEN {
        return Err(RealmError::malformed(format!(
            "user_id exceeds {MAX_USER_ID_LEN} bytes"
        )));
    }
    if let Some(bad) = raw.chars().find(|c| !is_user_id_char(*c)) {
        return Err(RealmError::malformed(format!(
            "user_id contains character outside addressing scheme: '{bad}'"
        )));
    }

    Ok(())
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')
}

fn is_user_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}
