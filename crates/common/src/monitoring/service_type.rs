//! Service type definitions
//!
//! Defines the types of services supported by the system

use serde::{Deserialize, Serialize};
use strum::Display;

/// Service type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, Display, PartialEq, Eq)]
pub enum ServiceType {
    /// Realm 注册服务
    Registry,
}
