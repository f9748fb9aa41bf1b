//! 监控模块
//!
//! 提供服务状态监控功能

pub mod service_info;
pub mod service_type;
pub mod status;

pub use service_info::ServiceInfo;
pub use service_type::ServiceType;
pub use status::ServiceState;
