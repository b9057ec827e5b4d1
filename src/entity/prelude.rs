//! 预导入模块，方便使用

pub use super::audit_logs::Entity as AuditLogs;
pub use super::system_settings::Entity as SystemSettings;
