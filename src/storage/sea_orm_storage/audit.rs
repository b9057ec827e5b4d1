//! 审计日志写入

use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use crate::entity::audit_logs::ActiveModel;
use crate::errors::{AcademyError, Result};

/// 审计动作
#[derive(Debug, Clone, Copy)]
pub(crate) enum AuditAction {
    Update,
    Delete,
    Cancel,
    Toggle,
}

impl AuditAction {
    fn as_str(self) -> &'static str {
        match self {
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Cancel => "cancel",
            AuditAction::Toggle => "toggle",
        }
    }
}

/// 在给定连接（或事务）上写入一条审计记录
pub(crate) async fn record<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    action: AuditAction,
    entity_type: &str,
    entity_id: impl ToString,
    details: Option<serde_json::Value>,
) -> Result<()> {
    ActiveModel {
        user_id: Set(user_id),
        action: Set(action.as_str().to_string()),
        entity_type: Set(entity_type.to_string()),
        entity_id: Set(entity_id.to_string()),
        details: Set(details.map(|d| d.to_string())),
        created_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| AcademyError::database_operation(format!("写入审计日志失败: {e}")))?;
    Ok(())
}
