//! 系统设置存储实现

use sea_orm::{ActiveModelTrait, EntityTrait, Order, QueryOrder, Set, TransactionTrait};

use crate::entity::prelude::SystemSettings;
use crate::entity::system_settings::{ActiveModel, Column};
use crate::errors::{AcademyError, Result};
use crate::models::system::entities::SystemSetting;

use super::SeaOrmStorage;
use super::audit::{self, AuditAction};

impl SeaOrmStorage {
    /// 获取所有设置
    pub(crate) async fn list_all_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = SystemSettings::find()
            .order_by(Column::Key, Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("获取设置列表失败: {e}")))?;

        Ok(settings.into_iter().map(|s| s.into_setting()).collect())
    }

    /// 更新设置，旧值与新值记入审计日志
    pub(crate) async fn update_setting_impl(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
    ) -> Result<SystemSetting> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = SystemSettings::find_by_id(key.to_string())
            .one(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("获取设置失败: {e}")))?
            .ok_or_else(|| AcademyError::not_found(format!("Setting not found: {key}")))?;

        let old_value = existing.value.clone();

        let mut active_model: ActiveModel = existing.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.updated_by = Set(Some(user_id));

        let updated = active_model
            .update(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新设置失败: {e}")))?;

        audit::record(
            &txn,
            user_id,
            AuditAction::Update,
            "system_setting",
            key,
            Some(serde_json::json!({ "old_value": old_value, "new_value": value })),
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated.into_setting())
    }
}
