use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use super::DynamicConfig;
use crate::admin::FieldErrors;
use crate::errors::{AcademyError, Result};
use crate::models::ApiResponse;
use crate::models::system::{
    entities::SystemSetting,
    requests::UpdateSettingRequest,
    responses::{AdminSettingsListResponse, SettingResponse},
};
use crate::services::panel::{auth_from, storage_from, validation_failed};
use crate::storage::Storage;

/// 获取所有系统设置
pub async fn list_settings(request: &HttpRequest) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let settings = storage.list_all_settings().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AdminSettingsListResponse { settings },
        "Settings retrieved successfully",
    )))
}

/// 按设置的值类型校验后写入
///
/// 值类型不符时返回字段错误，不写库。
pub async fn apply_setting(
    storage: &dyn Storage,
    key: &str,
    value: &str,
    user_id: i64,
) -> Result<std::result::Result<SystemSetting, FieldErrors>> {
    let current = storage
        .list_all_settings()
        .await?
        .into_iter()
        .find(|s| s.key == key)
        .ok_or_else(|| AcademyError::not_found(format!("Setting not found: {key}")))?;

    if let Err(message) = current.value_type.check(value) {
        let mut errors = FieldErrors::default();
        errors.add("value", message);
        return Ok(Err(errors));
    }

    let setting = storage.update_setting(key, value.trim(), user_id).await?;
    DynamicConfig::update(key, &setting.value).await;
    Ok(Ok(setting))
}

pub async fn update_setting(
    request: &HttpRequest,
    key: String,
    body: UpdateSettingRequest,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;

    let setting = match apply_setting(storage.as_ref(), &key, &body.value, auth.user_id).await? {
        Ok(setting) => setting,
        Err(errors) => return Ok(validation_failed(errors)),
    };
    info!("User {} updated setting {}", auth.user_id, key);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SettingResponse { setting },
        "Setting updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::testing::{insert_user, memory_storage};

    #[tokio::test]
    async fn test_apply_setting_checks_value_type() {
        let storage = memory_storage().await;
        let admin = insert_user(&storage, "root", "Ada", "Admin").await;

        let rejected = apply_setting(&storage, "academy.enrollment_period", "spring", admin)
            .await
            .unwrap();
        let errors = rejected.unwrap_err();
        assert!(errors.get("value").is_some());

        let err = apply_setting(&storage, "academy.missing", "1", admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::NotFound(_)));

        let setting = apply_setting(&storage, "academy.enrollment_period", " 7 ", admin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(setting.value, "7");
        assert_eq!(setting.updated_by, Some(admin));
    }
}
