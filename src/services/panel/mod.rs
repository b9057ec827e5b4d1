//! 后台面板的通用请求处理
//!
//! 各资源服务只声明描述符与存储调用，列表、表单、校验、导出等流程都在这里。

pub mod options;
pub mod resource;

pub use resource::PanelResource;

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde_json::Value;
use tracing::error;

use crate::admin::{CurrencyAffix, DescriptorContext, FieldErrors, FormInput, Operation};
use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use crate::middlewares::RequireJWT;
use crate::models::auth::entities::AuthContext;
use crate::models::courses::entities::Period;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::system::DynamicConfig;
use crate::storage::Storage;

/// JSON 或表单提交的请求体
pub type FormBody = web::Either<web::Json<Value>, web::Form<HashMap<String, String>>>;

pub(crate) fn form_input(body: FormBody) -> Result<FormInput> {
    match body {
        web::Either::Left(json) => FormInput::from_json(json.into_inner()),
        web::Either::Right(form) => Ok(FormInput::from_form(form.into_inner())),
    }
}

pub(crate) fn storage_from(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AcademyError::database_config("Storage not found in app data"))
}

pub(crate) fn auth_from(request: &HttpRequest) -> Result<AuthContext> {
    RequireJWT::extract_auth_context(request)
        .ok_or_else(|| AcademyError::authentication("Authentication required"))
}

pub(crate) fn require_permission(auth: &AuthContext, permission: &str) -> Result<()> {
    if auth.can(permission) {
        Ok(())
    } else {
        Err(AcademyError::authorization(format!(
            "Missing permission: {permission}"
        )))
    }
}

pub(crate) fn require_operation(allowed: bool, operation: Operation) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(AcademyError::authorization(format!(
            "Operation {operation:?} is not available here"
        )))
    }
}

pub(crate) fn error_response(err: &AcademyError) -> HttpResponse {
    if err.is_internal() {
        error!("{}", err.format_simple());
    }
    HttpResponse::build(err.status_code()).json(ApiResponse::from_error(err))
}

/// 字段校验失败，返回 422 与逐字段的错误信息
pub(crate) fn validation_failed(errors: FieldErrors) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(ApiResponse::error(
        ErrorCode::ValidationFailed,
        errors.0,
        "The given data was invalid.",
    ))
}

pub(crate) fn respond(result: Result<HttpResponse>) -> ActixResult<HttpResponse> {
    Ok(result.unwrap_or_else(|err| error_response(&err)))
}

pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// 默认学期与报名学期
///
/// 默认学期优先取设置中的学期，其次是包含今天的学期，最后是最近开始的学期；
/// 报名学期取设置中的学期，未设置或不存在时与默认学期相同。
pub async fn resolve_periods(
    storage: &dyn Storage,
    current_setting: Option<i64>,
    enrollment_setting: Option<i64>,
    today: &str,
) -> Result<(Option<Period>, Option<Period>)> {
    let default_period = storage.resolve_period(current_setting, today).await?;
    let enrollments_period = match enrollment_setting {
        Some(id) => storage.find_period(id).await?.or_else(|| default_period.clone()),
        None => default_period.clone(),
    };
    Ok((default_period, enrollments_period))
}

/// 构建描述符上下文，视图默认为全局
pub async fn build_context(
    storage: &dyn Storage,
    auth: &AuthContext,
    operation: Operation,
) -> Result<DescriptorContext> {
    let config = AppConfig::get();
    let today = today().format("%Y-%m-%d").to_string();
    let (default_period, enrollments_period) = resolve_periods(
        storage,
        DynamicConfig::current_period().await,
        DynamicConfig::enrollment_period().await,
        &today,
    )
    .await?;

    Ok(DescriptorContext::new(operation)
        .with_admin(auth.is_admin())
        .with_currency(CurrencyAffix::from_config(config))
        .with_scheduled_payments(config.invoicing.allow_scheduled_payments)
        .with_periods(default_period, enrollments_period)
        .with_external_campus(config.academy.external_campus_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::testing::{insert_period, memory_storage};

    #[tokio::test]
    async fn test_enrollments_period_follows_default_unless_set() {
        let storage = memory_storage().await;
        let old = insert_period(&storage, "2024-2", "2024-07-01", "2024-11-30").await;
        let current = insert_period(&storage, "2025-1", "2025-01-06", "2025-03-28").await;
        let next = insert_period(&storage, "2025-2", "2025-04-07", "2025-06-27").await;

        let (default, enrollments) = resolve_periods(&storage, None, None, "2025-02-10")
            .await
            .unwrap();
        assert_eq!(default.as_ref().map(|p| p.id), Some(current));
        assert_eq!(enrollments.map(|p| p.id), Some(current));

        let (default, enrollments) =
            resolve_periods(&storage, Some(old), Some(next), "2025-02-10")
                .await
                .unwrap();
        assert_eq!(default.map(|p| p.id), Some(old));
        assert_eq!(enrollments.map(|p| p.id), Some(next));

        let (_, enrollments) = resolve_periods(&storage, None, Some(999), "2025-02-10")
            .await
            .unwrap();
        assert_eq!(enrollments.map(|p| p.id), Some(current));
    }

    #[test]
    fn test_error_response_status() {
        let res = error_response(&AcademyError::conflict("Course has enrollments"));
        assert_eq!(res.status(), actix_web::http::StatusCode::CONFLICT);

        let mut errors = FieldErrors::default();
        errors.add("name", "The name field is required.");
        assert_eq!(
            validation_failed(errors).status(),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
