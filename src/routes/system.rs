use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::system::requests::UpdateSettingRequest;
use crate::models::users::entities::UserRole;
use crate::services::SystemService;
use crate::services::panel::respond;
use crate::utils::SafeSettingKey;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn list_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    respond(SYSTEM_SERVICE.list_settings(&request).await)
}

pub async fn update_setting(
    request: HttpRequest,
    key: SafeSettingKey,
    body: web::Json<UpdateSettingRequest>,
) -> ActixResult<HttpResponse> {
    respond(
        SYSTEM_SERVICE
            .update_setting(&request, key.0, body.into_inner())
            .await,
    )
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .wrap(middleware::Compress::default())
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/settings", web::get().to(list_settings))
            .route("/settings/{key}", web::put().to(update_setting)),
    );
}
