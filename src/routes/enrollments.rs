use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::admin::Operation;
use crate::middlewares;
use crate::models::auth::entities::Permission;
use crate::services::exports::EnrollmentExport;
use crate::services::panel::{FormBody, form_input, resource, respond};
use crate::services::{EnrollmentService, ExportService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);
static EXPORT_SERVICE: Lazy<ExportService> = Lazy::new(ExportService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    respond(ENROLLMENT_SERVICE.list(&req, query.into_inner()).await)
}

pub async fn export_enrollments(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    respond(ENROLLMENT_SERVICE.export(&req, query.into_inner()).await)
}

pub async fn describe_enrollments(
    req: HttpRequest,
    query: web::Query<super::panel::DescribeQuery>,
) -> ActixResult<HttpResponse> {
    let operation = query.operation.unwrap_or(Operation::List);
    respond(resource::describe(&*ENROLLMENT_SERVICE, &req, operation).await)
}

pub async fn show_enrollment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    respond(ENROLLMENT_SERVICE.show(&req, id.0).await)
}

pub async fn edit_enrollment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    respond(ENROLLMENT_SERVICE.edit_form(&req, id.0).await)
}

pub async fn update_enrollment(
    req: HttpRequest,
    id: SafeIDI64,
    body: FormBody,
) -> ActixResult<HttpResponse> {
    let result = match form_input(body) {
        Ok(input) => ENROLLMENT_SERVICE.update(&req, id.0, input).await,
        Err(e) => Err(e),
    };
    respond(result)
}

pub async fn cancel_enrollment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    respond(ENROLLMENT_SERVICE.cancel(&req, id.0).await)
}

pub async fn export_certificate(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    respond(
        EXPORT_SERVICE
            .enrollment_document(&req, id.0, EnrollmentExport::Certificate)
            .await,
    )
}

pub async fn export_result(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    respond(
        EXPORT_SERVICE
            .enrollment_document(&req, id.0, EnrollmentExport::Result)
            .await,
    )
}

pub async fn export_sheet(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    respond(
        EXPORT_SERVICE
            .enrollment_document(&req, id.0, EnrollmentExport::Sheet)
            .await,
    )
}

pub async fn export_course_results(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    respond(EXPORT_SERVICE.course_results(&req, id.0).await)
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin/enrollments")
            // 先执行 RequireJWT，再检查权限
            .wrap(middlewares::RequirePermission::new(Permission::ENROLLMENTS_VIEW))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_enrollments))
            .route("/descriptor", web::get().to(describe_enrollments))
            .route("/export", web::get().to(export_enrollments))
            .route("/{id}/edit", web::get().to(edit_enrollment))
            .route("/{id}/certificate", web::get().to(export_certificate))
            .route("/{id}/result", web::get().to(export_result))
            .route("/{id}/sheet", web::get().to(export_sheet))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(show_enrollment))
                    .route(web::put().to(update_enrollment))
                    .route(web::patch().to(update_enrollment))
                    .route(web::delete().to(cancel_enrollment)),
            ),
    );

    // 课程成绩导出，能力检查在服务层
    cfg.service(
        web::scope("/api/v1/admin/courses")
            .wrap(middlewares::RequireJWT)
            .route("/{id}/results", web::get().to(export_course_results)),
    );
}
