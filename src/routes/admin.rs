use actix_web::web;

use super::panel::panel_routes;
use crate::middlewares;
use crate::models::auth::entities::Permission;
use crate::models::users::entities::UserRole;
use crate::services::{
    ExternalCourseService, GradeTypeService, ResultTypeService, RhythmService, RoomService,
};

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        panel_routes::<ExternalCourseService>(web::scope("/api/v1/admin/externalcourses"))
            .wrap(middlewares::RequirePermission::new(Permission::COURSES_EDIT))
            .wrap(middlewares::RequireJWT),
    );

    // 成绩类型的分类检索与行内创建需要在 `/{id}` 之前注册
    cfg.service(
        panel_routes::<GradeTypeService>(
            web::scope("/api/v1/admin/gradetypes")
                .route("/fetch/category", web::get().to(super::lookups::fetch_categories))
                .route(
                    "/inline-create/category",
                    web::post().to(super::lookups::inline_create_category),
                ),
        )
        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
        .wrap(middlewares::RequireJWT),
    );

    cfg.service(
        panel_routes::<ResultTypeService>(web::scope("/api/v1/admin/resulttypes"))
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT),
    );

    cfg.service(
        panel_routes::<RhythmService>(
            web::scope("/api/v1/admin/rhythms")
                .route("/{id}/toggle", web::post().to(super::lookups::toggle_rhythm)),
        )
        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
        .wrap(middlewares::RequireJWT),
    );

    cfg.service(
        panel_routes::<RoomService>(web::scope("/api/v1/admin/rooms"))
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT),
    );
}
