/*!
 * 基于权限字符串的访问控制中间件
 *
 * 与 [`RequireRole`](super::RequireRole) 一样挂在 RequireJWT 之后，检查
 * [`AuthContext::can`]。管理员总是放行。
 *
 * ```rust,ignore
 * web::scope("/api/v1/admin/enrollments")
 *     .wrap(RequirePermission::new(Permission::ENROLLMENTS_VIEW))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{ErrorCode, auth::entities::AuthContext};

use super::create_error_response;

#[derive(Clone)]
pub struct RequirePermission {
    permission: &'static str,
}

impl RequirePermission {
    pub fn new(permission: &'static str) -> Self {
        Self { permission }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            permission: self.permission,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    permission: &'static str,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let permission = self.permission;

        Box::pin(async move {
            let allowed = req
                .extensions()
                .get::<AuthContext>()
                .map(|ctx| (ctx.user_id, ctx.can(permission)));

            match allowed {
                Some((_, true)) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some((user_id, false)) => {
                    info!("User {} lacks permission '{}'", user_id, permission);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Permission;
    use crate::models::users::entities::UserRole;
    use actix_web::{App, HttpResponse, test, web};

    fn inject(role: UserRole, permissions: &[&str]) -> AuthContext {
        AuthContext {
            user_id: 3,
            username: "clerk".to_string(),
            role,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    async fn status_for(ctx: Option<AuthContext>) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::resource("/enrollments")
                    .wrap(RequirePermission::new(Permission::ENROLLMENTS_DELETE))
                    .route(web::delete().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;
        let req = test::TestRequest::delete().uri("/enrollments").to_request();
        if let Some(ctx) = ctx {
            req.extensions_mut().insert(ctx);
        }
        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_permission_gate() {
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(Some(inject(UserRole::Secretary, &[Permission::ENROLLMENTS_VIEW]))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(Some(inject(UserRole::Secretary, &[Permission::ENROLLMENTS_DELETE]))).await,
            StatusCode::OK
        );
        assert_eq!(status_for(Some(inject(UserRole::Admin, &[]))).await, StatusCode::OK);
    }
}
