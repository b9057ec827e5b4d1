/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，并为本次请求解析出 [`AuthContext`]
 * （用户记录 + 权限列表），放入请求扩展。之后的中间件与处理函数只从扩展中读取身份。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireJWT;
 *
 * web::scope("/api/v1/admin")
 *     .wrap(RequireJWT)
 *     .route("/me", web::get().to(handler));
 *
 * async fn handler(req: HttpRequest) -> HttpResponse {
 *     let ctx = RequireJWT::extract_auth_context(&req);
 *     // ...
 * }
 * ```
 *
 * 解析结果按令牌缓存在 `ObjectCache` 中（键 `auth:{token}`），有效期取 `cache.default_ttl`。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::auth::entities::AuthContext;
use crate::models::users::entities::UserStatus;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

enum AuthFailure {
    Unauthorized(String),
    Internal(&'static str),
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 由用户 id 查出用户与权限，停用账号视为未认证
pub async fn load_auth_context(
    storage: &dyn Storage,
    user_id: i64,
) -> crate::errors::Result<Option<AuthContext>> {
    let Some(user) = storage.get_user_by_id(user_id).await? else {
        return Ok(None);
    };
    if user.status != UserStatus::Active {
        return Ok(None);
    }
    let permissions = storage.list_user_permissions(user.id).await?;

    Ok(Some(AuthContext {
        user_id: user.id,
        username: user.username,
        role: user.role,
        permissions,
    }))
}

async fn resolve_auth_context(req: &ServiceRequest) -> Result<AuthContext, AuthFailure> {
    let token = bearer_token(req).ok_or_else(|| {
        AuthFailure::Unauthorized("Missing or invalid Authorization header".to_string())
    })?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::Unauthorized("Invalid JWT token".to_string())
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(AuthFailure::Internal("Cache not found in app data"))?;

    let cache_key = format!("auth:{token}");
    match cache.get_json::<AuthContext>(&cache_key).await {
        CacheResult::Found(ctx) => return Ok(ctx),
        _ => debug!("Auth context not cached for user {}", claims.sub),
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(AuthFailure::Internal("Storage not found in app data"))?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| AuthFailure::Unauthorized("Invalid user ID in JWT".to_string()))?;

    let ctx = load_auth_context(storage.as_ref(), user_id)
        .await
        .map_err(|e| {
            error!("Failed to load auth context for user {}: {}", user_id, e);
            AuthFailure::Internal("Failed to retrieve user")
        })?
        .ok_or_else(|| AuthFailure::Unauthorized("User not found or inactive".to_string()))?;

    cache
        .insert_json(cache_key, &ctx, AppConfig::get().cache.default_ttl)
        .await;

    Ok(ctx)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match resolve_auth_context(&req).await {
                Ok(ctx) => {
                    debug!("JWT authentication successful for ID: {}", ctx.user_id);
                    req.extensions_mut().insert(ctx);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(AuthFailure::Unauthorized(err)) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(AuthFailure::Internal(err)) => {
                    error!("Authentication aborted: {}", err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Internal Server Error",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取出授权上下文，仅在 RequireJWT 之后可用
    pub fn extract_auth_context(req: &actix_web::HttpRequest) -> Option<AuthContext> {
        req.extensions().get::<AuthContext>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::Permission;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing::{insert_user, memory_storage};

    #[tokio::test]
    async fn test_load_auth_context_carries_permissions() {
        let storage = memory_storage().await;
        let id = insert_user(&storage, "sofia", "Sofia", "Rey").await;
        storage
            .grant_permissions(id, &[Permission::ENROLLMENTS_VIEW])
            .await
            .unwrap();

        let ctx = load_auth_context(&storage, id).await.unwrap().unwrap();
        assert_eq!(ctx.username, "sofia");
        assert_eq!(ctx.permissions, vec!["enrollments.view".to_string()]);
        assert_ne!(ctx.role, UserRole::Admin);

        assert!(load_auth_context(&storage, 999).await.unwrap().is_none());
    }
}
