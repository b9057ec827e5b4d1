/*!
 * 登录限流中间件
 *
 * 按客户端 IP 统计固定时间窗口内的请求次数，超过上限时直接返回 429。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RateLimit;
 *
 * web::resource("/login")
 *     .wrap(RateLimit::login())  // 5次/分钟/IP
 *     .route(web::post().to(login_handler))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 键: 前缀:IP，值: (窗口内计数, 窗口开始时间戳)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (u32, i64)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }
}

/// 客户端 IP，转发头仅在连接地址不可用时参考
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ip) = &connection_ip {
        if ip.parse::<IpAddr>().is_ok() {
            return ip.clone();
        }
    }

    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| ip.parse::<IpAddr>().is_ok());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many attempts, please try again later",
        ))
}

/// 记录一次请求，返回是否仍在限额内以及距窗口结束的秒数
async fn hit(key: &str, max_requests: u32, window_secs: u64, now: i64) -> (bool, u64) {
    let window = window_secs as i64;
    let (count, started) = match RATE_LIMIT_CACHE.get(key).await {
        Some((count, started)) if now - started < window => (count, started),
        _ => (0, now),
    };
    let retry_after = (started + window - now).max(1) as u64;

    if count >= max_requests {
        return (false, retry_after);
    }
    RATE_LIMIT_CACHE
        .insert(key.to_string(), (count + 1, started))
        .await;
    (true, retry_after)
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let cache_key = format!("{}:ip:{}", key_prefix, extract_client_ip(&req));
            let now = chrono::Utc::now().timestamp();

            let (allowed, retry_after) = hit(&cache_key, max_requests, window_secs, now).await;
            if !allowed {
                warn!("Rate limit exceeded for key: {}", cache_key);
                return Ok(req.into_response(
                    create_rate_limit_response(retry_after).map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    #[tokio::test]
    async fn test_window_resets() {
        let key = "unit:ip:10.0.0.1";
        assert!(hit(key, 2, 60, 1_000).await.0);
        assert!(hit(key, 2, 60, 1_010).await.0);

        let (allowed, retry_after) = hit(key, 2, 60, 1_020).await;
        assert!(!allowed);
        assert_eq!(retry_after, 40);

        assert!(hit(key, 2, 60, 1_061).await.0);
    }

    #[actix_web::test]
    async fn test_third_request_is_rejected() {
        let app = test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(RateLimit::new(2, 60).with_prefix("login-test"))
                    .route(web::post().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let peer = "192.168.10.20:5000".parse().unwrap();
        for expected in [StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS] {
            let req = test::TestRequest::post()
                .uri("/login")
                .peer_addr(peer)
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), expected);
        }
    }
}
