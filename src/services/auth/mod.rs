pub mod login;

use actix_web::{HttpRequest, HttpResponse};

use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::auth::requests::LoginRequest;
use crate::services::panel::auth_from;

pub struct AuthService;

impl AuthService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 登录验证
    pub async fn login(&self, login_request: LoginRequest, request: &HttpRequest) -> Result<HttpResponse> {
        login::handle_login(login_request, request).await
    }

    // 当前用户的授权上下文
    pub async fn me(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let auth = auth_from(request)?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(auth, "Current user retrieved successfully")))
    }
}
