use actix_web::{HttpRequest, HttpResponse};
use tracing::{error, info};

use crate::errors::{AcademyError, Result};
use crate::models::ApiResponse;
use crate::models::auth::{requests::LoginRequest, responses::LoginResponse};
use crate::models::users::entities::{User, UserStatus};
use crate::services::panel::storage_from;
use crate::services::system::DynamicConfig;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

const LOGIN_FAILED: &str = "Username or password is incorrect";

/// 校验用户名（或邮箱）与密码，停用账户与密码错误返回相同的信息
pub async fn authenticate(storage: &dyn Storage, login_request: &LoginRequest) -> Result<User> {
    let user = storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await?
        .ok_or_else(|| AcademyError::authentication(LOGIN_FAILED))?;

    if user.status != UserStatus::Active || !verify_password(&login_request.password, &user.password_hash) {
        return Err(AcademyError::authentication(LOGIN_FAILED));
    }
    Ok(user)
}

pub async fn handle_login(login_request: LoginRequest, request: &HttpRequest) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let user = authenticate(storage.as_ref(), &login_request).await?;

    // 登录时间写入失败不影响登录
    if let Err(e) = storage.update_last_login(user.id).await {
        error!("Failed to update last login for user {}: {}", user.id, e);
    }

    let expires_in = DynamicConfig::access_token_expiry().await * 60;
    let access_token =
        JwtUtils::generate_with_expiry(user.id, &user.role, chrono::Duration::seconds(expires_in))
            .map_err(|e| {
                error!("Failed to generate JWT token: {}", e);
                AcademyError::authentication("Login failed, unable to generate token")
            })?;

    info!("User {} logged in successfully", user.username);

    let response = LoginResponse {
        access_token,
        expires_in,
        user,
        created_at: chrono::Utc::now(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::testing::memory_storage;
    use crate::utils::password::hash_password;

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let storage = memory_storage().await;
        storage
            .create_user(CreateUserRequest {
                username: "secretary".to_string(),
                email: "office@example.com".to_string(),
                password: hash_password("correct horse").unwrap(),
                firstname: "Front".to_string(),
                lastname: "Desk".to_string(),
                role: UserRole::Secretary,
            })
            .await
            .unwrap();

        let user = authenticate(&storage, &login("office@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(user.username, "secretary");

        let err = authenticate(&storage, &login("secretary", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::Authentication(_)));

        let err = authenticate(&storage, &login("nobody", "correct horse"))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::Authentication(_)));
    }
}
