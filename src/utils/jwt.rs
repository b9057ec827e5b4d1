use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::models::users::entities::UserRole;

// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // 用户 ID
    pub role: String, // 签发时的角色，仅供参考，权限以数据库为准
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    /// 访问令牌有效期（秒）
    pub fn access_token_ttl() -> i64 {
        AppConfig::get().jwt.access_token_expiry * 60
    }

    /// 生成访问令牌，有效期取自配置（分钟）
    pub fn generate_access_token(
        user_id: i64,
        role: &UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::generate_with_expiry(
            user_id,
            role,
            chrono::Duration::seconds(Self::access_token_ttl()),
        )
    }

    pub fn generate_with_expiry(
        user_id: i64,
        role: &UserRole,
        expiry: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret().as_ref()),
        )
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret().as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip_and_expiry() {

        let token = JwtUtils::generate_access_token(12, &UserRole::Secretary).unwrap();
        let claims = JwtUtils::verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id(), Some(12));
        assert_eq!(claims.role, "secretary");

        let expired =
            JwtUtils::generate_with_expiry(12, &UserRole::Admin, chrono::Duration::minutes(-10))
                .unwrap();
        assert!(JwtUtils::verify_access_token(&expired).is_err());
        assert!(JwtUtils::verify_access_token("not-a-token").is_err());
    }
}
