use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};

/// 哈希密码（Argon2id，参数取自配置）
pub fn hash_password(password: &str) -> Result<String> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| AcademyError::validation(format!("Invalid Argon2 parameters: {e}")))?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AcademyError::validation(format!("Password hashing failed: {e}")))
}

/// 验证密码，哈希格式无效时视为不匹配
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("Correct-Horse-9").unwrap();
        assert!(verify_password("Correct-Horse-9", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("Correct-Horse-9", "plain-text"));
    }
}
