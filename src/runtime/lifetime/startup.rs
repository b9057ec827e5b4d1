//! 启动前的准备工作：存储与迁移、动态设置、初始管理员、缓存

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use crate::models::auth::entities::Permission;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::system::DynamicConfig;
use crate::storage::Storage;
use crate::utils::password::hash_password;

/// 配置的缓存后端不可用时使用
const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(name) else {
        warn!("Cache backend '{}' not found in registry", name);
        return None;
    };
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 按配置创建缓存，失败时回退到进程内缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }
    if cache_type != FALLBACK_CACHE {
        warn!("Falling back to {} cache", FALLBACK_CACHE);
        if let Some(cache) = try_cache_backend(FALLBACK_CACHE).await {
            return Ok(cache);
        }
    }

    Err(AcademyError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 从数据库加载动态设置，失败时以空设置启动（回退到静态配置）
async fn init_dynamic_config(storage: &dyn Storage) {
    match storage.list_all_settings().await {
        Ok(settings) => {
            DynamicConfig::init(settings.into_iter().map(|s| (s.key, s.value)).collect()).await;
        }
        Err(e) => {
            warn!("Failed to load dynamic settings: {}, using defaults", e);
            DynamicConfig::init(Vec::new()).await;
        }
    }
}

/// 数据库中没有任何用户时创建 `admin` 账号
///
/// 密码取 `ADMIN_PASSWORD`，未设置时生成一个并只在日志中出现一次。
pub async fn seed_admin(storage: &dyn Storage) -> Result<Option<i64>> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!("Database already has {} user(s), skipping admin seed", count);
        return Ok(None);
    }
    info!("No users found in database, creating default admin account...");

    let password = std::env::var("ADMIN_PASSWORD")
        .ok()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| {
            let generated = generate_random_password(16);
            warn!("ADMIN_PASSWORD is not set, generated admin password: {}", generated);
            generated
        });

    let user = storage
        .create_user(CreateUserRequest {
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
            password: hash_password(&password)?,
            firstname: "System".to_string(),
            lastname: "Administrator".to_string(),
            role: UserRole::Admin,
        })
        .await?;
    storage.grant_permissions(user.id, Permission::all()).await?;

    info!(
        "Default admin account created (ID: {}, username: {})",
        user.id, user.username
    );
    Ok(Some(user.id))
}

pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 另一个 provider 已安装时返回 Err，可以忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    init_dynamic_config(storage.as_ref()).await;

    if let Err(e) = seed_admin(storage.as_ref()).await {
        warn!("Failed to seed admin account: {}", e);
    }

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::testing::memory_storage;

    #[tokio::test]
    async fn test_seed_admin_only_once() {
        let storage = memory_storage().await;

        let admin_id = seed_admin(&storage).await.unwrap().unwrap();
        let admin = storage.get_user_by_id(admin_id).await.unwrap().unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        let permissions = storage.list_user_permissions(admin_id).await.unwrap();
        assert!(permissions.contains(&Permission::ENROLLMENTS_DELETE.to_string()));

        assert!(seed_admin(&storage).await.unwrap().is_none());
    }

    #[test]
    fn test_generated_password_length() {
        let password = generate_random_password(16);
        assert_eq!(password.chars().count(), 16);
    }
}
