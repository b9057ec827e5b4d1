//! 动态配置缓存
//!
//! 启动时从 `system_settings` 表加载，管理员修改设置后热更新。
//! 读取不到时回退到静态配置。

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;

static DYNAMIC_CONFIG: OnceLock<RwLock<DynamicConfigCache>> = OnceLock::new();

#[derive(Debug, Default)]
struct DynamicConfigCache {
    settings: HashMap<String, String>,
    initialized: bool,
}

/// 动态配置访问接口
pub struct DynamicConfig;

impl DynamicConfig {
    /// 在应用启动时调用
    pub async fn init(settings: Vec<(String, String)>) {
        let cache = DYNAMIC_CONFIG.get_or_init(|| RwLock::new(DynamicConfigCache::default()));

        let mut guard = cache.write().await;
        guard.settings = settings.into_iter().collect();
        guard.initialized = true;

        tracing::info!(
            "Dynamic settings loaded: {} entries",
            guard.settings.len()
        );
    }

    pub async fn update(key: &str, value: &str) {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            let mut guard = cache.write().await;
            guard.settings.insert(key.to_string(), value.to_string());
            tracing::debug!("Dynamic setting updated: {} = {}", key, value);
        }
    }

    /// 空字符串视为未设置
    async fn get_string(key: KnownSettingKey) -> Option<String> {
        let cache = DYNAMIC_CONFIG.get()?;
        let guard = cache.read().await;
        guard
            .settings
            .get(key.as_str())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    async fn get_i64(key: KnownSettingKey) -> Option<i64> {
        Self::get_string(key).await.and_then(|v| v.parse().ok())
    }

    pub async fn system_name() -> String {
        Self::get_string(KnownSettingKey::SystemName)
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    /// Access Token 有效期（分钟）
    pub async fn access_token_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::AccessTokenExpiry)
            .await
            .filter(|minutes| *minutes > 0)
            .unwrap_or_else(|| AppConfig::get().jwt.access_token_expiry)
    }

    /// 管理员指定的当前学期
    pub async fn current_period() -> Option<i64> {
        Self::get_i64(KnownSettingKey::CurrentPeriod).await
    }

    /// 管理员指定的报名学期
    pub async fn enrollment_period() -> Option<i64> {
        Self::get_i64(KnownSettingKey::EnrollmentPeriod).await
    }

    pub async fn is_initialized() -> bool {
        match DYNAMIC_CONFIG.get() {
            Some(cache) => cache.read().await.initialized,
            None => false,
        }
    }
}
