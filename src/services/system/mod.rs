pub mod settings;
pub mod settings_cache;

pub use settings_cache::DynamicConfig;

use actix_web::{HttpRequest, HttpResponse};

use crate::errors::Result;
use crate::models::system::requests::UpdateSettingRequest;

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn list_settings(&self, request: &HttpRequest) -> Result<HttpResponse> {
        settings::list_settings(request).await
    }

    pub async fn update_setting(
        &self,
        request: &HttpRequest,
        key: String,
        body: UpdateSettingRequest,
    ) -> Result<HttpResponse> {
        settings::update_setting(request, key, body).await
    }
}
