//! 课程节奏：没有删除，只能停用与恢复

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::admin::resources::rhythm;
use crate::admin::{DescriptorContext, FormInput, ListQuery, Operation, ResourceDescriptor};
use crate::errors::{AcademyError, Result};
use crate::models::auth::entities::AuthContext;
use crate::models::lookups::entities::Rhythm;
use crate::models::lookups::requests::RhythmInput;
use crate::models::{ApiResponse, PaginatedResponse};
use crate::services::panel::{PanelResource, auth_from, build_context, require_operation, storage_from};
use crate::storage::Storage;

#[derive(Default)]
pub struct RhythmService;

fn rhythm_input(input: &FormInput) -> Result<RhythmInput> {
    Ok(RhythmInput {
        name: input.required_text("name")?,
        default_volume: input.required_f64("default_volume")?,
        product_code: input.text("product_code"),
        lms_id: input.text("lms_id"),
    })
}

#[async_trait::async_trait]
impl PanelResource for RhythmService {
    type Row = Rhythm;

    fn descriptor(&self, ctx: &DescriptorContext) -> ResourceDescriptor<Rhythm> {
        rhythm::descriptor(ctx)
    }

    async fn list(&self, storage: &dyn Storage, query: &ListQuery) -> Result<PaginatedResponse<Rhythm>> {
        storage.list_rhythms(query).await
    }

    async fn find(&self, storage: &dyn Storage, id: i64) -> Result<Option<Rhythm>> {
        storage.get_rhythm(id).await
    }

    async fn create(
        &self,
        storage: &dyn Storage,
        input: &FormInput,
        _ctx: &DescriptorContext,
    ) -> Result<Rhythm> {
        storage.create_rhythm(rhythm_input(input)?).await
    }

    async fn update(
        &self,
        storage: &dyn Storage,
        id: i64,
        input: &FormInput,
        _auth: &AuthContext,
    ) -> Result<Option<Rhythm>> {
        storage.update_rhythm(id, rhythm_input(input)?).await
    }
}

impl RhythmService {
    /// 停用或恢复
    pub async fn toggle(&self, request: &HttpRequest, id: i64) -> Result<HttpResponse> {
        let storage = storage_from(request)?;
        let auth = auth_from(request)?;
        let ctx = build_context(storage.as_ref(), &auth, Operation::Toggle).await?;
        require_operation(self.descriptor(&ctx).allows(Operation::Toggle), Operation::Toggle)?;

        let rhythm = storage
            .toggle_rhythm(id, auth.user_id)
            .await?
            .ok_or_else(|| AcademyError::not_found(format!("Rhythm {id} not found")))?;

        info!(
            "User {} {} rhythm {}",
            auth.user_id,
            if rhythm.is_active() { "restored" } else { "disabled" },
            id
        );
        Ok(HttpResponse::Ok().json(ApiResponse::success(rhythm, "Rhythm toggled successfully")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rhythm_input_requires_volume() {
        let form = FormInput::from_json(json!({"name": "Intensive", "default_volume": ""})).unwrap();
        assert!(rhythm_input(&form).is_err());

        let form =
            FormInput::from_json(json!({"name": "Intensive", "default_volume": 42.5, "lms_id": " "}))
                .unwrap();
        let input = rhythm_input(&form).unwrap();
        assert_eq!(input.default_volume, 42.5);
        assert_eq!(input.lms_id, None);
    }
}
