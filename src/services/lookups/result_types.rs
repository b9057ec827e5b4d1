use crate::admin::resources::result_type;
use crate::admin::{DescriptorContext, FormInput, ListQuery, ResourceDescriptor};
use crate::errors::Result;
use crate::models::PaginatedResponse;
use crate::models::auth::entities::AuthContext;
use crate::models::lookups::entities::ResultType;
use crate::models::lookups::requests::ResultTypeInput;
use crate::services::panel::PanelResource;
use crate::storage::Storage;

#[derive(Default)]
pub struct ResultTypeService;

fn result_type_input(input: &FormInput) -> Result<ResultTypeInput> {
    Ok(ResultTypeInput {
        name: input.required_text("name")?,
        description: input.text("description"),
    })
}

#[async_trait::async_trait]
impl PanelResource for ResultTypeService {
    type Row = ResultType;

    fn descriptor(&self, ctx: &DescriptorContext) -> ResourceDescriptor<ResultType> {
        result_type::descriptor(ctx)
    }

    async fn list(
        &self,
        storage: &dyn Storage,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<ResultType>> {
        storage.list_result_types(query).await
    }

    async fn find(&self, storage: &dyn Storage, id: i64) -> Result<Option<ResultType>> {
        storage.get_result_type(id).await
    }

    async fn create(
        &self,
        storage: &dyn Storage,
        input: &FormInput,
        _ctx: &DescriptorContext,
    ) -> Result<ResultType> {
        storage.create_result_type(result_type_input(input)?).await
    }

    async fn update(
        &self,
        storage: &dyn Storage,
        id: i64,
        input: &FormInput,
        _auth: &AuthContext,
    ) -> Result<Option<ResultType>> {
        storage.update_result_type(id, result_type_input(input)?).await
    }

    async fn delete(&self, storage: &dyn Storage, id: i64, auth: &AuthContext) -> Result<bool> {
        storage.delete_result_type(id, auth.user_id).await
    }
}
