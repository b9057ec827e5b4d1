//! 成绩类型，以及分类的检索与行内创建

use actix_web::{HttpRequest, HttpResponse};
use tracing::info;

use crate::admin::resources::grade_type;
use crate::admin::validation::validate;
use crate::admin::{DescriptorContext, FormInput, ListQuery, Operation, ResourceDescriptor};
use crate::errors::Result;
use crate::models::auth::entities::AuthContext;
use crate::models::lookups::entities::GradeType;
use crate::models::lookups::requests::GradeTypeInput;
use crate::models::{ApiResponse, PaginatedResponse};
use crate::services::panel::{
    PanelResource, auth_from, build_context, require_operation, storage_from, validation_failed,
};
use crate::storage::Storage;

/// 分类检索每页条数
const CATEGORY_PAGE_SIZE: u64 = 10;

#[derive(Default)]
pub struct GradeTypeService;

fn grade_type_input(input: &FormInput) -> Result<GradeTypeInput> {
    Ok(GradeTypeInput {
        name: input.required_text("name")?,
        total: input.required_f64("total")?,
        category_id: input.required_i64("category_id")?,
    })
}

#[async_trait::async_trait]
impl PanelResource for GradeTypeService {
    type Row = GradeType;

    fn descriptor(&self, ctx: &DescriptorContext) -> ResourceDescriptor<GradeType> {
        grade_type::descriptor(ctx)
    }

    async fn list(
        &self,
        storage: &dyn Storage,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<GradeType>> {
        storage.list_grade_types(query).await
    }

    async fn find(&self, storage: &dyn Storage, id: i64) -> Result<Option<GradeType>> {
        storage.get_grade_type(id).await
    }

    async fn create(
        &self,
        storage: &dyn Storage,
        input: &FormInput,
        _ctx: &DescriptorContext,
    ) -> Result<GradeType> {
        storage.create_grade_type(grade_type_input(input)?).await
    }

    async fn update(
        &self,
        storage: &dyn Storage,
        id: i64,
        input: &FormInput,
        _auth: &AuthContext,
    ) -> Result<Option<GradeType>> {
        storage.update_grade_type(id, grade_type_input(input)?).await
    }

    async fn delete(&self, storage: &dyn Storage, id: i64, auth: &AuthContext) -> Result<bool> {
        storage.delete_grade_type(id, auth.user_id).await
    }
}

impl GradeTypeService {
    /// 关系字段的异步选项：按名称检索分类
    pub async fn fetch_categories(
        &self,
        request: &HttpRequest,
        term: Option<String>,
        page: Option<u64>,
    ) -> Result<HttpResponse> {
        let storage = storage_from(request)?;
        let auth = auth_from(request)?;
        let ctx = build_context(storage.as_ref(), &auth, Operation::Fetch).await?;
        require_operation(self.descriptor(&ctx).allows(Operation::Fetch), Operation::Fetch)?;

        let term = term.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let categories = storage
            .search_grade_type_categories(term, page.unwrap_or(1).max(1), CATEGORY_PAGE_SIZE)
            .await?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            categories,
            "Categories retrieved successfully",
        )))
    }

    /// 在成绩类型表单中直接新建分类
    pub async fn inline_create_category(
        &self,
        request: &HttpRequest,
        input: FormInput,
    ) -> Result<HttpResponse> {
        let storage = storage_from(request)?;
        let auth = auth_from(request)?;
        let ctx = build_context(storage.as_ref(), &auth, Operation::Create).await?;
        require_operation(self.descriptor(&ctx).allows(Operation::Create), Operation::Create)?;

        let errors = validate(&input, &grade_type::category_rules(), None, storage.as_ref()).await?;
        if !errors.is_empty() {
            return Ok(validation_failed(errors));
        }

        let category = storage
            .create_grade_type_category(&input.required_text("name")?)
            .await?;
        info!(
            "User {} created grade type category {}",
            auth.user_id, category.id
        );
        Ok(HttpResponse::Created().json(ApiResponse::success(
            category,
            "Category created successfully",
        )))
    }
}
