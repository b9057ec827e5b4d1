//! 通用资源操作
//!
//! 资源实现 [`PanelResource`]，其余流程（权限、描述符、校验、渲染、导出）由这里的函数完成。

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, http::header};
use serde::Serialize;
use tracing::{info, warn};
use ts_rs::TS;

use crate::admin::export::{export_filename, rows_to_csv};
use crate::admin::validation::validate;
use crate::admin::{
    AdminRow, DescriptorContext, FormInput, ListParams, ListQuery, Operation, ResourceDescriptor,
    plan_list, render_rows,
};
use crate::errors::{AcademyError, Result};
use crate::models::auth::entities::AuthContext;
use crate::models::panel::responses::{PanelFormResponse, PanelListResponse, WidgetData};
use crate::models::{ApiResponse, PaginatedResponse};
use crate::storage::Storage;

use super::options::resolve_view;
use super::{
    auth_from, build_context, require_operation, storage_from, today, validation_failed,
};

/// 导出时每次读取的行数
const EXPORT_CHUNK: u64 = 100;

#[async_trait::async_trait]
pub trait PanelResource: Send + Sync {
    type Row: AdminRow + Serialize + TS + Send + Sync;

    fn descriptor(&self, ctx: &DescriptorContext) -> ResourceDescriptor<Self::Row>;

    async fn list(
        &self,
        storage: &dyn Storage,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<Self::Row>>;

    async fn find(&self, storage: &dyn Storage, id: i64) -> Result<Option<Self::Row>>;

    async fn create(
        &self,
        _storage: &dyn Storage,
        _input: &FormInput,
        _ctx: &DescriptorContext,
    ) -> Result<Self::Row> {
        Err(AcademyError::authorization("Create is not available here"))
    }

    async fn update(
        &self,
        _storage: &dyn Storage,
        _id: i64,
        _input: &FormInput,
        _auth: &AuthContext,
    ) -> Result<Option<Self::Row>> {
        Err(AcademyError::authorization("Update is not available here"))
    }

    /// 返回 `false` 表示记录不存在
    async fn delete(&self, _storage: &dyn Storage, _id: i64, _auth: &AuthContext) -> Result<bool> {
        Err(AcademyError::authorization("Delete is not available here"))
    }

    /// 列表页挂件
    async fn widgets(
        &self,
        _storage: &dyn Storage,
        _descriptor: &ResourceDescriptor<Self::Row>,
        _ctx: &DescriptorContext,
    ) -> Result<Vec<WidgetData>> {
        Ok(Vec::new())
    }

    /// 编辑表单需要记录本身参与构建描述符时覆盖
    fn edit_context(&self, ctx: DescriptorContext, _entry: &Self::Row) -> DescriptorContext {
        ctx
    }
}

pub async fn list<P: PanelResource>(
    resource: &P,
    request: &HttpRequest,
    query: HashMap<String, String>,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;
    let ctx = build_context(storage.as_ref(), &auth, Operation::List).await?;
    list_with_context(resource, storage.as_ref(), ctx, ListParams::from_query(query)).await
}

pub async fn list_with_context<P: PanelResource>(
    resource: &P,
    storage: &dyn Storage,
    ctx: DescriptorContext,
    params: ListParams,
) -> Result<HttpResponse> {
    let descriptor = resource.descriptor(&ctx);
    require_operation(descriptor.allows(Operation::List), Operation::List)?;

    let (query, active_filters) = plan_list(&descriptor, &params, &ctx)?;
    let page = resource.list(storage, &query).await?;
    let widgets = resource.widgets(storage, &descriptor, &ctx).await?;

    let response = PanelListResponse {
        rows: render_rows(&descriptor.columns, &page.items),
        pagination: page.pagination,
        active_filters,
        widgets,
        buttons: serde_json::to_value(&descriptor.buttons)?,
        operations: serde_json::to_value(&descriptor.operations)?,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "List retrieved successfully")))
}

pub async fn export<P: PanelResource>(
    resource: &P,
    request: &HttpRequest,
    query: HashMap<String, String>,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;
    let ctx = build_context(storage.as_ref(), &auth, Operation::Export).await?;
    export_with_context(resource, storage.as_ref(), &auth, ctx, ListParams::from_query(query)).await
}

/// 导出当前筛选条件下的全部行
pub async fn export_with_context<P: PanelResource>(
    resource: &P,
    storage: &dyn Storage,
    auth: &AuthContext,
    ctx: DescriptorContext,
    params: ListParams,
) -> Result<HttpResponse> {
    let descriptor = resource.descriptor(&ctx);
    if !descriptor.export || !auth.is_admin() {
        return Err(AcademyError::authorization("Export is not available"));
    }

    let (mut query, _) = plan_list(&descriptor, &params, &ctx)?;
    query.size = EXPORT_CHUNK;
    query.page = 1;

    let mut rows = Vec::new();
    loop {
        let page = resource.list(storage, &query).await?;
        let fetched = page.items.len() as u64;
        rows.extend(render_rows(&descriptor.columns, &page.items));
        if fetched < EXPORT_CHUNK || query.page as i64 >= page.pagination.total_pages {
            break;
        }
        query.page += 1;
    }

    let body = rows_to_csv(&descriptor.columns, &rows)?;
    let filename = export_filename(descriptor.entity_name_plural, today());
    info!(
        "User {} exported {} {}",
        auth.user_id,
        rows.len(),
        descriptor.entity_name_plural
    );

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/csv; charset=utf-8"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body))
}

/// 描述符自省：给定操作下的完整声明，选项已展开
pub async fn describe<P: PanelResource>(
    resource: &P,
    request: &HttpRequest,
    operation: Operation,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;
    let ctx = build_context(storage.as_ref(), &auth, operation).await?;
    let view = resolve_view(storage.as_ref(), resource.descriptor(&ctx).view()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        serde_json::to_value(&view)?,
        "Descriptor retrieved successfully",
    )))
}

pub async fn create_form<P: PanelResource>(
    resource: &P,
    request: &HttpRequest,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;
    let ctx = build_context(storage.as_ref(), &auth, Operation::Create).await?;
    let descriptor = resource.descriptor(&ctx);
    require_operation(descriptor.allows(Operation::Create), Operation::Create)?;

    let view = resolve_view(storage.as_ref(), descriptor.view()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PanelFormResponse {
            descriptor: serde_json::to_value(&view)?,
            entry: None,
        },
        "Form retrieved successfully",
    )))
}

pub async fn edit_form<P: PanelResource>(
    resource: &P,
    request: &HttpRequest,
    id: i64,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;
    let entry = resource
        .find(storage.as_ref(), id)
        .await?
        .ok_or_else(|| AcademyError::not_found(format!("Entry {id} not found")))?;

    let ctx = build_context(storage.as_ref(), &auth, Operation::Update).await?;
    let ctx = resource.edit_context(ctx, &entry);
    let descriptor = resource.descriptor(&ctx);
    require_operation(descriptor.allows(Operation::Update), Operation::Update)?;

    let view = resolve_view(storage.as_ref(), descriptor.view()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        PanelFormResponse {
            descriptor: serde_json::to_value(&view)?,
            entry: Some(serde_json::to_value(&entry)?),
        },
        "Form retrieved successfully",
    )))
}

pub async fn store<P: PanelResource>(
    resource: &P,
    request: &HttpRequest,
    input: FormInput,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;
    let ctx = build_context(storage.as_ref(), &auth, Operation::Create).await?;
    let descriptor = resource.descriptor(&ctx);
    require_operation(descriptor.allows(Operation::Create), Operation::Create)?;

    let errors = validate(&input, &descriptor.validation, None, storage.as_ref()).await?;
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let entry = resource.create(storage.as_ref(), &input, &ctx).await?;
    info!(
        "User {} created {} {}",
        auth.user_id,
        descriptor.entity_name,
        entry.id()
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(entry, "Entry created successfully")))
}

pub async fn update<P: PanelResource>(
    resource: &P,
    request: &HttpRequest,
    id: i64,
    input: FormInput,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;
    let current = resource
        .find(storage.as_ref(), id)
        .await?
        .ok_or_else(|| AcademyError::not_found(format!("Entry {id} not found")))?;

    let ctx = build_context(storage.as_ref(), &auth, Operation::Update).await?;
    let ctx = resource.edit_context(ctx, &current);
    let descriptor = resource.descriptor(&ctx);
    require_operation(descriptor.allows(Operation::Update), Operation::Update)?;

    let errors = validate(&input, &descriptor.validation, Some(id), storage.as_ref()).await?;
    if !errors.is_empty() {
        return Ok(validation_failed(errors));
    }

    let entry = resource
        .update(storage.as_ref(), id, &input, &auth)
        .await?
        .ok_or_else(|| AcademyError::not_found(format!("Entry {id} not found")))?;
    info!(
        "User {} updated {} {}",
        auth.user_id, descriptor.entity_name, id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(entry, "Entry updated successfully")))
}

pub async fn destroy<P: PanelResource>(
    resource: &P,
    request: &HttpRequest,
    id: i64,
) -> Result<HttpResponse> {
    let storage = storage_from(request)?;
    let auth = auth_from(request)?;
    let ctx = build_context(storage.as_ref(), &auth, Operation::Delete).await?;
    let descriptor = resource.descriptor(&ctx);
    require_operation(descriptor.allows(Operation::Delete), Operation::Delete)?;

    if !resource.delete(storage.as_ref(), id, &auth).await? {
        return Err(AcademyError::not_found(format!("Entry {id} not found")));
    }
    warn!(
        "User {} ({}) deleted {} {}",
        auth.user_id, auth.username, descriptor.entity_name, id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Entry deleted successfully")))
}
