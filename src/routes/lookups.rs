//! 基础资料中通用路由之外的操作

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;

use crate::services::panel::{FormBody, form_input, respond};
use crate::services::{GradeTypeService, RhythmService};
use crate::utils::SafeIDI64;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
}

pub async fn fetch_categories(
    req: HttpRequest,
    query: web::Query<CategoryQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    respond(
        GradeTypeService
            .fetch_categories(&req, query.q, query.page)
            .await,
    )
}

pub async fn inline_create_category(req: HttpRequest, body: FormBody) -> ActixResult<HttpResponse> {
    let result = match form_input(body) {
        Ok(input) => GradeTypeService.inline_create_category(&req, input).await,
        Err(e) => Err(e),
    };
    respond(result)
}

pub async fn toggle_rhythm(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    respond(RhythmService.toggle(&req, id.0).await)
}
