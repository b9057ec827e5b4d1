//! 后台资源的通用路由
//!
//! 每个资源注册同一组路由，描述符不允许的操作由服务层返回 403。

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, Scope, web};
use serde::Deserialize;

use crate::admin::Operation;
use crate::services::panel::{FormBody, PanelResource, form_input, resource, respond};
use crate::utils::SafeIDI64;

#[derive(Debug, Deserialize)]
pub struct DescribeQuery {
    pub operation: Option<Operation>,
}

pub async fn list<P: PanelResource + Default>(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    respond(resource::list(&P::default(), &req, query.into_inner()).await)
}

pub async fn export<P: PanelResource + Default>(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    respond(resource::export(&P::default(), &req, query.into_inner()).await)
}

pub async fn describe<P: PanelResource + Default>(
    req: HttpRequest,
    query: web::Query<DescribeQuery>,
) -> ActixResult<HttpResponse> {
    let operation = query.operation.unwrap_or(Operation::List);
    respond(resource::describe(&P::default(), &req, operation).await)
}

pub async fn create_form<P: PanelResource + Default>(req: HttpRequest) -> ActixResult<HttpResponse> {
    respond(resource::create_form(&P::default(), &req).await)
}

pub async fn store<P: PanelResource + Default>(
    req: HttpRequest,
    body: FormBody,
) -> ActixResult<HttpResponse> {
    let result = match form_input(body) {
        Ok(input) => resource::store(&P::default(), &req, input).await,
        Err(e) => Err(e),
    };
    respond(result)
}

pub async fn edit_form<P: PanelResource + Default>(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    respond(resource::edit_form(&P::default(), &req, id.0).await)
}

pub async fn update<P: PanelResource + Default>(
    req: HttpRequest,
    id: SafeIDI64,
    body: FormBody,
) -> ActixResult<HttpResponse> {
    let result = match form_input(body) {
        Ok(input) => resource::update(&P::default(), &req, id.0, input).await,
        Err(e) => Err(e),
    };
    respond(result)
}

pub async fn destroy<P: PanelResource + Default>(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    respond(resource::destroy(&P::default(), &req, id.0).await)
}

/// 注册列表、导出、描述符、表单与增删改路由
///
/// 固定路径需要在 `/{id}` 之前注册。
pub fn panel_routes<P: PanelResource + Default + 'static>(scope: Scope) -> Scope {
    scope
        .service(
            web::resource("")
                .route(web::get().to(list::<P>))
                .route(web::post().to(store::<P>)),
        )
        .route("/descriptor", web::get().to(describe::<P>))
        .route("/export", web::get().to(export::<P>))
        .route("/create", web::get().to(create_form::<P>))
        .route("/{id}/edit", web::get().to(edit_form::<P>))
        .service(
            web::resource("/{id}")
                .route(web::put().to(update::<P>))
                .route(web::patch().to(update::<P>))
                .route(web::delete().to(destroy::<P>)),
        )
}
