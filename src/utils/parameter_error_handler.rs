//! 请求体与查询参数的解析错误处理

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError, UrlencodedError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn reject(message: String) -> actix_web::Error {
    debug!("Rejected request payload: {}", message);
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
            ErrorCode::BadRequest,
            message,
        )),
    )
    .into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    reject(format!("Invalid JSON body: {err}"))
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    reject(format!("Invalid query parameters: {err}"))
}

pub fn form_error_handler(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    reject(format!("Invalid form body: {err}"))
}
