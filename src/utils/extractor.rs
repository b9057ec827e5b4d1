//! 路径参数提取器
//!
//! 在进入处理函数之前校验路径参数，非法值直接返回 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ApiResponse, ErrorCode};

fn bad_param(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
            ErrorCode::BadRequest,
            message,
        )),
    )
    .into()
}

/// 定义一个从路径参数中提取正整数 id 的类型
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                ready(match raw.parse::<i64>() {
                    Ok(id) if id > 0 => Ok($name(id)),
                    _ => Err(bad_param(format!(
                        "Invalid path parameter '{}': {}",
                        $param, raw
                    ))),
                })
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");

static SETTING_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*$").expect("Invalid setting key regex"));

/// 系统设置键，例如 `academy.current_period`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeSettingKey(pub String);

impl FromRequest for SafeSettingKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("key").unwrap_or_default();
        ready(if raw.len() <= 64 && SETTING_KEY_RE.is_match(raw) {
            Ok(SafeSettingKey(raw.to_string()))
        } else {
            Err(bad_param(format!("Invalid setting key: {raw}")))
        })
    }
}
