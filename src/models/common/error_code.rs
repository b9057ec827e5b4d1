use crate::errors::AcademyError;

/// API 业务码，写入响应体的 `code` 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    MalformedPayload = 1002,

    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2003,

    NotFound = 3000,
    Conflict = 3001,

    RateLimitExceeded = 4029,

    InternalServerError = 5000,
    ExportUnavailable = 5001,
}

impl From<&AcademyError> for ErrorCode {
    fn from(err: &AcademyError) -> Self {
        match err {
            AcademyError::Validation(_) | AcademyError::DateParse(_) => ErrorCode::BadRequest,
            AcademyError::MalformedPayload(_) => ErrorCode::MalformedPayload,
            AcademyError::NotFound(_) => ErrorCode::NotFound,
            AcademyError::Authentication(_) => ErrorCode::AuthFailed,
            AcademyError::Authorization(_) => ErrorCode::Forbidden,
            AcademyError::Conflict(_) => ErrorCode::Conflict,
            AcademyError::ExportDriverNotFound(_) => ErrorCode::ExportUnavailable,
            _ => ErrorCode::InternalServerError,
        }
    }
}
