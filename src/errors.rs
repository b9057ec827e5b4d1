//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use actix_web::http::StatusCode;
use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_academy_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AcademyError {
            $($variant(String),)*
        }

        impl AcademyError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AcademyError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AcademyError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AcademyError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl AcademyError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AcademyError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_academy_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Io("E006", "IO Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    ExportDriverNotFound("E010", "Export Driver Not Found"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    MalformedPayload("E014", "Malformed Payload"),
    Conflict("E015", "Conflict"),
}

impl AcademyError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AcademyError::Validation(_) | AcademyError::DateParse(_) => StatusCode::BAD_REQUEST,
            AcademyError::MalformedPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AcademyError::NotFound(_) => StatusCode::NOT_FOUND,
            AcademyError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AcademyError::Authorization(_) => StatusCode::FORBIDDEN,
            AcademyError::Conflict(_) => StatusCode::CONFLICT,
            AcademyError::ExportDriverNotFound(_) => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否为服务端内部错误（不应把细节暴露给客户端）
    pub fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl fmt::Display for AcademyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AcademyError {}

impl From<sea_orm::DbErr> for AcademyError {
    fn from(err: sea_orm::DbErr) -> Self {
        AcademyError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AcademyError {
    fn from(err: std::io::Error) -> Self {
        AcademyError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AcademyError {
    fn from(err: serde_json::Error) -> Self {
        AcademyError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AcademyError {
    fn from(err: chrono::ParseError) -> Self {
        AcademyError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for AcademyError {
    fn from(err: csv::Error) -> Self {
        AcademyError::Serialization(format!("CSV 写入失败: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, AcademyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AcademyError::cache_connection("test").code(), "E001");
        assert_eq!(AcademyError::database_config("test").code(), "E003");
        assert_eq!(AcademyError::validation("test").code(), "E007");
        assert_eq!(AcademyError::malformed_payload("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AcademyError::export_driver_not_found("x").error_type(),
            "Export Driver Not Found"
        );
        assert_eq!(
            AcademyError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AcademyError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AcademyError::malformed_payload("x").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AcademyError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert!(AcademyError::database_operation("x").is_internal());
        assert!(!AcademyError::authorization("x").is_internal());
    }

    #[test]
    fn test_format_simple() {
        let err = AcademyError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
