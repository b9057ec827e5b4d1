//! 数据模型定义
//!
//! 按业务域划分：`entities` 为业务实体，`requests` 为请求体，`responses` 为响应体。
//! 带 `TS` 派生的类型会导出到前端的 TypeScript 类型定义。

pub mod auth {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod common {
    pub mod error_code;
    pub mod pagination;
    pub mod response;
}

pub mod courses {
    pub mod entities;
    pub mod requests;
}

pub mod enrollments {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod lookups {
    pub mod entities;
    pub mod requests;
}

pub mod panel {
    pub mod responses;
}

pub mod system {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod users {
    pub mod entities;
    pub mod requests;
}

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 进程启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
