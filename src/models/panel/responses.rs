use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;

use crate::admin::{ActiveFilter, RenderedRow};
use crate::models::PaginationInfo;
use crate::models::courses::entities::CourseSummary;

/// 列表页挂件数据
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "widget", rename_all = "snake_case")]
#[ts(export, export_to = "panel.ts")]
pub enum WidgetData {
    /// 待付款报名的余额合计
    PendingBalance { total: f64, display: String },
    CourseInfo { course: CourseSummary },
}

/// 列表页
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "panel.ts")]
pub struct PanelListResponse {
    pub rows: Vec<RenderedRow>,
    pub pagination: PaginationInfo,
    pub active_filters: Vec<ActiveFilter>,
    pub widgets: Vec<WidgetData>,
    pub buttons: Value,
    pub operations: Value,
}

/// 创建与编辑表单，`descriptor` 中的选项已展开
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "panel.ts")]
pub struct PanelFormResponse {
    pub descriptor: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Value>,
}
