use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 下拉选项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "lookup.ts")]
pub struct OptionItem {
    pub value: String,
    pub label: String,
}

impl OptionItem {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lookup.ts")]
pub struct GradeTypeCategory {
    pub id: i64,
    pub name: String,
}

// 成绩类型
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lookup.ts")]
pub struct GradeType {
    pub id: i64,
    pub name: String,
    pub total: f64,
    pub category_id: i64,
    pub category_name: Option<String>,
}

// 结果类型
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lookup.ts")]
pub struct ResultType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

// 课程节奏，可停用（软删除）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lookup.ts")]
pub struct Rhythm {
    pub id: i64,
    pub name: String,
    pub default_volume: f64,
    pub product_code: Option<String>,
    pub lms_id: Option<String>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Rhythm {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

// 教室
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "lookup.ts")]
pub struct Room {
    pub id: i64,
    pub campus_id: i64,
    pub campus_name: Option<String>,
    pub name: String,
    pub capacity: Option<i32>,
}
