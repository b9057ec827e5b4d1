use serde::Deserialize;

use crate::admin::repeatable::{flexible_i32, flexible_string};

/// 课程写入数据（表单校验之后构造）
#[derive(Debug, Clone, PartialEq)]
pub struct CourseInput {
    pub campus_id: i64,
    pub partner_id: Option<i64>,
    pub rhythm_id: i64,
    pub level_id: i64,
    pub teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub period_id: i64,
    pub name: String,
    pub volume: Option<f64>,
    pub hourly_price: Option<f64>,
    pub price: f64,
    pub start_date: String,
    pub end_date: String,
    pub head_count: Option<i32>,
    pub new_students: Option<i32>,
}

/// 课表中的一行，来自 `times` 或 `schedulepreset` 的 JSON 数组
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourseTimeInput {
    #[serde(deserialize_with = "flexible_i32")]
    pub day: i32,
    #[serde(deserialize_with = "flexible_string")]
    pub start: String,
    #[serde(deserialize_with = "flexible_string")]
    pub end: String,
}
