use serde::Deserialize;

use crate::admin::repeatable::{flexible_f64, flexible_i32, flexible_string};

/// 分期付款计划中的一行，来自 `scheduledPayments` 的 JSON 数组
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduledPaymentInput {
    #[serde(deserialize_with = "flexible_string")]
    pub date: String,
    #[serde(deserialize_with = "flexible_f64")]
    pub value: f64,
    #[serde(deserialize_with = "flexible_i32")]
    pub status: i32,
}

/// 报名更新（表单校验之后构造）
///
/// `scheduled_payments` 为 `Some` 时整体替换分期计划，`None` 时保持不变。
#[derive(Debug, Clone)]
pub struct EnrollmentUpdate {
    pub course_id: i64,
    pub price: f64,
    pub status_id: i64,
    pub scheduled_payments: Option<Vec<ScheduledPaymentInput>>,
}
