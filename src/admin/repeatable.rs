//! 可重复字段
//!
//! 课表时间段与分期付款计划以 JSON 数组文本提交，解码失败时整个请求被拒绝。

use chrono::{NaiveDate, NaiveTime};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{AcademyError, Result};
use crate::models::courses::requests::CourseTimeInput;
use crate::models::enrollments::requests::ScheduledPaymentInput;

/// 把 JSON 数组文本解码为子记录列表
pub fn decode_repeatable<T: DeserializeOwned>(field: &str, raw: &str) -> Result<Vec<T>> {
    serde_json::from_str::<Vec<T>>(raw.trim())
        .map_err(|e| AcademyError::malformed_payload(format!("Invalid JSON in '{field}': {e}")))
}

pub fn decode_course_times(field: &str, raw: &str) -> Result<Vec<CourseTimeInput>> {
    let times: Vec<CourseTimeInput> = decode_repeatable(field, raw)?;
    for (index, time) in times.iter().enumerate() {
        if !(0..=6).contains(&time.day) {
            return Err(AcademyError::malformed_payload(format!(
                "{field}[{index}].day must be between 0 and 6"
            )));
        }
        let start = parse_time(field, index, "start", &time.start)?;
        let end = parse_time(field, index, "end", &time.end)?;
        if end <= start {
            return Err(AcademyError::malformed_payload(format!(
                "{field}[{index}] ends before it starts"
            )));
        }
    }
    Ok(times)
}

pub fn decode_scheduled_payments(field: &str, raw: &str) -> Result<Vec<ScheduledPaymentInput>> {
    let payments: Vec<ScheduledPaymentInput> = decode_repeatable(field, raw)?;
    for (index, payment) in payments.iter().enumerate() {
        if NaiveDate::parse_from_str(&payment.date, "%Y-%m-%d").is_err() {
            return Err(AcademyError::malformed_payload(format!(
                "{field}[{index}].date is not a valid date"
            )));
        }
        if payment.value < 0.0 {
            return Err(AcademyError::malformed_payload(format!(
                "{field}[{index}].value must not be negative"
            )));
        }
        if !matches!(payment.status, 1 | 2) {
            return Err(AcademyError::malformed_payload(format!(
                "{field}[{index}].status must be 1 (pending) or 2 (paid)"
            )));
        }
    }
    Ok(payments)
}

fn parse_time(field: &str, index: usize, key: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            AcademyError::malformed_payload(format!("{field}[{index}].{key} is not a valid time"))
        })
}

// 表单控件提交的数字可能是字符串，以下反序列化函数同时接受两种写法

pub fn flexible_i32<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i32, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| de::Error::custom(format!("{n} is not a valid integer"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("'{s}' is not a valid integer"))),
        other => Err(de::Error::custom(format!("expected an integer, got {other}"))),
    }
}

pub fn flexible_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("{n} is not a valid number"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("'{s}' is not a valid number"))),
        other => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}

pub fn flexible_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected a string, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_times_accept_string_days() {
        let times = decode_course_times(
            "times",
            r#"[{"day":"1","start":"09:00","end":"11:00"},{"day":3,"start":"14:00:00","end":"16:00"}]"#,
        )
        .unwrap();
        assert_eq!(times.len(), 2);
        assert_eq!(times[0].day, 1);
        assert_eq!(times[1].start, "14:00:00");
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = decode_course_times("times", r#"[{"day":1,"start":"09:00""#).unwrap_err();
        assert!(matches!(err, AcademyError::MalformedPayload(_)));

        // 空字符串不是合法 JSON，不能当作空集合
        let err = decode_course_times("times", "").unwrap_err();
        assert!(matches!(err, AcademyError::MalformedPayload(_)));
    }

    #[test]
    fn test_course_time_shape_checks() {
        assert!(decode_course_times("times", r#"[{"day":7,"start":"09:00","end":"10:00"}]"#).is_err());
        assert!(decode_course_times("times", r#"[{"day":1,"start":"11:00","end":"10:00"}]"#).is_err());
        assert!(decode_course_times("times", "[]").unwrap().is_empty());
    }

    #[test]
    fn test_scheduled_payments() {
        let payments = decode_scheduled_payments(
            "scheduledPayments",
            r#"[{"date":"2025-02-01","value":"120.50","status":"1"}]"#,
        )
        .unwrap();
        assert_eq!(payments[0].value, 120.5);
        assert_eq!(payments[0].status, 1);

        assert!(decode_scheduled_payments(
            "scheduledPayments",
            r#"[{"date":"2025-02-01","value":10,"status":3}]"#
        )
        .is_err());
        assert!(decode_scheduled_payments("scheduledPayments", r#"{"date":"2025-02-01"}"#).is_err());
    }
}
