use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 报名状态
///
/// 编号与 `enrollment_status_types` 表一致。大于 [`EnrollmentStatus::ACTIVE_THRESHOLD`]
/// 的状态视为已失效，列表中以删除线显示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Pending = 1,
    Paid = 2,
    Canceled = 3,
    Transferred = 4,
    Refunded = 5,
}

impl EnrollmentStatus {
    pub const ACTIVE_THRESHOLD: i64 = 2;

    pub fn all() -> [EnrollmentStatus; 5] {
        [
            EnrollmentStatus::Pending,
            EnrollmentStatus::Paid,
            EnrollmentStatus::Canceled,
            EnrollmentStatus::Transferred,
            EnrollmentStatus::Refunded,
        ]
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::all().into_iter().find(|s| s.id() == id)
    }

    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "Pending",
            EnrollmentStatus::Paid => "Paid",
            EnrollmentStatus::Canceled => "Canceled",
            EnrollmentStatus::Transferred => "Transferred",
            EnrollmentStatus::Refunded => "Refunded",
        }
    }

    /// 徽章样式
    pub fn styling(self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "warning",
            EnrollmentStatus::Paid => "success",
            EnrollmentStatus::Canceled => "danger",
            _ => "secondary",
        }
    }

    pub fn is_inactive(status_id: i64) -> bool {
        status_id > Self::ACTIVE_THRESHOLD
    }
}

// 报名记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub status_id: i64,
    pub price: f64,
    pub balance: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 分期付款计划
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct ScheduledPayment {
    pub id: i64,
    pub enrollment_id: i64,
    pub date: String,
    pub value: f64,
    /// 1 待付，2 已付
    pub status: i32,
}

/// 报名列表行（已关联学生、课程、学期等信息）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentRow {
    pub id: i64,
    pub student_id: i64,
    pub student_idnumber: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub birthdate: Option<String>,
    pub age: Option<i64>,
    pub course_id: i64,
    pub course_name: String,
    pub period_id: i64,
    pub period_name: String,
    pub status_id: i64,
    pub status_name: String,
    pub price: f64,
    pub balance: f64,
    pub scheduled_payments: Vec<ScheduledPayment>,
    pub scholarships: Vec<String>,
    pub phone_numbers: Vec<String>,
}

impl EnrollmentRow {
    pub fn status(&self) -> Option<EnrollmentStatus> {
        EnrollmentStatus::from_id(self.status_id)
    }
}

/// 按生日计算周岁，生日格式不合法时返回 None
pub fn age_on(birthdate: &str, today: NaiveDate) -> Option<i64> {
    let born = NaiveDate::parse_from_str(birthdate, "%Y-%m-%d").ok()?;
    if born > today {
        return None;
    }
    let mut age = i64::from(today.year() - born.year());
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    Some(age)
}

// 发票明细
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct InvoiceDetail {
    pub id: i64,
    pub product_name: String,
    pub price: f64,
}

// 发票
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: Option<String>,
    pub total: f64,
    pub date: String,
    pub details: Vec<InvoiceDetail>,
}

// 备注
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct Comment {
    pub id: i64,
    pub commentable_type: String,
    pub commentable_id: i64,
    pub body: String,
    pub author_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct Scholarship {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct PaymentMethod {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_threshold() {
        assert!(!EnrollmentStatus::is_inactive(EnrollmentStatus::Pending.id()));
        assert!(!EnrollmentStatus::is_inactive(EnrollmentStatus::Paid.id()));
        assert!(EnrollmentStatus::is_inactive(EnrollmentStatus::Canceled.id()));
        assert!(EnrollmentStatus::is_inactive(EnrollmentStatus::Refunded.id()));
    }

    #[test]
    fn test_status_styling() {
        assert_eq!(EnrollmentStatus::Pending.styling(), "warning");
        assert_eq!(EnrollmentStatus::Paid.styling(), "success");
        assert_eq!(EnrollmentStatus::Canceled.styling(), "danger");
        assert_eq!(EnrollmentStatus::Transferred.styling(), "secondary");
        assert_eq!(EnrollmentStatus::from_id(9), None);
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(age_on("2000-03-10", today), Some(25));
        assert_eq!(age_on("2000-03-11", today), Some(24));
        assert_eq!(age_on("not a date", today), None);
        assert_eq!(age_on("2030-01-01", today), None);
    }
}
