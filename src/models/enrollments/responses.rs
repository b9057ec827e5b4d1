use serde::Serialize;
use ts_rs::TS;

use super::entities::{Comment, EnrollmentRow, Invoice, PaymentMethod, Scholarship};

/// 报名详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentDetailResponse {
    pub enrollment: EnrollmentRow,
    /// 发票及明细
    pub products: Vec<Invoice>,
    /// 发票与报名本身的备注
    pub comments: Vec<Comment>,
    pub scholarships: Vec<Scholarship>,
    pub available_payment_methods: Vec<PaymentMethod>,
    pub writeaccess: bool,
}
