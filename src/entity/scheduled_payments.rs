//! 分期付款计划实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scheduled_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_id: i64,
    pub date: String,
    pub value: f64,
    pub status: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_scheduled_payment(self) -> crate::models::enrollments::entities::ScheduledPayment {
        crate::models::enrollments::entities::ScheduledPayment {
            id: self.id,
            enrollment_id: self.enrollment_id,
            date: self.date,
            value: self.value,
            status: self.status,
        }
    }
}
