//! 支付方式实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment_method(self) -> crate::models::enrollments::entities::PaymentMethod {
        crate::models::enrollments::entities::PaymentMethod {
            id: self.id,
            name: self.name,
            code: self.code,
        }
    }
}
