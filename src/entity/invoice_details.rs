//! 发票明细实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoice_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub invoice_id: i64,
    pub product_name: String,
    pub price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_detail(self) -> crate::models::enrollments::entities::InvoiceDetail {
        crate::models::enrollments::entities::InvoiceDetail {
            id: self.id,
            product_name: self.product_name,
            price: self.price,
        }
    }
}
