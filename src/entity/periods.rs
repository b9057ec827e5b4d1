//! 学期实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_period(self) -> crate::models::courses::entities::Period {
        crate::models::courses::entities::Period {
            id: self.id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}
