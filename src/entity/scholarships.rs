//! 奖学金实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scholarships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_scholarship(self) -> crate::models::enrollments::entities::Scholarship {
        crate::models::enrollments::entities::Scholarship {
            id: self.id,
            name: self.name,
        }
    }
}
