//! 成绩类型分类实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_type_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grade_types::Entity")]
    GradeTypes,
}

impl Related<super::grade_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GradeTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_category(self) -> crate::models::lookups::entities::GradeTypeCategory {
        crate::models::lookups::entities::GradeTypeCategory {
            id: self.id,
            name: self.name,
        }
    }
}
