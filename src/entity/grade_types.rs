//! 成绩类型实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub total: f64,
    pub grade_type_category_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grade_type_categories::Entity",
        from = "Column::GradeTypeCategoryId",
        to = "super::grade_type_categories::Column::Id"
    )]
    Category,
}

impl Related<super::grade_type_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_grade_type(
        self,
        category: Option<super::grade_type_categories::Model>,
    ) -> crate::models::lookups::entities::GradeType {
        crate::models::lookups::entities::GradeType {
            id: self.id,
            name: self.name,
            total: self.total,
            category_id: self.grade_type_category_id,
            category_name: category.map(|c| c.name),
        }
    }
}
