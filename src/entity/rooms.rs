//! 教室实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub campus_id: i64,
    pub name: String,
    pub capacity: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campuses::Entity",
        from = "Column::CampusId",
        to = "super::campuses::Column::Id"
    )]
    Campus,
}

impl Related<super::campuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campus.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_room(
        self,
        campus: Option<super::campuses::Model>,
    ) -> crate::models::lookups::entities::Room {
        crate::models::lookups::entities::Room {
            id: self.id,
            campus_id: self.campus_id,
            campus_name: campus.map(|c| c.name),
            name: self.name,
            capacity: self.capacity,
        }
    }
}
