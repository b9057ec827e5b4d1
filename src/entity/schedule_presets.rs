//! 课表预设实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_presets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub presets: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule_preset(self) -> crate::models::courses::entities::SchedulePreset {
        crate::models::courses::entities::SchedulePreset {
            id: self.id,
            name: self.name,
            presets: self.presets,
        }
    }
}
