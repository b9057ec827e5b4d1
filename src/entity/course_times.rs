//! 上课时间段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_times")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub day: i32,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_course_time(self) -> crate::models::courses::entities::CourseTime {
        crate::models::courses::entities::CourseTime {
            id: self.id,
            course_id: self.course_id,
            day: self.day,
            start: self.start_time,
            end: self.end_time,
        }
    }
}
