//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub campus_id: i64,
    pub partner_id: Option<i64>,
    pub rhythm_id: i64,
    pub level_id: i64,
    pub teacher_id: Option<i64>,
    pub room_id: Option<i64>,
    pub period_id: i64,
    pub name: String,
    pub volume: Option<f64>,
    pub hourly_price: Option<f64>,
    pub price: f64,
    pub start_date: String,
    pub end_date: String,
    pub head_count: Option<i32>,
    pub new_students: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
