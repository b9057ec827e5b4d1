//! 课程节奏实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rhythms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub default_volume: f64,
    pub product_code: Option<String>,
    pub lms_id: Option<String>,
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_rhythm(self) -> crate::models::lookups::entities::Rhythm {
        use chrono::{DateTime, Utc};

        crate::models::lookups::entities::Rhythm {
            id: self.id,
            name: self.name,
            default_volume: self.default_volume,
            product_code: self.product_code,
            lms_id: self.lms_id,
            deleted_at: self
                .deleted_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
        }
    }
}
