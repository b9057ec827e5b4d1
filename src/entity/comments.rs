//! 备注（发票或报名）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub commentable_type: String,
    pub commentable_id: i64,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub author_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_comment(self) -> crate::models::enrollments::entities::Comment {
        use chrono::{DateTime, Utc};

        crate::models::enrollments::entities::Comment {
            id: self.id,
            commentable_type: self.commentable_type,
            commentable_id: self.commentable_id,
            body: self.body,
            author_id: self.author_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
