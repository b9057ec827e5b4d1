use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Set,
};

use crate::admin::{Clause, ListQuery, SearchPredicate};
use crate::entity::campuses;
use crate::entity::rooms::{ActiveModel, Column, Entity as Rooms, Model};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginatedResponse,
    lookups::{entities::Room, requests::RoomInput},
};
use crate::utils::escape_like_pattern;

use super::audit::{self, AuditAction};
use super::{SeaOrmStorage, any_match, unsupported_clause};

fn search_condition(predicate: &SearchPredicate) -> Option<Condition> {
    let SearchPredicate::Column { key, term } = predicate else {
        return None;
    };
    let escaped = escape_like_pattern(term.trim());
    match *key {
        "name" => Some(Condition::all().add(Column::Name.contains(&escaped))),
        "campus" => Some(
            Condition::all().add(
                Column::CampusId.in_subquery(
                    campuses::Entity::find()
                        .select_only()
                        .column(campuses::Column::Id)
                        .filter(campuses::Column::Name.contains(&escaped))
                        .into_query(),
                ),
            ),
        ),
        _ => None,
    }
}

impl SeaOrmStorage {
    async fn attach_campuses(&self, models: Vec<Model>) -> Result<Vec<Room>> {
        let campus_map: HashMap<i64, campuses::Model> = campuses::Entity::find()
            .filter(campuses::Column::Id.is_in(models.iter().map(|m| m.campus_id)))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询校区失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let campus = campus_map.get(&m.campus_id).cloned();
                m.into_room(campus)
            })
            .collect())
    }

    pub async fn list_rooms_impl(&self, query: &ListQuery) -> Result<PaginatedResponse<Room>> {
        let mut select = Rooms::find();
        for clause in &query.clauses {
            select = match clause {
                Clause::Search(predicates) => select.filter(any_match(
                    predicates.iter().filter_map(search_condition).collect(),
                )),
                Clause::Where {
                    column: "campus_id",
                    value,
                } => select.filter(Column::CampusId.eq(*value)),
                other => return Err(unsupported_clause("rooms", other)),
            };
        }
        select = select.order_by_asc(Column::CampusId).order_by_asc(Column::Name);

        let (models, pagination) = self.fetch_list_page(select, query, "教室").await?;
        let items = self.attach_campuses(models).await?;

        Ok(PaginatedResponse { items, pagination })
    }

    pub async fn get_room_impl(&self, id: i64) -> Result<Option<Room>> {
        let Some(model) = Rooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询教室失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.attach_campuses(vec![model]).await?.pop())
    }

    pub async fn create_room_impl(&self, input: RoomInput) -> Result<Room> {
        let model = ActiveModel {
            campus_id: Set(input.campus_id),
            name: Set(input.name),
            capacity: Set(input.capacity),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建教室失败: {e}")))?;

        Ok(self.attach_campuses(vec![model]).await?.remove(0))
    }

    pub async fn update_room_impl(&self, id: i64, input: RoomInput) -> Result<Option<Room>> {
        let Some(existing) = Rooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询教室失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.campus_id = Set(input.campus_id);
        model.name = Set(input.name);
        model.capacity = Set(input.capacity);
        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新教室失败: {e}")))?;

        Ok(self.attach_campuses(vec![updated]).await?.pop())
    }

    pub async fn delete_room_impl(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = Rooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除教室失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }
        audit::record(&self.db, user_id, AuditAction::Delete, "room", id, None).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{insert_campus, memory_storage};
    use super::*;

    #[tokio::test]
    async fn test_room_crud_and_campus_search() {
        let s = memory_storage().await;
        let main = insert_campus(&s, "Main").await;
        let north = insert_campus(&s, "North").await;

        let a = s
            .create_room_impl(RoomInput {
                campus_id: main,
                name: "A-101".to_string(),
                capacity: Some(12),
            })
            .await
            .unwrap();
        s.create_room_impl(RoomInput {
            campus_id: north,
            name: "N-1".to_string(),
            capacity: None,
        })
        .await
        .unwrap();
        assert_eq!(a.campus_name.as_deref(), Some("Main"));

        let query = ListQuery {
            clauses: vec![Clause::Search(vec![SearchPredicate::Column {
                key: "campus",
                term: "nor".to_string(),
            }])],
            page: 1,
            size: 25,
        };
        let page = s.list_rooms_impl(&query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "N-1");

        let moved = s
            .update_room_impl(
                a.id,
                RoomInput {
                    campus_id: north,
                    name: "A-101".to_string(),
                    capacity: Some(14),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.campus_name.as_deref(), Some("North"));

        assert!(s.delete_room_impl(a.id, 1).await.unwrap());
        assert!(s.get_room_impl(a.id).await.unwrap().is_none());
    }
}
