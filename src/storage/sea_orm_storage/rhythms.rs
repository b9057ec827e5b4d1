//! 课程节奏（软删除）

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::admin::{Clause, ListQuery, SearchPredicate};
use crate::entity::rhythms::{ActiveModel, Column, Entity as Rhythms};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginatedResponse,
    lookups::{entities::Rhythm, requests::RhythmInput},
};
use crate::utils::escape_like_pattern;

use super::audit::{self, AuditAction};
use super::{SeaOrmStorage, any_match, unsupported_clause};

fn search_condition(predicate: &SearchPredicate) -> Option<Condition> {
    let SearchPredicate::Column { key, term } = predicate else {
        return None;
    };
    let escaped = escape_like_pattern(term.trim());
    let column = match *key {
        "name" => Column::Name,
        "product_code" => Column::ProductCode,
        "lms_id" => Column::LmsId,
        _ => return None,
    };
    Some(Condition::all().add(column.contains(&escaped)))
}

impl SeaOrmStorage {
    /// 默认排除已停用的记录，`WithTrashed` 时全部列出
    pub async fn list_rhythms_impl(&self, query: &ListQuery) -> Result<PaginatedResponse<Rhythm>> {
        let mut select = Rhythms::find();
        let mut with_trashed = false;
        for clause in &query.clauses {
            select = match clause {
                Clause::WithTrashed => {
                    with_trashed = true;
                    select
                }
                Clause::Search(predicates) => select.filter(any_match(
                    predicates.iter().filter_map(search_condition).collect(),
                )),
                other => return Err(unsupported_clause("rhythms", other)),
            };
        }
        if !with_trashed {
            select = select.filter(Column::DeletedAt.is_null());
        }
        select = select.order_by_asc(Column::Name);

        let (models, pagination) = self.fetch_list_page(select, query, "课程节奏").await?;

        Ok(PaginatedResponse {
            items: models.into_iter().map(|m| m.into_rhythm()).collect(),
            pagination,
        })
    }

    pub async fn get_rhythm_impl(&self, id: i64) -> Result<Option<Rhythm>> {
        let result = Rhythms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程节奏失败: {e}")))?;

        Ok(result.map(|m| m.into_rhythm()))
    }

    pub async fn create_rhythm_impl(&self, input: RhythmInput) -> Result<Rhythm> {
        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            name: Set(input.name),
            default_volume: Set(input.default_volume),
            product_code: Set(input.product_code),
            lms_id: Set(input.lms_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建课程节奏失败: {e}")))?;

        Ok(model.into_rhythm())
    }

    pub async fn update_rhythm_impl(&self, id: i64, input: RhythmInput) -> Result<Option<Rhythm>> {
        let Some(existing) = Rhythms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程节奏失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.name = Set(input.name);
        model.default_volume = Set(input.default_volume);
        model.product_code = Set(input.product_code);
        model.lms_id = Set(input.lms_id);
        model.updated_at = Set(chrono::Utc::now().timestamp());
        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新课程节奏失败: {e}")))?;

        Ok(Some(updated.into_rhythm()))
    }

    /// 停用或恢复
    pub async fn toggle_rhythm_impl(&self, id: i64, user_id: i64) -> Result<Option<Rhythm>> {
        let Some(existing) = Rhythms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程节奏失败: {e}")))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let deleted_at = match existing.deleted_at {
            Some(_) => None,
            None => Some(now),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model: ActiveModel = existing.into();
        model.deleted_at = Set(deleted_at);
        model.updated_at = Set(now);
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("切换课程节奏状态失败: {e}")))?;

        audit::record(
            &txn,
            user_id,
            AuditAction::Toggle,
            "rhythm",
            id,
            Some(serde_json::json!({ "active": deleted_at.is_none() })),
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "Rhythm {} {} by user {}",
            id,
            if deleted_at.is_some() { "deactivated" } else { "restored" },
            user_id
        );

        Ok(Some(updated.into_rhythm()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::memory_storage;
    use super::*;

    fn input(name: &str) -> RhythmInput {
        RhythmInput {
            name: name.to_string(),
            default_volume: 30.0,
            product_code: Some("INT".to_string()),
            lms_id: None,
        }
    }

    fn list(clauses: Vec<Clause>) -> ListQuery {
        ListQuery {
            clauses,
            page: 1,
            size: 25,
        }
    }

    #[tokio::test]
    async fn test_toggle_and_with_trashed() {
        let s = memory_storage().await;
        let evening = s.create_rhythm_impl(input("Evening")).await.unwrap();
        s.create_rhythm_impl(input("Intensive")).await.unwrap();

        let toggled = s.toggle_rhythm_impl(evening.id, 1).await.unwrap().unwrap();
        assert!(!toggled.is_active());

        assert_eq!(s.list_rhythms_impl(&list(Vec::new())).await.unwrap().items.len(), 1);
        assert_eq!(
            s.list_rhythms_impl(&list(vec![Clause::WithTrashed]))
                .await
                .unwrap()
                .items
                .len(),
            2
        );

        let restored = s.toggle_rhythm_impl(evening.id, 1).await.unwrap().unwrap();
        assert!(restored.is_active());
        assert!(s.toggle_rhythm_impl(999, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_search_by_product_code() {
        let s = memory_storage().await;
        let created = s.create_rhythm_impl(input("Evening")).await.unwrap();
        let mut change = input("Evening");
        change.product_code = Some("EVE-2".to_string());
        s.update_rhythm_impl(created.id, change).await.unwrap();

        let page = s
            .list_rhythms_impl(&list(vec![Clause::Search(vec![SearchPredicate::Column {
                key: "product_code",
                term: "eve-".to_string(),
            }])]))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].product_code.as_deref(), Some("EVE-2"));
    }
}
