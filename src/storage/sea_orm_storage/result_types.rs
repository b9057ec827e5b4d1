use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::admin::{Clause, ListQuery, SearchPredicate};
use crate::entity::result_types::{ActiveModel, Column, Entity as ResultTypes};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginatedResponse,
    lookups::{entities::ResultType, requests::ResultTypeInput},
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
        "description" => Column::Description,
        _ => return None,
    };
    Some(Condition::all().add(column.contains(&escaped)))
}

impl SeaOrmStorage {
    pub async fn list_result_types_impl(
        &self,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<ResultType>> {
        let mut select = ResultTypes::find();
        for clause in &query.clauses {
            select = match clause {
                Clause::Search(predicates) => select.filter(any_match(
                    predicates.iter().filter_map(search_condition).collect(),
                )),
                other => return Err(unsupported_clause("result types", other)),
            };
        }
        select = select.order_by_asc(Column::Name);

        let (models, pagination) = self.fetch_list_page(select, query, "结果类型").await?;

        Ok(PaginatedResponse {
            items: models.into_iter().map(|m| m.into_result_type()).collect(),
            pagination,
        })
    }

    pub async fn get_result_type_impl(&self, id: i64) -> Result<Option<ResultType>> {
        let result = ResultTypes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询结果类型失败: {e}")))?;

        Ok(result.map(|m| m.into_result_type()))
    }

    pub async fn create_result_type_impl(&self, input: ResultTypeInput) -> Result<ResultType> {
        let model = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建结果类型失败: {e}")))?;

        Ok(model.into_result_type())
    }

    pub async fn update_result_type_impl(
        &self,
        id: i64,
        input: ResultTypeInput,
    ) -> Result<Option<ResultType>> {
        let Some(existing) = ResultTypes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询结果类型失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.name = Set(input.name);
        model.description = Set(input.description);
        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新结果类型失败: {e}")))?;

        Ok(Some(updated.into_result_type()))
    }

    pub async fn delete_result_type_impl(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = ResultTypes::delete_many()
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除结果类型失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }
        audit::record(&self.db, user_id, AuditAction::Delete, "result_type", id, None).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::memory_storage;
    use super::*;

    #[tokio::test]
    async fn test_result_type_crud_and_search() {
        let s = memory_storage().await;
        let passed = s
            .create_result_type_impl(ResultTypeInput {
                name: "Passed".to_string(),
                description: Some("Course completed".to_string()),
            })
            .await
            .unwrap();
        s.create_result_type_impl(ResultTypeInput {
            name: "Failed".to_string(),
            description: None,
        })
        .await
        .unwrap();

        let query = ListQuery {
            clauses: vec![Clause::Search(vec![
                SearchPredicate::Column {
                    key: "name",
                    term: "complet".to_string(),
                },
                SearchPredicate::Column {
                    key: "description",
                    term: "complet".to_string(),
                },
            ])],
            page: 1,
            size: 25,
        };
        let page = s.list_result_types_impl(&query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, passed.id);

        let updated = s
            .update_result_type_impl(
                passed.id,
                ResultTypeInput {
                    name: "Passed".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.description.is_none());

        assert!(s.delete_result_type_impl(passed.id, 1).await.unwrap());
        assert!(s.get_result_type_impl(passed.id).await.unwrap().is_none());
    }
}
