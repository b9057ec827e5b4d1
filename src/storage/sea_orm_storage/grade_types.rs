//! 成绩类型与分类

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Select, Set,
};

use crate::admin::{Clause, ListQuery, SearchPredicate};
use crate::entity::grade_type_categories;
use crate::entity::grade_types::{ActiveModel, Column, Entity as GradeTypes, Model};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginatedResponse,
    lookups::{
        entities::{GradeType, GradeTypeCategory},
        requests::GradeTypeInput,
    },
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
        "grade_type_category_id" => Some(
            Condition::all().add(
                Column::GradeTypeCategoryId.in_subquery(
                    grade_type_categories::Entity::find()
                        .select_only()
                        .column(grade_type_categories::Column::Id)
                        .filter(grade_type_categories::Column::Name.contains(&escaped))
                        .into_query(),
                ),
            ),
        ),
        _ => None,
    }
}

fn apply_clause(select: Select<GradeTypes>, clause: &Clause) -> Result<Select<GradeTypes>> {
    match clause {
        Clause::Search(predicates) => Ok(select.filter(any_match(
            predicates.iter().filter_map(search_condition).collect(),
        ))),
        Clause::Where {
            column: "grade_type_category_id",
            value,
        } => Ok(select.filter(Column::GradeTypeCategoryId.eq(*value))),
        _ => Err(unsupported_clause("grade types", clause)),
    }
}

impl SeaOrmStorage {
    async fn attach_categories(&self, models: Vec<Model>) -> Result<Vec<GradeType>> {
        let categories: HashMap<i64, grade_type_categories::Model> =
            grade_type_categories::Entity::find()
                .filter(
                    grade_type_categories::Column::Id
                        .is_in(models.iter().map(|m| m.grade_type_category_id)),
                )
                .all(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("查询成绩分类失败: {e}")))?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let category = categories.get(&m.grade_type_category_id).cloned();
                m.into_grade_type(category)
            })
            .collect())
    }

    pub async fn list_grade_types_impl(
        &self,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<GradeType>> {
        let mut select = GradeTypes::find();
        for clause in &query.clauses {
            select = apply_clause(select, clause)?;
        }
        select = select.order_by_asc(Column::Name);

        let (models, pagination) = self.fetch_list_page(select, query, "成绩类型").await?;
        let items = self.attach_categories(models).await?;

        Ok(PaginatedResponse { items, pagination })
    }

    pub async fn get_grade_type_impl(&self, id: i64) -> Result<Option<GradeType>> {
        let Some(model) = GradeTypes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询成绩类型失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.attach_categories(vec![model]).await?.pop())
    }

    pub async fn create_grade_type_impl(&self, input: GradeTypeInput) -> Result<GradeType> {
        let model = ActiveModel {
            name: Set(input.name),
            total: Set(input.total),
            grade_type_category_id: Set(input.category_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建成绩类型失败: {e}")))?;

        Ok(self.attach_categories(vec![model]).await?.remove(0))
    }

    pub async fn update_grade_type_impl(
        &self,
        id: i64,
        input: GradeTypeInput,
    ) -> Result<Option<GradeType>> {
        let Some(existing) = GradeTypes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询成绩类型失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.name = Set(input.name);
        model.total = Set(input.total);
        model.grade_type_category_id = Set(input.category_id);
        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新成绩类型失败: {e}")))?;

        Ok(self.attach_categories(vec![updated]).await?.pop())
    }

    pub async fn delete_grade_type_impl(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = GradeTypes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除成绩类型失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }
        audit::record(&self.db, user_id, AuditAction::Delete, "grade_type", id, None).await?;
        Ok(true)
    }

    /// 分类的 ajax 搜索
    pub async fn search_grade_type_categories_impl(
        &self,
        term: Option<&str>,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<GradeTypeCategory>> {
        let mut select = grade_type_categories::Entity::find();
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let escaped = escape_like_pattern(term);
            select = select.filter(grade_type_categories::Column::Name.contains(&escaped));
        }
        select = select.order_by_asc(grade_type_categories::Column::Name);

        let (models, pagination) = self.fetch_page(select, page, size, "成绩分类").await?;

        Ok(PaginatedResponse {
            items: models.into_iter().map(|c| c.into_category()).collect(),
            pagination,
        })
    }

    pub async fn create_grade_type_category_impl(&self, name: &str) -> Result<GradeTypeCategory> {
        let model = grade_type_categories::ActiveModel {
            name: Set(name.trim().to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AcademyError::database_operation(format!("创建成绩分类失败: {e}")))?;

        Ok(model.into_category())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::memory_storage;
    use super::*;

    #[tokio::test]
    async fn test_grade_type_crud_with_category() {
        let s = memory_storage().await;
        let oral = s.create_grade_type_category_impl(" Oral ").await.unwrap();
        assert_eq!(oral.name, "Oral");

        let created = s
            .create_grade_type_impl(GradeTypeInput {
                name: "Presentation".to_string(),
                total: 20.0,
                category_id: oral.id,
            })
            .await
            .unwrap();
        assert_eq!(created.category_name.as_deref(), Some("Oral"));

        let updated = s
            .update_grade_type_impl(
                created.id,
                GradeTypeInput {
                    name: "Final presentation".to_string(),
                    total: 25.0,
                    category_id: oral.id,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.total, 25.0);

        assert!(s.delete_grade_type_impl(created.id, 1).await.unwrap());
        assert!(s.get_grade_type_impl(created.id).await.unwrap().is_none());
        assert!(!s.delete_grade_type_impl(created.id, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_by_category_name() {
        let s = memory_storage().await;
        let oral = s.create_grade_type_category_impl("Oral").await.unwrap();
        let written = s.create_grade_type_category_impl("Written").await.unwrap();
        for (name, category_id) in [("Presentation", oral.id), ("Essay", written.id)] {
            s.create_grade_type_impl(GradeTypeInput {
                name: name.to_string(),
                total: 10.0,
                category_id,
            })
            .await
            .unwrap();
        }

        let query = ListQuery {
            clauses: vec![Clause::Search(vec![
                SearchPredicate::Column {
                    key: "name",
                    term: "writ".to_string(),
                },
                SearchPredicate::Column {
                    key: "grade_type_category_id",
                    term: "writ".to_string(),
                },
            ])],
            page: 1,
            size: 25,
        };
        let page = s.list_grade_types_impl(&query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Essay");
    }

    #[tokio::test]
    async fn test_category_search_paginates() {
        let s = memory_storage().await;
        for name in ["Oral", "Oral exam", "Written"] {
            s.create_grade_type_category_impl(name).await.unwrap();
        }

        let page = s
            .search_grade_type_categories_impl(Some("oral"), 1, 1)
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.items[0].name, "Oral");

        let all = s.search_grade_type_categories_impl(None, 1, 25).await.unwrap();
        assert_eq!(all.items.len(), 3);
    }
}
