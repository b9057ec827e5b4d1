//! 列表查询规划
//!
//! 把请求参数（分页、搜索、筛选器取值）与描述符组合成存储层可执行的 [`ListQuery`]。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::Result;
use crate::models::PaginationQuery;

use super::clause::{Clause, SearchPredicate};
use super::context::DescriptorContext;
use super::descriptor::{InactiveDefault, ResourceDescriptor, SearchStrategy};

/// 这些参数不会被当作筛选器取值
const RESERVED_PARAMS: [&str; 4] = ["page", "size", "search", "course_id"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub page: i64,
    pub size: i64,
    pub search: Option<String>,
    pub filters: HashMap<String, String>,
}

impl ListParams {
    pub fn from_query(mut query: HashMap<String, String>) -> Self {
        let pagination = PaginationQuery {
            page: query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1),
            size: query
                .get("size")
                .and_then(|s| s.parse().ok())
                .unwrap_or(PaginationQuery::default().size),
        }
        .normalized();

        let search = query
            .remove("search")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let filters = query
            .into_iter()
            .filter(|(k, v)| !RESERVED_PARAMS.contains(&k.as_str()) && !v.trim().is_empty())
            .collect();

        Self {
            page: pagination.page,
            size: pagination.size,
            search,
            filters,
        }
    }
}

/// 生效中的筛选器
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "admin.ts")]
pub struct ActiveFilter {
    pub name: String,
    pub value: String,
    /// 由未激活时的默认行为产生
    pub defaulted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub clauses: Vec<Clause>,
    pub page: u64,
    pub size: u64,
}

pub fn plan_list<R>(
    descriptor: &ResourceDescriptor<R>,
    params: &ListParams,
    ctx: &DescriptorContext,
) -> Result<(ListQuery, Vec<ActiveFilter>)> {
    let mut clauses = descriptor.base_clauses.clone();
    let mut active = Vec::new();

    for filter in &descriptor.filters {
        match params.filters.get(filter.name) {
            Some(value) => {
                clauses.extend((filter.apply)(value)?);
                active.push(ActiveFilter {
                    name: filter.name.to_string(),
                    value: value.clone(),
                    defaulted: false,
                });
            }
            None => match filter.inactive {
                Some(InactiveDefault::DefaultPeriod) => {
                    if let Some(period) = &ctx.default_period {
                        let value = period.id.to_string();
                        clauses.extend((filter.apply)(&value)?);
                        active.push(ActiveFilter {
                            name: filter.name.to_string(),
                            value,
                            defaulted: true,
                        });
                    }
                }
                None => {}
            },
        }
    }

    if let Some(term) = &params.search {
        let predicates: Vec<SearchPredicate> = descriptor
            .columns
            .iter()
            .filter_map(|column| match &column.search {
                SearchStrategy::Column => Some(SearchPredicate::Column {
                    key: column.key,
                    term: term.clone(),
                }),
                SearchStrategy::Custom(build) => Some(build(term)),
                SearchStrategy::Disabled => None,
            })
            .collect();
        if !predicates.is_empty() {
            clauses.push(Clause::Search(predicates));
        }
    }

    Ok((
        ListQuery {
            clauses,
            page: params.page.max(1) as u64,
            size: params.size.max(1) as u64,
        },
        active,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::descriptor::{Column, ColumnKind, Filter, FilterKind, OptionSource};
    use crate::admin::render::CellValue;
    use crate::admin::Operation;
    use crate::errors::AcademyError;
    use crate::models::courses::entities::Period;

    struct Row;

    fn period_filter(value: &str) -> Result<Vec<Clause>> {
        let id = value
            .parse()
            .map_err(|_| AcademyError::malformed_payload("bad period"))?;
        Ok(vec![Clause::InPeriod(id)])
    }

    fn descriptor() -> ResourceDescriptor<Row> {
        let mut d = ResourceDescriptor::new("row", "rows", "rows");
        d.base_clauses.push(Clause::External { campus_id: 2 });
        d.columns.push(Column::new("name", "Name", ColumnKind::Text, |_| CellValue::Empty));
        d.columns.push(
            Column::new("teacher", "Teacher", ColumnKind::Text, |_| CellValue::Empty)
                .not_searchable(),
        );
        d.filters.push(
            Filter::new(
                "period_id",
                FilterKind::Select2,
                "Period",
                OptionSource::None,
                period_filter,
            )
            .when_inactive(InactiveDefault::DefaultPeriod),
        );
        d
    }

    fn ctx() -> DescriptorContext {
        DescriptorContext::new(Operation::List).with_periods(
            Some(Period {
                id: 4,
                name: "2025-1".to_string(),
                start_date: "2025-01-01".to_string(),
                end_date: "2025-03-31".to_string(),
            }),
            None,
        )
    }

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        ListParams::from_query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_params_skip_reserved_and_empty() {
        let p = params(&[("page", "0"), ("size", "500"), ("course_id", "3"), ("level", " ")]);
        assert_eq!(p.page, 1);
        assert_eq!(p.size, 100);
        assert!(p.filters.is_empty());
    }

    #[test]
    fn test_inactive_default_equals_explicit_value() {
        let (implicit, active) = plan_list(&descriptor(), &params(&[]), &ctx()).unwrap();
        let (explicit, _) = plan_list(&descriptor(), &params(&[("period_id", "4")]), &ctx()).unwrap();

        assert_eq!(implicit, explicit);
        assert_eq!(active.len(), 1);
        assert!(active[0].defaulted);
        assert_eq!(active[0].value, "4");
    }

    #[test]
    fn test_no_default_period_means_no_filter() {
        let ctx = DescriptorContext::new(Operation::List);
        let (query, active) = plan_list(&descriptor(), &params(&[]), &ctx).unwrap();
        assert_eq!(query.clauses, vec![Clause::External { campus_id: 2 }]);
        assert!(active.is_empty());
    }

    #[test]
    fn test_search_uses_searchable_columns_only() {
        let (query, _) =
            plan_list(&descriptor(), &params(&[("search", "abc"), ("period_id", "1")]), &ctx())
                .unwrap();
        assert_eq!(
            query.clauses.last(),
            Some(&Clause::Search(vec![SearchPredicate::Column {
                key: "name",
                term: "abc".to_string()
            }]))
        );
    }

    #[test]
    fn test_filter_error_propagates() {
        let err = plan_list(&descriptor(), &params(&[("period_id", "x")]), &ctx()).unwrap_err();
        assert!(matches!(err, AcademyError::MalformedPayload(_)));
    }
}
