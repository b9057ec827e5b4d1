//! 报名存储实现

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Select, Set, TransactionTrait,
};

use crate::admin::{Clause, ListQuery, ScholarshipFilter, SearchPredicate};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments, Model};
use crate::entity::{
    comments, courses, enrollment_scholarships, enrollment_status_types, invoice_details,
    invoices, periods, phone_numbers, scheduled_payments, scholarships, students, users,
};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginatedResponse,
    enrollments::{
        entities::{Comment, Enrollment, EnrollmentRow, EnrollmentStatus, Invoice, age_on},
        requests::EnrollmentUpdate,
    },
};
use crate::utils::escape_like_pattern;

use super::audit::{self, AuditAction};
use super::{SeaOrmStorage, any_match, unsupported_clause};

pub(crate) const COMMENTABLE_ENROLLMENT: &str = "enrollment";
pub(crate) const COMMENTABLE_INVOICE: &str = "invoice";

fn apply_clause(select: Select<Enrollments>, clause: &Clause) -> Result<Select<Enrollments>> {
    let select = match clause {
        Clause::Where { column, value } => match *column {
            "status_id" => select.filter(Column::StatusId.eq(*value)),
            "course_id" => select.filter(Column::CourseId.eq(*value)),
            "student_id" => select.filter(Column::StudentId.eq(*value)),
            _ => return Err(unsupported_clause("enrollments", clause)),
        },
        Clause::AnyOf { column, values } => match *column {
            "status_id" => select.filter(Column::StatusId.is_in(values.iter().copied())),
            _ => return Err(unsupported_clause("enrollments", clause)),
        },
        Clause::InPeriod(period_id) => select.filter(
            Column::CourseId.in_subquery(
                courses::Entity::find()
                    .select_only()
                    .column(courses::Column::Id)
                    .filter(courses::Column::PeriodId.eq(*period_id))
                    .into_query(),
            ),
        ),
        Clause::InCourse(course_id) => select.filter(Column::CourseId.eq(*course_id)),
        Clause::HasScholarship(filter) => {
            let mut sub = enrollment_scholarships::Entity::find()
                .select_only()
                .column(enrollment_scholarships::Column::EnrollmentId);
            if let ScholarshipFilter::Id(id) = filter {
                sub = sub.filter(enrollment_scholarships::Column::ScholarshipId.eq(*id));
            }
            select.filter(Column::Id.in_subquery(sub.into_query()))
        }
        Clause::Pending => select.filter(Column::StatusId.eq(EnrollmentStatus::Pending.id())),
        Clause::Search(predicates) => select.filter(any_match(
            predicates.iter().filter_map(search_condition).collect(),
        )),
        Clause::External { .. } | Clause::WithTrashed => {
            return Err(unsupported_clause("enrollments", clause));
        }
    };
    Ok(select)
}

/// 学生 id 子查询：其用户的指定属性包含搜索词
fn students_by_user(column: users::Column, escaped: &str) -> Condition {
    Condition::all().add(
        Column::StudentId.in_subquery(
            students::Entity::find()
                .select_only()
                .column(students::Column::Id)
                .filter(
                    students::Column::UserId.in_subquery(
                        users::Entity::find()
                            .select_only()
                            .column(users::Column::Id)
                            .filter(column.contains(escaped))
                            .into_query(),
                    ),
                )
                .into_query(),
        ),
    )
}

fn search_condition(predicate: &SearchPredicate) -> Option<Condition> {
    match predicate {
        SearchPredicate::Column { key, term } => {
            let escaped = escape_like_pattern(term.trim());
            match *key {
                "id" => term
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .map(|id| Condition::all().add(Column::Id.eq(id))),
                "student.idnumber" => Some(
                    Condition::all().add(
                        Column::StudentId.in_subquery(
                            students::Entity::find()
                                .select_only()
                                .column(students::Column::Id)
                                .filter(students::Column::Idnumber.contains(&escaped))
                                .into_query(),
                        ),
                    ),
                ),
                "course_id" => Some(
                    Condition::all().add(
                        Column::CourseId.in_subquery(
                            courses::Entity::find()
                                .select_only()
                                .column(courses::Column::Id)
                                .filter(courses::Column::Name.contains(&escaped))
                                .into_query(),
                        ),
                    ),
                ),
                _ => None,
            }
        }
        SearchPredicate::Related {
            path: "student.user",
            attribute,
            term,
        } => {
            let escaped = escape_like_pattern(term.trim());
            let column = match *attribute {
                "lastname" => users::Column::Lastname,
                "firstname" => users::Column::Firstname,
                "email" => users::Column::Email,
                "username" => users::Column::Username,
                _ => return None,
            };
            Some(students_by_user(column, &escaped))
        }
        SearchPredicate::Related { .. } => None,
    }
}

/// 按 key 分组
fn group_by<K, V, T>(items: impl IntoIterator<Item = T>, split: impl Fn(T) -> (K, V)) -> HashMap<K, Vec<V>>
where
    K: std::hash::Hash + Eq,
{
    let mut grouped: HashMap<K, Vec<V>> = HashMap::new();
    for item in items {
        let (key, value) = split(item);
        grouped.entry(key).or_default().push(value);
    }
    grouped
}

impl SeaOrmStorage {
    /// 分页列出报名
    pub async fn list_enrollments_impl(
        &self,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<EnrollmentRow>> {
        let mut select = Enrollments::find();
        for clause in &query.clauses {
            select = apply_clause(select, clause)?;
        }
        select = select.order_by_desc(Column::Id);

        let (models, pagination) = self.fetch_list_page(select, query, "报名").await?;
        let items = self.hydrate_enrollment_rows(models).await?;

        Ok(PaginatedResponse { items, pagination })
    }

    /// 单条报名的列表行
    pub async fn get_enrollment_row_impl(&self, id: i64) -> Result<Option<EnrollmentRow>> {
        let Some(model) = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.hydrate_enrollment_rows(vec![model]).await?.pop())
    }

    /// 批量关联学生、用户、课程、学期、状态、分期计划、奖学金与电话
    async fn hydrate_enrollment_rows(&self, models: Vec<Model>) -> Result<Vec<EnrollmentRow>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let student_ids: Vec<i64> = models.iter().map(|m| m.student_id).collect();
        let course_ids: Vec<i64> = models.iter().map(|m| m.course_id).collect();

        let student_map: HashMap<i64, students::Model> = students::Entity::find()
            .filter(students::Column::Id.is_in(student_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let user_ids: Vec<i64> = student_map.values().map(|s| s.user_id).collect();
        let user_map: HashMap<i64, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询用户失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let course_map: HashMap<i64, courses::Model> = courses::Entity::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let period_ids: Vec<i64> = course_map.values().map(|c| c.period_id).collect();
        let period_map: HashMap<i64, String> = periods::Entity::find()
            .filter(periods::Column::Id.is_in(period_ids))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询学期失败: {e}")))?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let status_map: HashMap<i64, String> = enrollment_status_types::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名状态失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let payments = scheduled_payments::Entity::find()
            .filter(scheduled_payments::Column::EnrollmentId.is_in(ids.clone()))
            .order_by_asc(scheduled_payments::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询分期计划失败: {e}")))?;
        let mut payment_map = group_by(payments, |p| (p.enrollment_id, p.into_scheduled_payment()));

        let links = enrollment_scholarships::Entity::find()
            .filter(enrollment_scholarships::Column::EnrollmentId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询奖学金关联失败: {e}")))?;
        let scholarship_names: HashMap<i64, String> = scholarships::Entity::find()
            .filter(
                scholarships::Column::Id
                    .is_in(links.iter().map(|l| l.scholarship_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询奖学金失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();
        let mut scholarship_map = group_by(links, |l| {
            (
                l.enrollment_id,
                scholarship_names
                    .get(&l.scholarship_id)
                    .cloned()
                    .unwrap_or_default(),
            )
        });

        let phones = phone_numbers::Entity::find()
            .filter(phone_numbers::Column::StudentId.is_in(student_ids))
            .order_by_asc(phone_numbers::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询电话失败: {e}")))?;
        let phone_map = group_by(phones, |p| (p.student_id, p.phone_number));

        let today = chrono::Utc::now().date_naive();

        let rows = models
            .into_iter()
            .map(|m| {
                let student = student_map.get(&m.student_id);
                let user = student.and_then(|s| user_map.get(&s.user_id));
                let course = course_map.get(&m.course_id);
                let birthdate = student.and_then(|s| s.birthdate.clone());

                EnrollmentRow {
                    id: m.id,
                    student_id: m.student_id,
                    student_idnumber: student.and_then(|s| s.idnumber.clone()),
                    firstname: user.map(|u| u.firstname.clone()).unwrap_or_default(),
                    lastname: user.map(|u| u.lastname.clone()).unwrap_or_default(),
                    email: user.map(|u| u.email.clone()).unwrap_or_default(),
                    age: birthdate.as_deref().and_then(|b| age_on(b, today)),
                    birthdate,
                    course_id: m.course_id,
                    course_name: course.map(|c| c.name.clone()).unwrap_or_default(),
                    period_id: course.map(|c| c.period_id).unwrap_or_default(),
                    period_name: course
                        .and_then(|c| period_map.get(&c.period_id).cloned())
                        .unwrap_or_default(),
                    status_id: m.status_id,
                    status_name: status_map.get(&m.status_id).cloned().unwrap_or_default(),
                    price: m.price,
                    balance: m.balance,
                    scheduled_payments: payment_map.remove(&m.id).unwrap_or_default(),
                    scholarships: scholarship_map.remove(&m.id).unwrap_or_default(),
                    phone_numbers: phone_map.get(&m.student_id).cloned().unwrap_or_default(),
                }
            })
            .collect();

        Ok(rows)
    }

    /// 报名的发票及明细
    pub async fn list_enrollment_invoices_impl(&self, enrollment_id: i64) -> Result<Vec<Invoice>> {
        let invoice_models = invoices::Entity::find()
            .filter(invoices::Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(invoices::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询发票失败: {e}")))?;

        let invoice_ids: Vec<i64> = invoice_models.iter().map(|i| i.id).collect();
        let details = invoice_details::Entity::find()
            .filter(invoice_details::Column::InvoiceId.is_in(invoice_ids))
            .order_by_asc(invoice_details::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询发票明细失败: {e}")))?;
        let mut detail_map = group_by(details, |d| (d.invoice_id, d.into_detail()));

        Ok(invoice_models
            .into_iter()
            .map(|i| Invoice {
                details: detail_map.remove(&i.id).unwrap_or_default(),
                id: i.id,
                invoice_number: i.invoice_number,
                total: i.total,
                date: i.date,
            })
            .collect())
    }

    /// 报名本身及其发票上的备注，按时间排序
    pub async fn list_enrollment_comments_impl(&self, enrollment_id: i64) -> Result<Vec<Comment>> {
        let invoice_ids = invoices::Entity::find()
            .select_only()
            .column(invoices::Column::Id)
            .filter(invoices::Column::EnrollmentId.eq(enrollment_id))
            .into_query();

        let rows = comments::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(comments::Column::CommentableType.eq(COMMENTABLE_ENROLLMENT))
                            .add(comments::Column::CommentableId.eq(enrollment_id)),
                    )
                    .add(
                        Condition::all()
                            .add(comments::Column::CommentableType.eq(COMMENTABLE_INVOICE))
                            .add(comments::Column::CommentableId.in_subquery(invoice_ids)),
                    ),
            )
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询备注失败: {e}")))?;

        Ok(rows.into_iter().map(|c| c.into_comment()).collect())
    }

    /// 待付款报名的余额合计
    pub async fn pending_balance_total_impl(&self) -> Result<f64> {
        let total = Enrollments::find()
            .select_only()
            .column_as(Column::Balance.sum(), "total")
            .filter(Column::StatusId.eq(EnrollmentStatus::Pending.id()))
            .into_tuple::<Option<f64>>()
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("统计待付余额失败: {e}")))?;

        Ok(total.flatten().unwrap_or(0.0))
    }

    /// 更新报名；给出分期计划时在同一事务中先删后插
    pub async fn update_enrollment_impl(
        &self,
        id: i64,
        update: EnrollmentUpdate,
    ) -> Result<Option<Enrollment>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Enrollments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.course_id = Set(update.course_id);
        model.price = Set(update.price);
        model.status_id = Set(update.status_id);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新报名失败: {e}")))?;

        if let Some(payments) = update.scheduled_payments {
            scheduled_payments::Entity::delete_many()
                .filter(scheduled_payments::Column::EnrollmentId.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| AcademyError::database_operation(format!("删除分期计划失败: {e}")))?;

            for payment in payments {
                scheduled_payments::ActiveModel {
                    enrollment_id: Set(id),
                    date: Set(payment.date),
                    value: Set(payment.value),
                    status: Set(payment.status),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| AcademyError::database_operation(format!("保存分期计划失败: {e}")))?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_enrollment()))
    }

    /// 取消报名：保留记录，状态改为已取消
    pub async fn cancel_enrollment_impl(&self, id: i64, user_id: i64) -> Result<Option<Enrollment>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Enrollments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询报名失败: {e}")))?
        else {
            return Ok(None);
        };

        let previous_status = existing.status_id;
        let mut model: ActiveModel = existing.into();
        model.status_id = Set(EnrollmentStatus::Canceled.id());
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("取消报名失败: {e}")))?;

        audit::record(
            &txn,
            user_id,
            AuditAction::Cancel,
            "enrollment",
            id,
            Some(serde_json::json!({ "previous_status": previous_status })),
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_enrollment()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::entity::{audit_logs, enrollment_scholarships, phone_numbers, scholarships};
    use crate::models::enrollments::requests::ScheduledPaymentInput;

    fn list(clauses: Vec<Clause>) -> ListQuery {
        ListQuery {
            clauses,
            page: 1,
            size: 25,
        }
    }

    struct Seeded {
        s: SeaOrmStorage,
        course_id: i64,
        period_id: i64,
        pending: i64,
        paid: i64,
    }

    async fn seeded() -> Seeded {
        let s = memory_storage().await;
        let f = course_fixture(&s).await;
        let course_id = insert_course(&s, &f, "B1 Intensive", None).await;
        let ana = insert_student(&s, "ana", "Ana", "Lopez", Some("2000-03-10")).await;
        let ben = insert_student(&s, "ben", "Ben", "Meyer", None).await;
        let pending = insert_enrollment(&s, ana, course_id, 1, 120.0).await;
        let paid = insert_enrollment(&s, ben, course_id, 2, 0.0).await;
        Seeded {
            s,
            course_id,
            period_id: f.period_id,
            pending,
            paid,
        }
    }

    #[tokio::test]
    async fn test_list_hydrates_rows() {
        let t = seeded().await;
        phone_numbers::ActiveModel {
            student_id: Set(1),
            phone_number: Set("555-0100".to_string()),
            ..Default::default()
        }
        .insert(&t.s.db)
        .await
        .unwrap();

        let page = t.s.list_enrollments_impl(&list(Vec::new())).await.unwrap();
        assert_eq!(page.pagination.total, 2);

        let row = page.items.iter().find(|r| r.id == t.pending).unwrap();
        assert_eq!(row.lastname, "Lopez");
        assert_eq!(row.email, "ana@example.com");
        assert_eq!(row.course_name, "B1 Intensive");
        assert_eq!(row.period_name, "2025-1");
        assert_eq!(row.status_name, "Pending");
        assert_eq!(row.phone_numbers, vec!["555-0100"]);
        assert!(row.age.is_some());
    }

    #[tokio::test]
    async fn test_status_any_of_and_period_clauses() {
        let t = seeded().await;

        let page = t
            .s
            .list_enrollments_impl(&list(vec![Clause::AnyOf {
                column: "status_id",
                values: vec![2, 3],
            }]))
            .await
            .unwrap();
        let ids: Vec<i64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![t.paid]);

        let page = t
            .s
            .list_enrollments_impl(&list(vec![Clause::InPeriod(t.period_id + 1)]))
            .await
            .unwrap();
        assert!(page.items.is_empty());

        let page = t
            .s
            .list_enrollments_impl(&list(vec![Clause::InCourse(t.course_id)]))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_search_through_student_user() {
        let t = seeded().await;
        let query = list(vec![Clause::Search(vec![
            SearchPredicate::Column {
                key: "id",
                term: "mey".to_string(),
            },
            SearchPredicate::Related {
                path: "student.user",
                attribute: "lastname",
                term: "mey".to_string(),
            },
        ])]);

        let page = t.s.list_enrollments_impl(&query).await.unwrap();
        let ids: Vec<i64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![t.paid]);
    }

    #[tokio::test]
    async fn test_scholarship_clause() {
        let t = seeded().await;
        let scholarship = scholarships::ActiveModel {
            name: Set("Merit".to_string()),
            ..Default::default()
        }
        .insert(&t.s.db)
        .await
        .unwrap();
        enrollment_scholarships::ActiveModel {
            enrollment_id: Set(t.pending),
            scholarship_id: Set(scholarship.id),
            ..Default::default()
        }
        .insert(&t.s.db)
        .await
        .unwrap();

        let any = t
            .s
            .list_enrollments_impl(&list(vec![Clause::HasScholarship(ScholarshipFilter::Any)]))
            .await
            .unwrap();
        assert_eq!(any.items.len(), 1);
        assert_eq!(any.items[0].scholarships, vec!["Merit"]);

        let other = t
            .s
            .list_enrollments_impl(&list(vec![Clause::HasScholarship(ScholarshipFilter::Id(
                scholarship.id + 1,
            ))]))
            .await
            .unwrap();
        assert!(other.items.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_clause_is_rejected() {
        let t = seeded().await;
        let err = t
            .s
            .list_enrollments_impl(&list(vec![Clause::WithTrashed]))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::Validation(_)));
    }

    #[tokio::test]
    async fn test_pending_balance_total() {
        let t = seeded().await;
        assert_eq!(t.s.pending_balance_total_impl().await.unwrap(), 120.0);
    }

    #[tokio::test]
    async fn test_update_replaces_scheduled_payments() {
        let t = seeded().await;
        let payment = |date: &str, value| ScheduledPaymentInput {
            date: date.to_string(),
            value,
            status: 1,
        };

        let update = |payments| EnrollmentUpdate {
            course_id: t.course_id,
            price: 250.0,
            status_id: 1,
            scheduled_payments: payments,
        };

        t.s.update_enrollment_impl(
            t.pending,
            update(Some(vec![payment("2025-02-01", 100.0), payment("2025-03-01", 150.0)])),
        )
        .await
        .unwrap();
        t.s.update_enrollment_impl(t.pending, update(Some(vec![payment("2025-04-01", 250.0)])))
            .await
            .unwrap();

        let payments = t.s.get_enrollment_row_impl(t.pending).await.unwrap().unwrap().scheduled_payments;
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].date, "2025-04-01");

        // 未提交分期计划时保持不变
        let updated = t
            .s
            .update_enrollment_impl(t.pending, update(None))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.price, 250.0);
        assert_eq!(
            t.s.get_enrollment_row_impl(t.pending)
                .await
                .unwrap()
                .unwrap()
                .scheduled_payments
                .len(),
            1
        );

        assert!(t
            .s
            .update_enrollment_impl(9999, update(None))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_cancel_keeps_row_and_audits() {
        let t = seeded().await;
        let canceled = t.s.cancel_enrollment_impl(t.pending, 42).await.unwrap().unwrap();
        assert_eq!(canceled.status_id, EnrollmentStatus::Canceled.id());
        assert!(t.s.get_enrollment_row_impl(t.pending).await.unwrap().is_some());

        let logs = audit_logs::Entity::find().all(&t.s.db).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].user_id, 42);
        assert_eq!(logs[0].action, "cancel");
        assert_eq!(logs[0].entity_id, t.pending.to_string());
    }

    #[tokio::test]
    async fn test_comments_of_enrollment_and_invoices() {
        let t = seeded().await;
        let invoice = invoices::ActiveModel {
            enrollment_id: Set(t.pending),
            total: Set(300.0),
            date: Set("2025-01-10".to_string()),
            created_at: Set(0),
            ..Default::default()
        }
        .insert(&t.s.db)
        .await
        .unwrap();
        invoice_details::ActiveModel {
            invoice_id: Set(invoice.id),
            product_name: Set("Course fee".to_string()),
            price: Set(300.0),
            ..Default::default()
        }
        .insert(&t.s.db)
        .await
        .unwrap();

        for (kind, target, body) in [
            (COMMENTABLE_ENROLLMENT, t.pending, "first call"),
            (COMMENTABLE_INVOICE, invoice.id, "paid by card"),
            (COMMENTABLE_ENROLLMENT, t.paid, "other enrollment"),
        ] {
            comments::ActiveModel {
                commentable_type: Set(kind.to_string()),
                commentable_id: Set(target),
                body: Set(body.to_string()),
                created_at: Set(0),
                ..Default::default()
            }
            .insert(&t.s.db)
            .await
            .unwrap();
        }

        let invoices = t.s.list_enrollment_invoices_impl(t.pending).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].details[0].product_name, "Course fee");

        let bodies: Vec<String> = t
            .s
            .list_enrollment_comments_impl(t.pending)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.body)
            .collect();
        assert_eq!(bodies, vec!["first call", "paid by card"]);
    }
}
