//! 课程与课表存储实现

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select, Set, TransactionTrait,
};

use crate::admin::{Clause, ListQuery, SearchPredicate};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses, Model};
use crate::entity::{
    course_times, enrollments, levels, partners, periods, rhythms, rooms, teachers,
};
use crate::errors::{AcademyError, Result};
use crate::models::{
    PaginatedResponse,
    courses::{
        entities::{CourseSummary, CourseTime, ExternalCourseRow},
        requests::{CourseInput, CourseTimeInput},
    },
};
use crate::utils::escape_like_pattern;

use super::audit::{self, AuditAction};
use super::{SeaOrmStorage, any_match, unsupported_clause};

fn id_column(name: &str) -> Option<Column> {
    match name {
        "rhythm_id" => Some(Column::RhythmId),
        "teacher_id" => Some(Column::TeacherId),
        "level_id" => Some(Column::LevelId),
        "period_id" => Some(Column::PeriodId),
        "campus_id" => Some(Column::CampusId),
        "partner_id" => Some(Column::PartnerId),
        "room_id" => Some(Column::RoomId),
        _ => None,
    }
}

fn apply_clause(select: Select<Courses>, clause: &Clause) -> Result<Select<Courses>> {
    let select = match clause {
        Clause::Where { column, value } => {
            let col = id_column(column).ok_or_else(|| unsupported_clause("courses", clause))?;
            select.filter(col.eq(*value))
        }
        Clause::AnyOf { column, values } => {
            let col = id_column(column).ok_or_else(|| unsupported_clause("courses", clause))?;
            select.filter(col.is_in(values.iter().copied()))
        }
        Clause::External { campus_id } => select.filter(Column::CampusId.eq(*campus_id)),
        Clause::InPeriod(period_id) => select.filter(Column::PeriodId.eq(*period_id)),
        Clause::Search(predicates) => select.filter(any_match(
            predicates.iter().filter_map(search_condition).collect(),
        )),
        _ => return Err(unsupported_clause("courses", clause)),
    };
    Ok(select)
}

/// 关联表名称模糊匹配
macro_rules! name_lookup {
    ($column:expr, $module:ident, $escaped:expr) => {
        Condition::all().add(
            $column.in_subquery(
                $module::Entity::find()
                    .select_only()
                    .column($module::Column::Id)
                    .filter($module::Column::Name.contains($escaped))
                    .into_query(),
            ),
        )
    };
}

fn search_condition(predicate: &SearchPredicate) -> Option<Condition> {
    let SearchPredicate::Column { key, term } = predicate else {
        return None;
    };
    let escaped = escape_like_pattern(term.trim());
    let condition = match *key {
        "name" => Condition::all().add(Column::Name.contains(&escaped)),
        "partner_id" => name_lookup!(Column::PartnerId, partners, &escaped),
        "rhythm_id" => name_lookup!(Column::RhythmId, rhythms, &escaped),
        "level_id" => name_lookup!(Column::LevelId, levels, &escaped),
        "room_id" => name_lookup!(Column::RoomId, rooms, &escaped),
        "teacher_id" => name_lookup!(Column::TeacherId, teachers, &escaped),
        _ => return None,
    };
    Some(condition)
}

fn time_models(course_id: i64, times: Vec<CourseTimeInput>) -> Vec<course_times::ActiveModel> {
    times
        .into_iter()
        .map(|t| course_times::ActiveModel {
            course_id: Set(course_id),
            day: Set(t.day),
            start_time: Set(t.start),
            end_time: Set(t.end),
            ..Default::default()
        })
        .collect()
}

/// 整体替换课表
async fn replace_times<C: ConnectionTrait>(
    conn: &C,
    course_id: i64,
    times: Vec<CourseTimeInput>,
) -> Result<()> {
    course_times::Entity::delete_many()
        .filter(course_times::Column::CourseId.eq(course_id))
        .exec(conn)
        .await
        .map_err(|e| AcademyError::database_operation(format!("删除课表失败: {e}")))?;

    for model in time_models(course_id, times) {
        model
            .insert(conn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("保存课表失败: {e}")))?;
    }
    Ok(())
}

fn apply_input(model: &mut ActiveModel, input: CourseInput) {
    model.campus_id = Set(input.campus_id);
    model.partner_id = Set(input.partner_id);
    model.rhythm_id = Set(input.rhythm_id);
    model.level_id = Set(input.level_id);
    model.teacher_id = Set(input.teacher_id);
    model.room_id = Set(input.room_id);
    model.period_id = Set(input.period_id);
    model.name = Set(input.name);
    model.volume = Set(input.volume);
    model.hourly_price = Set(input.hourly_price);
    model.price = Set(input.price);
    model.start_date = Set(input.start_date);
    model.end_date = Set(input.end_date);
    model.head_count = Set(input.head_count);
    model.new_students = Set(input.new_students);
}

impl SeaOrmStorage {
    /// 课程概要（学期、任课教师、报名人数）
    pub async fn get_course_summary_impl(&self, id: i64) -> Result<Option<CourseSummary>> {
        let Some(course) = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        let period = periods::Entity::find_by_id(course.period_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询学期失败: {e}")))?;

        let teacher = match course.teacher_id {
            Some(teacher_id) => teachers::Entity::find_by_id(teacher_id)
                .one(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("查询教师失败: {e}")))?,
            None => None,
        };

        let enrollment_count = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("统计报名失败: {e}")))?;

        Ok(Some(CourseSummary {
            id: course.id,
            name: course.name,
            period_id: course.period_id,
            period_name: period.map(|p| p.name).unwrap_or_default(),
            teacher_name: teacher.as_ref().map(|t| t.name.clone()),
            teacher_user_id: teacher.and_then(|t| t.user_id),
            start_date: course.start_date,
            end_date: course.end_date,
            enrollment_count: enrollment_count as i64,
        }))
    }

    /// 分页列出课程（调用方以 `External` 条件限定校区）
    pub async fn list_external_courses_impl(
        &self,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<ExternalCourseRow>> {
        let mut select = Courses::find();
        for clause in &query.clauses {
            select = apply_clause(select, clause)?;
        }
        select = select
            .order_by_desc(Column::StartDate)
            .order_by_desc(Column::Id);

        let (models, pagination) = self.fetch_list_page(select, query, "课程").await?;
        let items = self.hydrate_course_rows(models).await?;

        Ok(PaginatedResponse { items, pagination })
    }

    /// 单条课程，只在给定校区内查找
    pub async fn get_external_course_impl(
        &self,
        id: i64,
        campus_id: i64,
    ) -> Result<Option<ExternalCourseRow>> {
        let Some(model) = Courses::find_by_id(id)
            .filter(Column::CampusId.eq(campus_id))
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.hydrate_course_rows(vec![model]).await?.pop())
    }

    async fn hydrate_course_rows(&self, models: Vec<Model>) -> Result<Vec<ExternalCourseRow>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();

        let partner_map: HashMap<i64, String> = partners::Entity::find()
            .filter(partners::Column::Id.is_in(models.iter().filter_map(|m| m.partner_id)))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询合作机构失败: {e}")))?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let rhythm_map: HashMap<i64, String> = rhythms::Entity::find()
            .filter(rhythms::Column::Id.is_in(models.iter().map(|m| m.rhythm_id)))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程节奏失败: {e}")))?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let level_map: HashMap<i64, String> = levels::Entity::find()
            .filter(levels::Column::Id.is_in(models.iter().map(|m| m.level_id)))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询级别失败: {e}")))?
            .into_iter()
            .map(|l| (l.id, l.name))
            .collect();

        let teacher_map: HashMap<i64, String> = teachers::Entity::find()
            .filter(teachers::Column::Id.is_in(models.iter().filter_map(|m| m.teacher_id)))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询教师失败: {e}")))?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        let room_map: HashMap<i64, String> = rooms::Entity::find()
            .filter(rooms::Column::Id.is_in(models.iter().filter_map(|m| m.room_id)))
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询教室失败: {e}")))?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let mut times_map: HashMap<i64, Vec<CourseTime>> = HashMap::new();
        for time in course_times::Entity::find()
            .filter(course_times::Column::CourseId.is_in(ids))
            .order_by_asc(course_times::Column::Day)
            .order_by_asc(course_times::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课表失败: {e}")))?
        {
            times_map
                .entry(time.course_id)
                .or_default()
                .push(time.into_course_time());
        }

        Ok(models
            .into_iter()
            .map(|m| ExternalCourseRow {
                partner_name: m.partner_id.and_then(|id| partner_map.get(&id).cloned()),
                rhythm_name: rhythm_map.get(&m.rhythm_id).cloned(),
                level_name: level_map.get(&m.level_id).cloned(),
                teacher_name: m.teacher_id.and_then(|id| teacher_map.get(&id).cloned()),
                room_name: m.room_id.and_then(|id| room_map.get(&id).cloned()),
                times: times_map.remove(&m.id).unwrap_or_default(),
                id: m.id,
                campus_id: m.campus_id,
                partner_id: m.partner_id,
                rhythm_id: m.rhythm_id,
                level_id: m.level_id,
                teacher_id: m.teacher_id,
                room_id: m.room_id,
                period_id: m.period_id,
                name: m.name,
                volume: m.volume,
                hourly_price: m.hourly_price,
                price: m.price,
                head_count: m.head_count,
                new_students: m.new_students,
                start_date: m.start_date,
                end_date: m.end_date,
            })
            .collect())
    }

    /// 创建课程及课表（同一事务）
    pub async fn create_course_impl(
        &self,
        input: CourseInput,
        times: Vec<CourseTimeInput>,
    ) -> Result<ExternalCourseRow> {
        let now = chrono::Utc::now().timestamp();
        let campus_id = input.campus_id;
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_input(&mut model, input);

        let course = model
            .insert(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("创建课程失败: {e}")))?;

        for time in time_models(course.id, times) {
            time.insert(&txn)
                .await
                .map_err(|e| AcademyError::database_operation(format!("保存课表失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_external_course_impl(course.id, campus_id)
            .await?
            .ok_or_else(|| AcademyError::not_found(format!("Course {} not found", course.id)))
    }

    /// 更新课程；`times` 为 Some 时整体替换课表。其他校区的课程视为不存在
    pub async fn update_course_impl(
        &self,
        id: i64,
        campus_id: i64,
        input: CourseInput,
        times: Option<Vec<CourseTimeInput>>,
    ) -> Result<Option<ExternalCourseRow>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Courses::find_by_id(id)
            .filter(Column::CampusId.eq(campus_id))
            .one(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        apply_input(&mut model, input);
        model.updated_at = Set(chrono::Utc::now().timestamp());
        model
            .update(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新课程失败: {e}")))?;

        if let Some(times) = times {
            replace_times(&txn, id, times).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_external_course_impl(id, campus_id).await
    }

    /// 删除课程及课表；已有报名时拒绝，其他校区的课程视为不存在
    pub async fn delete_course_impl(&self, id: i64, campus_id: i64, user_id: i64) -> Result<bool> {
        let in_campus = Courses::find_by_id(id)
            .filter(Column::CampusId.eq(campus_id))
            .count(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课程失败: {e}")))?;
        if in_campus == 0 {
            return Ok(false);
        }

        let enrolled = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("统计报名失败: {e}")))?;
        if enrolled > 0 {
            return Err(AcademyError::conflict(format!(
                "Course {id} has {enrolled} enrollment(s) and cannot be deleted"
            )));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启事务失败: {e}")))?;

        course_times::Entity::delete_many()
            .filter(course_times::Column::CourseId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除课表失败: {e}")))?;

        let result = Courses::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AcademyError::database_operation(format!("删除课程失败: {e}")))?;
        if result.rows_affected == 0 {
            return Ok(false);
        }

        audit::record(&txn, user_id, AuditAction::Delete, "course", id, None).await?;

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    fn input(f: &CourseFixture, name: &str) -> CourseInput {
        CourseInput {
            campus_id: f.campus_id,
            partner_id: None,
            rhythm_id: f.rhythm_id,
            level_id: f.level_id,
            teacher_id: None,
            room_id: None,
            period_id: f.period_id,
            name: name.to_string(),
            volume: Some(40.0),
            hourly_price: Some(25.0),
            price: 0.0,
            start_date: "2025-01-06".to_string(),
            end_date: "2025-03-28".to_string(),
            head_count: Some(8),
            new_students: None,
        }
    }

    fn time(day: i32, start: &str, end: &str) -> CourseTimeInput {
        CourseTimeInput {
            day,
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_with_times_then_replace() {
        let s = memory_storage().await;
        let f = course_fixture(&s).await;

        let created = s
            .create_course_impl(
                input(&f, "Company A"),
                vec![time(3, "09:00", "11:00"), time(1, "09:00", "11:00")],
            )
            .await
            .unwrap();
        assert_eq!(created.rhythm_name.as_deref(), Some("Intensive"));
        assert_eq!(created.schedule(), "Monday 09:00-11:00, Wednesday 09:00-11:00");

        let updated = s
            .update_course_impl(
                created.id,
                f.campus_id,
                input(&f, "Company A (evening)"),
                Some(vec![time(2, "18:00", "20:00")]),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Company A (evening)");
        assert_eq!(updated.schedule(), "Tuesday 18:00-20:00");

        // 不提交课表时保持不变
        let kept = s
            .update_course_impl(created.id, f.campus_id, input(&f, "Company A"), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.times.len(), 1);
    }

    #[tokio::test]
    async fn test_external_clause_and_search() {
        let s = memory_storage().await;
        let f = course_fixture(&s).await;
        let external = insert_campus(&s, "External").await;

        s.create_course_impl(input(&f, "On site"), Vec::new())
            .await
            .unwrap();
        let mut ext = input(&f, "Company A");
        ext.campus_id = external;
        let ext = s.create_course_impl(ext, Vec::new()).await.unwrap();

        let query = ListQuery {
            clauses: vec![Clause::External {
                campus_id: external,
            }],
            page: 1,
            size: 25,
        };
        let page = s.list_external_courses_impl(&query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, ext.id);

        let query = ListQuery {
            clauses: vec![Clause::Search(vec![SearchPredicate::Column {
                key: "rhythm_id",
                term: "intens".to_string(),
            }])],
            page: 1,
            size: 25,
        };
        assert_eq!(s.list_external_courses_impl(&query).await.unwrap().items.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_refuses_when_enrolled() {
        let s = memory_storage().await;
        let f = course_fixture(&s).await;
        let course = s
            .create_course_impl(input(&f, "Company A"), vec![time(1, "09:00", "11:00")])
            .await
            .unwrap();
        let student = insert_student(&s, "ana", "Ana", "Lopez", None).await;
        insert_enrollment(&s, student, course.id, 1, 0.0).await;

        let err = s.delete_course_impl(course.id, f.campus_id, 1).await.unwrap_err();
        assert!(matches!(err, AcademyError::Conflict(_)));

        let empty = s
            .create_course_impl(input(&f, "Company B"), vec![time(1, "09:00", "11:00")])
            .await
            .unwrap();
        assert!(s.delete_course_impl(empty.id, f.campus_id, 1).await.unwrap());
        let leftover = course_times::Entity::find()
            .filter(course_times::Column::CourseId.eq(empty.id))
            .count(&s.db)
            .await
            .unwrap();
        assert_eq!(leftover, 0);
        assert!(!s.delete_course_impl(empty.id, f.campus_id, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_other_campus_is_out_of_reach() {
        let s = memory_storage().await;
        let f = course_fixture(&s).await;
        let external = insert_campus(&s, "External").await;
        let internal = s
            .create_course_impl(input(&f, "On site"), vec![time(1, "09:00", "11:00")])
            .await
            .unwrap();

        assert!(s
            .get_external_course_impl(internal.id, external)
            .await
            .unwrap()
            .is_none());

        let mut moved = input(&f, "Hijacked");
        moved.campus_id = external;
        assert!(s
            .update_course_impl(internal.id, external, moved, Some(Vec::new()))
            .await
            .unwrap()
            .is_none());
        assert!(!s.delete_course_impl(internal.id, external, 1).await.unwrap());

        let kept = s
            .get_external_course_impl(internal.id, f.campus_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.name, "On site");
        assert_eq!(kept.campus_id, f.campus_id);
        assert_eq!(kept.times.len(), 1);
    }

    #[tokio::test]
    async fn test_course_summary_carries_teacher_user() {
        let s = memory_storage().await;
        let f = course_fixture(&s).await;
        let user = insert_user(&s, "tina", "Tina", "Teach").await;
        let teacher = insert_teacher(&s, "Tina Teach", Some(user)).await;
        let course = insert_course(&s, &f, "B1 Intensive", Some(teacher)).await;

        let summary = s.get_course_summary_impl(course).await.unwrap().unwrap();
        assert_eq!(summary.teacher_user_id, Some(user));
        assert_eq!(summary.period_name, "2025-1");
        assert_eq!(summary.enrollment_count, 0);
        assert!(s.get_course_summary_impl(course + 1).await.unwrap().is_none());
    }
}
