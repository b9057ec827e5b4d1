//! 外部课程（合作机构在外部校区开设的课程）

use crate::admin::repeatable::decode_course_times;
use crate::admin::resources::external_course;
use crate::admin::{DescriptorContext, FormInput, ListQuery, ResourceDescriptor};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::PaginatedResponse;
use crate::models::auth::entities::AuthContext;
use crate::models::courses::entities::ExternalCourseRow;
use crate::models::courses::requests::{CourseInput, CourseTimeInput};
use crate::services::panel::PanelResource;
use crate::storage::Storage;

/// 所有单条操作都限定在外部校区内，其他校区的课程按不存在处理
pub struct ExternalCourseService {
    campus_id: i64,
}

impl ExternalCourseService {
    pub fn for_campus(campus_id: i64) -> Self {
        Self { campus_id }
    }

    /// 校区只取自配置，提交的 `campus_id` 一律覆盖
    fn scoped_input(&self, input: &FormInput) -> FormInput {
        let mut input = input.clone();
        input.set("campus_id", self.campus_id.to_string());
        input
    }
}

impl Default for ExternalCourseService {
    fn default() -> Self {
        Self::for_campus(AppConfig::get().academy.external_campus_id)
    }
}

fn course_input(input: &FormInput) -> Result<CourseInput> {
    Ok(CourseInput {
        campus_id: input.required_i64("campus_id")?,
        partner_id: input.i64("partner_id")?,
        rhythm_id: input.required_i64("rhythm_id")?,
        level_id: input.required_i64("level_id")?,
        teacher_id: input.i64("teacher_id")?,
        room_id: input.i64("room_id")?,
        period_id: input.required_i64("period_id")?,
        name: input.required_text("name")?,
        volume: input.f64("volume")?,
        hourly_price: input.f64("hourly_price")?,
        price: input.f64("price")?.unwrap_or(0.0),
        start_date: input.required_text("start_date")?,
        end_date: input.required_text("end_date")?,
        head_count: input.i32("head_count")?,
        new_students: input.i32("new_students")?,
    })
}

/// 新建时的课表：选了预设就用预设，否则用逐条填写的时间段
fn schedule_for_create(input: &FormInput) -> Result<Vec<CourseTimeInput>> {
    if let Some(preset) = input.text("schedulepreset") {
        return decode_course_times("schedulepreset", &preset);
    }
    match input.text("times") {
        Some(raw) => decode_course_times("times", &raw),
        None => Ok(Vec::new()),
    }
}

/// 编辑时只有提交了 `times` 才替换课表
fn schedule_for_update(input: &FormInput) -> Result<Option<Vec<CourseTimeInput>>> {
    // 空字符串不是合法的课表，清空课表需提交 `[]`
    input
        .get("times")
        .map(|raw| decode_course_times("times", raw))
        .transpose()
}

#[async_trait::async_trait]
impl PanelResource for ExternalCourseService {
    type Row = ExternalCourseRow;

    fn descriptor(&self, ctx: &DescriptorContext) -> ResourceDescriptor<ExternalCourseRow> {
        external_course::descriptor(ctx)
    }

    async fn list(
        &self,
        storage: &dyn Storage,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<ExternalCourseRow>> {
        storage.list_external_courses(query).await
    }

    async fn find(&self, storage: &dyn Storage, id: i64) -> Result<Option<ExternalCourseRow>> {
        storage.get_external_course(id, self.campus_id).await
    }

    async fn create(
        &self,
        storage: &dyn Storage,
        input: &FormInput,
        _ctx: &DescriptorContext,
    ) -> Result<ExternalCourseRow> {
        let input = self.scoped_input(input);
        let times = schedule_for_create(&input)?;
        storage.create_course(course_input(&input)?, times).await
    }

    async fn update(
        &self,
        storage: &dyn Storage,
        id: i64,
        input: &FormInput,
        _auth: &AuthContext,
    ) -> Result<Option<ExternalCourseRow>> {
        let input = self.scoped_input(input);
        let times = schedule_for_update(&input)?;
        storage
            .update_course(id, self.campus_id, course_input(&input)?, times)
            .await
    }

    async fn delete(&self, storage: &dyn Storage, id: i64, auth: &AuthContext) -> Result<bool> {
        // 仍有报名时存储层返回 Conflict
        storage.delete_course(id, self.campus_id, auth.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::Operation;
    use crate::errors::AcademyError;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing::{
        CourseFixture, course_fixture, insert_campus, insert_course, insert_enrollment,
        insert_student, memory_storage,
    };
    use serde_json::json;

    fn course_form(f: &CourseFixture) -> serde_json::Value {
        json!({
            "rhythm_id": f.rhythm_id,
            "level_id": f.level_id,
            "period_id": f.period_id,
            "name": "Business English",
            "volume": "40",
            "start_date": "2025-01-06",
            "end_date": "2025-03-28",
        })
    }

    #[test]
    fn test_preset_wins_over_times() {
        let input = FormInput::from_json(json!({
            "schedulepreset": r#"[{"day": 2, "start": "18:00", "end": "20:00"}]"#,
            "times": [{"day": 4, "start": "09:00", "end": "11:00"}],
        }))
        .unwrap();
        let times = schedule_for_create(&input).unwrap();
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].day, 2);
    }

    #[test]
    fn test_update_keeps_schedule_without_times() {
        let input = FormInput::from_json(json!({"name": "x"})).unwrap();
        assert!(schedule_for_update(&input).unwrap().is_none());

        let input = FormInput::from_json(json!({"times": "not json"})).unwrap();
        assert!(matches!(
            schedule_for_update(&input),
            Err(AcademyError::MalformedPayload(_))
        ));

        let input = FormInput::from_json(json!({"times": ""})).unwrap();
        assert!(matches!(
            schedule_for_update(&input),
            Err(AcademyError::MalformedPayload(_))
        ));

        let input = FormInput::from_json(json!({"times": []})).unwrap();
        assert_eq!(schedule_for_update(&input).unwrap(), Some(Vec::new()));
    }

    fn admin() -> AuthContext {
        AuthContext {
            user_id: 1,
            username: "admin".to_string(),
            role: UserRole::Admin,
            permissions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_fills_external_campus_and_zero_price() {
        let storage = memory_storage().await;
        let f = course_fixture(&storage).await;
        let ctx = DescriptorContext::new(Operation::Create).with_external_campus(f.campus_id);

        let mut body = course_form(&f);
        body["campus_id"] = json!(f.campus_id + 100);
        body["times"] = json!([{"day": 1, "start": "10:00", "end": "12:00"}]);
        let input = FormInput::from_json(body).unwrap();

        let course = ExternalCourseService::for_campus(f.campus_id)
            .create(&storage, &input, &ctx)
            .await
            .unwrap();
        assert_eq!(course.campus_id, f.campus_id);
        assert_eq!(course.price, 0.0);
        assert_eq!(course.times.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_with_enrollments_conflicts() {
        let storage = memory_storage().await;
        let f = course_fixture(&storage).await;
        let ctx = DescriptorContext::new(Operation::Create).with_external_campus(f.campus_id);
        let input = FormInput::from_json(course_form(&f)).unwrap();
        let service = ExternalCourseService::for_campus(f.campus_id);
        let course = service.create(&storage, &input, &ctx).await.unwrap();

        let student = insert_student(&storage, "lea", "Léa", "Martin", None).await;
        insert_enrollment(&storage, student, course.id, 1, 0.0).await;

        let result = service.delete(&storage, course.id, &admin()).await;
        assert!(matches!(result, Err(AcademyError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_internal_course_is_not_found() {
        let storage = memory_storage().await;
        let f = course_fixture(&storage).await;
        let external = insert_campus(&storage, "External").await;
        let internal = insert_course(&storage, &f, "On site", None).await;
        let service = ExternalCourseService::for_campus(external);

        assert!(service.find(&storage, internal).await.unwrap().is_none());

        let mut body = course_form(&f);
        body["campus_id"] = json!(f.campus_id);
        let input = FormInput::from_json(body).unwrap();
        assert!(service
            .update(&storage, internal, &input, &admin())
            .await
            .unwrap()
            .is_none());
        assert!(!service.delete(&storage, internal, &admin()).await.unwrap());

        let kept = storage
            .get_external_course(internal, f.campus_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.name, "On site");
    }

    #[tokio::test]
    async fn test_blank_times_keep_schedule() {
        let storage = memory_storage().await;
        let f = course_fixture(&storage).await;
        let ctx = DescriptorContext::new(Operation::Create).with_external_campus(f.campus_id);
        let service = ExternalCourseService::for_campus(f.campus_id);

        let mut body = course_form(&f);
        body["times"] = json!([
            {"day": 1, "start": "10:00", "end": "12:00"},
            {"day": 3, "start": "10:00", "end": "12:00"},
        ]);
        let course = service
            .create(&storage, &FormInput::from_json(body).unwrap(), &ctx)
            .await
            .unwrap();

        let mut body = course_form(&f);
        body["times"] = json!("");
        let result = service
            .update(&storage, course.id, &FormInput::from_json(body).unwrap(), &admin())
            .await;
        assert!(matches!(result, Err(AcademyError::MalformedPayload(_))));

        let kept = service.find(&storage, course.id).await.unwrap().unwrap();
        assert_eq!(kept.times.len(), 2);
    }
}
