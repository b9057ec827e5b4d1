//! 报名管理
//!
//! 全局列表与按课程（`?course_id=`）限定的列表共用一个描述符，
//! 课程模式在查询之前完成课程存在性与 `view-course` 能力检查。

pub mod show;

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse};

use crate::admin::render::format_number;
use crate::admin::repeatable::decode_scheduled_payments;
use crate::admin::resources::enrollment;
use crate::admin::{
    DescriptorContext, FormInput, ListParams, ListQuery, Operation, ResourceDescriptor,
    ViewContext, Widget,
};
use crate::errors::{AcademyError, Result};
use crate::models::PaginatedResponse;
use crate::models::auth::entities::{AuthContext, Permission};
use crate::models::enrollments::entities::EnrollmentRow;
use crate::models::enrollments::requests::EnrollmentUpdate;
use crate::models::panel::responses::WidgetData;
use crate::services::panel::{
    PanelResource, auth_from, build_context, require_permission, resource, storage_from,
};
use crate::storage::Storage;

#[derive(Default)]
pub struct EnrollmentService;

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn list(
        &self,
        request: &HttpRequest,
        query: HashMap<String, String>,
    ) -> Result<HttpResponse> {
        let storage = storage_from(request)?;
        let auth = auth_from(request)?;
        let ctx = build_context(storage.as_ref(), &auth, Operation::List).await?;
        let ctx = scope_to_course(storage.as_ref(), &auth, ctx, query.get("course_id")).await?;
        resource::list_with_context(self, storage.as_ref(), ctx, ListParams::from_query(query)).await
    }

    pub async fn export(
        &self,
        request: &HttpRequest,
        query: HashMap<String, String>,
    ) -> Result<HttpResponse> {
        let storage = storage_from(request)?;
        let auth = auth_from(request)?;
        let ctx = build_context(storage.as_ref(), &auth, Operation::Export).await?;
        let ctx = scope_to_course(storage.as_ref(), &auth, ctx, query.get("course_id")).await?;
        resource::export_with_context(
            self,
            storage.as_ref(),
            &auth,
            ctx,
            ListParams::from_query(query),
        )
        .await
    }

    pub async fn edit_form(&self, request: &HttpRequest, id: i64) -> Result<HttpResponse> {
        require_permission(&auth_from(request)?, Permission::ENROLLMENTS_EDIT)?;
        resource::edit_form(self, request, id).await
    }

    pub async fn update(
        &self,
        request: &HttpRequest,
        id: i64,
        input: FormInput,
    ) -> Result<HttpResponse> {
        require_permission(&auth_from(request)?, Permission::ENROLLMENTS_EDIT)?;
        resource::update(self, request, id, input).await
    }

    /// 取消报名（记录保留）
    pub async fn cancel(&self, request: &HttpRequest, id: i64) -> Result<HttpResponse> {
        require_permission(&auth_from(request)?, Permission::ENROLLMENTS_DELETE)?;
        resource::destroy(self, request, id).await
    }
}

/// 带 `course_id` 时切换到课程模式
///
/// 课程不存在返回 404，无权查看返回 403，二者都发生在任何列表查询之前。
pub async fn scope_to_course(
    storage: &dyn Storage,
    auth: &AuthContext,
    ctx: DescriptorContext,
    course_id: Option<&String>,
) -> Result<DescriptorContext> {
    let Some(raw) = course_id.map(|s| s.trim()).filter(|s| !s.is_empty()) else {
        return Ok(ctx);
    };
    let course_id: i64 = raw
        .parse()
        .map_err(|_| AcademyError::validation(format!("Invalid course_id: {raw}")))?;

    let course = storage
        .get_course_summary(course_id)
        .await?
        .ok_or_else(|| AcademyError::not_found(format!("Course {course_id} not found")))?;
    if !auth.can_view_course(&course) {
        return Err(AcademyError::authorization("You cannot view this course"));
    }

    Ok(ctx.with_view(ViewContext::CourseScoped(course)))
}

fn enrollment_update(input: &FormInput) -> Result<EnrollmentUpdate> {
    // 清空计划需提交 `[]`，空字符串按格式错误拒绝
    let scheduled_payments = input
        .get("scheduledPayments")
        .map(|raw| decode_scheduled_payments("scheduledPayments", raw))
        .transpose()?;
    Ok(EnrollmentUpdate {
        course_id: input.required_i64("course_id")?,
        price: input.required_f64("price")?,
        status_id: input.required_i64("status_id")?,
        scheduled_payments,
    })
}

#[async_trait::async_trait]
impl PanelResource for EnrollmentService {
    type Row = EnrollmentRow;

    fn descriptor(&self, ctx: &DescriptorContext) -> ResourceDescriptor<EnrollmentRow> {
        enrollment::descriptor(ctx)
    }

    async fn list(
        &self,
        storage: &dyn Storage,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<EnrollmentRow>> {
        storage.list_enrollments(query).await
    }

    async fn find(&self, storage: &dyn Storage, id: i64) -> Result<Option<EnrollmentRow>> {
        storage.get_enrollment_row(id).await
    }

    async fn update(
        &self,
        storage: &dyn Storage,
        id: i64,
        input: &FormInput,
        _auth: &AuthContext,
    ) -> Result<Option<EnrollmentRow>> {
        if storage.update_enrollment(id, enrollment_update(input)?).await?.is_none() {
            return Ok(None);
        }
        storage.get_enrollment_row(id).await
    }

    async fn delete(&self, storage: &dyn Storage, id: i64, auth: &AuthContext) -> Result<bool> {
        Ok(storage.cancel_enrollment(id, auth.user_id).await?.is_some())
    }

    async fn widgets(
        &self,
        storage: &dyn Storage,
        descriptor: &ResourceDescriptor<EnrollmentRow>,
        ctx: &DescriptorContext,
    ) -> Result<Vec<WidgetData>> {
        let mut widgets = Vec::new();
        for widget in &descriptor.widgets {
            match widget {
                Widget::PendingBalance => {
                    let total = storage.pending_balance_total().await?;
                    let display = format!(
                        "{}{}{}",
                        ctx.currency.prefix.as_deref().unwrap_or_default(),
                        format_number(total),
                        ctx.currency.suffix.as_deref().unwrap_or_default()
                    );
                    widgets.push(WidgetData::PendingBalance { total, display });
                }
                Widget::CourseInfo => {
                    if let Some(course) = ctx.view.course() {
                        widgets.push(WidgetData::CourseInfo {
                            course: course.clone(),
                        });
                    }
                }
            }
        }
        Ok(widgets)
    }

    fn edit_context(&self, ctx: DescriptorContext, entry: &EnrollmentRow) -> DescriptorContext {
        ctx.with_entry_period(Some(entry.period_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::CurrencyAffix;
    use crate::models::enrollments::requests::ScheduledPaymentInput;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing::*;
    use serde_json::json;

    fn auth(user_id: i64, role: UserRole, permissions: &[&str]) -> AuthContext {
        AuthContext {
            user_id,
            username: "tester".to_string(),
            role,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_course_scope_checks_existence_then_ability() {
        let storage = memory_storage().await;
        let f = course_fixture(&storage).await;
        let teacher_user = insert_user(&storage, "prof", "Marie", "Curie").await;
        let teacher = insert_teacher(&storage, "Marie Curie", Some(teacher_user)).await;
        let course = insert_course(&storage, &f, "B1 Evening", Some(teacher)).await;
        let base = DescriptorContext::new(Operation::List);

        let missing = "9999".to_string();
        let err = scope_to_course(&storage, &auth(5, UserRole::Secretary, &[]), base.clone(), Some(&missing))
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::NotFound(_)));

        let course_param = course.to_string();
        let err = scope_to_course(
            &storage,
            &auth(5, UserRole::Secretary, &[Permission::ENROLLMENTS_VIEW]),
            base.clone(),
            Some(&course_param),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AcademyError::Authorization(_)));

        let ctx = scope_to_course(
            &storage,
            &auth(teacher_user, UserRole::Teacher, &[]),
            base.clone(),
            Some(&course_param),
        )
        .await
        .unwrap();
        assert_eq!(ctx.view.course().map(|c| c.id), Some(course));

        let ctx = scope_to_course(&storage, &auth(1, UserRole::Admin, &[]), base, None)
            .await
            .unwrap();
        assert!(ctx.view.course().is_none());
    }

    #[tokio::test]
    async fn test_pending_balance_widget() {
        let storage = memory_storage().await;
        let f = course_fixture(&storage).await;
        let course = insert_course(&storage, &f, "B1 Evening", None).await;
        let a = insert_student(&storage, "a", "Ana", "Silva", None).await;
        let b = insert_student(&storage, "b", "Bo", "Lind", None).await;
        let c = insert_student(&storage, "c", "Cy", "Moss", None).await;
        insert_enrollment(&storage, a, course, 1, 120.5).await;
        insert_enrollment(&storage, b, course, 1, 80.0).await;
        insert_enrollment(&storage, c, course, 2, 300.0).await;

        let ctx = DescriptorContext::new(Operation::List).with_currency(CurrencyAffix {
            prefix: Some("$".to_string()),
            suffix: None,
        });
        let service = EnrollmentService;
        let descriptor = service.descriptor(&ctx);
        let widgets = service.widgets(&storage, &descriptor, &ctx).await.unwrap();

        match widgets.as_slice() {
            [WidgetData::PendingBalance { total, display }] => {
                assert_eq!(*total, 200.5);
                assert_eq!(display, "$200.50");
            }
            other => panic!("unexpected widgets: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_scheduled_payments_rejected() {
        let input = FormInput::from_json(json!({
            "course_id": 1,
            "price": 300,
            "status_id": 1,
            "scheduledPayments": "[{\"date\": \"2025-02-01\", ",
        }))
        .unwrap();
        assert!(matches!(
            enrollment_update(&input),
            Err(AcademyError::MalformedPayload(_))
        ));

        let input = FormInput::from_json(json!({"course_id": 1, "price": 300, "status_id": 1})).unwrap();
        assert!(enrollment_update(&input).unwrap().scheduled_payments.is_none());

        let input = FormInput::from_json(json!({
            "course_id": 1,
            "price": 300,
            "status_id": 1,
            "scheduledPayments": "[]",
        }))
        .unwrap();
        assert_eq!(enrollment_update(&input).unwrap().scheduled_payments, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_blank_scheduled_payments_keep_existing_plan() {
        let storage = memory_storage().await;
        let f = course_fixture(&storage).await;
        let course = insert_course(&storage, &f, "A2 Morning", None).await;
        let student = insert_student(&storage, "ida", "Ida", "Berg", None).await;
        let enrollment = insert_enrollment(&storage, student, course, 1, 300.0).await;

        let payment = |date: &str| ScheduledPaymentInput {
            date: date.to_string(),
            value: 150.0,
            status: 1,
        };
        storage
            .update_enrollment(
                enrollment,
                EnrollmentUpdate {
                    course_id: course,
                    price: 300.0,
                    status_id: 1,
                    scheduled_payments: Some(vec![payment("2025-02-01"), payment("2025-03-01")]),
                },
            )
            .await
            .unwrap();

        let mut form = HashMap::new();
        form.insert("course_id".to_string(), course.to_string());
        form.insert("price".to_string(), "300".to_string());
        form.insert("status_id".to_string(), "1".to_string());
        form.insert("scheduledPayments".to_string(), String::new());
        let input = FormInput::from_form(form);

        let editor = auth(2, UserRole::Secretary, &[Permission::ENROLLMENTS_EDIT]);
        let result =
            PanelResource::update(&EnrollmentService, &storage, enrollment, &input, &editor).await;
        assert!(matches!(result, Err(AcademyError::MalformedPayload(_))));

        let row = storage.get_enrollment_row(enrollment).await.unwrap().unwrap();
        assert_eq!(row.scheduled_payments.len(), 2);
    }
}
