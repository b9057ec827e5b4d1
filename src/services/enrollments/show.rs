use actix_web::{HttpRequest, HttpResponse};

use super::EnrollmentService;
use crate::admin::Operation;
use crate::errors::{AcademyError, Result};
use crate::models::ApiResponse;
use crate::models::auth::entities::{AuthContext, Permission};
use crate::models::enrollments::entities::{EnrollmentRow, EnrollmentStatus};
use crate::models::enrollments::responses::EnrollmentDetailResponse;
use crate::services::panel::{
    PanelResource, auth_from, build_context, require_operation, storage_from,
};
use crate::storage::Storage;

/// 已付清的报名不可再编辑
fn has_write_access(auth: &AuthContext, enrollment: &EnrollmentRow) -> bool {
    enrollment.status_id != EnrollmentStatus::Paid.id() && auth.can(Permission::ENROLLMENTS_EDIT)
}

pub async fn load_detail(
    storage: &dyn Storage,
    auth: &AuthContext,
    id: i64,
) -> Result<Option<EnrollmentDetailResponse>> {
    let Some(enrollment) = storage.get_enrollment_row(id).await? else {
        return Ok(None);
    };

    Ok(Some(EnrollmentDetailResponse {
        products: storage.list_enrollment_invoices(id).await?,
        comments: storage.list_enrollment_comments(id).await?,
        scholarships: storage.list_scholarships().await?,
        available_payment_methods: storage.list_payment_methods().await?,
        writeaccess: has_write_access(auth, &enrollment),
        enrollment,
    }))
}

impl EnrollmentService {
    pub async fn show(&self, request: &HttpRequest, id: i64) -> Result<HttpResponse> {
        let storage = storage_from(request)?;
        let auth = auth_from(request)?;
        let ctx = build_context(storage.as_ref(), &auth, Operation::Show).await?;
        require_operation(self.descriptor(&ctx).allows(Operation::Show), Operation::Show)?;

        let detail = load_detail(storage.as_ref(), &auth, id)
            .await?
            .ok_or_else(|| AcademyError::not_found(format!("Enrollment {id} not found")))?;
        Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Enrollment retrieved successfully",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::testing::*;

    fn secretary(permissions: &[&str]) -> AuthContext {
        AuthContext {
            user_id: 2,
            username: "frontdesk".to_string(),
            role: UserRole::Secretary,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_writeaccess_depends_on_status_and_permission() {
        let storage = memory_storage().await;
        let f = course_fixture(&storage).await;
        let course = insert_course(&storage, &f, "A2 Morning", None).await;
        let student = insert_student(&storage, "tom", "Tom", "Hardy", Some("2001-05-04")).await;
        let pending = insert_enrollment(&storage, student, course, 1, 300.0).await;
        let paid = insert_enrollment(&storage, student, course, 2, 0.0).await;

        let editor = secretary(&[Permission::ENROLLMENTS_VIEW, Permission::ENROLLMENTS_EDIT]);
        let viewer = secretary(&[Permission::ENROLLMENTS_VIEW]);

        let detail = load_detail(&storage, &editor, pending).await.unwrap().unwrap();
        assert!(detail.writeaccess);
        assert_eq!(detail.enrollment.id, pending);

        let detail = load_detail(&storage, &editor, paid).await.unwrap().unwrap();
        assert!(!detail.writeaccess);

        let detail = load_detail(&storage, &viewer, pending).await.unwrap().unwrap();
        assert!(!detail.writeaccess);

        assert!(load_detail(&storage, &editor, 4242).await.unwrap().is_none());
    }
}
