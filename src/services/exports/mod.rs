//! 证书、成绩单与报名表导出
//!
//! 具体实现由 `exports.certificates` 与 `exports.enrollment_sheet` 配置的驱动提供，
//! 内置的 `generic` 驱动总是返回 403。

pub mod drivers;
pub mod register;

pub use drivers::{CertificatesService, EnrollmentSheetService, ExportFile};

use actix_web::{HttpRequest, HttpResponse, http::header};
use tracing::info;

use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use crate::models::enrollments::entities::EnrollmentRow;
use crate::services::panel::{auth_from, storage_from};

/// 报名相关的导出种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentExport {
    Certificate,
    Result,
    Sheet,
}

pub struct ExportService;

impl ExportService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn enrollment_document(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
        kind: EnrollmentExport,
    ) -> Result<HttpResponse> {
        let storage = storage_from(request)?;
        let auth = auth_from(request)?;
        let enrollment = storage
            .get_enrollment_row(enrollment_id)
            .await?
            .ok_or_else(|| {
                AcademyError::not_found(format!("Enrollment {enrollment_id} not found"))
            })?;

        let file = export_enrollment(AppConfig::get(), &enrollment, kind).await?;
        info!(
            "User {} exported {:?} for enrollment {}",
            auth.user_id, kind, enrollment_id
        );
        Ok(attachment(file))
    }

    pub async fn course_results(&self, request: &HttpRequest, course_id: i64) -> Result<HttpResponse> {
        let storage = storage_from(request)?;
        let auth = auth_from(request)?;
        let course = storage
            .get_course_summary(course_id)
            .await?
            .ok_or_else(|| AcademyError::not_found(format!("Course {course_id} not found")))?;
        if !auth.can_view_course(&course) {
            return Err(AcademyError::authorization("You cannot view this course"));
        }

        let driver = register::certificates_driver(&AppConfig::get().exports.certificates)?;
        let file = driver.export_course_results(&course).await?;
        info!("User {} exported results of course {}", auth.user_id, course_id);
        Ok(attachment(file))
    }
}

async fn export_enrollment(
    config: &AppConfig,
    enrollment: &EnrollmentRow,
    kind: EnrollmentExport,
) -> Result<ExportFile> {
    match kind {
        EnrollmentExport::Certificate => {
            register::certificates_driver(&config.exports.certificates)?
                .export_certificate(enrollment)
                .await
        }
        EnrollmentExport::Result => {
            register::certificates_driver(&config.exports.certificates)?
                .export_result(enrollment)
                .await
        }
        EnrollmentExport::Sheet => {
            register::enrollment_sheet_driver(&config.exports.enrollment_sheet)?
                .generate(enrollment)
                .await
        }
    }
}

fn attachment(file: ExportFile) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.content_type))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ))
        .body(file.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportsConfig;

    fn enrollment() -> EnrollmentRow {
        EnrollmentRow {
            id: 7,
            student_id: 3,
            student_idnumber: None,
            firstname: "Ana".to_string(),
            lastname: "Silva".to_string(),
            email: "ana@example.com".to_string(),
            birthdate: None,
            age: None,
            course_id: 2,
            course_name: "B1 Evening".to_string(),
            period_id: 1,
            period_name: "2025-1".to_string(),
            status_id: 2,
            status_name: "Paid".to_string(),
            price: 300.0,
            balance: 0.0,
            scheduled_payments: Vec::new(),
            scholarships: Vec::new(),
            phone_numbers: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_generic_drivers_refuse_everything() {
        let config = AppConfig::default();
        for kind in [
            EnrollmentExport::Certificate,
            EnrollmentExport::Result,
            EnrollmentExport::Sheet,
        ] {
            let err = export_enrollment(&config, &enrollment(), kind).await.unwrap_err();
            assert!(matches!(err, AcademyError::Authorization(_)), "{kind:?}");
        }
    }

    #[tokio::test]
    async fn test_unknown_driver_is_reported() {
        let config = AppConfig {
            exports: ExportsConfig {
                certificates: "acme-pdf".to_string(),
                enrollment_sheet: "generic".to_string(),
            },
            ..AppConfig::default()
        };
        let err = export_enrollment(&config, &enrollment(), EnrollmentExport::Certificate)
            .await
            .unwrap_err();
        assert!(matches!(err, AcademyError::ExportDriverNotFound(_)));
    }
}
