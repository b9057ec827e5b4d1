//! 导出驱动的接口与内置的通用驱动

use crate::errors::{AcademyError, Result};
use crate::models::courses::entities::CourseSummary;
use crate::models::enrollments::entities::EnrollmentRow;

/// 驱动生成的文件
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// 证书与成绩单
#[async_trait::async_trait]
pub trait CertificatesService: Send + Sync {
    async fn export_certificate(&self, enrollment: &EnrollmentRow) -> Result<ExportFile>;
    async fn export_course_results(&self, course: &CourseSummary) -> Result<ExportFile>;
    async fn export_result(&self, enrollment: &EnrollmentRow) -> Result<ExportFile>;
}

/// 报名表
#[async_trait::async_trait]
pub trait EnrollmentSheetService: Send + Sync {
    async fn generate(&self, enrollment: &EnrollmentRow) -> Result<ExportFile>;
}

/// 未授权部署使用的驱动，所有调用都被拒绝且不产生任何副作用
pub struct GenericCertificates;

#[async_trait::async_trait]
impl CertificatesService for GenericCertificates {
    async fn export_certificate(&self, _enrollment: &EnrollmentRow) -> Result<ExportFile> {
        Err(unavailable("Certificate export"))
    }

    async fn export_course_results(&self, _course: &CourseSummary) -> Result<ExportFile> {
        Err(unavailable("Course results export"))
    }

    async fn export_result(&self, _enrollment: &EnrollmentRow) -> Result<ExportFile> {
        Err(unavailable("Result export"))
    }
}

pub struct GenericEnrollmentSheet;

#[async_trait::async_trait]
impl EnrollmentSheetService for GenericEnrollmentSheet {
    async fn generate(&self, _enrollment: &EnrollmentRow) -> Result<ExportFile> {
        Err(unavailable("Enrollment sheet"))
    }
}

fn unavailable(feature: &str) -> AcademyError {
    AcademyError::authorization(format!("{feature} is not available for this deployment"))
}
