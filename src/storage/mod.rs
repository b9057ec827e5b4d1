use std::sync::Arc;

use crate::admin::{ListQuery, OptionSource, UniqueTarget};
use crate::models::{
    PaginatedResponse,
    courses::{
        entities::{CourseSummary, ExternalCourseRow, Period},
        requests::{CourseInput, CourseTimeInput},
    },
    enrollments::{
        entities::{Comment, Enrollment, EnrollmentRow, Invoice, PaymentMethod, Scholarship},
        requests::EnrollmentUpdate,
    },
    lookups::{
        entities::{GradeType, GradeTypeCategory, OptionItem, ResultType, Rhythm, Room},
        requests::{GradeTypeInput, ResultTypeInput, RhythmInput, RoomInput},
    },
    system::entities::SystemSetting,
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户与权限
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;
    async fn list_user_permissions(&self, user_id: i64) -> Result<Vec<String>>;
    async fn grant_permissions(&self, user_id: i64, permissions: &[&str]) -> Result<()>;

    /// 系统设置
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>>;
    // 更新设置并写入审计日志
    async fn update_setting(&self, key: &str, value: &str, user_id: i64) -> Result<SystemSetting>;

    /// 学期
    async fn find_period(&self, id: i64) -> Result<Option<Period>>;
    // 优先使用给定 id，其次是包含 today 的学期，最后是最近开始的学期
    async fn resolve_period(&self, preferred: Option<i64>, today: &str) -> Result<Option<Period>>;

    /// 表单与筛选器选项
    async fn list_options(&self, source: &OptionSource) -> Result<Vec<OptionItem>>;
    async fn value_exists(
        &self,
        target: UniqueTarget,
        value: &str,
        ignore_id: Option<i64>,
    ) -> Result<bool>;

    /// 报名
    async fn list_enrollments(&self, query: &ListQuery) -> Result<PaginatedResponse<EnrollmentRow>>;
    /// 带学生、课程、状态等关联信息的单条报名
    async fn get_enrollment_row(&self, id: i64) -> Result<Option<EnrollmentRow>>;
    async fn list_enrollment_invoices(&self, enrollment_id: i64) -> Result<Vec<Invoice>>;
    // 报名及其发票上的备注
    async fn list_enrollment_comments(&self, enrollment_id: i64) -> Result<Vec<Comment>>;
    async fn list_scholarships(&self) -> Result<Vec<Scholarship>>;
    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>>;
    async fn pending_balance_total(&self) -> Result<f64>;
    // 在同一事务中更新报名并（可选）整体替换分期付款计划
    async fn update_enrollment(&self, id: i64, update: EnrollmentUpdate) -> Result<Option<Enrollment>>;
    // 取消报名：保留记录，状态改为已取消并写入审计日志
    async fn cancel_enrollment(&self, id: i64, user_id: i64) -> Result<Option<Enrollment>>;

    /// 课程
    async fn get_course_summary(&self, id: i64) -> Result<Option<CourseSummary>>;
    async fn list_external_courses(
        &self,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<ExternalCourseRow>>;
    // 单条课程的读取、更新与删除都限定在给定校区内
    async fn get_external_course(
        &self,
        id: i64,
        campus_id: i64,
    ) -> Result<Option<ExternalCourseRow>>;
    async fn create_course(
        &self,
        course: CourseInput,
        times: Vec<CourseTimeInput>,
    ) -> Result<ExternalCourseRow>;
    // times 为 Some 时整体替换课表
    async fn update_course(
        &self,
        id: i64,
        campus_id: i64,
        course: CourseInput,
        times: Option<Vec<CourseTimeInput>>,
    ) -> Result<Option<ExternalCourseRow>>;
    async fn delete_course(&self, id: i64, campus_id: i64, user_id: i64) -> Result<bool>;

    /// 成绩类型
    async fn list_grade_types(&self, query: &ListQuery) -> Result<PaginatedResponse<GradeType>>;
    async fn get_grade_type(&self, id: i64) -> Result<Option<GradeType>>;
    async fn create_grade_type(&self, input: GradeTypeInput) -> Result<GradeType>;
    async fn update_grade_type(&self, id: i64, input: GradeTypeInput) -> Result<Option<GradeType>>;
    async fn delete_grade_type(&self, id: i64, user_id: i64) -> Result<bool>;
    async fn search_grade_type_categories(
        &self,
        term: Option<&str>,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<GradeTypeCategory>>;
    async fn create_grade_type_category(&self, name: &str) -> Result<GradeTypeCategory>;

    /// 结果类型
    async fn list_result_types(&self, query: &ListQuery) -> Result<PaginatedResponse<ResultType>>;
    async fn get_result_type(&self, id: i64) -> Result<Option<ResultType>>;
    async fn create_result_type(&self, input: ResultTypeInput) -> Result<ResultType>;
    async fn update_result_type(
        &self,
        id: i64,
        input: ResultTypeInput,
    ) -> Result<Option<ResultType>>;
    async fn delete_result_type(&self, id: i64, user_id: i64) -> Result<bool>;

    /// 课程节奏
    async fn list_rhythms(&self, query: &ListQuery) -> Result<PaginatedResponse<Rhythm>>;
    async fn get_rhythm(&self, id: i64) -> Result<Option<Rhythm>>;
    async fn create_rhythm(&self, input: RhythmInput) -> Result<Rhythm>;
    async fn update_rhythm(&self, id: i64, input: RhythmInput) -> Result<Option<Rhythm>>;
    // 停用与恢复之间切换
    async fn toggle_rhythm(&self, id: i64, user_id: i64) -> Result<Option<Rhythm>>;

    /// 教室
    async fn list_rooms(&self, query: &ListQuery) -> Result<PaginatedResponse<Room>>;
    async fn get_room(&self, id: i64) -> Result<Option<Room>>;
    async fn create_room(&self, input: RoomInput) -> Result<Room>;
    async fn update_room(&self, id: i64, input: RoomInput) -> Result<Option<Room>>;
    async fn delete_room(&self, id: i64, user_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
