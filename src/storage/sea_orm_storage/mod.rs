//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod audit;
mod courses;
mod enrollments;
mod grade_types;
mod lookups;
mod result_types;
mod rhythms;
mod rooms;
mod system_settings;
mod users;

use crate::admin::ListQuery;
use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use crate::models::PaginationInfo;
use migration::{Migrator, MigratorTrait};
use sea_orm::sea_query::Expr;
use sea_orm::{
    Condition, ConnectOptions, Database, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, Select,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("Storage initialized, database: {}", db_url);
        Ok(storage)
    }

    /// 在已有连接上运行迁移并创建存储
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| AcademyError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AcademyError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| AcademyError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| AcademyError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AcademyError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite path"
            )))
        }
    }

    /// 按列表查询的页码取一页数据
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        page: u64,
        size: u64,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: FromQueryResult + Sized + Send + Sync,
    {
        let size = size.max(1);
        let page = page.max(1);
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AcademyError::database_operation(format!("统计{what}失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询{what}列表失败: {e}")))?;

        Ok((
            models,
            PaginationInfo::new(page as i64, size as i64, total as i64),
        ))
    }

    pub(crate) async fn fetch_list_page<E>(
        &self,
        select: Select<E>,
        query: &ListQuery,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: FromQueryResult + Sized + Send + Sync,
    {
        self.fetch_page(select, query.page, query.size, what).await
    }
}

/// 合并搜索条件（OR）；没有任何可用条件时返回恒假条件，使搜索不命中任何记录
pub(crate) fn any_match(conditions: Vec<Condition>) -> Condition {
    if conditions.is_empty() {
        return Condition::all().add(Expr::cust("1 = 0"));
    }
    conditions
        .into_iter()
        .fold(Condition::any(), |acc, c| acc.add(c))
}

pub(crate) fn unsupported_clause(entity: &str, clause: &crate::admin::Clause) -> AcademyError {
    AcademyError::validation(format!("Unsupported list clause for {entity}: {clause:?}"))
}

// Storage trait 实现
use crate::admin::{OptionSource, UniqueTarget};
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn list_user_permissions(&self, user_id: i64) -> Result<Vec<String>> {
        self.list_user_permissions_impl(user_id).await
    }

    async fn grant_permissions(&self, user_id: i64, permissions: &[&str]) -> Result<()> {
        self.grant_permissions_impl(user_id, permissions).await
    }

    // 系统设置
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_all_settings_impl().await
    }

    async fn update_setting(&self, key: &str, value: &str, user_id: i64) -> Result<SystemSetting> {
        self.update_setting_impl(key, value, user_id).await
    }

    // 学期与选项
    async fn find_period(&self, id: i64) -> Result<Option<Period>> {
        self.find_period_impl(id).await
    }

    async fn resolve_period(&self, preferred: Option<i64>, today: &str) -> Result<Option<Period>> {
        self.resolve_period_impl(preferred, today).await
    }

    async fn list_options(&self, source: &OptionSource) -> Result<Vec<OptionItem>> {
        self.list_options_impl(source).await
    }

    async fn value_exists(
        &self,
        target: UniqueTarget,
        value: &str,
        ignore_id: Option<i64>,
    ) -> Result<bool> {
        self.value_exists_impl(target, value, ignore_id).await
    }

    // 报名模块
    async fn list_enrollments(&self, query: &ListQuery) -> Result<PaginatedResponse<EnrollmentRow>> {
        self.list_enrollments_impl(query).await
    }

    async fn get_enrollment_row(&self, id: i64) -> Result<Option<EnrollmentRow>> {
        self.get_enrollment_row_impl(id).await
    }

    async fn list_enrollment_invoices(&self, enrollment_id: i64) -> Result<Vec<Invoice>> {
        self.list_enrollment_invoices_impl(enrollment_id).await
    }

    async fn list_enrollment_comments(&self, enrollment_id: i64) -> Result<Vec<Comment>> {
        self.list_enrollment_comments_impl(enrollment_id).await
    }

    async fn list_scholarships(&self) -> Result<Vec<Scholarship>> {
        self.list_scholarships_impl().await
    }

    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>> {
        self.list_payment_methods_impl().await
    }

    async fn pending_balance_total(&self) -> Result<f64> {
        self.pending_balance_total_impl().await
    }

    async fn update_enrollment(&self, id: i64, update: EnrollmentUpdate) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, update).await
    }

    async fn cancel_enrollment(&self, id: i64, user_id: i64) -> Result<Option<Enrollment>> {
        self.cancel_enrollment_impl(id, user_id).await
    }

    // 课程模块
    async fn get_course_summary(&self, id: i64) -> Result<Option<CourseSummary>> {
        self.get_course_summary_impl(id).await
    }

    async fn list_external_courses(
        &self,
        query: &ListQuery,
    ) -> Result<PaginatedResponse<ExternalCourseRow>> {
        self.list_external_courses_impl(query).await
    }

    async fn get_external_course(
        &self,
        id: i64,
        campus_id: i64,
    ) -> Result<Option<ExternalCourseRow>> {
        self.get_external_course_impl(id, campus_id).await
    }

    async fn create_course(
        &self,
        course: CourseInput,
        times: Vec<CourseTimeInput>,
    ) -> Result<ExternalCourseRow> {
        self.create_course_impl(course, times).await
    }

    async fn update_course(
        &self,
        id: i64,
        campus_id: i64,
        course: CourseInput,
        times: Option<Vec<CourseTimeInput>>,
    ) -> Result<Option<ExternalCourseRow>> {
        self.update_course_impl(id, campus_id, course, times).await
    }

    async fn delete_course(&self, id: i64, campus_id: i64, user_id: i64) -> Result<bool> {
        self.delete_course_impl(id, campus_id, user_id).await
    }

    // 成绩类型
    async fn list_grade_types(&self, query: &ListQuery) -> Result<PaginatedResponse<GradeType>> {
        self.list_grade_types_impl(query).await
    }

    async fn get_grade_type(&self, id: i64) -> Result<Option<GradeType>> {
        self.get_grade_type_impl(id).await
    }

    async fn create_grade_type(&self, input: GradeTypeInput) -> Result<GradeType> {
        self.create_grade_type_impl(input).await
    }

    async fn update_grade_type(&self, id: i64, input: GradeTypeInput) -> Result<Option<GradeType>> {
        self.update_grade_type_impl(id, input).await
    }

    async fn delete_grade_type(&self, id: i64, user_id: i64) -> Result<bool> {
        self.delete_grade_type_impl(id, user_id).await
    }

    async fn search_grade_type_categories(
        &self,
        term: Option<&str>,
        page: u64,
        size: u64,
    ) -> Result<PaginatedResponse<GradeTypeCategory>> {
        self.search_grade_type_categories_impl(term, page, size)
            .await
    }

    async fn create_grade_type_category(&self, name: &str) -> Result<GradeTypeCategory> {
        self.create_grade_type_category_impl(name).await
    }

    // 结果类型
    async fn list_result_types(&self, query: &ListQuery) -> Result<PaginatedResponse<ResultType>> {
        self.list_result_types_impl(query).await
    }

    async fn get_result_type(&self, id: i64) -> Result<Option<ResultType>> {
        self.get_result_type_impl(id).await
    }

    async fn create_result_type(&self, input: ResultTypeInput) -> Result<ResultType> {
        self.create_result_type_impl(input).await
    }

    async fn update_result_type(
        &self,
        id: i64,
        input: ResultTypeInput,
    ) -> Result<Option<ResultType>> {
        self.update_result_type_impl(id, input).await
    }

    async fn delete_result_type(&self, id: i64, user_id: i64) -> Result<bool> {
        self.delete_result_type_impl(id, user_id).await
    }

    // 课程节奏
    async fn list_rhythms(&self, query: &ListQuery) -> Result<PaginatedResponse<Rhythm>> {
        self.list_rhythms_impl(query).await
    }

    async fn get_rhythm(&self, id: i64) -> Result<Option<Rhythm>> {
        self.get_rhythm_impl(id).await
    }

    async fn create_rhythm(&self, input: RhythmInput) -> Result<Rhythm> {
        self.create_rhythm_impl(input).await
    }

    async fn update_rhythm(&self, id: i64, input: RhythmInput) -> Result<Option<Rhythm>> {
        self.update_rhythm_impl(id, input).await
    }

    async fn toggle_rhythm(&self, id: i64, user_id: i64) -> Result<Option<Rhythm>> {
        self.toggle_rhythm_impl(id, user_id).await
    }

    // 教室
    async fn list_rooms(&self, query: &ListQuery) -> Result<PaginatedResponse<Room>> {
        self.list_rooms_impl(query).await
    }

    async fn get_room(&self, id: i64) -> Result<Option<Room>> {
        self.get_room_impl(id).await
    }

    async fn create_room(&self, input: RoomInput) -> Result<Room> {
        self.create_room_impl(input).await
    }

    async fn update_room(&self, id: i64, input: RoomInput) -> Result<Option<Room>> {
        self.update_room_impl(id, input).await
    }

    async fn delete_room(&self, id: i64, user_id: i64) -> Result<bool> {
        self.delete_room_impl(id, user_id).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 测试用内存数据库与基础数据

    use super::SeaOrmStorage;
    use crate::entity::{
        campuses, courses, enrollments, levels, periods, rhythms, students, teachers, users,
    };
    use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};

    pub async fn memory_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.expect("sqlite memory database");
        SeaOrmStorage::from_connection(db)
            .await
            .expect("migrations")
    }

    pub async fn insert_user(s: &SeaOrmStorage, username: &str, first: &str, last: &str) -> i64 {
        users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set("x".to_string()),
            firstname: Set(first.to_string()),
            lastname: Set(last.to_string()),
            role: Set("student".to_string()),
            status: Set("active".to_string()),
            created_at: Set(0),
            updated_at: Set(0),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }

    pub async fn insert_student(
        s: &SeaOrmStorage,
        username: &str,
        first: &str,
        last: &str,
        birthdate: Option<&str>,
    ) -> i64 {
        let user_id = insert_user(s, username, first, last).await;
        students::ActiveModel {
            user_id: Set(user_id),
            idnumber: Set(Some(format!("ID-{username}"))),
            birthdate: Set(birthdate.map(str::to_string)),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }

    pub async fn insert_campus(s: &SeaOrmStorage, name: &str) -> i64 {
        campuses::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }

    pub async fn insert_period(s: &SeaOrmStorage, name: &str, start: &str, end: &str) -> i64 {
        periods::ActiveModel {
            name: Set(name.to_string()),
            start_date: Set(start.to_string()),
            end_date: Set(end.to_string()),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }

    pub async fn insert_level(s: &SeaOrmStorage, name: &str) -> i64 {
        levels::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }

    pub async fn insert_rhythm(s: &SeaOrmStorage, name: &str) -> i64 {
        rhythms::ActiveModel {
            name: Set(name.to_string()),
            default_volume: Set(30.0),
            created_at: Set(0),
            updated_at: Set(0),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }

    pub async fn insert_teacher(s: &SeaOrmStorage, name: &str, user_id: Option<i64>) -> i64 {
        teachers::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }

    /// 课程所需的外键数据
    pub struct CourseFixture {
        pub campus_id: i64,
        pub period_id: i64,
        pub level_id: i64,
        pub rhythm_id: i64,
    }

    pub async fn course_fixture(s: &SeaOrmStorage) -> CourseFixture {
        CourseFixture {
            campus_id: insert_campus(s, "Main").await,
            period_id: insert_period(s, "2025-1", "2025-01-06", "2025-03-28").await,
            level_id: insert_level(s, "B1").await,
            rhythm_id: insert_rhythm(s, "Intensive").await,
        }
    }

    pub async fn insert_course(
        s: &SeaOrmStorage,
        f: &CourseFixture,
        name: &str,
        teacher_id: Option<i64>,
    ) -> i64 {
        courses::ActiveModel {
            campus_id: Set(f.campus_id),
            rhythm_id: Set(f.rhythm_id),
            level_id: Set(f.level_id),
            teacher_id: Set(teacher_id),
            period_id: Set(f.period_id),
            name: Set(name.to_string()),
            price: Set(300.0),
            start_date: Set("2025-01-06".to_string()),
            end_date: Set("2025-03-28".to_string()),
            created_at: Set(0),
            updated_at: Set(0),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }

    pub async fn insert_enrollment(
        s: &SeaOrmStorage,
        student_id: i64,
        course_id: i64,
        status_id: i64,
        balance: f64,
    ) -> i64 {
        enrollments::ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            status_id: Set(status_id),
            price: Set(300.0),
            balance: Set(balance),
            created_at: Set(0),
            updated_at: Set(0),
            ..Default::default()
        }
        .insert(&s.db)
        .await
        .unwrap()
        .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("academy.db").unwrap(),
            "sqlite://academy.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/academy").unwrap(),
            "postgres://u:p@localhost/academy"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }
}
