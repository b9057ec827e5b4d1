use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 用户与权限 ====================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Firstname).string().not_null())
                    .col(ColumnDef::new(Users::Lastname).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserPermissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserPermissions::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserPermissions::Permission)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserPermissions::Table, UserPermissions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_permissions_user_permission")
                    .table(UserPermissions::Table)
                    .col(UserPermissions::UserId)
                    .col(UserPermissions::Permission)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ==================== 基础字典表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Campuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campuses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campuses::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Partners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Partners::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Partners::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Levels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Levels::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Levels::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Periods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Periods::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Periods::Name).string().not_null())
                    .col(ColumnDef::new(Periods::StartDate).string().not_null())
                    .col(ColumnDef::new(Periods::EndDate).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rhythms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rhythms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Rhythms::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Rhythms::DefaultVolume).double().not_null())
                    .col(ColumnDef::new(Rhythms::ProductCode).string().null())
                    .col(ColumnDef::new(Rhythms::LmsId).string().null())
                    .col(ColumnDef::new(Rhythms::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(Rhythms::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Rhythms::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::CampusId).big_integer().not_null())
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::Capacity).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rooms::Table, Rooms::CampusId)
                            .to(Campuses::Table, Campuses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teachers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teachers::UserId).big_integer().null())
                    .col(ColumnDef::new(Teachers::Name).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Teachers::Table, Teachers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 学生 ====================
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Students::Idnumber).string().null())
                    .col(ColumnDef::new(Students::Birthdate).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PhoneNumbers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhoneNumbers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PhoneNumbers::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PhoneNumbers::PhoneNumber)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PhoneNumbers::Table, PhoneNumbers::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 课程 ====================
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::CampusId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::PartnerId).big_integer().null())
                    .col(ColumnDef::new(Courses::RhythmId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::LevelId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::TeacherId).big_integer().null())
                    .col(ColumnDef::new(Courses::RoomId).big_integer().null())
                    .col(ColumnDef::new(Courses::PeriodId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Volume).double().null())
                    .col(ColumnDef::new(Courses::HourlyPrice).double().null())
                    .col(
                        ColumnDef::new(Courses::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Courses::StartDate).string().not_null())
                    .col(ColumnDef::new(Courses::EndDate).string().not_null())
                    .col(ColumnDef::new(Courses::HeadCount).integer().null())
                    .col(ColumnDef::new(Courses::NewStudents).integer().null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::CampusId)
                            .to(Campuses::Table, Campuses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::PartnerId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::RhythmId)
                            .to(Rhythms::Table, Rhythms::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::LevelId)
                            .to(Levels::Table, Levels::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::PeriodId)
                            .to(Periods::Table, Periods::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_period_id")
                    .table(Courses::Table)
                    .col(Courses::PeriodId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseTimes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseTimes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseTimes::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseTimes::Day).integer().not_null())
                    .col(ColumnDef::new(CourseTimes::StartTime).string().not_null())
                    .col(ColumnDef::new(CourseTimes::EndTime).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseTimes::Table, CourseTimes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SchedulePresets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SchedulePresets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SchedulePresets::Name).string().not_null())
                    .col(ColumnDef::new(SchedulePresets::Presets).text().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 注册 ====================
        manager
            .create_table(
                Table::create()
                    .table(EnrollmentStatusTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentStatusTypes::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentStatusTypes::Name)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (id, name) in [
            (1_i64, "Pending"),
            (2, "Paid"),
            (3, "Canceled"),
            (4, "Transferred"),
            (5, "Refunded"),
        ] {
            let insert = Query::insert()
                .into_table(EnrollmentStatusTypes::Table)
                .columns([EnrollmentStatusTypes::Id, EnrollmentStatusTypes::Name])
                .values_panic([id.into(), name.into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::StatusId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Enrollments::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Enrollments::Balance)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Enrollments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StatusId)
                            .to(EnrollmentStatusTypes::Table, EnrollmentStatusTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_course_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_status_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::StatusId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScheduledPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduledPayments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduledPayments::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduledPayments::Date).string().not_null())
                    .col(ColumnDef::new(ScheduledPayments::Value).double().not_null())
                    .col(ColumnDef::new(ScheduledPayments::Status).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduledPayments::Table, ScheduledPayments::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Scholarships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scholarships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scholarships::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnrollmentScholarships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrollmentScholarships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentScholarships::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollmentScholarships::ScholarshipId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EnrollmentScholarships::Table,
                                EnrollmentScholarships::EnrollmentId,
                            )
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                EnrollmentScholarships::Table,
                                EnrollmentScholarships::ScholarshipId,
                            )
                            .to(Scholarships::Table, Scholarships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 账单与备注 ====================
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::EnrollmentId).big_integer().not_null())
                    .col(ColumnDef::new(Invoices::InvoiceNumber).string().null())
                    .col(
                        ColumnDef::new(Invoices::Total)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Invoices::Date).string().not_null())
                    .col(ColumnDef::new(Invoices::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invoices::Table, Invoices::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvoiceDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoiceDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvoiceDetails::InvoiceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceDetails::ProductName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvoiceDetails::Price).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(InvoiceDetails::Table, InvoiceDetails::InvoiceId)
                            .to(Invoices::Table, Invoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Comments::CommentableType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Comments::CommentableId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Comments::Body).text().not_null())
                    .col(ColumnDef::new(Comments::AuthorId).big_integer().null())
                    .col(ColumnDef::new(Comments::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comments_commentable")
                    .table(Comments::Table)
                    .col(Comments::CommentableType)
                    .col(Comments::CommentableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentMethods::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentMethods::Name).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Code).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 成绩与结果类型 ====================
        manager
            .create_table(
                Table::create()
                    .table(GradeTypeCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeTypeCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradeTypeCategories::Name)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GradeTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradeTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GradeTypes::Name).string().not_null())
                    .col(ColumnDef::new(GradeTypes::Total).double().not_null())
                    .col(
                        ColumnDef::new(GradeTypes::GradeTypeCategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradeTypes::Table, GradeTypes::GradeTypeCategoryId)
                            .to(GradeTypeCategories::Table, GradeTypeCategories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ResultTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResultTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResultTypes::Name).string().not_null())
                    .col(ColumnDef::new(ResultTypes::Description).text().null())
                    .to_owned(),
            )
            .await?;

        // ==================== 审计日志 ====================
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogs::UserId).big_integer().not_null())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityId).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Details).text().null())
                    .col(ColumnDef::new(AuditLogs::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_entity")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::EntityType)
                    .col(AuditLogs::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Members::CreatedAt).big_integer().null())
                    .col(ColumnDef::new(Members::UpdatedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按依赖关系逆序删除
        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ResultTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradeTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradeTypeCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentMethods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvoiceDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnrollmentScholarships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scholarships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScheduledPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnrollmentStatusTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SchedulePresets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseTimes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PhoneNumbers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rhythms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Periods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Levels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Partners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserPermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Firstname,
    Lastname,
    Role,
    Status,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserPermissions {
    #[sea_orm(iden = "user_permissions")]
    Table,
    Id,
    UserId,
    Permission,
}

#[derive(DeriveIden)]
enum Campuses {
    #[sea_orm(iden = "campuses")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Partners {
    #[sea_orm(iden = "partners")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Levels {
    #[sea_orm(iden = "levels")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Periods {
    #[sea_orm(iden = "periods")]
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
}

#[derive(DeriveIden)]
enum Rhythms {
    #[sea_orm(iden = "rhythms")]
    Table,
    Id,
    Name,
    DefaultVolume,
    ProductCode,
    LmsId,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Rooms {
    #[sea_orm(iden = "rooms")]
    Table,
    Id,
    CampusId,
    Name,
    Capacity,
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
    UserId,
    Name,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    UserId,
    Idnumber,
    Birthdate,
}

#[derive(DeriveIden)]
enum PhoneNumbers {
    #[sea_orm(iden = "phone_numbers")]
    Table,
    Id,
    StudentId,
    PhoneNumber,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    CampusId,
    PartnerId,
    RhythmId,
    LevelId,
    TeacherId,
    RoomId,
    PeriodId,
    Name,
    Volume,
    HourlyPrice,
    Price,
    StartDate,
    EndDate,
    HeadCount,
    NewStudents,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseTimes {
    #[sea_orm(iden = "course_times")]
    Table,
    Id,
    CourseId,
    Day,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
enum SchedulePresets {
    #[sea_orm(iden = "schedule_presets")]
    Table,
    Id,
    Name,
    Presets,
}

#[derive(DeriveIden)]
enum EnrollmentStatusTypes {
    #[sea_orm(iden = "enrollment_status_types")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    CourseId,
    StatusId,
    Price,
    Balance,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScheduledPayments {
    #[sea_orm(iden = "scheduled_payments")]
    Table,
    Id,
    EnrollmentId,
    Date,
    Value,
    Status,
}

#[derive(DeriveIden)]
enum Scholarships {
    #[sea_orm(iden = "scholarships")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum EnrollmentScholarships {
    #[sea_orm(iden = "enrollment_scholarships")]
    Table,
    Id,
    EnrollmentId,
    ScholarshipId,
}

#[derive(DeriveIden)]
enum Invoices {
    #[sea_orm(iden = "invoices")]
    Table,
    Id,
    EnrollmentId,
    InvoiceNumber,
    Total,
    Date,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InvoiceDetails {
    #[sea_orm(iden = "invoice_details")]
    Table,
    Id,
    InvoiceId,
    ProductName,
    Price,
}

#[derive(DeriveIden)]
enum Comments {
    #[sea_orm(iden = "comments")]
    Table,
    Id,
    CommentableType,
    CommentableId,
    Body,
    AuthorId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentMethods {
    #[sea_orm(iden = "payment_methods")]
    Table,
    Id,
    Name,
    Code,
}

#[derive(DeriveIden)]
enum GradeTypeCategories {
    #[sea_orm(iden = "grade_type_categories")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum GradeTypes {
    #[sea_orm(iden = "grade_types")]
    Table,
    Id,
    Name,
    Total,
    GradeTypeCategoryId,
}

#[derive(DeriveIden)]
enum ResultTypes {
    #[sea_orm(iden = "result_types")]
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum AuditLogs {
    #[sea_orm(iden = "audit_logs")]
    Table,
    Id,
    UserId,
    Action,
    EntityType,
    EntityId,
    Details,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Members {
    #[sea_orm(iden = "members")]
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
}
