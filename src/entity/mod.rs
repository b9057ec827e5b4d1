//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod audit_logs;
pub mod campuses;
pub mod comments;
pub mod course_times;
pub mod courses;
pub mod enrollment_scholarships;
pub mod enrollment_status_types;
pub mod enrollments;
pub mod grade_type_categories;
pub mod grade_types;
pub mod invoice_details;
pub mod invoices;
pub mod levels;
pub mod partners;
pub mod payment_methods;
pub mod periods;
pub mod phone_numbers;
pub mod result_types;
pub mod rhythms;
pub mod rooms;
pub mod schedule_presets;
pub mod scheduled_payments;
pub mod scholarships;
pub mod students;
pub mod system_settings;
pub mod teachers;
pub mod user_permissions;
pub mod users;
