pub mod auth;
pub mod enrollments;
pub mod exports;
pub mod external_courses;
pub mod lookups;
pub mod panel;
pub mod system;

pub use auth::AuthService;
pub use enrollments::EnrollmentService;
pub use exports::ExportService;
pub use external_courses::ExternalCourseService;
pub use lookups::{GradeTypeService, ResultTypeService, RhythmService, RoomService};
pub use system::SystemService;
