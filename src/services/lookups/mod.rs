//! 基础资料：成绩类型、结果类型、课程节奏、教室

pub mod grade_types;
pub mod result_types;
pub mod rhythms;
pub mod rooms;

pub use grade_types::GradeTypeService;
pub use result_types::ResultTypeService;
pub use rhythms::RhythmService;
pub use rooms::RoomService;
