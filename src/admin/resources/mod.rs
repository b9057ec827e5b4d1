//! 各资源的描述符构建
//!
//! 每个子模块提供 `descriptor(&DescriptorContext)`，返回该资源在给定上下文下的完整声明。

pub mod enrollment;
pub mod external_course;
pub mod grade_type;
pub mod result_type;
pub mod rhythm;
pub mod room;

use crate::errors::{AcademyError, Result};
use crate::models::courses::entities::ExternalCourseRow;
use crate::models::enrollments::entities::EnrollmentRow;
use crate::models::lookups::entities::{GradeType, ResultType, Rhythm, Room};

use super::clause::Clause;
use super::render::AdminRow;

macro_rules! impl_admin_row {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AdminRow for $ty {
                fn id(&self) -> i64 {
                    self.id
                }
            }
        )*
    };
}

impl_admin_row!(EnrollmentRow, ExternalCourseRow, GradeType, ResultType, Rhythm, Room);

/// 解析筛选器提交的 id
pub(crate) fn parse_filter_id(filter: &str, value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| {
        AcademyError::malformed_payload(format!("Filter '{filter}' expects an id, got '{value}'"))
    })
}

/// 生成 `column = id` 条件的筛选器函数
macro_rules! where_filter {
    ($fn_name:ident, $column:literal) => {
        pub(crate) fn $fn_name(value: &str) -> $crate::errors::Result<Vec<Clause>> {
            Ok(vec![Clause::Where {
                column: $column,
                value: parse_filter_id($column, value)?,
            }])
        }
    };
}

where_filter!(where_rhythm, "rhythm_id");
where_filter!(where_teacher, "teacher_id");
where_filter!(where_level, "level_id");
where_filter!(where_period, "period_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_filters() {
        assert_eq!(
            where_level("3").unwrap(),
            vec![Clause::Where {
                column: "level_id",
                value: 3
            }]
        );
        assert!(matches!(
            where_teacher("abc").unwrap_err(),
            AcademyError::MalformedPayload(_)
        ));
    }
}
