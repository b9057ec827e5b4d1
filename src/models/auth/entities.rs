use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::CourseSummary;
use crate::models::users::entities::UserRole;

/// 权限字符串
pub struct Permission;

impl Permission {
    pub const ENROLLMENTS_VIEW: &'static str = "enrollments.view";
    pub const ENROLLMENTS_EDIT: &'static str = "enrollments.edit";
    pub const ENROLLMENTS_DELETE: &'static str = "enrollments.delete";
    pub const COURSES_VIEW: &'static str = "courses.view";
    pub const COURSES_EDIT: &'static str = "courses.edit";

    pub fn all() -> &'static [&'static str] {
        &[
            Self::ENROLLMENTS_VIEW,
            Self::ENROLLMENTS_EDIT,
            Self::ENROLLMENTS_DELETE,
            Self::COURSES_VIEW,
            Self::COURSES_EDIT,
        ]
    }
}

/// 请求级授权上下文
///
/// 由 `RequireJWT` 在每个请求开始时解析一次（用户 + 权限列表），放入请求扩展。
/// 处理函数只从这里读取身份与权限。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
    pub permissions: Vec<String>,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// 管理员拥有全部权限
    pub fn can(&self, permission: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == permission)
    }

    /// `view-course` 能力：管理员、持有 `courses.view` 或该课程的任课教师
    pub fn can_view_course(&self, course: &CourseSummary) -> bool {
        self.can(Permission::COURSES_VIEW) || course.teacher_user_id == Some(self.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: UserRole, permissions: &[&str]) -> AuthContext {
        AuthContext {
            user_id: 7,
            username: "someone".to_string(),
            role,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn course(teacher_user_id: Option<i64>) -> CourseSummary {
        CourseSummary {
            id: 1,
            name: "B1 Intensive".to_string(),
            period_id: 1,
            period_name: "2025-1".to_string(),
            teacher_name: None,
            teacher_user_id,
            start_date: "2025-01-06".to_string(),
            end_date: "2025-03-28".to_string(),
            enrollment_count: 0,
        }
    }

    #[test]
    fn test_admin_passes_every_check() {
        let admin = ctx(UserRole::Admin, &[]);
        for p in Permission::all() {
            assert!(admin.can(p));
        }
        assert!(admin.can_view_course(&course(None)));
    }

    #[test]
    fn test_permission_set_is_checked() {
        let secretary = ctx(UserRole::Secretary, &[Permission::ENROLLMENTS_VIEW]);
        assert!(secretary.can(Permission::ENROLLMENTS_VIEW));
        assert!(!secretary.can(Permission::ENROLLMENTS_DELETE));
    }

    #[test]
    fn test_teacher_views_own_course_only() {
        let teacher = ctx(UserRole::Teacher, &[]);
        assert!(teacher.can_view_course(&course(Some(7))));
        assert!(!teacher.can_view_course(&course(Some(8))));
        assert!(!teacher.can_view_course(&course(None)));

        let viewer = ctx(UserRole::Teacher, &[Permission::COURSES_VIEW]);
        assert!(viewer.can_view_course(&course(Some(8))));
    }
}
