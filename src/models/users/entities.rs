use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserRole {
    Admin,     // 管理员
    Secretary, // 教务
    Teacher,   // 教师
    Student,   // 学生
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const SECRETARY: &'static str = "secretary";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// 可维护基础数据（课程节奏、教室等）的角色
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Secretary]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Secretary, &Self::Teacher, &Self::Student]
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Secretary)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, secretary, teacher, student"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Admin => UserRole::ADMIN,
            UserRole::Secretary => UserRole::SECRETARY,
            UserRole::Teacher => UserRole::TEACHER,
            UserRole::Student => UserRole::STUDENT,
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::SECRETARY => Ok(UserRole::Secretary),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STUDENT => Ok(UserRole::Student),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Suspended, // 停用
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub firstname: String,
    pub lastname: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_strings() {
        for role in UserRole::all_roles() {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), **role);
        }
        assert!("user".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        let err = serde_json::from_str::<UserRole>("\"root\"").unwrap_err();
        assert!(err.to_string().contains("无效的用户角色"));
    }

    #[test]
    fn test_staff_roles() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Secretary.is_staff());
        assert!(!UserRole::Teacher.is_staff());
    }
}
