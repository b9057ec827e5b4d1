use super::entities::UserRole;

/// 创建用户（启动时初始化管理员使用）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub role: UserRole,
}
