use super::SeaOrmStorage;
use crate::entity::user_permissions;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{AcademyError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::CreateUserRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户，`password` 必须已是哈希值
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            firstname: Set(req.firstname),
            lastname: Set(req.lastname),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("更新登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("统计用户失败: {e}")))
    }

    /// 用户持有的权限字符串
    pub async fn list_user_permissions_impl(&self, user_id: i64) -> Result<Vec<String>> {
        let rows = user_permissions::Entity::find()
            .filter(user_permissions::Column::UserId.eq(user_id))
            .order_by_asc(user_permissions::Column::Permission)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询用户权限失败: {e}")))?;

        Ok(rows.into_iter().map(|p| p.permission).collect())
    }

    /// 授予权限，已持有的权限跳过
    pub async fn grant_permissions_impl(&self, user_id: i64, permissions: &[&str]) -> Result<()> {
        let existing = self.list_user_permissions_impl(user_id).await?;

        for permission in permissions {
            if existing.iter().any(|p| p == permission) {
                continue;
            }
            user_permissions::ActiveModel {
                user_id: Set(user_id),
                permission: Set(permission.to_string()),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("授予权限失败: {e}")))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::memory_storage;
    use super::*;
    use crate::models::users::entities::UserRole;

    fn request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed".to_string(),
            firstname: "Ana".to_string(),
            lastname: "Lopez".to_string(),
            role: UserRole::Secretary,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_username_or_email() {
        let s = memory_storage().await;
        let user = s.create_user_impl(request("ana")).await.unwrap();
        assert_eq!(user.role, UserRole::Secretary);
        assert_eq!(user.status, UserStatus::Active);

        let by_name = s.get_user_by_username_or_email_impl("ana").await.unwrap();
        let by_mail = s
            .get_user_by_username_or_email_impl("ana@example.com")
            .await
            .unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(user.id));
        assert_eq!(by_mail.map(|u| u.id), Some(user.id));
        assert_eq!(s.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let s = memory_storage().await;
        let user = s.create_user_impl(request("ana")).await.unwrap();
        assert!(user.last_login.is_none());

        assert!(s.update_last_login_impl(user.id).await.unwrap());
        assert!(!s.update_last_login_impl(user.id + 100).await.unwrap());
        let reloaded = s.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());
    }

    #[tokio::test]
    async fn test_grant_permissions_is_idempotent() {
        let s = memory_storage().await;
        let user = s.create_user_impl(request("ana")).await.unwrap();

        s.grant_permissions_impl(user.id, &["enrollments.view", "courses.view"])
            .await
            .unwrap();
        s.grant_permissions_impl(user.id, &["enrollments.view"])
            .await
            .unwrap();

        assert_eq!(
            s.list_user_permissions_impl(user.id).await.unwrap(),
            vec!["courses.view", "enrollments.view"]
        );
    }
}
