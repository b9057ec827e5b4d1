use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 系统设置表 ====================
        manager
            .create_table(
                Table::create()
                    .table(SystemSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemSettings::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemSettings::Value).text().not_null())
                    .col(
                        ColumnDef::new(SystemSettings::ValueType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SystemSettings::Description).text().null())
                    .col(
                        ColumnDef::new(SystemSettings::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::UpdatedBy)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 插入默认配置 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let default_settings = [
            ("app.system_name", "Academy Admin", "string", "系统名称"),
            (
                "academy.current_period",
                "",
                "integer",
                "当前学期 ID（为空时按日期推断）",
            ),
            (
                "academy.enrollment_period",
                "",
                "integer",
                "报名学期 ID（为空时使用当前学期）",
            ),
            (
                "jwt.access_token_expiry",
                "60",
                "integer",
                "Access Token 有效期（分钟）",
            ),
        ];

        for (key, value, value_type, description) in default_settings {
            let insert = Query::insert()
                .into_table(SystemSettings::Table)
                .columns([
                    SystemSettings::Key,
                    SystemSettings::Value,
                    SystemSettings::ValueType,
                    SystemSettings::Description,
                    SystemSettings::UpdatedAt,
                ])
                .values_panic([
                    key.into(),
                    value.into(),
                    value_type.into(),
                    description.into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum SystemSettings {
    #[sea_orm(iden = "system_settings")]
    Table,
    Key,
    Value,
    ValueType,
    Description,
    UpdatedAt,
    UpdatedBy,
}
