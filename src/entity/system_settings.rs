//! 动态设置实体
//!
//! 以点分键保存（如 `academy.current_period`），值统一存为文本，按 `value_type` 解析。

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::models::system::entities::{SettingValueType, SystemSetting};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
    pub value_type: String,
    pub description: Option<String>,
    pub updated_at: i64,
    /// 最后修改人，种子数据为空
    pub updated_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UpdatedBy",
        to = "super::users::Column::Id"
    )]
    Updater,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Updater.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 未知的值类型按字符串处理
    pub fn into_setting(self) -> SystemSetting {
        SystemSetting {
            value_type: self
                .value_type
                .parse()
                .unwrap_or(SettingValueType::String),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
            key: self.key,
            value: self.value,
            description: self.description,
            updated_by: self.updated_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(value_type: &str) -> Model {
        Model {
            key: "academy.current_period".to_string(),
            value: "3".to_string(),
            value_type: value_type.to_string(),
            description: None,
            updated_at: 1_735_689_600,
            updated_by: Some(1),
        }
    }

    #[test]
    fn test_into_setting() {
        let setting = row("integer").into_setting();
        assert_eq!(setting.key, "academy.current_period");
        assert_eq!(setting.value_type, SettingValueType::Integer);
        assert_eq!(setting.updated_at.timestamp(), 1_735_689_600);
        assert_eq!(setting.updated_by, Some(1));

        assert_eq!(row("decimal").into_setting().value_type, SettingValueType::String);
    }
}
