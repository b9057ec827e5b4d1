use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 配置值类型
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "system.ts")]
pub enum SettingValueType {
    String,
    Integer,
    Boolean,
}

impl SettingValueType {
    /// 检查新值是否符合类型；整数与布尔允许留空表示“未设置”
    pub fn check(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        match self {
            SettingValueType::String => Ok(()),
            _ if value.is_empty() => Ok(()),
            SettingValueType::Integer => value
                .parse::<i64>()
                .map(|_| ())
                .map_err(|_| format!("'{value}' is not an integer")),
            SettingValueType::Boolean => match value {
                "true" | "false" => Ok(()),
                _ => Err(format!("'{value}' is not a boolean")),
            },
        }
    }
}

impl std::fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValueType::String => write!(f, "string"),
            SettingValueType::Integer => write!(f, "integer"),
            SettingValueType::Boolean => write!(f, "boolean"),
        }
    }
}

impl std::str::FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            "boolean" => Ok(SettingValueType::Boolean),
            _ => Err(format!("Invalid setting value type: {s}")),
        }
    }
}

/// 已知配置键
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnownSettingKey {
    SystemName,
    AccessTokenExpiry,
    CurrentPeriod,
    EnrollmentPeriod,
}

impl KnownSettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SystemName => "app.system_name",
            KnownSettingKey::AccessTokenExpiry => "jwt.access_token_expiry",
            KnownSettingKey::CurrentPeriod => "academy.current_period",
            KnownSettingKey::EnrollmentPeriod => "academy.enrollment_period",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::SystemName => SettingValueType::String,
            _ => SettingValueType::Integer,
        }
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "app.system_name" => Ok(KnownSettingKey::SystemName),
            "jwt.access_token_expiry" => Ok(KnownSettingKey::AccessTokenExpiry),
            "academy.current_period" => Ok(KnownSettingKey::CurrentPeriod),
            "academy.enrollment_period" => Ok(KnownSettingKey::EnrollmentPeriod),
            _ => Err(format!("Unknown setting key: {s}")),
        }
    }
}

/// 系统设置实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_are_written_under_crate_bindings() {
        assert_eq!(
            SystemSetting::output_path().as_deref(),
            Some(std::path::Path::new("system.ts"))
        );
    }

    #[test]
    fn test_known_keys_parse_back() {
        for key in [
            KnownSettingKey::SystemName,
            KnownSettingKey::AccessTokenExpiry,
            KnownSettingKey::CurrentPeriod,
            KnownSettingKey::EnrollmentPeriod,
        ] {
            assert_eq!(key.as_str().parse::<KnownSettingKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_value_type_check() {
        assert!(SettingValueType::Integer.check("12").is_ok());
        assert!(SettingValueType::Integer.check("").is_ok());
        assert!(SettingValueType::Integer.check("twelve").is_err());
        assert!(SettingValueType::Boolean.check("yes").is_err());
        assert!(SettingValueType::String.check("anything").is_ok());
    }
}
