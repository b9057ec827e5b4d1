//! 表单校验规则

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use crate::errors::Result;
use crate::storage::Storage;

use super::form::FormInput;

/// 唯一性约束的目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueTarget {
    RhythmName,
    GradeTypeCategoryName,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    /// 允许为空，为空时跳过其余规则
    Nullable,
    Integer,
    Numeric,
    /// 数值型字段比较数值，否则比较字符长度
    Min(f64),
    Max(f64),
    /// `YYYY-MM-DD`
    Date,
    /// 编辑时忽略当前记录
    Unique(UniqueTarget),
    InSet(Vec<String>),
}

impl Rule {
    pub fn in_set<T: ToString>(values: &[T]) -> Self {
        Rule::InSet(values.iter().map(ToString::to_string).collect())
    }

    fn describe(&self) -> String {
        match self {
            Rule::Required => "required".to_string(),
            Rule::Nullable => "nullable".to_string(),
            Rule::Integer => "integer".to_string(),
            Rule::Numeric => "numeric".to_string(),
            Rule::Min(n) => format!("min:{n}"),
            Rule::Max(n) => format!("max:{n}"),
            Rule::Date => "date".to_string(),
            Rule::Unique(_) => "unique".to_string(),
            Rule::InSet(values) => format!("in:{}", values.join(",")),
        }
    }
}

/// 字段名到规则列表
#[derive(Debug, Clone, Default)]
pub struct RuleSet(Vec<(&'static str, Vec<Rule>)>);

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.0.push((name, rules));
        self
    }

    pub fn rules_for(&self, name: &str) -> Option<&[Rule]> {
        self.0
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.rules_for(name)
            .is_some_and(|rules| rules.contains(&Rule::Required))
    }

    pub fn describe(&self) -> BTreeMap<&'static str, Vec<String>> {
        self.0
            .iter()
            .map(|(name, rules)| (*name, rules.iter().map(Rule::describe).collect()))
            .collect()
    }
}

/// 字段级错误
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "admin.ts")]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// 不依赖存储的规则检查，返回该字段的错误信息
pub fn check_value(field: &str, value: Option<&str>, rules: &[Rule]) -> Vec<String> {
    let value = value.map(str::trim).unwrap_or_default();
    let label = field.replace('_', " ");
    let mut errors = Vec::new();

    if value.is_empty() {
        if rules.contains(&Rule::Required) {
            errors.push(format!("The {label} field is required."));
        }
        return errors;
    }

    let numeric = rules.contains(&Rule::Integer) || rules.contains(&Rule::Numeric);
    let number = value.parse::<f64>().ok().filter(|n| n.is_finite());

    for rule in rules {
        match rule {
            Rule::Integer if value.parse::<i64>().is_err() => {
                errors.push(format!("The {label} must be an integer."));
            }
            Rule::Numeric if number.is_none() => {
                errors.push(format!("The {label} must be a number."));
            }
            Rule::Min(min) => {
                if numeric {
                    if number.is_some_and(|n| n < *min) {
                        errors.push(format!("The {label} must be at least {min}."));
                    }
                } else if (value.chars().count() as f64) < *min {
                    errors.push(format!("The {label} must be at least {min} characters."));
                }
            }
            Rule::Max(max) => {
                if numeric {
                    if number.is_some_and(|n| n > *max) {
                        errors.push(format!("The {label} may not be greater than {max}."));
                    }
                } else if (value.chars().count() as f64) > *max {
                    errors.push(format!(
                        "The {label} may not be greater than {max} characters."
                    ));
                }
            }
            Rule::Date if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => {
                errors.push(format!("The {label} is not a valid date."));
            }
            Rule::InSet(allowed) if !allowed.iter().any(|a| a == value) => {
                errors.push(format!("The selected {label} is invalid."));
            }
            _ => {}
        }
    }

    errors
}

/// 按规则集校验表单，唯一性规则会查询存储
///
/// `ignore_id` 为编辑中的记录 id。
pub async fn validate(
    input: &FormInput,
    rules: &RuleSet,
    ignore_id: Option<i64>,
    storage: &dyn Storage,
) -> Result<FieldErrors> {
    let mut errors = FieldErrors::default();

    for (field, field_rules) in &rules.0 {
        let value = input.get(field);
        let messages = check_value(field, value, field_rules);
        let failed = !messages.is_empty();
        for message in messages {
            errors.add(field, message);
        }
        if failed {
            continue;
        }

        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        for rule in field_rules {
            if let Rule::Unique(target) = rule {
                if storage.value_exists(*target, value, ignore_id).await? {
                    errors.add(
                        field,
                        format!("The {} has already been taken.", field.replace('_', " ")),
                    );
                }
            }
        }
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_nullable() {
        assert_eq!(
            check_value("name", None, &[Rule::Required]),
            vec!["The name field is required."]
        );
        assert_eq!(
            check_value("name", Some("   "), &[Rule::Required]),
            vec!["The name field is required."]
        );
        assert!(check_value("capacity", Some(""), &[Rule::Nullable, Rule::Integer]).is_empty());
    }

    #[test]
    fn test_min_max_use_length_for_text() {
        let rules = [Rule::Required, Rule::Min(1.0), Rule::Max(40.0)];
        assert!(check_value("name", Some("Intensive"), &rules).is_empty());
        let long = "x".repeat(41);
        assert_eq!(
            check_value("name", Some(&long), &rules),
            vec!["The name may not be greater than 40 characters."]
        );
    }

    #[test]
    fn test_min_uses_value_for_numbers() {
        let rules = [Rule::Required, Rule::Numeric, Rule::Min(0.0)];
        assert!(check_value("price", Some("0"), &rules).is_empty());
        assert_eq!(
            check_value("price", Some("-5"), &rules),
            vec!["The price must be at least 0."]
        );
        assert_eq!(
            check_value("price", Some("abc"), &rules),
            vec!["The price must be a number."]
        );
    }

    #[test]
    fn test_integer_date_and_set() {
        assert_eq!(
            check_value("course_id", Some("1.5"), &[Rule::Integer]),
            vec!["The course id must be an integer."]
        );
        assert_eq!(
            check_value("start_date", Some("2025-02-30"), &[Rule::Date]),
            vec!["The start date is not a valid date."]
        );
        let set = Rule::in_set(&[1, 2, 3]);
        assert!(check_value("status_id", Some("2"), &[set.clone()]).is_empty());
        assert_eq!(
            check_value("status_id", Some("7"), &[set]),
            vec!["The selected status id is invalid."]
        );
    }

    #[test]
    fn test_rule_set_describe() {
        let rules = RuleSet::new().field("name", vec![Rule::Required, Rule::Max(40.0)]);
        assert!(rules.is_required("name"));
        assert!(!rules.is_required("lms_id"));
        assert_eq!(rules.describe()["name"], vec!["required", "max:40"]);
    }
}
