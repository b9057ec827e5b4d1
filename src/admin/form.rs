//! 表单输入
//!
//! JSON 与 `application/x-www-form-urlencoded` 两种提交方式统一成字符串字典。
//! JSON 中嵌套的数组或对象会重新编码为 JSON 文本，和表单提交时一样走可重复字段的解码流程。

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::errors::{AcademyError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    values: BTreeMap<String, String>,
}

impl FormInput {
    pub fn from_json(body: Value) -> Result<Self> {
        let Value::Object(map) = body else {
            return Err(AcademyError::malformed_payload(
                "Request body must be a JSON object",
            ));
        };

        let mut values = BTreeMap::new();
        for (key, value) in map {
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s,
                Value::Bool(b) => if b { "1" } else { "0" }.to_string(),
                Value::Number(n) => n.to_string(),
                nested @ (Value::Array(_) | Value::Object(_)) => serde_json::to_string(&nested)?,
            };
            values.insert(key, text);
        }
        Ok(Self { values })
    }

    pub fn from_form(form: HashMap<String, String>) -> Self {
        Self {
            values: form.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// 去除首尾空白后的非空文本
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn required_text(&self, name: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| AcademyError::validation(format!("The {name} field is required.")))
    }

    pub fn i64(&self, name: &str) -> Result<Option<i64>> {
        self.parsed(name)
    }

    pub fn required_i64(&self, name: &str) -> Result<i64> {
        self.required(name)
    }

    pub fn i32(&self, name: &str) -> Result<Option<i32>> {
        self.parsed(name)
    }

    pub fn f64(&self, name: &str) -> Result<Option<f64>> {
        self.parsed(name)
    }

    pub fn required_f64(&self, name: &str) -> Result<f64> {
        self.required(name)
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                AcademyError::validation(format!("The {name} field has an invalid value: {raw}"))
            }),
        }
    }

    fn required<T: std::str::FromStr>(&self, name: &str) -> Result<T> {
        self.parsed(name)?
            .ok_or_else(|| AcademyError::validation(format!("The {name} field is required.")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_scalars_become_strings() {
        let input = FormInput::from_json(json!({
            "name": "Intensive",
            "default_volume": 40,
            "price": 12.5,
            "active": true,
            "lms_id": null,
        }))
        .unwrap();

        assert_eq!(input.get("name"), Some("Intensive"));
        assert_eq!(input.get("default_volume"), Some("40"));
        assert_eq!(input.f64("price").unwrap(), Some(12.5));
        assert_eq!(input.get("active"), Some("1"));
        assert!(input.get("lms_id").is_some());
        assert_eq!(input.text("lms_id"), None);
    }

    #[test]
    fn test_nested_arrays_are_reencoded() {
        let input = FormInput::from_json(json!({
            "times": [{"day": 1, "start": "09:00", "end": "11:00"}]
        }))
        .unwrap();
        let raw = input.get("times").unwrap();
        let decoded: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded[0]["start"], "09:00");
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        let err = FormInput::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, AcademyError::MalformedPayload(_)));
    }

    #[test]
    fn test_typed_accessors() {
        let mut form = HashMap::new();
        form.insert("course_id".to_string(), " 12 ".to_string());
        form.insert("capacity".to_string(), "many".to_string());
        let input = FormInput::from_form(form);

        assert_eq!(input.required_i64("course_id").unwrap(), 12);
        assert!(input.i32("capacity").is_err());
        assert!(input.required_f64("price").is_err());
    }
}
