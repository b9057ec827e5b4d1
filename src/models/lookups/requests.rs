//! 基础数据写入结构，均在表单校验通过后由 `FormInput` 构造

#[derive(Debug, Clone, PartialEq)]
pub struct GradeTypeInput {
    pub name: String,
    pub total: f64,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTypeInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RhythmInput {
    pub name: String,
    pub default_volume: f64,
    pub product_code: Option<String>,
    pub lms_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomInput {
    pub campus_id: i64,
    pub name: String,
    pub capacity: Option<i32>,
}
