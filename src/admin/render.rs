//! 列表渲染
//!
//! 把类型化的行数据按列声明转换为显示文本，包括前后缀、长度限制与外层元素样式。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::descriptor::{ClassStrategy, Column, ElementStrategy};

/// 可在后台列表中展示的行
pub trait AdminRow {
    fn id(&self) -> i64;
}

/// 单元格的原始值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Date(String),
    List(Vec<String>),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => CellValue::Text(v.to_string()),
            _ => CellValue::Empty,
        }
    }

    pub fn opt_number(value: Option<f64>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }

    pub fn opt_integer<T: Into<i64>>(value: Option<T>) -> Self {
        value.map(|v| CellValue::Integer(v.into())).unwrap_or(CellValue::Empty)
    }

    fn display(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Date(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Integer(n) => n.to_string(),
            CellValue::List(items) => items.join(", "),
            CellValue::Empty => String::new(),
        }
    }
}

/// 整数值不带小数，其余保留两位
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n:.2}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "admin.ts")]
pub struct RenderedCell {
    pub key: String,
    pub text: String,
    pub element: String,
    pub class: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "admin.ts")]
pub struct RenderedRow {
    pub id: i64,
    pub cells: Vec<RenderedCell>,
}

impl RenderedRow {
    pub fn cell(&self, key: &str) -> Option<&RenderedCell> {
        self.cells.iter().find(|c| c.key == key)
    }
}

pub fn render_cell<R>(column: &Column<R>, row: &R) -> RenderedCell {
    let value = (column.value)(row);

    let mut text = value.display();
    if let Some(limit) = column.limit {
        if text.chars().count() > limit {
            text = text.chars().take(limit).collect::<String>() + "...";
        }
    }
    if value != CellValue::Empty && !text.is_empty() {
        if let Some(prefix) = &column.prefix {
            text = format!("{prefix}{text}");
        }
        if let Some(suffix) = &column.suffix {
            text.push_str(suffix);
        }
    }

    let element = match &column.wrapper.element {
        ElementStrategy::Fixed(element) => *element,
        ElementStrategy::ByRow(f) => f(row),
    };
    let class = match &column.wrapper.class {
        ClassStrategy::None => None,
        ClassStrategy::Fixed(class) => Some((*class).to_string()),
        ClassStrategy::ByRow(f) => Some(f(row)),
    };

    RenderedCell {
        key: column.key.to_string(),
        text,
        element: element.as_str().to_string(),
        class,
    }
}

pub fn render_rows<R: AdminRow>(columns: &[Column<R>], rows: &[R]) -> Vec<RenderedRow> {
    rows.iter()
        .map(|row| RenderedRow {
            id: row.id(),
            cells: columns.iter().map(|c| render_cell(c, row)).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::descriptor::{ColumnKind, Element};

    struct Row {
        id: i64,
        name: String,
        amount: Option<f64>,
        flagged: bool,
    }

    impl AdminRow for Row {
        fn id(&self) -> i64 {
            self.id
        }
    }

    fn row(name: &str, amount: Option<f64>, flagged: bool) -> Row {
        Row {
            id: 7,
            name: name.to_string(),
            amount,
            flagged,
        }
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(40.0), "40");
        assert_eq!(format_number(12.5), "12.50");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_affixes_skip_empty_values() {
        let column: Column<Row> = Column::new("amount", "Amount", ColumnKind::Number, |r: &Row| {
            CellValue::opt_number(r.amount)
        })
        .prefix("$");

        assert_eq!(render_cell(&column, &row("a", Some(120.0), false)).text, "$120");
        assert_eq!(render_cell(&column, &row("a", None, false)).text, "");
    }

    #[test]
    fn test_limit_truncates_by_chars() {
        let column: Column<Row> =
            Column::new("name", "Name", ColumnKind::Text, |r: &Row| CellValue::text(&r.name)).limit(5);
        assert_eq!(render_cell(&column, &row("Ángela María", None, false)).text, "Ángel...");
        assert_eq!(render_cell(&column, &row("Ana", None, false)).text, "Ana");
    }

    #[test]
    fn test_row_strategies() {
        let column: Column<Row> = Column::new("name", "Name", ColumnKind::Text, |r: &Row| {
            CellValue::text(&r.name)
        })
        .element_by(|r| if r.flagged { Element::Del } else { Element::Span })
        .class_by(|r| format!("badge-{}", r.id));

        let rows = render_rows(&[column], &[row("x", None, true), row("y", None, false)]);
        assert_eq!(rows[0].cells[0].element, "del");
        assert_eq!(rows[1].cells[0].element, "span");
        assert_eq!(rows[0].cell("name").unwrap().class.as_deref(), Some("badge-7"));
    }
}
