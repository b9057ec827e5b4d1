//! 列表导出（CSV）

use crate::errors::{AcademyError, Result};

use super::descriptor::Column;
use super::render::RenderedRow;

/// 表头为列标签，内容为渲染后的显示文本
pub fn rows_to_csv<R>(columns: &[Column<R>], rows: &[RenderedRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(columns.iter().map(|c| c.label))?;
    for row in rows {
        writer.write_record(row.cells.iter().map(|c| c.text.as_str()))?;
    }
    writer
        .into_inner()
        .map_err(|e| AcademyError::io(format!("Failed to flush CSV writer: {e}")))
}

/// 导出文件名，例如 `enrollments-20250310.csv`
pub fn export_filename(entity_name_plural: &str, today: chrono::NaiveDate) -> String {
    let slug: String = entity_name_plural
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    format!("{}-{}.csv", slug.trim_matches('-'), today.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::descriptor::ColumnKind;
    use crate::admin::render::{AdminRow, CellValue, render_rows};

    struct Row(i64, &'static str);

    impl AdminRow for Row {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_csv_uses_labels_and_display_text() {
        let columns: Vec<Column<Row>> = vec![
            Column::new("id", "ID", ColumnKind::Number, |r| CellValue::Integer(r.0)),
            Column::new("name", "Last name", ColumnKind::Text, |r| CellValue::text(r.1)),
        ];
        let rows = render_rows(&columns, &[Row(1, "Doe, Jr."), Row(2, "Smith")]);
        let csv = String::from_utf8(rows_to_csv(&columns, &rows).unwrap()).unwrap();
        assert_eq!(csv, "ID,Last name\n1,\"Doe, Jr.\"\n2,Smith\n");
    }

    #[test]
    fn test_export_filename() {
        let day = chrono::NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(export_filename("External Courses", day), "external-courses-20250310.csv");
    }
}
