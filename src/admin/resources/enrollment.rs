//! 报名
//!
//! 报名只能查看、修改与取消，不能在这里创建。带 `course_id` 时进入课程模式，
//! 只保留列表（管理员另有导出），并展示课程信息与学员相关按钮。

use serde_json::Value;

use crate::admin::clause::{Clause, ScholarshipFilter, SearchPredicate};
use crate::admin::context::{DescriptorContext, ViewContext};
use crate::admin::descriptor::{
    Button, Column, ColumnKind, Element, Field, FieldKind, Filter, FilterKind, LookupTable,
    OptionSource, Operation, ResourceDescriptor, Widget,
};
use crate::admin::render::CellValue;
use crate::admin::validation::{Rule, RuleSet};
use crate::errors::{AcademyError, Result};
use crate::models::enrollments::entities::{EnrollmentRow, EnrollmentStatus};

use super::parse_filter_id;

pub const ROUTE: &str = "enrollments";

/// 状态超过阈值的报名以删除线显示
pub fn strike_inactive(row: &EnrollmentRow) -> Element {
    if EnrollmentStatus::is_inactive(row.status_id) {
        Element::Del
    } else {
        Element::Span
    }
}

pub fn status_badge(row: &EnrollmentRow) -> String {
    let styling = row.status().map(EnrollmentStatus::styling).unwrap_or("secondary");
    format!("badge badge-pill badge-{styling}")
}

pub fn search_lastname(term: &str) -> SearchPredicate {
    SearchPredicate::Related {
        path: "student.user",
        attribute: "lastname",
        term: term.to_string(),
    }
}

pub fn search_firstname(term: &str) -> SearchPredicate {
    SearchPredicate::Related {
        path: "student.user",
        attribute: "firstname",
        term: term.to_string(),
    }
}

pub fn search_email(term: &str) -> SearchPredicate {
    SearchPredicate::Related {
        path: "student.user",
        attribute: "email",
        term: term.to_string(),
    }
}

/// 多选状态筛选，取值为 JSON 数组，各值之间为 OR
pub fn filter_status(value: &str) -> Result<Vec<Clause>> {
    let items: Vec<Value> = serde_json::from_str(value).map_err(|e| {
        AcademyError::malformed_payload(format!("Filter 'status_id' expects a JSON array: {e}"))
    })?;
    let values = items
        .iter()
        .map(|item| match item {
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                AcademyError::malformed_payload(format!("Invalid status id: {n}"))
            }),
            Value::String(s) => parse_filter_id("status_id", s),
            other => Err(AcademyError::malformed_payload(format!(
                "Invalid status id: {other}"
            ))),
        })
        .collect::<Result<Vec<i64>>>()?;

    if values.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![Clause::AnyOf {
        column: "status_id",
        values,
    }])
}

pub fn filter_period(value: &str) -> Result<Vec<Clause>> {
    Ok(vec![Clause::InPeriod(parse_filter_id("period_id", value)?)])
}

pub fn filter_scholarship(value: &str) -> Result<Vec<Clause>> {
    let filter = if value.trim() == "all" {
        ScholarshipFilter::Any
    } else {
        ScholarshipFilter::Id(parse_filter_id("scholarship", value)?)
    };
    Ok(vec![Clause::HasScholarship(filter)])
}

pub fn descriptor(ctx: &DescriptorContext) -> ResourceDescriptor<EnrollmentRow> {
    let mut d = ResourceDescriptor::new("enrollment", "enrollments", ROUTE);

    match &ctx.view {
        ViewContext::CourseScoped(course) => {
            d.allow(&[Operation::List]);
            d.base_clauses.push(Clause::InCourse(course.id));
            d.widgets.push(Widget::CourseInfo);
            d.buttons
                .push(Button::line("showStudent", "showStudentForEnrollment"));
            d.buttons.push(Button::top(
                "enroll-student-in-course",
                "enroll-student-in-course",
            ));
            d.buttons
                .push(Button::top("switch-to-photo-roster", "switch-to-photo-roster"));
        }
        ViewContext::Global => {
            d.allow(&[
                Operation::List,
                Operation::Show,
                Operation::Update,
                Operation::Delete,
            ]);
            if ctx.operation == Operation::List {
                d.widgets.push(Widget::PendingBalance);
            }
        }
    }

    if ctx.is_admin {
        d.enable_export();
    }

    d.columns = columns(ctx);

    if !ctx.is_course_scoped() {
        d.filters = vec![
            Filter::new(
                "status_id",
                FilterKind::Select2Multiple,
                "Status",
                OptionSource::Table(LookupTable::EnrollmentStatuses),
                filter_status,
            ),
            Filter::new(
                "period_id",
                FilterKind::Select2,
                "Period",
                OptionSource::Table(LookupTable::Periods),
                filter_period,
            ),
            Filter::new(
                "scholarship",
                FilterKind::Select2,
                "Scholarship",
                OptionSource::Table(LookupTable::Scholarships),
                filter_scholarship,
            ),
        ];
    }

    if ctx.operation == Operation::Update {
        d.fields = update_fields(ctx);
        d.validation = rules();
    }

    d
}

fn columns(ctx: &DescriptorContext) -> Vec<Column<EnrollmentRow>> {
    let mut columns = vec![
        Column::new("id", "ID", ColumnKind::Number, |r: &EnrollmentRow| {
            CellValue::Integer(r.id)
        })
        .element_by(strike_inactive),
        Column::new("student.idnumber", "ID number", ColumnKind::Text, |r: &EnrollmentRow| {
            CellValue::opt_text(r.student_idnumber.as_deref())
        })
        .element_by(strike_inactive),
        Column::new("user_lastname", "Last Name", ColumnKind::Relationship, |r: &EnrollmentRow| {
            CellValue::text(&r.lastname)
        })
        .element_by(strike_inactive)
        .search(crate::admin::SearchStrategy::Custom(search_lastname)),
        Column::new("user_firstname", "First Name", ColumnKind::Relationship, |r: &EnrollmentRow| {
            CellValue::text(&r.firstname)
        })
        .element_by(strike_inactive)
        .search(crate::admin::SearchStrategy::Custom(search_firstname)),
        Column::new("student_age", "Age", ColumnKind::ModelFunction, |r: &EnrollmentRow| {
            CellValue::opt_integer(r.age)
        })
        .not_searchable(),
        Column::new("student_birthdate", "Birthdate", ColumnKind::Date, |r: &EnrollmentRow| {
            r.birthdate
                .clone()
                .map(CellValue::Date)
                .unwrap_or(CellValue::Empty)
        })
        .not_searchable(),
    ];

    if !ctx.is_course_scoped() {
        columns.push(Column::new("course_id", "Course", ColumnKind::Select, |r: &EnrollmentRow| {
            CellValue::text(&r.course_name)
        }));
        columns.push(
            Column::new("course.period", "Period", ColumnKind::Relationship, |r: &EnrollmentRow| {
                CellValue::text(&r.period_name)
            })
            .not_searchable(),
        );
    }

    columns.push(
        Column::new("status_id", "Status", ColumnKind::Select, |r: &EnrollmentRow| {
            CellValue::text(&r.status_name)
        })
        .class_by(status_badge)
        .not_searchable(),
    );
    columns.push(
        Column::new("balance", "Remaining balance", ColumnKind::Number, |r: &EnrollmentRow| {
            CellValue::Number(r.balance)
        })
        .currency(&ctx.currency)
        .not_searchable(),
    );

    if ctx.scheduled_payments {
        columns.push(
            Column::new(
                "scheduledPayments",
                "Scheduled Payments",
                ColumnKind::Relationship,
                |r: &EnrollmentRow| {
                    CellValue::List(r.scheduled_payments.iter().map(|p| p.date.clone()).collect())
                },
            )
            .not_searchable(),
        );
    }

    columns.push(
        Column::new("scholarships", "Scholarship", ColumnKind::Relationship, |r: &EnrollmentRow| {
            CellValue::List(r.scholarships.clone())
        })
        .not_searchable(),
    );
    columns.push(
        Column::new("email", "Email", ColumnKind::Relationship, |r: &EnrollmentRow| {
            CellValue::text(&r.email)
        })
        .search(crate::admin::SearchStrategy::Custom(search_email)),
    );
    columns.push(
        Column::new("student.phone", "Phone Number", ColumnKind::SelectMultiple, |r: &EnrollmentRow| {
            CellValue::List(r.phone_numbers.clone())
        })
        .not_searchable(),
    );

    columns
}

fn update_fields(ctx: &DescriptorContext) -> Vec<Field> {
    let course_options = match ctx.current_entry_period {
        Some(period_id) => OptionSource::CoursesInPeriodByLevel(period_id),
        None => OptionSource::None,
    };

    let mut fields = vec![
        Field::new("course_id", "Course", FieldKind::Select2).options(course_options),
        Field::new("price", "Price", FieldKind::Number).currency(&ctx.currency),
    ];

    if ctx.scheduled_payments {
        fields.push(Field::new(
            "scheduledPayments",
            "Scheduled Payments",
            FieldKind::Repeatable {
                subfields: vec![
                    Field::new("date", "Date", FieldKind::Date),
                    Field::new("value", "Value", FieldKind::Number).currency(&ctx.currency),
                    Field::new("status", "Status", FieldKind::Radio)
                        .options(OptionSource::from_pairs(&[(1, "Pending"), (2, "Paid")])),
                ],
                init_rows: 0,
            },
        ));
    }

    fields.push(
        Field::new("status_id", "Status", FieldKind::Select)
            .options(OptionSource::Table(LookupTable::EnrollmentStatuses)),
    );
    fields
}

pub fn rules() -> RuleSet {
    let statuses: Vec<i64> = EnrollmentStatus::all().iter().map(|s| s.id()).collect();
    RuleSet::new()
        .field("course_id", vec![Rule::Required, Rule::Integer])
        .field("price", vec![Rule::Required, Rule::Numeric, Rule::Min(0.0)])
        .field("status_id", vec![Rule::Required, Rule::in_set(&statuses)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::context::CurrencyAffix;
    use crate::admin::render::render_rows;
    use crate::models::courses::entities::CourseSummary;

    fn row(id: i64, status_id: i64) -> EnrollmentRow {
        EnrollmentRow {
            id,
            student_id: 10,
            student_idnumber: Some("CC-1020".to_string()),
            firstname: "Ana".to_string(),
            lastname: "Pérez".to_string(),
            email: "ana@example.com".to_string(),
            birthdate: Some("2001-04-02".to_string()),
            age: Some(23),
            course_id: 3,
            course_name: "B1 Intensive".to_string(),
            period_id: 4,
            period_name: "2025-1".to_string(),
            status_id,
            status_name: EnrollmentStatus::from_id(status_id)
                .map(|s| s.name().to_string())
                .unwrap_or_default(),
            price: 300.0,
            balance: 120.0,
            scheduled_payments: Vec::new(),
            scholarships: vec!["Staff".to_string()],
            phone_numbers: vec!["555-0101".to_string(), "555-0102".to_string()],
        }
    }

    fn course() -> CourseSummary {
        CourseSummary {
            id: 3,
            name: "B1 Intensive".to_string(),
            period_id: 4,
            period_name: "2025-1".to_string(),
            teacher_name: None,
            teacher_user_id: None,
            start_date: "2025-01-06".to_string(),
            end_date: "2025-03-28".to_string(),
            enrollment_count: 12,
        }
    }

    #[test]
    fn test_inactive_rows_are_struck_through() {
        let d = descriptor(&DescriptorContext::new(Operation::List));
        let rendered = render_rows(&d.columns, &[row(1, 1), row(2, 2), row(3, 3), row(4, 5)]);

        for (r, expected) in rendered.iter().zip(["span", "span", "del", "del"]) {
            for key in ["id", "student.idnumber", "user_lastname", "user_firstname"] {
                assert_eq!(r.cell(key).unwrap().element, expected, "{key} of {}", r.id);
            }
            assert_eq!(r.cell("email").unwrap().element, "span");
        }
    }

    #[test]
    fn test_status_badge_and_currency() {
        let ctx = DescriptorContext::new(Operation::List).with_currency(CurrencyAffix {
            prefix: None,
            suffix: Some("€".to_string()),
        });
        let d = descriptor(&ctx);
        let rendered = render_rows(&d.columns, &[row(1, 3)]);
        let status = rendered[0].cell("status_id").unwrap();
        assert_eq!(status.text, "Canceled");
        assert_eq!(status.class.as_deref(), Some("badge badge-pill badge-danger"));
        assert_eq!(rendered[0].cell("balance").unwrap().text, "120€");
        assert_eq!(rendered[0].cell("student.phone").unwrap().text, "555-0101, 555-0102");
    }

    #[test]
    fn test_global_mode() {
        let d = descriptor(&DescriptorContext::new(Operation::List));
        assert!(d.allows(Operation::Update));
        assert!(d.allows(Operation::Delete));
        assert!(!d.allows(Operation::Create));
        assert!(!d.allows(Operation::Export));
        assert_eq!(d.widgets, vec![Widget::PendingBalance]);
        assert!(d.column("course_id").is_some());
        assert!(d.column("scheduledPayments").is_none());
        assert_eq!(d.filters.len(), 3);
        assert!(d.base_clauses.is_empty());
    }

    #[test]
    fn test_course_mode() {
        let ctx = DescriptorContext::new(Operation::List)
            .with_view(ViewContext::CourseScoped(course()))
            .with_admin(true);
        let d = descriptor(&ctx);

        assert_eq!(d.operations, vec![Operation::List, Operation::Export]);
        assert_eq!(d.base_clauses, vec![Clause::InCourse(3)]);
        assert_eq!(d.widgets, vec![Widget::CourseInfo]);
        assert!(d.column("course_id").is_none());
        assert!(d.column("course.period").is_none());
        assert!(d.filters.is_empty());
        let names: Vec<_> = d.buttons.iter().map(|b| b.name).collect();
        assert_eq!(
            names,
            vec!["showStudent", "enroll-student-in-course", "switch-to-photo-roster"]
        );
    }

    #[test]
    fn test_scheduled_payments_toggle() {
        let ctx = DescriptorContext::new(Operation::Update)
            .with_scheduled_payments(true)
            .with_entry_period(Some(4));
        let d = descriptor(&ctx);
        assert!(d.column("scheduledPayments").is_some());
        assert!(matches!(
            d.field("scheduledPayments").unwrap().kind,
            FieldKind::Repeatable { .. }
        ));
        assert_eq!(
            d.field("course_id").unwrap().options,
            OptionSource::CoursesInPeriodByLevel(4)
        );
        assert!(d.validation.is_required("status_id"));
    }

    #[test]
    fn test_status_filter_values() {
        assert_eq!(
            filter_status(r#"["1", 3]"#).unwrap(),
            vec![Clause::AnyOf {
                column: "status_id",
                values: vec![1, 3]
            }]
        );
        assert!(filter_status("[]").unwrap().is_empty());
        assert!(matches!(
            filter_status("1,3").unwrap_err(),
            AcademyError::MalformedPayload(_)
        ));
    }

    #[test]
    fn test_scholarship_filter() {
        assert_eq!(
            filter_scholarship("all").unwrap(),
            vec![Clause::HasScholarship(ScholarshipFilter::Any)]
        );
        assert_eq!(
            filter_scholarship("5").unwrap(),
            vec![Clause::HasScholarship(ScholarshipFilter::Id(5))]
        );
    }

    #[test]
    fn test_last_name_search_goes_through_user() {
        let d = descriptor(&DescriptorContext::new(Operation::List));
        let column = d.column("user_lastname").unwrap();
        match &column.search {
            crate::admin::SearchStrategy::Custom(build) => assert_eq!(
                build("Pér"),
                SearchPredicate::Related {
                    path: "student.user",
                    attribute: "lastname",
                    term: "Pér".to_string()
                }
            ),
            _ => panic!("expected a custom search"),
        }
    }
}
