//! 校外课程
//!
//! 位于校外校区的课程，课表时间段以可重复字段提交，保存时整体替换。

use serde_json::json;

use crate::admin::clause::Clause;
use crate::admin::context::DescriptorContext;
use crate::admin::descriptor::{
    Column, ColumnKind, Field, FieldKind, Filter, FilterKind, InactiveDefault, LookupTable,
    OptionSource, Operation, ResourceDescriptor,
};
use crate::admin::render::CellValue;
use crate::admin::validation::{Rule, RuleSet};
use crate::models::courses::entities::{ExternalCourseRow, WEEKDAYS};

use super::{where_level, where_period, where_rhythm, where_teacher};

pub const ROUTE: &str = "externalcourses";

const TAB_INFO: &str = "Course info";
const TAB_SCHEDULE: &str = "Schedule";

pub fn descriptor(ctx: &DescriptorContext) -> ResourceDescriptor<ExternalCourseRow> {
    let mut d = ResourceDescriptor::new("External Course", "External Courses", ROUTE);
    d.allow(&[
        Operation::List,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ]);
    d.base_clauses.push(Clause::External {
        campus_id: ctx.external_campus_id,
    });
    d.enable_export();

    d.columns = columns();
    d.filters = filters();

    match ctx.operation {
        Operation::Create => {
            d.fields = fields(ctx, true);
            d.validation = rules();
        }
        Operation::Update => {
            d.fields = fields(ctx, false);
            d.validation = rules();
        }
        _ => {}
    }

    d
}

fn columns() -> Vec<Column<ExternalCourseRow>> {
    vec![
        Column::new("partner_id", "Partnership", ColumnKind::Select, |r: &ExternalCourseRow| {
            CellValue::opt_text(r.partner_name.as_deref())
        }),
        Column::new("rhythm_id", "Rhythm", ColumnKind::Select, |r: &ExternalCourseRow| {
            CellValue::opt_text(r.rhythm_name.as_deref())
        }),
        Column::new("level_id", "Level", ColumnKind::Select, |r: &ExternalCourseRow| {
            CellValue::opt_text(r.level_name.as_deref())
        }),
        Column::new("name", "Name", ColumnKind::Text, |r: &ExternalCourseRow| {
            CellValue::text(&r.name)
        }),
        Column::new("volume", "Volume", ColumnKind::Number, |r: &ExternalCourseRow| {
            CellValue::opt_number(r.volume)
        })
        .suffix("h")
        .not_searchable(),
        Column::new("hourly_price", "Hourly Price", ColumnKind::Number, |r: &ExternalCourseRow| {
            CellValue::opt_number(r.hourly_price)
        })
        .prefix("$")
        .not_searchable(),
        Column::new("teacher_id", "Teacher", ColumnKind::Select, |r: &ExternalCourseRow| {
            CellValue::opt_text(r.teacher_name.as_deref())
        })
        .not_searchable(),
        Column::new("room_id", "Room", ColumnKind::Select, |r: &ExternalCourseRow| {
            CellValue::opt_text(r.room_name.as_deref())
        }),
        Column::new("times", "Schedule", ColumnKind::ModelFunction, |r: &ExternalCourseRow| {
            CellValue::Text(r.schedule())
        })
        .limit(150)
        .not_searchable(),
        Column::new("head_count", "Students", ColumnKind::Number, |r: &ExternalCourseRow| {
            CellValue::opt_integer(r.head_count)
        })
        .not_searchable(),
        Column::new("new_students", "Year Students", ColumnKind::Number, |r: &ExternalCourseRow| {
            CellValue::opt_integer(r.new_students)
        })
        .not_searchable(),
        Column::new("start_date", "Start Date", ColumnKind::Date, |r: &ExternalCourseRow| {
            CellValue::Date(r.start_date.clone())
        })
        .not_searchable(),
        Column::new("end_date", "End Date", ColumnKind::Date, |r: &ExternalCourseRow| {
            CellValue::Date(r.end_date.clone())
        })
        .not_searchable(),
    ]
}

fn filters() -> Vec<Filter> {
    vec![
        Filter::new(
            "rhythm_id",
            FilterKind::Select2,
            "Rhythm",
            OptionSource::Table(LookupTable::Rhythms),
            where_rhythm,
        ),
        Filter::new(
            "teacher_id",
            FilterKind::Select2,
            "Teacher",
            OptionSource::Table(LookupTable::Teachers),
            where_teacher,
        ),
        Filter::new(
            "level_id",
            FilterKind::Select2,
            "Level",
            OptionSource::Table(LookupTable::Levels),
            where_level,
        ),
        Filter::new(
            "period_id",
            FilterKind::Select2,
            "Period",
            OptionSource::Table(LookupTable::Periods),
            where_period,
        )
        .when_inactive(InactiveDefault::DefaultPeriod),
    ]
}

fn fields(ctx: &DescriptorContext, creating: bool) -> Vec<Field> {
    let select = |name, label, table| {
        Field::new(name, label, FieldKind::Select)
            .options(OptionSource::Table(table))
            .tab(TAB_INFO)
    };

    let mut period = Field::new("period_id", "Period", FieldKind::Select)
        .options(OptionSource::Table(LookupTable::Periods))
        .tab(TAB_SCHEDULE);
    let mut start = Field::new("start_date", "Start Date", FieldKind::Date).tab(TAB_SCHEDULE);
    let mut end = Field::new("end_date", "End Date", FieldKind::Date).tab(TAB_SCHEDULE);
    if let Some(p) = &ctx.enrollments_period {
        period = period.default_value(p.id);
        start = start.default_value(p.start_date.clone());
        end = end.default_value(p.end_date.clone());
    }

    let days: Vec<(usize, &str)> = WEEKDAYS.iter().copied().enumerate().collect();

    let mut fields = vec![
        select("partner_id", "Partnership", LookupTable::Partners).nullable(),
        select("rhythm_id", "Rhythm", LookupTable::Rhythms),
        select("level_id", "Level", LookupTable::Levels),
        Field::new("name", "Name", FieldKind::Text).tab(TAB_INFO),
        Field::new("volume", "Volume", FieldKind::Number)
            .suffix("h")
            .tab(TAB_INFO),
        Field::new("hourly_price", "Hourly Price", FieldKind::Number)
            .prefix("$")
            .tab(TAB_INFO),
        select("teacher_id", "Teacher", LookupTable::Teachers).nullable(),
        select("room_id", "Room", LookupTable::Rooms).nullable(),
        Field::new(
            "campus_id",
            "Campus",
            FieldKind::Hidden {
                value: json!(ctx.external_campus_id),
            },
        )
        .tab(TAB_INFO),
        Field::new("price", "Price", FieldKind::Hidden { value: json!(0) }).tab(TAB_INFO),
        period,
        start,
        end,
        Field::new("head_count", "Head Count", FieldKind::Number).tab(TAB_INFO),
        Field::new(
            "new_students",
            "Students to count in year total",
            FieldKind::Number,
        )
        .tab(TAB_INFO),
        Field::new(
            "times",
            "Course Schedule",
            FieldKind::Repeatable {
                subfields: vec![
                    Field::new("day", "Day", FieldKind::SelectFromArray)
                        .options(OptionSource::from_pairs(&days))
                        .default_value(1),
                    Field::new("start", "Start", FieldKind::Time),
                    Field::new("end", "End", FieldKind::Time),
                ],
                init_rows: 0,
            },
        )
        .tab(TAB_SCHEDULE),
    ];

    if creating {
        fields.push(
            Field::new(
                "custom-ajax-button",
                "",
                FieldKind::View {
                    view: "courses/schedule-preset-alert",
                },
            )
            .tab(TAB_SCHEDULE),
        );
        fields.push(
            Field::new("schedulepreset", "Schedule Preset", FieldKind::SelectFromArray)
                .options(OptionSource::SchedulePresets)
                .nullable()
                .tab(TAB_SCHEDULE),
        );
    }

    fields
}

pub fn rules() -> RuleSet {
    let optional_id = || vec![Rule::Nullable, Rule::Integer];
    RuleSet::new()
        .field("campus_id", vec![Rule::Required, Rule::Integer])
        .field("partner_id", optional_id())
        .field("rhythm_id", vec![Rule::Required, Rule::Integer])
        .field("level_id", vec![Rule::Required, Rule::Integer])
        .field("teacher_id", optional_id())
        .field("room_id", optional_id())
        .field("period_id", vec![Rule::Required, Rule::Integer])
        .field("name", vec![Rule::Required, Rule::Max(255.0)])
        .field("volume", vec![Rule::Nullable, Rule::Numeric, Rule::Min(0.0)])
        .field("hourly_price", vec![Rule::Nullable, Rule::Numeric, Rule::Min(0.0)])
        .field("price", vec![Rule::Nullable, Rule::Numeric])
        .field("start_date", vec![Rule::Required, Rule::Date])
        .field("end_date", vec![Rule::Required, Rule::Date])
        .field("head_count", vec![Rule::Nullable, Rule::Integer, Rule::Min(0.0)])
        .field("new_students", vec![Rule::Nullable, Rule::Integer, Rule::Min(0.0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::render::render_rows;
    use crate::models::courses::entities::{CourseTime, Period};

    fn enrollments_period() -> Period {
        Period {
            id: 9,
            name: "2025-2".to_string(),
            start_date: "2025-04-07".to_string(),
            end_date: "2025-06-27".to_string(),
        }
    }

    #[test]
    fn test_create_form_defaults_to_enrollments_period() {
        let ctx = DescriptorContext::new(Operation::Create).with_periods(None, Some(enrollments_period()));
        let d = descriptor(&ctx);

        assert_eq!(d.field("period_id").unwrap().default, Some(json!(9)));
        assert_eq!(d.field("start_date").unwrap().default, Some(json!("2025-04-07")));
        assert_eq!(d.field("end_date").unwrap().default, Some(json!("2025-06-27")));
        assert_eq!(
            d.field("campus_id").unwrap().kind,
            FieldKind::Hidden { value: json!(2) }
        );
        assert_eq!(
            d.field("schedulepreset").unwrap().options,
            OptionSource::SchedulePresets
        );
        assert_eq!(d.field("times").unwrap().tab, Some(TAB_SCHEDULE));
    }

    #[test]
    fn test_update_form_has_no_preset() {
        let d = descriptor(&DescriptorContext::new(Operation::Update));
        assert!(d.field("schedulepreset").is_none());
        assert!(d.field("custom-ajax-button").is_none());
        assert!(d.field("times").is_some());
        assert!(d.field("period_id").unwrap().default.is_none());
    }

    #[test]
    fn test_list_is_restricted_to_external_campus() {
        let ctx = DescriptorContext::new(Operation::List).with_external_campus(5);
        let d = descriptor(&ctx);
        assert_eq!(d.base_clauses, vec![Clause::External { campus_id: 5 }]);
        assert!(d.export);
        assert!(!d.column("teacher_id").unwrap().search.is_searchable());
        assert_eq!(
            d.filter("period_id").unwrap().inactive,
            Some(InactiveDefault::DefaultPeriod)
        );
        assert!(d.fields.is_empty());
    }

    #[test]
    fn test_schedule_column_is_limited() {
        let times = (0..20)
            .map(|i| CourseTime {
                id: i,
                course_id: 1,
                day: (i % 7) as i32,
                start: "08:00".to_string(),
                end: "10:00".to_string(),
            })
            .collect();
        let row = ExternalCourseRow {
            id: 1,
            campus_id: 2,
            partner_id: None,
            partner_name: Some("ACME".to_string()),
            rhythm_id: 1,
            rhythm_name: Some("Intensive".to_string()),
            level_id: 1,
            level_name: Some("B1".to_string()),
            teacher_id: None,
            teacher_name: None,
            room_id: None,
            room_name: None,
            period_id: 9,
            name: "ACME B1".to_string(),
            volume: Some(40.0),
            hourly_price: Some(22.5),
            price: 0.0,
            head_count: Some(8),
            new_students: None,
            start_date: "2025-04-07".to_string(),
            end_date: "2025-06-27".to_string(),
            times,
        };
        let d = descriptor(&DescriptorContext::new(Operation::List));
        let rendered = render_rows(&d.columns, &[row]);
        let schedule = &rendered[0].cell("times").unwrap().text;
        assert_eq!(schedule.chars().count(), 153);
        assert!(schedule.ends_with("..."));
        assert_eq!(rendered[0].cell("volume").unwrap().text, "40h");
        assert_eq!(rendered[0].cell("hourly_price").unwrap().text, "$22.50");
        assert_eq!(rendered[0].cell("new_students").unwrap().text, "");
    }
}
