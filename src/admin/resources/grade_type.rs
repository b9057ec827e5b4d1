//! 成绩类型

use crate::admin::context::DescriptorContext;
use crate::admin::descriptor::{
    Column, ColumnKind, Field, FieldKind, OptionSource, Operation, ResourceDescriptor,
};
use crate::admin::render::CellValue;
use crate::admin::validation::{Rule, RuleSet, UniqueTarget};
use crate::models::lookups::entities::GradeType;

pub const ROUTE: &str = "gradetypes";

pub fn descriptor(ctx: &DescriptorContext) -> ResourceDescriptor<GradeType> {
    let mut d = ResourceDescriptor::new("grade type", "grade types", ROUTE);
    d.allow(&[
        Operation::List,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Fetch,
    ]);

    d.columns = vec![
        Column::new("name", "Name", ColumnKind::Text, |r: &GradeType| {
            CellValue::text(&r.name)
        }),
        Column::new("total", "Total", ColumnKind::Number, |r: &GradeType| {
            CellValue::Number(r.total)
        })
        .not_searchable(),
        Column::new("grade_type_category_id", "Category", ColumnKind::Select, |r: &GradeType| {
            CellValue::opt_text(r.category_name.as_deref())
        }),
    ];

    if matches!(ctx.operation, Operation::Create | Operation::Update) {
        d.fields = vec![
            Field::new("name", "Name", FieldKind::Text),
            Field::new("total", "Total", FieldKind::Text),
            Field::new(
                "category_id",
                "Category",
                FieldKind::Relationship {
                    ajax: true,
                    inline_create: Some("gradetypecategory"),
                },
            )
            .options(OptionSource::Ajax("fetch/category")),
        ];
        d.validation = rules();
    }

    d
}

pub fn rules() -> RuleSet {
    RuleSet::new()
        .field("name", vec![Rule::Required, Rule::Min(1.0), Rule::Max(255.0)])
        .field("total", vec![Rule::Required, Rule::Numeric, Rule::Min(0.0)])
        .field("category_id", vec![Rule::Required, Rule::Integer])
}

/// 行内创建成绩类型分类时使用的规则
pub fn category_rules() -> RuleSet {
    RuleSet::new().field(
        "name",
        vec![
            Rule::Required,
            Rule::Min(1.0),
            Rule::Max(255.0),
            Rule::Unique(UniqueTarget::GradeTypeCategoryName),
        ],
    )
}
