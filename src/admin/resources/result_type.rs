//! 结果类型

use crate::admin::context::DescriptorContext;
use crate::admin::descriptor::{Column, ColumnKind, Field, FieldKind, Operation, ResourceDescriptor};
use crate::admin::render::CellValue;
use crate::admin::validation::{Rule, RuleSet};
use crate::models::lookups::entities::ResultType;

pub const ROUTE: &str = "resulttypes";

pub fn descriptor(ctx: &DescriptorContext) -> ResourceDescriptor<ResultType> {
    let mut d = ResourceDescriptor::new("result type", "result types", ROUTE);
    d.allow(&[
        Operation::List,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ]);

    d.columns = vec![
        Column::new("name", "Name", ColumnKind::Text, |r: &ResultType| {
            CellValue::text(&r.name)
        }),
        Column::new("description", "Description", ColumnKind::Text, |r: &ResultType| {
            CellValue::opt_text(r.description.as_deref())
        }),
    ];

    if matches!(ctx.operation, Operation::Create | Operation::Update) {
        d.fields = vec![
            Field::new("name", "Name", FieldKind::Text),
            Field::new("description", "Description", FieldKind::Textarea),
        ];
        d.validation = RuleSet::new()
            .field("name", vec![Rule::Required, Rule::Min(1.0), Rule::Max(255.0)])
            .field("description", vec![Rule::Nullable]);
    }

    d
}
