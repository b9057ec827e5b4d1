//! 课程节奏
//!
//! 节奏不删除，只能停用（软删除）与恢复，列表同时显示已停用的记录。

use crate::admin::clause::Clause;
use crate::admin::context::DescriptorContext;
use crate::admin::descriptor::{
    Button, Column, ColumnKind, Field, FieldKind, Operation, ResourceDescriptor,
};
use crate::admin::render::CellValue;
use crate::admin::validation::{Rule, RuleSet, UniqueTarget};
use crate::models::lookups::entities::Rhythm;

pub const ROUTE: &str = "rhythms";

pub fn descriptor(ctx: &DescriptorContext) -> ResourceDescriptor<Rhythm> {
    let mut d = ResourceDescriptor::new("rhythm", "rhythms", ROUTE);
    d.allow(&[
        Operation::List,
        Operation::Create,
        Operation::Update,
        Operation::Toggle,
    ]);
    d.base_clauses.push(Clause::WithTrashed);
    d.buttons.push(Button::line("toggle", "toggle"));

    d.columns = vec![
        Column::new("name", "Name", ColumnKind::Text, |r: &Rhythm| {
            CellValue::text(&r.name)
        }),
        Column::new("default_volume", "Default volume", ColumnKind::Number, |r: &Rhythm| {
            CellValue::Number(r.default_volume)
        })
        .not_searchable(),
        Column::new("product_code", "Product code", ColumnKind::Text, |r: &Rhythm| {
            CellValue::opt_text(r.product_code.as_deref())
        }),
        Column::new("lms_id", "LMS code", ColumnKind::Text, |r: &Rhythm| {
            CellValue::opt_text(r.lms_id.as_deref())
        }),
    ];

    if matches!(ctx.operation, Operation::Create | Operation::Update) {
        d.fields = vec![
            Field::new("name", "Name", FieldKind::Text),
            Field::new("default_volume", "Default volume", FieldKind::Text),
            Field::new("product_code", "Product Code", FieldKind::Text),
            Field::new("lms_id", "LMS code", FieldKind::Text),
        ];
        d.validation = rules();
    }

    d
}

pub fn rules() -> RuleSet {
    RuleSet::new()
        .field(
            "name",
            vec![
                Rule::Required,
                Rule::Min(1.0),
                Rule::Max(40.0),
                Rule::Unique(UniqueTarget::RhythmName),
            ],
        )
        .field("default_volume", vec![Rule::Required, Rule::Numeric])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rhythms_cannot_be_deleted() {
        let d = descriptor(&DescriptorContext::new(Operation::List));
        assert!(!d.allows(Operation::Delete));
        assert!(d.allows(Operation::Toggle));
        assert_eq!(d.base_clauses, vec![Clause::WithTrashed]);
        assert_eq!(d.buttons[0].name, "toggle");
    }

    #[test]
    fn test_name_rules() {
        let rules = rules();
        let name = rules.rules_for("name").unwrap();
        assert!(name.contains(&Rule::Unique(UniqueTarget::RhythmName)));
        assert!(name.contains(&Rule::Max(40.0)));
        assert!(rules.is_required("default_volume"));
    }
}
