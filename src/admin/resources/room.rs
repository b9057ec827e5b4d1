//! 教室

use crate::admin::context::DescriptorContext;
use crate::admin::descriptor::{
    Column, ColumnKind, Field, FieldKind, LookupTable, OptionSource, Operation,
    ResourceDescriptor,
};
use crate::admin::render::CellValue;
use crate::admin::validation::{Rule, RuleSet};
use crate::models::lookups::entities::Room;

pub const ROUTE: &str = "rooms";

pub fn descriptor(ctx: &DescriptorContext) -> ResourceDescriptor<Room> {
    let mut d = ResourceDescriptor::new("room", "rooms", ROUTE);
    d.allow(&[
        Operation::List,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ]);

    d.columns = vec![
        Column::new("campus", "Campus", ColumnKind::Relationship, |r: &Room| {
            CellValue::opt_text(r.campus_name.as_deref())
        }),
        Column::new("name", "Name", ColumnKind::Text, |r: &Room| CellValue::text(&r.name)),
        Column::new("capacity", "Capacity", ColumnKind::Number, |r: &Room| {
            CellValue::opt_integer(r.capacity)
        })
        .not_searchable(),
    ];

    if matches!(ctx.operation, Operation::Create | Operation::Update) {
        d.fields = vec![
            Field::new("campus_id", "Campus", FieldKind::Select)
                .options(OptionSource::Table(LookupTable::Campuses)),
            Field::new("name", "Name", FieldKind::Text),
            Field::new("capacity", "Capacity", FieldKind::Number),
        ];
        d.validation = RuleSet::new()
            .field("campus_id", vec![Rule::Required, Rule::Integer])
            .field("name", vec![Rule::Required, Rule::Max(255.0)])
            .field("capacity", vec![Rule::Nullable, Rule::Integer, Rule::Min(0.0)]);
    }

    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::render::render_rows;

    #[test]
    fn test_room_rendering() {
        let d = descriptor(&DescriptorContext::new(Operation::List));
        let rows = render_rows(
            &d.columns,
            &[Room {
                id: 4,
                campus_id: 1,
                campus_name: Some("Main".to_string()),
                name: "A-101".to_string(),
                capacity: None,
            }],
        );
        assert_eq!(rows[0].id, 4);
        assert_eq!(rows[0].cell("campus").unwrap().text, "Main");
        assert_eq!(rows[0].cell("capacity").unwrap().text, "");
    }
}
