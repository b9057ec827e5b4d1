//! 把描述符视图中引用数据表的选项来源展开成静态选项

use crate::admin::{DescriptorView, FieldKind, OptionSource};
use crate::errors::Result;
use crate::storage::Storage;

async fn resolve_source(storage: &dyn Storage, source: &OptionSource) -> Result<OptionSource> {
    match source {
        OptionSource::None | OptionSource::Static(_) | OptionSource::Ajax(_) => Ok(source.clone()),
        other => Ok(OptionSource::Static(storage.list_options(other).await?)),
    }
}

/// 字段（含可重复字段的子字段）与筛选器的选项都会被展开
pub async fn resolve_view(storage: &dyn Storage, mut view: DescriptorView) -> Result<DescriptorView> {
    for field in &mut view.fields {
        field.options = resolve_source(storage, &field.options).await?;
        if let FieldKind::Repeatable { subfields, .. } = &mut field.kind {
            for sub in subfields {
                sub.options = resolve_source(storage, &sub.options).await?;
            }
        }
    }
    for filter in &mut view.filters {
        filter.options = resolve_source(storage, &filter.options).await?;
    }
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::resources::room;
    use crate::admin::{DescriptorContext, Operation};
    use crate::storage::sea_orm_storage::testing::{insert_campus, memory_storage};

    #[tokio::test]
    async fn test_table_options_are_expanded() {
        let storage = memory_storage().await;
        insert_campus(&storage, "Main").await;

        let view = room::descriptor(&DescriptorContext::new(Operation::Create)).view();
        let view = resolve_view(&storage, view).await.unwrap();

        let campus = view.fields.iter().find(|f| f.name == "campus_id").unwrap();
        match &campus.options {
            OptionSource::Static(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].label, "Main");
            }
            other => panic!("unexpected options: {other:?}"),
        }
    }
}
