//! 通用后台面板
//!
//! 每个资源用一个 [`ResourceDescriptor`] 声明列表列、表单字段、筛选器与校验规则，
//! 查询、渲染、导出与校验都由这里的通用代码完成。描述符的构建是
//! `(资源, DescriptorContext) -> ResourceDescriptor` 的纯函数，
//! 只有少数行为（搜索条件、筛选器、按行样式）以具名函数指针的形式挂在描述符上。

pub mod clause;
pub mod context;
pub mod descriptor;
pub mod export;
pub mod form;
pub mod query;
pub mod render;
pub mod repeatable;
pub mod resources;
pub mod validation;

pub use clause::{Clause, ScholarshipFilter, SearchPredicate};
pub use context::{CurrencyAffix, DescriptorContext, ViewContext};
pub use descriptor::{
    Button, ButtonPosition, ButtonStack, Column, ColumnKind, DescriptorView, Element, Field,
    FieldKind, Filter, FilterKind, InactiveDefault, LookupTable, OptionSource, Operation,
    ResourceDescriptor, SearchStrategy, Widget,
};
pub use form::FormInput;
pub use query::{ActiveFilter, ListParams, ListQuery, plan_list};
pub use render::{AdminRow, CellValue, RenderedRow, render_rows};
pub use validation::{FieldErrors, Rule, RuleSet, UniqueTarget};
