//! 资源描述符

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;
use crate::models::lookups::entities::OptionItem;

use super::clause::{Clause, SearchPredicate};
use super::render::CellValue;
use super::validation::RuleSet;

/// 面板操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    List,
    Show,
    Create,
    Update,
    Delete,
    Export,
    Fetch,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Relationship,
    Select,
    SelectMultiple,
    ModelFunction,
}

/// 单元格外层元素
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Span,
    /// 删除线
    Del,
}

impl Element {
    pub fn as_str(self) -> &'static str {
        match self {
            Element::Span => "span",
            Element::Del => "del",
        }
    }
}

pub enum ElementStrategy<R> {
    Fixed(Element),
    ByRow(fn(&R) -> Element),
}

pub enum ClassStrategy<R> {
    None,
    Fixed(&'static str),
    ByRow(fn(&R) -> String),
}

pub struct Wrapper<R> {
    pub element: ElementStrategy<R>,
    pub class: ClassStrategy<R>,
}

impl<R> Default for Wrapper<R> {
    fn default() -> Self {
        Self {
            element: ElementStrategy::Fixed(Element::Span),
            class: ClassStrategy::None,
        }
    }
}

/// 列的搜索方式
pub enum SearchStrategy {
    /// 按列键模糊匹配
    Column,
    Disabled,
    Custom(fn(&str) -> SearchPredicate),
}

impl SearchStrategy {
    pub fn is_searchable(&self) -> bool {
        !matches!(self, SearchStrategy::Disabled)
    }
}

/// 列表列
pub struct Column<R> {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub limit: Option<usize>,
    pub wrapper: Wrapper<R>,
    pub search: SearchStrategy,
    pub value: fn(&R) -> CellValue,
}

impl<R> Column<R> {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: ColumnKind,
        value: fn(&R) -> CellValue,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            prefix: None,
            suffix: None,
            limit: None,
            wrapper: Wrapper::default(),
            search: SearchStrategy::Column,
            value,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn currency(mut self, affix: &super::CurrencyAffix) -> Self {
        self.prefix = affix.prefix.clone();
        self.suffix = affix.suffix.clone();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn element_by(mut self, f: fn(&R) -> Element) -> Self {
        self.wrapper.element = ElementStrategy::ByRow(f);
        self
    }

    pub fn class_by(mut self, f: fn(&R) -> String) -> Self {
        self.wrapper.class = ClassStrategy::ByRow(f);
        self
    }

    pub fn search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    pub fn not_searchable(self) -> Self {
        self.search(SearchStrategy::Disabled)
    }

    fn view(&self) -> ColumnView {
        ColumnView {
            key: self.key,
            label: self.label,
            kind: self.kind,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            limit: self.limit,
            searchable: self.search.is_searchable(),
        }
    }
}

/// 可选项来源
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "items", rename_all = "snake_case")]
pub enum OptionSource {
    None,
    Static(Vec<OptionItem>),
    Table(LookupTable),
    /// 指定学期内的课程，按级别排序
    CoursesInPeriodByLevel(i64),
    SchedulePresets,
    /// 由前端通过 fetch 接口按需加载
    Ajax(&'static str),
}

impl OptionSource {
    pub fn from_pairs<V: ToString>(pairs: &[(V, &str)]) -> Self {
        OptionSource::Static(
            pairs
                .iter()
                .map(|(value, label)| OptionItem::new(value.to_string(), *label))
                .collect(),
        )
    }
}

/// 可作为选项来源的表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupTable {
    Campuses,
    EnrollmentStatuses,
    GradeTypeCategories,
    Levels,
    Partners,
    Periods,
    Rhythms,
    Rooms,
    Scholarships,
    Teachers,
}

/// 表单字段类型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Date,
    Time,
    Select,
    Select2,
    SelectFromArray,
    Radio,
    Hidden {
        value: Value,
    },
    /// 一对多子结构，提交时为 JSON 数组文本，保存时整体替换
    Repeatable {
        subfields: Vec<Field>,
        init_rows: u32,
    },
    Relationship {
        ajax: bool,
        inline_create: Option<&'static str>,
    },
    View {
        view: &'static str,
    },
}

/// 表单字段
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub options: OptionSource,
    pub allows_null: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Field {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            tab: None,
            prefix: None,
            suffix: None,
            options: OptionSource::None,
            allows_null: false,
            default: None,
        }
    }

    pub fn tab(mut self, tab: &'static str) -> Self {
        self.tab = Some(tab);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn currency(mut self, affix: &super::CurrencyAffix) -> Self {
        self.prefix = affix.prefix.clone();
        self.suffix = affix.suffix.clone();
        self
    }

    pub fn options(mut self, options: OptionSource) -> Self {
        self.options = options;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.allows_null = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Select2,
    Select2Multiple,
}

/// 筛选器未激活时的默认行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InactiveDefault {
    /// 以默认学期的 id 作为筛选值，并把筛选器报告为已激活
    DefaultPeriod,
}

pub type FilterApply = fn(&str) -> Result<Vec<Clause>>;

/// 列表筛选器
pub struct Filter {
    pub name: &'static str,
    pub kind: FilterKind,
    pub label: &'static str,
    pub options: OptionSource,
    pub apply: FilterApply,
    pub inactive: Option<InactiveDefault>,
}

impl Filter {
    pub fn new(
        name: &'static str,
        kind: FilterKind,
        label: &'static str,
        options: OptionSource,
        apply: FilterApply,
    ) -> Self {
        Self {
            name,
            kind,
            label,
            options,
            apply,
            inactive: None,
        }
    }

    pub fn when_inactive(mut self, default: InactiveDefault) -> Self {
        self.inactive = Some(default);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStack {
    Line,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonPosition {
    Beginning,
    End,
}

/// 由前端视图渲染的按钮
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub name: &'static str,
    pub stack: ButtonStack,
    pub view: &'static str,
    pub position: ButtonPosition,
}

impl Button {
    pub fn line(name: &'static str, view: &'static str) -> Self {
        Self {
            name,
            stack: ButtonStack::Line,
            view,
            position: ButtonPosition::End,
        }
    }

    pub fn top(name: &'static str, view: &'static str) -> Self {
        Self {
            name,
            stack: ButtonStack::Top,
            view,
            position: ButtonPosition::End,
        }
    }
}

/// 列表页上方的挂件，数据由服务层填充
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    /// 待付款报名的余额合计
    PendingBalance,
    /// 当前课程信息
    CourseInfo,
}

/// 一个资源在某个上下文下的完整声明
pub struct ResourceDescriptor<R> {
    pub entity_name: &'static str,
    pub entity_name_plural: &'static str,
    pub route: &'static str,
    pub operations: Vec<Operation>,
    /// 始终生效的查询条件
    pub base_clauses: Vec<Clause>,
    pub columns: Vec<Column<R>>,
    pub fields: Vec<Field>,
    pub filters: Vec<Filter>,
    pub buttons: Vec<Button>,
    pub widgets: Vec<Widget>,
    pub validation: RuleSet,
    pub export: bool,
}

impl<R> ResourceDescriptor<R> {
    pub fn new(
        entity_name: &'static str,
        entity_name_plural: &'static str,
        route: &'static str,
    ) -> Self {
        Self {
            entity_name,
            entity_name_plural,
            route,
            operations: Vec::new(),
            base_clauses: Vec::new(),
            columns: Vec::new(),
            fields: Vec::new(),
            filters: Vec::new(),
            buttons: Vec::new(),
            widgets: Vec::new(),
            validation: RuleSet::default(),
            export: false,
        }
    }

    pub fn allows(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    pub fn allow(&mut self, operations: &[Operation]) {
        for op in operations {
            if !self.operations.contains(op) {
                self.operations.push(*op);
            }
        }
    }

    pub fn enable_export(&mut self) {
        self.export = true;
        self.allow(&[Operation::Export]);
    }

    pub fn column(&self, key: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn filter(&self, name: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.name == name)
    }

    /// 可序列化的描述符视图（不含函数），选项按原样给出
    pub fn view(&self) -> DescriptorView {
        DescriptorView {
            entity_name: self.entity_name,
            entity_name_plural: self.entity_name_plural,
            route: self.route,
            operations: self.operations.clone(),
            columns: self.columns.iter().map(Column::view).collect(),
            fields: self.fields.clone(),
            filters: self
                .filters
                .iter()
                .map(|f| FilterView {
                    name: f.name,
                    kind: f.kind,
                    label: f.label,
                    options: f.options.clone(),
                    inactive: f.inactive,
                })
                .collect(),
            buttons: self.buttons.clone(),
            widgets: self.widgets.clone(),
            rules: self.validation.describe(),
            export: self.export,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnView {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub limit: Option<usize>,
    pub searchable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterView {
    pub name: &'static str,
    pub kind: FilterKind,
    pub label: &'static str,
    pub options: OptionSource,
    pub inactive: Option<InactiveDefault>,
}

/// 描述符视图，供前端构建页面
#[derive(Debug, Clone, Serialize)]
pub struct DescriptorView {
    pub entity_name: &'static str,
    pub entity_name_plural: &'static str,
    pub route: &'static str,
    pub operations: Vec<Operation>,
    pub columns: Vec<ColumnView>,
    pub fields: Vec<Field>,
    pub filters: Vec<FilterView>,
    pub buttons: Vec<Button>,
    pub widgets: Vec<Widget>,
    pub rules: std::collections::BTreeMap<&'static str, Vec<String>>,
    pub export: bool,
}
