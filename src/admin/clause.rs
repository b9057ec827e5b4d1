/// 列表查询条件
///
/// 资源描述符与筛选器只产出这些类型化的条件，由存储层按实体翻译成 SQL。
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `column = value`
    Where { column: &'static str, value: i64 },
    /// `column IN (values)`，即多个值之间为 OR
    AnyOf {
        column: &'static str,
        values: Vec<i64>,
    },
    /// 所属课程在指定学期
    InPeriod(i64),
    /// 属于指定课程
    InCourse(i64),
    HasScholarship(ScholarshipFilter),
    /// 任一搜索条件命中即可
    Search(Vec<SearchPredicate>),
    /// 校外课程（位于指定校区）
    External { campus_id: i64 },
    /// 包含已软删除的记录
    WithTrashed,
    /// 待付款的报名
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScholarshipFilter {
    Any,
    Id(i64),
}

/// 搜索条件
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPredicate {
    /// 列自身的模糊匹配（整数列为精确匹配）
    Column { key: &'static str, term: String },
    /// 沿关联路径匹配关联表的属性，如 `student.user` 的 `lastname`
    Related {
        path: &'static str,
        attribute: &'static str,
        term: String,
    },
}
