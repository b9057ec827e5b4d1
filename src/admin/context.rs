use crate::config::AppConfig;
use crate::models::courses::entities::{CourseSummary, Period};

use super::descriptor::Operation;

pub use crate::models::auth::entities::AuthContext;

/// 资源的视图上下文
#[derive(Debug, Clone)]
pub enum ViewContext {
    Global,
    /// 限定在某一课程之下（`?course_id=`）
    CourseScoped(CourseSummary),
}

impl ViewContext {
    pub fn course(&self) -> Option<&CourseSummary> {
        match self {
            ViewContext::Global => None,
            ViewContext::CourseScoped(course) => Some(course),
        }
    }
}

/// 金额前后缀
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyAffix {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl CurrencyAffix {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            prefix: config.currency_prefix(),
            suffix: config.currency_suffix(),
        }
    }
}

/// 构建描述符所需的全部外部输入
#[derive(Debug, Clone)]
pub struct DescriptorContext {
    pub view: ViewContext,
    pub operation: Operation,
    pub currency: CurrencyAffix,
    pub scheduled_payments: bool,
    pub default_period: Option<Period>,
    pub enrollments_period: Option<Period>,
    /// 编辑中记录所属学期（报名编辑时限定可选课程）
    pub current_entry_period: Option<i64>,
    pub external_campus_id: i64,
    pub is_admin: bool,
}

impl DescriptorContext {
    pub fn new(operation: Operation) -> Self {
        Self {
            view: ViewContext::Global,
            operation,
            currency: CurrencyAffix::default(),
            scheduled_payments: false,
            default_period: None,
            enrollments_period: None,
            current_entry_period: None,
            external_campus_id: 2,
            is_admin: false,
        }
    }

    pub fn with_view(mut self, view: ViewContext) -> Self {
        self.view = view;
        self
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_currency(mut self, currency: CurrencyAffix) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_scheduled_payments(mut self, enabled: bool) -> Self {
        self.scheduled_payments = enabled;
        self
    }

    pub fn with_periods(mut self, default: Option<Period>, enrollments: Option<Period>) -> Self {
        self.default_period = default;
        self.enrollments_period = enrollments;
        self
    }

    pub fn with_entry_period(mut self, period_id: Option<i64>) -> Self {
        self.current_entry_period = period_id;
        self
    }

    pub fn with_external_campus(mut self, campus_id: i64) -> Self {
        self.external_campus_id = campus_id;
        self
    }

    pub fn is_course_scoped(&self) -> bool {
        matches!(self.view, ViewContext::CourseScoped(_))
    }
}
