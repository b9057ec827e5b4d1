use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 星期名称，0 为周日
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn weekday_name(day: i32) -> Option<&'static str> {
    usize::try_from(day).ok().and_then(|d| WEEKDAYS.get(d).copied())
}

// 学期
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Period {
    pub id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

impl Period {
    /// 日期以 `YYYY-MM-DD` 存储，字符串比较即日期比较
    pub fn contains(&self, date: &str) -> bool {
        self.start_date.as_str() <= date && date <= self.end_date.as_str()
    }
}

/// 课程概要，用于课程视图的权限判断与信息挂件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseSummary {
    pub id: i64,
    pub name: String,
    pub period_id: i64,
    pub period_name: String,
    pub teacher_name: Option<String>,
    /// 任课教师对应的登录账号
    pub teacher_user_id: Option<i64>,
    pub start_date: String,
    pub end_date: String,
    pub enrollment_count: i64,
}

// 上课时间段
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseTime {
    pub id: i64,
    pub course_id: i64,
    pub day: i32,
    pub start: String,
    pub end: String,
}

impl CourseTime {
    pub fn describe(&self) -> String {
        format!(
            "{} {}-{}",
            weekday_name(self.day).unwrap_or("?"),
            self.start,
            self.end
        )
    }
}

/// 校外课程列表行
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct ExternalCourseRow {
    pub id: i64,
    pub campus_id: i64,
    pub partner_id: Option<i64>,
    pub partner_name: Option<String>,
    pub rhythm_id: i64,
    pub rhythm_name: Option<String>,
    pub level_id: i64,
    pub level_name: Option<String>,
    pub teacher_id: Option<i64>,
    pub teacher_name: Option<String>,
    pub room_id: Option<i64>,
    pub room_name: Option<String>,
    pub period_id: i64,
    pub name: String,
    pub volume: Option<f64>,
    pub hourly_price: Option<f64>,
    pub price: f64,
    pub head_count: Option<i32>,
    pub new_students: Option<i32>,
    pub start_date: String,
    pub end_date: String,
    pub times: Vec<CourseTime>,
}

impl ExternalCourseRow {
    /// 课表摘要，如 `Monday 09:00-11:00, Wednesday 09:00-11:00`
    pub fn schedule(&self) -> String {
        self.times
            .iter()
            .map(CourseTime::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// 课表预设
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct SchedulePreset {
    pub id: i64,
    pub name: String,
    /// 时间段数组的 JSON 文本，提交时原样作为 `schedulepreset` 的值
    pub presets: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_contains_bounds() {
        let period = Period {
            id: 1,
            name: "2025-1".to_string(),
            start_date: "2025-01-06".to_string(),
            end_date: "2025-03-28".to_string(),
        };
        assert!(period.contains("2025-01-06"));
        assert!(period.contains("2025-03-28"));
        assert!(!period.contains("2025-03-29"));
    }

    #[test]
    fn test_schedule_summary() {
        let time = |day, start: &str, end: &str| CourseTime {
            id: 0,
            course_id: 1,
            day,
            start: start.to_string(),
            end: end.to_string(),
        };
        let row = ExternalCourseRow {
            id: 1,
            campus_id: 2,
            partner_id: None,
            partner_name: None,
            rhythm_id: 1,
            rhythm_name: None,
            level_id: 1,
            level_name: None,
            teacher_id: None,
            teacher_name: None,
            room_id: None,
            room_name: None,
            period_id: 1,
            name: "Company A".to_string(),
            volume: None,
            hourly_price: None,
            price: 0.0,
            head_count: None,
            new_students: None,
            start_date: "2025-01-06".to_string(),
            end_date: "2025-03-28".to_string(),
            times: vec![time(1, "09:00", "11:00"), time(9, "18:00", "20:00")],
        };
        assert_eq!(row.schedule(), "Monday 09:00-11:00, ? 18:00-20:00");
    }
}
