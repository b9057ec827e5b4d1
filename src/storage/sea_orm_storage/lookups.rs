//! 学期、下拉选项与唯一性检查

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::admin::{LookupTable, OptionSource, UniqueTarget};
use crate::entity::{
    campuses, courses, enrollment_status_types, grade_type_categories, levels, partners,
    payment_methods, periods, rhythms, rooms, schedule_presets, scholarships, teachers,
};
use crate::errors::{AcademyError, Result};
use crate::models::{
    courses::entities::{Period, SchedulePreset},
    enrollments::entities::{PaymentMethod, Scholarship},
    lookups::entities::OptionItem,
};

use super::SeaOrmStorage;

/// `id => name` 选项，按名称排序
macro_rules! named_options {
    ($storage:expr, $module:ident) => {
        $module::Entity::find()
            .order_by_asc($module::Column::Name)
            .all(&$storage.db)
            .await
            .map_err(|e| {
                AcademyError::database_operation(format!(
                    "查询{}选项失败: {e}",
                    stringify!($module)
                ))
            })?
            .into_iter()
            .map(|m| OptionItem::new(m.id, m.name))
            .collect()
    };
}

impl SeaOrmStorage {
    pub async fn find_period_impl(&self, id: i64) -> Result<Option<Period>> {
        let period = periods::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(period.map(|p| p.into_period()))
    }

    /// 解析学期：给定 id，其次包含 `today` 的学期，最后最近开始的学期
    pub async fn resolve_period_impl(
        &self,
        preferred: Option<i64>,
        today: &str,
    ) -> Result<Option<Period>> {
        if let Some(id) = preferred {
            if let Some(period) = self.find_period_impl(id).await? {
                return Ok(Some(period));
            }
        }

        let current = periods::Entity::find()
            .filter(periods::Column::StartDate.lte(today))
            .filter(periods::Column::EndDate.gte(today))
            .order_by_desc(periods::Column::StartDate)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询当前学期失败: {e}")))?;
        if let Some(period) = current {
            return Ok(Some(period.into_period()));
        }

        let latest = periods::Entity::find()
            .order_by_desc(periods::Column::StartDate)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询学期失败: {e}")))?;

        Ok(latest.map(|p| p.into_period()))
    }

    /// 展开选项来源；`Ajax` 由前端另行加载，这里返回空
    pub async fn list_options_impl(&self, source: &OptionSource) -> Result<Vec<OptionItem>> {
        let items = match source {
            OptionSource::None | OptionSource::Ajax(_) => Vec::new(),
            OptionSource::Static(items) => items.clone(),
            OptionSource::Table(table) => self.table_options(*table).await?,
            OptionSource::CoursesInPeriodByLevel(period_id) => courses::Entity::find()
                .filter(courses::Column::PeriodId.eq(*period_id))
                .order_by_asc(courses::Column::LevelId)
                .order_by_asc(courses::Column::Name)
                .all(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("查询课程选项失败: {e}")))?
                .into_iter()
                .map(|c| OptionItem::new(c.id, c.name))
                .collect(),
            OptionSource::SchedulePresets => self
                .list_schedule_presets_impl()
                .await?
                .into_iter()
                .map(|p| OptionItem::new(p.presets, p.name))
                .collect(),
        };

        Ok(items)
    }

    async fn table_options(&self, table: LookupTable) -> Result<Vec<OptionItem>> {
        let items = match table {
            LookupTable::Campuses => named_options!(self, campuses),
            LookupTable::GradeTypeCategories => named_options!(self, grade_type_categories),
            LookupTable::Levels => named_options!(self, levels),
            LookupTable::Partners => named_options!(self, partners),
            LookupTable::Rooms => named_options!(self, rooms),
            LookupTable::Scholarships => named_options!(self, scholarships),
            LookupTable::Teachers => named_options!(self, teachers),
            LookupTable::Rhythms => rhythms::Entity::find()
                .filter(rhythms::Column::DeletedAt.is_null())
                .order_by_asc(rhythms::Column::Name)
                .all(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("查询课程节奏选项失败: {e}")))?
                .into_iter()
                .map(|r| OptionItem::new(r.id, r.name))
                .collect(),
            LookupTable::Periods => periods::Entity::find()
                .order_by_desc(periods::Column::StartDate)
                .all(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("查询学期选项失败: {e}")))?
                .into_iter()
                .map(|p| OptionItem::new(p.id, p.name))
                .collect(),
            LookupTable::EnrollmentStatuses => enrollment_status_types::Entity::find()
                .order_by_asc(enrollment_status_types::Column::Id)
                .all(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("查询报名状态失败: {e}")))?
                .into_iter()
                .map(|s| OptionItem::new(s.id, s.name))
                .collect(),
        };

        Ok(items)
    }

    /// 唯一性检查，`ignore_id` 为编辑中的记录
    pub async fn value_exists_impl(
        &self,
        target: UniqueTarget,
        value: &str,
        ignore_id: Option<i64>,
    ) -> Result<bool> {
        let count = match target {
            UniqueTarget::RhythmName => {
                let mut select = rhythms::Entity::find().filter(rhythms::Column::Name.eq(value));
                if let Some(id) = ignore_id {
                    select = select.filter(rhythms::Column::Id.ne(id));
                }
                select.count(&self.db).await
            }
            UniqueTarget::GradeTypeCategoryName => {
                let mut select = grade_type_categories::Entity::find()
                    .filter(grade_type_categories::Column::Name.eq(value));
                if let Some(id) = ignore_id {
                    select = select.filter(grade_type_categories::Column::Id.ne(id));
                }
                select.count(&self.db).await
            }
        }
        .map_err(|e| AcademyError::database_operation(format!("唯一性检查失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn list_schedule_presets_impl(&self) -> Result<Vec<SchedulePreset>> {
        let presets = schedule_presets::Entity::find()
            .order_by_asc(schedule_presets::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询课表预设失败: {e}")))?;

        Ok(presets.into_iter().map(|p| p.into_schedule_preset()).collect())
    }

    pub async fn list_scholarships_impl(&self) -> Result<Vec<Scholarship>> {
        let rows = scholarships::Entity::find()
            .order_by_asc(scholarships::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询奖学金失败: {e}")))?;

        Ok(rows.into_iter().map(|s| s.into_scholarship()).collect())
    }

    pub async fn list_payment_methods_impl(&self) -> Result<Vec<PaymentMethod>> {
        let rows = payment_methods::Entity::find()
            .order_by_asc(payment_methods::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询支付方式失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_payment_method()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_resolve_period_prefers_configured_then_today_then_latest() {
        let s = memory_storage().await;
        let old = insert_period(&s, "2024-3", "2024-09-02", "2024-12-13").await;
        let current = insert_period(&s, "2025-1", "2025-01-06", "2025-03-28").await;

        let p = s.resolve_period_impl(Some(old), "2025-02-01").await.unwrap();
        assert_eq!(p.map(|p| p.id), Some(old));

        let p = s.resolve_period_impl(None, "2025-02-01").await.unwrap();
        assert_eq!(p.map(|p| p.id), Some(current));

        // 配置的学期不存在且今天不在任何学期内
        let p = s.resolve_period_impl(Some(999), "2025-06-01").await.unwrap();
        assert_eq!(p.map(|p| p.id), Some(current));
    }

    #[tokio::test]
    async fn test_resolve_period_without_periods() {
        let s = memory_storage().await;
        assert!(s.resolve_period_impl(None, "2025-02-01").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_table_options_hide_trashed_rhythms() {
        let s = memory_storage().await;
        let active = insert_rhythm(&s, "Intensive").await;
        let trashed = insert_rhythm(&s, "Evening").await;
        s.toggle_rhythm_impl(trashed, 1).await.unwrap();

        let items = s
            .list_options_impl(&OptionSource::Table(LookupTable::Rhythms))
            .await
            .unwrap();
        assert_eq!(items, vec![OptionItem::new(active, "Intensive")]);
    }

    #[tokio::test]
    async fn test_enrollment_status_options_are_seeded() {
        let s = memory_storage().await;
        let items = s
            .list_options_impl(&OptionSource::Table(LookupTable::EnrollmentStatuses))
            .await
            .unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0], OptionItem::new(1, "Pending"));
    }

    #[tokio::test]
    async fn test_courses_in_period_ordered_by_level() {
        let s = memory_storage().await;
        let f = course_fixture(&s).await;
        let a1 = insert_level(&s, "A1").await;
        let b1_course = insert_course(&s, &f, "B1 Evening", None).await;
        let a1_course = insert_course(
            &s,
            &CourseFixture {
                level_id: a1,
                ..f
            },
            "A1 Morning",
            None,
        )
        .await;

        let items = s
            .list_options_impl(&OptionSource::CoursesInPeriodByLevel(f.period_id))
            .await
            .unwrap();
        let ids: Vec<String> = items.into_iter().map(|i| i.value).collect();
        // B1 先于 A1 插入，级别 id 更小
        assert_eq!(ids, vec![b1_course.to_string(), a1_course.to_string()]);
    }

    #[tokio::test]
    async fn test_value_exists_ignores_current_record() {
        let s = memory_storage().await;
        let id = insert_rhythm(&s, "Intensive").await;

        assert!(s
            .value_exists_impl(UniqueTarget::RhythmName, "Intensive", None)
            .await
            .unwrap());
        assert!(!s
            .value_exists_impl(UniqueTarget::RhythmName, "Intensive", Some(id))
            .await
            .unwrap());
        assert!(!s
            .value_exists_impl(UniqueTarget::GradeTypeCategoryName, "Oral", None)
            .await
            .unwrap());
    }
}
