// ==========================================
// 鲜奶订送系统 - 订购计划解析引擎
// ==========================================
// 职责: 维护长期计划与按日覆盖状态；计算任意日期的生效订单；
//       支持把某日生效结果复制到另一日期
// 输入: 产品目录 + 注入的 ScheduleStore
// 输出: 生效日视图（EffectiveDayRow 列表，按计划行顺序）
// ==========================================
// 合并规则（按计划行逐一判定）:
// 1) 无覆盖 → 沿用计划升数
// 2) SKIP   → (0, 0)，无视覆盖自带升数
// 3) EXTRA  → 计划值 + 覆盖值（缺省按 0）
// 4) ADJUST → 覆盖值替换计划值，未给出的班次沿用计划值
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;

use crate::domain::catalog::Product;
use crate::domain::schedule::{DayOverride, EffectiveDayRow, OverrideAction, Schedule};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::schedule_store::ScheduleStore;

// ==========================================
// ScheduleResolver - 订购计划解析引擎
// ==========================================
pub struct ScheduleResolver {
    store: Arc<dyn ScheduleStore>,
    catalog: Vec<Product>,
}

impl ScheduleResolver {
    /// 创建解析引擎
    ///
    /// # 参数
    /// - store: 注入的计划/覆盖存储
    /// - catalog: 固定产品目录（顺序稳定）
    pub fn new(store: Arc<dyn ScheduleStore>, catalog: Vec<Product>) -> Self {
        Self { store, catalog }
    }

    /// 产品目录（稳定排序）
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// 读取长期计划（独立副本，修改返回值不影响存储状态）
    pub fn schedule(&self) -> RepositoryResult<Schedule> {
        self.store.schedule()
    }

    /// 整体替换长期计划
    ///
    /// 校验失败返回 ValidationError 且状态保持不变:
    /// - 同一 product_id 出现多行（不做静默合并）
    /// - product_id 不在产品目录中
    /// - 升数为负或非有限值
    #[instrument(skip(self, next), fields(lines = next.lines.len()))]
    pub fn replace_schedule(&self, next: Schedule) -> RepositoryResult<()> {
        self.validate_schedule(&next)?;
        self.store.replace_schedule(&next)
    }

    /// 计算指定日期的生效订单
    ///
    /// 结果每计划行一条，保持计划行顺序；
    /// 两次连续调用且期间无写入时，结果值相等。
    #[instrument(skip(self))]
    pub fn resolve_day(&self, date: NaiveDate) -> RepositoryResult<Vec<EffectiveDayRow>> {
        let schedule = self.store.schedule()?;
        let overrides: HashMap<String, DayOverride> = self
            .store
            .overrides_for(date)?
            .into_iter()
            .map(|r| (r.product_id.clone(), r))
            .collect();

        schedule
            .lines
            .iter()
            .map(|line| {
                let product = self.product_for(&line.product_id)?;
                let (liters_morning, liters_evening) = match overrides.get(&line.product_id) {
                    Some(record) => record
                        .action
                        .apply(line.liters_morning, line.liters_evening),
                    None => (line.liters_morning, line.liters_evening),
                };
                Ok(EffectiveDayRow {
                    product,
                    liters_morning,
                    liters_evening,
                })
            })
            .collect()
    }

    /// 写入按日覆盖
    ///
    /// 按 (日期, 产品) 键整条替换已有记录；
    /// 产品不在目录中的覆盖会被保存但永远不会出现在生效结果里
    /// （解析按计划行迭代），属于约定的静默空操作。
    #[instrument(skip(self, record), fields(product_id = %record.product_id, kind = record.action.kind_db_str()))]
    pub fn set_override(&self, date: NaiveDate, record: DayOverride) -> RepositoryResult<()> {
        Self::validate_action(&record.action)?;
        if self.product_lookup(&record.product_id).is_none() {
            tracing::debug!(
                product_id = %record.product_id,
                "覆盖指向目录外产品，将存储但不参与解析"
            );
        }
        self.store.upsert_override(date, record)
    }

    /// 把 from 日的生效订单复制到 to 日
    ///
    /// 等价于: 对 resolve_day(from) 的每一行，向 to 日写入一条
    /// ADJUST 覆盖（两班次均显式给出）。幂等: 连续两次调用与一次调用
    /// 的 to 日解析结果相同。
    #[instrument(skip(self))]
    pub fn repeat_order(&self, from: NaiveDate, to: NaiveDate) -> RepositoryResult<()> {
        let rows = self.resolve_day(from)?;
        for row in rows {
            self.set_override(
                to,
                DayOverride::new(
                    &row.product.product_id,
                    OverrideAction::Adjust {
                        liters_morning: Some(row.liters_morning),
                        liters_evening: Some(row.liters_evening),
                    },
                ),
            )?;
        }
        Ok(())
    }

    /// 清理早于 cutoff 的覆盖记录
    pub fn prune_overrides_before(&self, cutoff: NaiveDate) -> RepositoryResult<usize> {
        let removed = self.store.prune_overrides_before(cutoff)?;
        if removed > 0 {
            tracing::info!(removed, cutoff = %cutoff, "已清理过期覆盖记录");
        }
        Ok(removed)
    }

    // ==========================================
    // 内部校验
    // ==========================================

    fn product_lookup(&self, product_id: &str) -> Option<&Product> {
        self.catalog.iter().find(|p| p.product_id == product_id)
    }

    fn product_for(&self, product_id: &str) -> RepositoryResult<Product> {
        // 计划行在写入时已对照目录校验，查不到说明状态被绕过本引擎修改
        self.product_lookup(product_id).cloned().ok_or_else(|| {
            RepositoryError::InternalError(format!("计划行引用了目录外产品: {}", product_id))
        })
    }

    fn validate_schedule(&self, next: &Schedule) -> RepositoryResult<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(next.lines.len());
        for line in &next.lines {
            if seen.contains(&line.product_id.as_str()) {
                return Err(RepositoryError::ValidationError(format!(
                    "计划中产品重复: {}",
                    line.product_id
                )));
            }
            seen.push(&line.product_id);

            if self.product_lookup(&line.product_id).is_none() {
                return Err(RepositoryError::ValidationError(format!(
                    "计划引用了目录外产品: {}",
                    line.product_id
                )));
            }
            Self::validate_liters(line.liters_morning)?;
            Self::validate_liters(line.liters_evening)?;
        }
        Ok(())
    }

    fn validate_action(action: &OverrideAction) -> RepositoryResult<()> {
        match action {
            OverrideAction::Skip => Ok(()),
            OverrideAction::Extra {
                liters_morning,
                liters_evening,
            } => {
                Self::validate_liters(*liters_morning)?;
                Self::validate_liters(*liters_evening)
            }
            OverrideAction::Adjust {
                liters_morning,
                liters_evening,
            } => {
                if let Some(m) = liters_morning {
                    Self::validate_liters(*m)?;
                }
                if let Some(e) = liters_evening {
                    Self::validate_liters(*e)?;
                }
                Ok(())
            }
        }
    }

    fn validate_liters(value: f64) -> RepositoryResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(RepositoryError::ValidationError(format!(
                "升数必须为非负有限值: {}",
                value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Product;
    use crate::domain::schedule::ScheduleLine;
    use crate::repository::schedule_store::MemoryScheduleStore;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn test_catalog() -> Vec<Product> {
        vec![
            Product::new("cow", "Cow Milk".to_string(), 50.0),
            Product::new("buffalo", "Buffalo Milk".to_string(), 60.0),
            Product::new("goat", "Goat Milk".to_string(), 80.0),
        ]
    }

    fn resolver_with(lines: Vec<ScheduleLine>) -> ScheduleResolver {
        let store = Arc::new(MemoryScheduleStore::new(Schedule::new(lines)));
        ScheduleResolver::new(store, test_catalog())
    }

    fn rows_as_tuples(rows: &[EffectiveDayRow]) -> Vec<(String, f64, f64)> {
        rows.iter()
            .map(|r| {
                (
                    r.product.product_id.clone(),
                    r.liters_morning,
                    r.liters_evening,
                )
            })
            .collect()
    }

    #[test]
    fn test_resolve_without_override_follows_schedule() {
        let resolver = resolver_with(vec![
            ScheduleLine::new("cow", 2.0, 1.0),
            ScheduleLine::new("buffalo", 0.0, 0.0),
        ]);
        let rows = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(
            rows_as_tuples(&rows),
            vec![
                ("cow".to_string(), 2.0, 1.0),
                ("buffalo".to_string(), 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_skip_zeroes_both_shifts_only_on_that_date() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        resolver
            .set_override(d("2024-05-01"), DayOverride::new("cow", OverrideAction::Skip))
            .unwrap();

        let rows = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(rows_as_tuples(&rows), vec![("cow".to_string(), 0.0, 0.0)]);

        // 相邻日期不受影响
        let rows = resolver.resolve_day(d("2024-05-02")).unwrap();
        assert_eq!(rows_as_tuples(&rows), vec![("cow".to_string(), 2.0, 1.0)]);
    }

    #[test]
    fn test_extra_adds_on_top_of_schedule() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        resolver
            .set_override(
                d("2024-05-01"),
                DayOverride::new(
                    "cow",
                    OverrideAction::Extra {
                        liters_morning: 1.0,
                        liters_evening: 0.0,
                    },
                ),
            )
            .unwrap();
        let rows = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(rows_as_tuples(&rows), vec![("cow".to_string(), 3.0, 1.0)]);
    }

    #[test]
    fn test_adjust_single_shift_leaves_other_on_schedule() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        resolver
            .set_override(
                d("2024-05-01"),
                DayOverride::new(
                    "cow",
                    OverrideAction::Adjust {
                        liters_morning: Some(5.0),
                        liters_evening: None,
                    },
                ),
            )
            .unwrap();
        let rows = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(rows_as_tuples(&rows), vec![("cow".to_string(), 5.0, 1.0)]);
    }

    #[test]
    fn test_set_override_is_idempotent() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        let record = DayOverride::new(
            "cow",
            OverrideAction::Extra {
                liters_morning: 1.0,
                liters_evening: 1.0,
            },
        );
        resolver.set_override(d("2024-05-01"), record.clone()).unwrap();
        let once = resolver.resolve_day(d("2024-05-01")).unwrap();
        resolver.set_override(d("2024-05-01"), record).unwrap();
        let twice = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(once, twice);
        assert_eq!(rows_as_tuples(&once), vec![("cow".to_string(), 3.0, 2.0)]);
    }

    #[test]
    fn test_upsert_overwrites_previous_override() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        resolver
            .set_override(d("2024-05-01"), DayOverride::new("cow", OverrideAction::Skip))
            .unwrap();
        resolver
            .set_override(
                d("2024-05-01"),
                DayOverride::new(
                    "cow",
                    OverrideAction::Extra {
                        liters_morning: 1.0,
                        liters_evening: 0.0,
                    },
                ),
            )
            .unwrap();
        // 先写入的 SKIP 不留任何残余影响
        let rows = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(rows_as_tuples(&rows), vec![("cow".to_string(), 3.0, 1.0)]);
    }

    #[test]
    fn test_repeat_order_replays_effective_day() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        resolver
            .set_override(
                d("2024-05-01"),
                DayOverride::new(
                    "cow",
                    OverrideAction::Extra {
                        liters_morning: 1.0,
                        liters_evening: 0.0,
                    },
                ),
            )
            .unwrap();

        let source = resolver.resolve_day(d("2024-05-01")).unwrap();
        resolver.repeat_order(d("2024-05-01"), d("2024-06-15")).unwrap();
        let target = resolver.resolve_day(d("2024-06-15")).unwrap();
        assert_eq!(rows_as_tuples(&source), rows_as_tuples(&target));
        assert_eq!(rows_as_tuples(&target), vec![("cow".to_string(), 3.0, 1.0)]);
    }

    #[test]
    fn test_repeat_order_is_idempotent() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        resolver.repeat_order(d("2024-05-01"), d("2024-06-15")).unwrap();
        let once = resolver.resolve_day(d("2024-06-15")).unwrap();
        resolver.repeat_order(d("2024-05-01"), d("2024-06-15")).unwrap();
        let twice = resolver.resolve_day(d("2024-06-15")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_repeat_order_freezes_target_against_schedule_change() {
        // 复制产生的是 ADJUST 覆盖，目标日不再跟随计划变化
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        resolver.repeat_order(d("2024-05-01"), d("2024-06-15")).unwrap();
        resolver
            .replace_schedule(Schedule::new(vec![ScheduleLine::new("cow", 9.0, 9.0)]))
            .unwrap();
        let rows = resolver.resolve_day(d("2024-06-15")).unwrap();
        assert_eq!(rows_as_tuples(&rows), vec![("cow".to_string(), 2.0, 1.0)]);
    }

    #[test]
    fn test_unknown_product_override_never_surfaces() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        resolver
            .set_override(
                d("2024-05-01"),
                DayOverride::new("camel", OverrideAction::Skip),
            )
            .unwrap();
        let rows = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(rows_as_tuples(&rows), vec![("cow".to_string(), 2.0, 1.0)]);
    }

    #[test]
    fn test_replace_schedule_rejects_duplicate_lines() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        let err = resolver
            .replace_schedule(Schedule::new(vec![
                ScheduleLine::new("cow", 1.0, 0.0),
                ScheduleLine::new("cow", 3.0, 0.0),
            ]))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
        // 校验失败后状态保持不变
        let rows = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(rows_as_tuples(&rows), vec![("cow".to_string(), 2.0, 1.0)]);
    }

    #[test]
    fn test_replace_schedule_rejects_unknown_product() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        let err = resolver
            .replace_schedule(Schedule::new(vec![ScheduleLine::new("camel", 1.0, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }

    #[test]
    fn test_replace_schedule_rejects_negative_liters() {
        let resolver = resolver_with(vec![]);
        let err = resolver
            .replace_schedule(Schedule::new(vec![ScheduleLine::new("cow", -1.0, 0.0)]))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }

    #[test]
    fn test_set_override_rejects_negative_liters() {
        let resolver = resolver_with(vec![ScheduleLine::new("cow", 2.0, 1.0)]);
        let err = resolver
            .set_override(
                d("2024-05-01"),
                DayOverride::new(
                    "cow",
                    OverrideAction::Extra {
                        liters_morning: -1.0,
                        liters_evening: 0.0,
                    },
                ),
            )
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }

    #[test]
    fn test_resolve_day_repeated_reads_equal() {
        let resolver = resolver_with(vec![
            ScheduleLine::new("cow", 2.0, 1.0),
            ScheduleLine::new("goat", 1.5, 0.0),
        ]);
        let a = resolver.resolve_day(d("2024-05-01")).unwrap();
        let b = resolver.resolve_day(d("2024-05-01")).unwrap();
        assert_eq!(a, b);
    }
}
