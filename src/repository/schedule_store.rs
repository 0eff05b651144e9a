// ==========================================
// 鲜奶订送系统 - 订购计划存储接口
// ==========================================
// 职责:
// 1) 定义长期计划与按日覆盖的注入式存储接口
// 2) 提供默认的进程内实现（测试与演示场景）
//
// 说明:
// - 覆盖记录按 (日期键, product_id) 唯一，写入为整条替换（last-write-wins）
// - 长期计划为整体替换，不做按行补丁
// - 保留策略由上层决定，存储只提供按日期清理的原语
// ==========================================

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::domain::schedule::{DayOverride, Schedule};
use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// ScheduleStore - 注入式存储接口
// ==========================================
pub trait ScheduleStore: Send + Sync {
    /// 读取长期计划（返回独立副本）
    fn schedule(&self) -> RepositoryResult<Schedule>;

    /// 整体替换长期计划（原子操作，旧计划丢弃）
    fn replace_schedule(&self, next: &Schedule) -> RepositoryResult<()>;

    /// 查询某日某产品的覆盖记录
    fn override_for(
        &self,
        date: NaiveDate,
        product_id: &str,
    ) -> RepositoryResult<Option<DayOverride>>;

    /// 写入覆盖记录，按 (日期, 产品) 键整条替换
    fn upsert_override(&self, date: NaiveDate, record: DayOverride) -> RepositoryResult<()>;

    /// 列出某日全部覆盖记录
    fn overrides_for(&self, date: NaiveDate) -> RepositoryResult<Vec<DayOverride>>;

    /// 清理早于 cutoff 的覆盖记录，返回删除条数
    fn prune_overrides_before(&self, cutoff: NaiveDate) -> RepositoryResult<usize>;
}

// ==========================================
// MemoryScheduleStore - 进程内存储实现
// ==========================================
// 默认实现: 无 I/O、无失败路径（锁中毒除外）
struct MemoryState {
    schedule: Schedule,
    // BTreeMap 保证同日覆盖按 product_id 稳定排序
    overrides: BTreeMap<(NaiveDate, String), DayOverride>,
}

pub struct MemoryScheduleStore {
    inner: Mutex<MemoryState>,
}

impl MemoryScheduleStore {
    /// 以给定计划初始化
    pub fn new(initial: Schedule) -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                schedule: initial,
                overrides: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, MemoryState>> {
        self.inner
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl Default for MemoryScheduleStore {
    fn default() -> Self {
        Self::new(Schedule::default())
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn schedule(&self) -> RepositoryResult<Schedule> {
        Ok(self.lock()?.schedule.clone())
    }

    fn replace_schedule(&self, next: &Schedule) -> RepositoryResult<()> {
        self.lock()?.schedule = next.clone();
        Ok(())
    }

    fn override_for(
        &self,
        date: NaiveDate,
        product_id: &str,
    ) -> RepositoryResult<Option<DayOverride>> {
        let state = self.lock()?;
        Ok(state
            .overrides
            .get(&(date, product_id.to_string()))
            .cloned())
    }

    fn upsert_override(&self, date: NaiveDate, record: DayOverride) -> RepositoryResult<()> {
        let mut state = self.lock()?;
        state
            .overrides
            .insert((date, record.product_id.clone()), record);
        Ok(())
    }

    fn overrides_for(&self, date: NaiveDate) -> RepositoryResult<Vec<DayOverride>> {
        let state = self.lock()?;
        Ok(state
            .overrides
            .range((date, String::new())..)
            .take_while(|((d, _), _)| *d == date)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn prune_overrides_before(&self, cutoff: NaiveDate) -> RepositoryResult<usize> {
        let mut state = self.lock()?;
        let before = state.overrides.len();
        state.overrides.retain(|(d, _), _| *d >= cutoff);
        Ok(before - state.overrides.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::{OverrideAction, ScheduleLine};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_replace_discards_previous_schedule() {
        let store = MemoryScheduleStore::new(Schedule::new(vec![ScheduleLine::new(
            "cow", 2.0, 1.0,
        )]));
        store
            .replace_schedule(&Schedule::new(vec![ScheduleLine::new("goat", 1.0, 0.0)]))
            .unwrap();
        let schedule = store.schedule().unwrap();
        assert_eq!(schedule.lines.len(), 1);
        assert_eq!(schedule.lines[0].product_id, "goat");
    }

    #[test]
    fn test_schedule_read_is_isolated_copy() {
        let store = MemoryScheduleStore::new(Schedule::new(vec![ScheduleLine::new(
            "cow", 2.0, 1.0,
        )]));
        let mut copy = store.schedule().unwrap();
        copy.lines[0].liters_morning = 99.0;
        // 修改返回值不得影响存储状态
        assert_eq!(store.schedule().unwrap().lines[0].liters_morning, 2.0);
    }

    #[test]
    fn test_upsert_override_last_write_wins() {
        let store = MemoryScheduleStore::default();
        let date = d("2024-05-01");
        store
            .upsert_override(date, DayOverride::new("cow", OverrideAction::Skip))
            .unwrap();
        store
            .upsert_override(
                date,
                DayOverride::new(
                    "cow",
                    OverrideAction::Extra {
                        liters_morning: 1.0,
                        liters_evening: 0.0,
                    },
                ),
            )
            .unwrap();
        let records = store.overrides_for(date).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action.kind_db_str(), "EXTRA");
    }

    #[test]
    fn test_overrides_scoped_to_date() {
        let store = MemoryScheduleStore::default();
        store
            .upsert_override(d("2024-05-01"), DayOverride::new("cow", OverrideAction::Skip))
            .unwrap();
        store
            .upsert_override(d("2024-05-02"), DayOverride::new("cow", OverrideAction::Skip))
            .unwrap();
        assert_eq!(store.overrides_for(d("2024-05-01")).unwrap().len(), 1);
        assert_eq!(store.overrides_for(d("2024-05-03")).unwrap().len(), 0);
    }

    #[test]
    fn test_prune_overrides_before() {
        let store = MemoryScheduleStore::default();
        store
            .upsert_override(d("2024-04-01"), DayOverride::new("cow", OverrideAction::Skip))
            .unwrap();
        store
            .upsert_override(d("2024-05-01"), DayOverride::new("cow", OverrideAction::Skip))
            .unwrap();
        let removed = store.prune_overrides_before(d("2024-05-01")).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.overrides_for(d("2024-04-01")).unwrap().len(), 0);
        assert_eq!(store.overrides_for(d("2024-05-01")).unwrap().len(), 1);
    }
}
