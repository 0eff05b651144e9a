// ==========================================
// 鲜奶订送系统 - 订购计划 SQLite 存储
// ==========================================
// 职责:
// 1) 持久化长期计划与按日覆盖（ScheduleStore 的落盘实现）
// 2) 整体替换在事务内完成，保证原子性
//
// 说明:
// - standing_schedule.position 保留计划行顺序
// - day_override 以 (override_date, product_id) 为主键，INSERT OR REPLACE 实现整条替换
// ==========================================

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::schedule::{
    format_date_key, DayOverride, OverrideAction, Schedule, ScheduleLine,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::schedule_store::ScheduleStore;

pub struct SqliteScheduleStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteScheduleStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn ensure_schema(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS standing_schedule (
              product_id TEXT NOT NULL PRIMARY KEY,
              liters_morning REAL NOT NULL DEFAULT 0,
              liters_evening REAL NOT NULL DEFAULT 0,
              position INTEGER NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS day_override (
              override_date TEXT NOT NULL,
              product_id TEXT NOT NULL,
              kind TEXT NOT NULL,
              liters_morning REAL,
              liters_evening REAL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (override_date, product_id)
            );

            CREATE INDEX IF NOT EXISTS idx_day_override_date
              ON day_override(override_date);
            "#,
        )?;
        Ok(())
    }

    fn row_to_override(
        product_id: String,
        kind: String,
        liters_morning: Option<f64>,
        liters_evening: Option<f64>,
    ) -> RepositoryResult<DayOverride> {
        let action = OverrideAction::from_parts(&kind, liters_morning, liters_evening)
            .ok_or_else(|| {
                RepositoryError::ValidationError(format!(
                    "未识别的覆盖动作类型: {} (product_id={})",
                    kind, product_id
                ))
            })?;
        Ok(DayOverride { product_id, action })
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn schedule(&self) -> RepositoryResult<Schedule> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT product_id, liters_morning, liters_evening
             FROM standing_schedule ORDER BY position",
        )?;
        let lines = stmt
            .query_map([], |row| {
                Ok(ScheduleLine {
                    product_id: row.get(0)?,
                    liters_morning: row.get(1)?,
                    liters_evening: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Schedule::new(lines))
    }

    fn replace_schedule(&self, next: &Schedule) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM standing_schedule", [])?;
        for (position, line) in next.lines.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO standing_schedule
                  (product_id, liters_morning, liters_evening, position, updated_at)
                VALUES (?1, ?2, ?3, ?4, datetime('now'))
                "#,
                params![
                    &line.product_id,
                    line.liters_morning,
                    line.liters_evening,
                    position as i64,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    fn override_for(
        &self,
        date: NaiveDate,
        product_id: &str,
    ) -> RepositoryResult<Option<DayOverride>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                "SELECT product_id, kind, liters_morning, liters_evening
                 FROM day_override WHERE override_date = ?1 AND product_id = ?2",
                params![format_date_key(date), product_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<f64>>(2)?,
                        row.get::<_, Option<f64>>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((pid, kind, m, e)) => Ok(Some(Self::row_to_override(pid, kind, m, e)?)),
            None => Ok(None),
        }
    }

    fn upsert_override(&self, date: NaiveDate, record: DayOverride) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO day_override
              (override_date, product_id, kind, liters_morning, liters_evening, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
            "#,
            params![
                format_date_key(date),
                &record.product_id,
                record.action.kind_db_str(),
                record.action.stored_liters_morning(),
                record.action.stored_liters_evening(),
            ],
        )?;
        Ok(())
    }

    fn overrides_for(&self, date: NaiveDate) -> RepositoryResult<Vec<DayOverride>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT product_id, kind, liters_morning, liters_evening
             FROM day_override WHERE override_date = ?1 ORDER BY product_id",
        )?;
        let rows = stmt
            .query_map(params![format_date_key(date)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(pid, kind, m, e)| Self::row_to_override(pid, kind, m, e))
            .collect()
    }

    fn prune_overrides_before(&self, cutoff: NaiveDate) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let removed = conn.execute(
            "DELETE FROM day_override WHERE override_date < ?1",
            params![format_date_key(cutoff)],
        )?;
        Ok(removed)
    }
}
