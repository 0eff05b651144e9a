// ==========================================
// 鲜奶订送系统 - 客户会话仓储
// ==========================================
// 职责: 在本地 KV 表中持久化客户会话
// 约定: 记录缺失即"未登录"，写入整条覆盖
// ==========================================

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::session::CustomerSession;
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 会话在 local_kv 表中的键
const SESSION_KEY: &str = "customer_session";

pub struct SessionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SessionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_schema()?;
        Ok(repo)
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
            CREATE TABLE IF NOT EXISTS local_kv (
              key TEXT NOT NULL PRIMARY KEY,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    /// 读取会话，缺失返回 None（未登录）
    pub fn get_session(&self) -> RepositoryResult<Option<CustomerSession>> {
        let conn = self.get_conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM local_kv WHERE key = ?1",
                params![SESSION_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => {
                let session: CustomerSession = serde_json::from_str(&json).map_err(|e| {
                    RepositoryError::ValidationError(format!("会话记录解析失败: {}", e))
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// 写入会话（整条覆盖）
    pub fn set_session(&self, session: &CustomerSession) -> RepositoryResult<()> {
        let json = serde_json::to_string(session)
            .map_err(|e| RepositoryError::InternalError(format!("会话序列化失败: {}", e)))?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO local_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            "#,
            params![SESSION_KEY, json],
        )?;
        Ok(())
    }

    /// 清除会话（登出）
    pub fn clear_session(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM local_kv WHERE key = ?1", params![SESSION_KEY])?;
        Ok(())
    }
}
