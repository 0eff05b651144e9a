// ==========================================
// 鲜奶订送系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value, scope_id='global')
// ==========================================

use std::error::Error;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use crate::db::open_sqlite_connection;

/// 配置键全集
pub mod config_keys {
    /// 按日覆盖记录的保留天数
    pub const OVERRIDE_RETENTION_DAYS: &str = "override_retention_days";
    /// 界面语言
    pub const LOCALE: &str = "locale";
}

/// 按日覆盖保留天数的默认值
pub const DEFAULT_OVERRIDE_RETENTION_DAYS: u32 = 90;

/// 默认界面语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_schema()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }
        let manager = Self { conn };
        manager.ensure_schema()?;
        Ok(manager)
    }

    fn ensure_schema(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 的配置值（整条覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 按日覆盖记录的保留天数
    ///
    /// 配置缺失或无法解析时回落默认值。
    pub fn get_override_retention_days(&self) -> Result<u32, Box<dyn Error>> {
        let raw = self.get_config_or_default(
            config_keys::OVERRIDE_RETENTION_DAYS,
            &DEFAULT_OVERRIDE_RETENTION_DAYS.to_string(),
        )?;
        Ok(raw
            .trim()
            .parse::<u32>()
            .unwrap_or(DEFAULT_OVERRIDE_RETENTION_DAYS))
    }

    /// 界面语言（默认 zh-CN）
    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::LOCALE, DEFAULT_LOCALE)
    }
}
