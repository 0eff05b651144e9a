// ==========================================
// 鲜奶订送系统 - 演示入口
// ==========================================
// 技术栈: Rust + SQLite
// 说明: 离线演示入口，只使用本地计划解析部分；
//       远端数据消费由宿主应用注入客户端后通过库接口使用
// ==========================================

use std::sync::{Arc, Mutex};

use milk_subscription::app::get_default_db_path;
use milk_subscription::config::ConfigManager;
use milk_subscription::domain::{builtin_catalog, Schedule, Shift};
use milk_subscription::i18n::t;
use milk_subscription::repository::{ScheduleStore, SqliteScheduleStore};
use milk_subscription::ScheduleResolver;

fn main() {
    // 初始化日志系统
    milk_subscription::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", milk_subscription::APP_NAME);
    tracing::info!("系统版本: {}", milk_subscription::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let conn = match milk_subscription::db::open_sqlite_connection(&db_path) {
        Ok(conn) => Arc::new(Mutex::new(conn)),
        Err(e) => {
            tracing::error!("无法打开数据库: {}", e);
            std::process::exit(1);
        }
    };

    // 应用界面语言配置
    match ConfigManager::from_connection(conn.clone()) {
        Ok(config) => match config.get_locale() {
            Ok(locale) => milk_subscription::i18n::set_locale(&locale),
            Err(e) => tracing::warn!("读取语言配置失败(沿用当前语言): {}", e),
        },
        Err(e) => tracing::warn!("配置管理器初始化失败(沿用当前语言): {}", e),
    }

    let store = match SqliteScheduleStore::new(conn) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("计划存储初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = builtin_catalog();

    // 首次启动: 写入零升数初始计划
    match store.schedule() {
        Ok(schedule) if schedule.lines.is_empty() => {
            if let Err(e) = store.replace_schedule(&Schedule::zero_for(&catalog)) {
                tracing::error!("写入初始计划失败: {}", e);
                std::process::exit(1);
            }
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("读取计划失败: {}", e);
            std::process::exit(1);
        }
    }

    let resolver = ScheduleResolver::new(store, catalog);
    let today = chrono::Local::now().date_naive();

    match resolver.resolve_day(today) {
        Ok(rows) => {
            println!();
            println!("{} ({})", t("common.today_order"), today);
            println!("--------------------------------------------------");
            let mut total_liters = 0.0;
            let mut total_amount = 0.0;
            for row in &rows {
                println!(
                    "{:<12} {}: {:>5.1} L  {}: {:>5.1} L",
                    row.product.name,
                    Shift::Morning.label(),
                    row.liters_morning,
                    Shift::Evening.label(),
                    row.liters_evening,
                );
                total_liters += row.total_liters();
                total_amount += row.amount();
            }
            println!("--------------------------------------------------");
            println!(
                "{}: {:.1} L    {}: {:.2}",
                t("common.total_liters"),
                total_liters,
                t("common.total_amount"),
                total_amount,
            );
        }
        Err(e) => {
            tracing::error!("解析今日订单失败: {}", e);
            std::process::exit(1);
        }
    }
}
