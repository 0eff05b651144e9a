// ==========================================
// 鲜奶订送系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 远端服务客户端由宿主应用注入（BackendServices），
//       本地存储/引擎/API 在此统一装配
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{
    BillingApi, CustomerApi, DashboardApi, NotificationApi, OrderApi, ScheduleApi,
};
use crate::backend::BackendServices;
use crate::config::config_manager::ConfigManager;
use crate::domain::catalog::builtin_catalog;
use crate::domain::schedule::Schedule;
use crate::engine::resolver::ScheduleResolver;
use crate::repository::schedule_store::ScheduleStore;
use crate::repository::session_repo::SessionRepository;
use crate::repository::sqlite_schedule_store::SqliteScheduleStore;

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 订购计划API
    pub schedule_api: Arc<ScheduleApi>,

    /// 客户会话API
    pub customer_api: Arc<CustomerApi>,

    /// 订单历史API
    pub order_api: Arc<OrderApi>,

    /// 账务API
    pub billing_api: Arc<BillingApi>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 推送注册API
    pub notification_api: Arc<NotificationApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 解析引擎（供宿主直接调用只读操作）
    pub resolver: Arc<ScheduleResolver>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - services: 宿主注入的远端服务客户端集合
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接并应用统一 PRAGMA
    /// 2. 初始化本地仓储（计划存储/会话/配置）并在首次启动时
    ///    写入内置目录的零升数计划
    /// 3. 创建引擎与所有API实例
    pub fn new(db_path: String, services: BackendServices) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let schedule_store = Arc::new(
            SqliteScheduleStore::new(conn.clone())
                .map_err(|e| format!("计划存储初始化失败: {}", e))?,
        );
        let session_repo = Arc::new(
            SessionRepository::new(conn.clone())
                .map_err(|e| format!("会话仓储初始化失败: {}", e))?,
        );
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("配置管理器初始化失败: {}", e))?,
        );

        // 应用界面语言配置
        match config_manager.get_locale() {
            Ok(locale) => crate::i18n::set_locale(&locale),
            Err(e) => tracing::warn!("读取语言配置失败(沿用当前语言): {}", e),
        }

        // ==========================================
        // 初始化引擎层
        // ==========================================
        let catalog = builtin_catalog();

        // 首次启动: 为目录中每个产品写入零升数计划
        let existing = schedule_store
            .schedule()
            .map_err(|e| format!("读取计划失败: {}", e))?;
        if existing.lines.is_empty() {
            schedule_store
                .replace_schedule(&Schedule::zero_for(&catalog))
                .map_err(|e| format!("写入初始计划失败: {}", e))?;
            tracing::info!("已写入初始零升数计划({}个产品)", catalog.len());
        }

        let resolver = Arc::new(ScheduleResolver::new(schedule_store, catalog));

        // ==========================================
        // 创建API实例
        // ==========================================
        let schedule_api = Arc::new(ScheduleApi::new(resolver.clone(), config_manager.clone()));
        let customer_api = Arc::new(CustomerApi::new(session_repo, services.directory.clone()));
        let order_api = Arc::new(OrderApi::new(services.delivery.clone(), customer_api.clone()));
        let billing_api = Arc::new(BillingApi::new(services.billing.clone()));
        let dashboard_api = Arc::new(DashboardApi::new(
            services.delivery.clone(),
            resolver.clone(),
        ));
        let notification_api = Arc::new(NotificationApi::new(
            customer_api.clone(),
            services.push.clone(),
        ));

        tracing::info!("AppState初始化成功");

        Ok(Self {
            db_path,
            schedule_api,
            customer_api,
            order_api,
            billing_api,
            dashboard_api,
            notification_api,
            config_manager,
            resolver,
        })
    }
}

/// 获取默认数据库路径
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("MILK_SUBSCRIPTION_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，后续如果能拿到 data_dir 再覆盖
    let mut path = PathBuf::from("./milk_subscription.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("milk-subscription-dev");
        }
        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("milk-subscription");
        }
        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!("创建数据目录失败(回退当前目录): {}", e);
            path = PathBuf::from(".");
        }
        path = path.join("milk_subscription.db");
    }

    path.to_string_lossy().to_string()
}
