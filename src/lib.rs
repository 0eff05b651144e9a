// ==========================================
// 鲜奶订送系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 客户端核心（计划解析 + 本地会话 + 远端数据消费）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 本地数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 远端服务契约层 - 消费接口定义
pub mod backend;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{InvoiceStatus, Shift, StatementFilter};

// 领域实体
pub use domain::{
    AgentAssignment, CustomerSession, DashboardCounts, DayOverride, DeliveryRecord,
    EffectiveDayRow, Invoice, InvoiceTotals, MonthlyStatement, OverrideAction, Payment,
    PaymentOutcome, Product, Schedule, ScheduleLine,
};

// 引擎
pub use engine::ScheduleResolver;

// 存储接口
pub use repository::{MemoryScheduleStore, ScheduleStore, SqliteScheduleStore};

// 远端服务契约
pub use backend::{
    BackendServices, BillingService, CustomerDirectory, DeliveryService, PushGateway,
};

// API
pub use api::{
    BillingApi, CustomerApi, DashboardApi, NotificationApi, OrderApi, ScheduleApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "鲜奶订送系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================
