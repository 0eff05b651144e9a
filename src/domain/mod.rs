// ==========================================
// 鲜奶订送系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod billing;
pub mod catalog;
pub mod delivery;
pub mod schedule;
pub mod session;
pub mod types;

// 重导出核心类型
pub use billing::{Invoice, InvoiceTotals, MonthlyStatement, Payment, PaymentOutcome};
pub use catalog::{builtin_catalog, Product};
pub use delivery::{AgentAssignment, DashboardCounts, DeliveryRecord};
pub use schedule::{
    format_date_key, parse_date_key, DayOverride, EffectiveDayRow, OverrideAction, Schedule,
    ScheduleLine,
};
pub use session::{normalize_phone, CustomerSession};
pub use types::{InvoiceStatus, Shift, StatementFilter};
