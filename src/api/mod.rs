// ==========================================
// 鲜奶订送系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供界面层调用
// ==========================================

pub mod error;
pub mod billing_api;
pub mod customer_api;
pub mod dashboard_api;
pub mod notification_api;
pub mod order_api;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use billing_api::BillingApi;
pub use customer_api::CustomerApi;
pub use dashboard_api::{DashboardApi, DashboardOverview};
pub use notification_api::NotificationApi;
pub use order_api::OrderApi;
pub use schedule_api::{QuickOrderLine, ScheduleApi};
