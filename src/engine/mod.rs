// ==========================================
// 鲜奶订送系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 状态读写全部经由注入的存储接口
// ==========================================

pub mod resolver;
pub mod statement;

// 重导出核心引擎
pub use resolver::ScheduleResolver;
pub use statement::{filter_statements, invoice_totals, month_bounds, monthly_statements};
