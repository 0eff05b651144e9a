// ==========================================
// 鲜奶订送系统 - 驾驶舱 API
// ==========================================
// 职责: 聚合远端配送统计与本地今日生效订单，供首页展示
// 架构: API 层 → 远端配送服务 + 解析引擎
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::backend::DeliveryService;
use crate::domain::delivery::DashboardCounts;
use crate::domain::schedule::EffectiveDayRow;
use crate::engine::resolver::ScheduleResolver;

// ==========================================
// DashboardOverview - 驾驶舱总览
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub counts: DashboardCounts,           // 今日/近7日应送与已送
    pub today_rows: Vec<EffectiveDayRow>,  // 今日生效订单
    pub today_total_liters: f64,           // 今日合计升数
    pub today_total_amount: f64,           // 今日合计金额
}

pub struct DashboardApi {
    delivery: Arc<dyn DeliveryService>,
    resolver: Arc<ScheduleResolver>,
}

impl DashboardApi {
    pub fn new(delivery: Arc<dyn DeliveryService>, resolver: Arc<ScheduleResolver>) -> Self {
        Self { delivery, resolver }
    }

    /// 驾驶舱总览: 远端统计 + 本地今日生效订单
    pub async fn overview(&self, customer_id: &str) -> ApiResult<DashboardOverview> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户ID不能为空".to_string()));
        }
        let counts = self.delivery.dashboard_counts(customer_id).await?;
        let today_rows = self.today_effective()?;
        let today_total_liters = today_rows.iter().map(|r| r.total_liters()).sum();
        let today_total_amount = today_rows.iter().map(|r| r.amount()).sum();
        Ok(DashboardOverview {
            counts,
            today_rows,
            today_total_liters,
            today_total_amount,
        })
    }

    /// 今日（本地日历日）生效订单
    pub fn today_effective(&self) -> ApiResult<Vec<EffectiveDayRow>> {
        let today = chrono::Local::now().date_naive();
        Ok(self.resolver.resolve_day(today)?)
    }

    /// 今日合计升数（首页角标）
    pub fn today_total_liters(&self) -> ApiResult<f64> {
        Ok(self
            .today_effective()?
            .iter()
            .map(|r| r.total_liters())
            .sum())
    }
}
