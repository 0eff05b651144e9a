// ==========================================
// 鲜奶订送系统 - 订单历史 API
// ==========================================
// 职责: 查询配送记录/当前指派，归一化远端原始行
// 说明: 班次字符串历史取值不一，这里统一归一化为 Shift 枚举
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::customer_api::CustomerApi;
use crate::api::error::{ApiError, ApiResult};
use crate::backend::{DeliveryRowDto, DeliveryService};
use crate::domain::delivery::{AgentAssignment, DeliveryRecord};
use crate::domain::schedule::parse_date_key;
use crate::domain::types::Shift;

pub struct OrderApi {
    delivery: Arc<dyn DeliveryService>,
    customer: Arc<CustomerApi>,
}

impl OrderApi {
    pub fn new(delivery: Arc<dyn DeliveryService>, customer: Arc<CustomerApi>) -> Self {
        Self { delivery, customer }
    }

    /// 查询配送记录，可选日期区间（YYYY-MM-DD 闭区间）
    pub async fn list_my_orders(
        &self,
        customer_id: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> ApiResult<Vec<DeliveryRecord>> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户ID不能为空".to_string()));
        }
        let from = Self::parse_optional_date(from)?;
        let to = Self::parse_optional_date(to)?;

        let rows = self.delivery.list_orders(customer_id, from, to).await?;
        Ok(rows.into_iter().map(Self::normalize_row).collect())
    }

    /// 查询某日配送明细（date 缺省为远端"今日"）
    pub async fn day_details(
        &self,
        customer_id: &str,
        date: Option<&str>,
    ) -> ApiResult<Vec<DeliveryRecord>> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户ID不能为空".to_string()));
        }
        let date = Self::parse_optional_date(date)?;
        let rows = self.delivery.day_details(customer_id, date).await?;
        Ok(rows.into_iter().map(Self::normalize_row).collect())
    }

    /// 按当前会话查询配送明细
    ///
    /// 未登录或客户解析无结果时返回空列表（与既有客户端行为一致），
    /// 不作为错误处理。
    pub async fn deliveries_for_session(
        &self,
        date: Option<&str>,
    ) -> ApiResult<Vec<DeliveryRecord>> {
        let Some(customer_id) = self.customer.current_customer_id().await? else {
            tracing::debug!("当前无会话或客户解析无结果，返回空配送列表");
            return Ok(Vec::new());
        };
        self.day_details(&customer_id, date).await
    }

    /// 查询当前配送员指派
    pub async fn current_assignment(
        &self,
        customer_id: &str,
    ) -> ApiResult<Option<AgentAssignment>> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户ID不能为空".to_string()));
        }
        Ok(self.delivery.current_assignment(customer_id).await?)
    }

    fn normalize_row(row: DeliveryRowDto) -> DeliveryRecord {
        DeliveryRecord {
            date: row.date,
            shift: Shift::normalize(&row.shift),
            liters: row.liters,
            delivered: row.delivered,
            delivered_at: row.delivered_at,
            agent_id: row.agent_id,
            agent_name: row.agent_name,
            agent_phone: row.agent_phone,
        }
    }

    fn parse_optional_date(raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
        match raw {
            None => Ok(None),
            Some(s) => parse_date_key(s)
                .map(Some)
                .ok_or_else(|| ApiError::ValidationError(format!("无法解析日期: {}", s))),
        }
    }
}
