// ==========================================
// 鲜奶订送系统 - 远端服务契约层
// ==========================================
// 职责: 定义本侧消费的远端服务接口（客户档案/账务/配送/推送）
// 红线: 本仓库不包含任何传输实现，宿主应用注入具体客户端；
//       测试注入进程内伪实现
// ==========================================

pub mod dto;
pub mod error;

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::billing::{Payment, PaymentOutcome};
use crate::domain::delivery::{AgentAssignment, DashboardCounts};

pub use dto::{DeliveryRowDto, InvoiceDto};
pub use error::{BackendError, BackendResult};

/// 远端客户标识
pub type CustomerId = String;

// ==========================================
// CustomerDirectory - 客户档案服务
// ==========================================
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// 按姓名+电话登录，返回客户ID；查无此人返回 None
    async fn login(&self, name: &str, phone: &str) -> BackendResult<Option<CustomerId>>;

    /// 仅按电话查找客户ID（登录接口无结果时的回退路径）
    async fn find_by_phone(&self, phone: &str) -> BackendResult<Option<CustomerId>>;
}

// ==========================================
// BillingService - 账务服务
// ==========================================
#[async_trait]
pub trait BillingService: Send + Sync {
    /// 查询账单，可选开具日期区间（闭区间）
    async fn list_invoices(
        &self,
        customer_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> BackendResult<Vec<InvoiceDto>>;

    /// 查询全部付款记录
    async fn list_payments(&self, customer_id: &str) -> BackendResult<Vec<Payment>>;

    /// 发起付款
    ///
    /// client_reference 为本侧生成的幂等参考号。
    async fn initiate_payment(
        &self,
        customer_id: &str,
        invoice_id: &str,
        amount: f64,
        client_reference: &str,
    ) -> BackendResult<PaymentOutcome>;
}

// ==========================================
// DeliveryService - 配送/订单历史服务
// ==========================================
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// 查询配送记录，可选日期区间（闭区间）
    async fn list_orders(
        &self,
        customer_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> BackendResult<Vec<DeliveryRowDto>>;

    /// 查询某日（缺省为远端"今日"）的配送明细
    async fn day_details(
        &self,
        customer_id: &str,
        date: Option<NaiveDate>,
    ) -> BackendResult<Vec<DeliveryRowDto>>;

    /// 查询当前配送员指派
    async fn current_assignment(
        &self,
        customer_id: &str,
    ) -> BackendResult<Option<AgentAssignment>>;

    /// 查询驾驶舱统计（今日/近7日应送与已送）
    async fn dashboard_counts(&self, customer_id: &str) -> BackendResult<DashboardCounts>;
}

// ==========================================
// PushGateway - 推送注册服务
// ==========================================
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// 登记设备推送令牌，按 (user_id, role) 覆盖
    async fn register_token(
        &self,
        customer_id: &str,
        role: &str,
        token: &str,
    ) -> BackendResult<()>;
}

// ==========================================
// BackendServices - 远端服务集合
// ==========================================
// 将 4 个服务句柄合并为 1 个结构体参数，简化依赖注入
#[derive(Clone)]
pub struct BackendServices {
    pub directory: Arc<dyn CustomerDirectory>,
    pub billing: Arc<dyn BillingService>,
    pub delivery: Arc<dyn DeliveryService>,
    pub push: Arc<dyn PushGateway>,
}

impl BackendServices {
    pub fn new(
        directory: Arc<dyn CustomerDirectory>,
        billing: Arc<dyn BillingService>,
        delivery: Arc<dyn DeliveryService>,
        push: Arc<dyn PushGateway>,
    ) -> Self {
        Self {
            directory,
            billing,
            delivery,
            push,
        }
    }
}
