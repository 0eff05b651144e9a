// ==========================================
// 鲜奶订送系统 - 账务 API
// ==========================================
// 职责: 当月账单窗口查询、账单汇总、月度对账单、发起付款
// 说明: 账务数据全部来自远端账务服务，本层只做窗口计算与聚合
// ==========================================

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::backend::{BillingService, InvoiceDto};
use crate::domain::billing::{Invoice, InvoiceTotals, MonthlyStatement, PaymentOutcome};
use crate::domain::types::{InvoiceStatus, StatementFilter};
use crate::engine::statement;

pub struct BillingApi {
    billing: Arc<dyn BillingService>,
}

impl BillingApi {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self { billing }
    }

    /// 查询 today 所在自然月的账单，按开具日期倒序
    pub async fn current_month_invoices(
        &self,
        customer_id: &str,
        today: NaiveDate,
    ) -> ApiResult<Vec<Invoice>> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户ID不能为空".to_string()));
        }
        let (first, last) = statement::month_bounds(today.year(), today.month())
            .ok_or_else(|| ApiError::InternalError("月份边界计算失败".to_string()))?;

        let rows = self
            .billing
            .list_invoices(customer_id, Some(first), Some(last))
            .await?;

        let mut invoices: Vec<Invoice> = rows.into_iter().map(Self::normalize_invoice).collect();
        invoices.sort_by(|a, b| b.issue_date.cmp(&a.issue_date));
        Ok(invoices)
    }

    /// 当月最新一张账单（付款页只展示最新账单）
    pub async fn latest_invoice(
        &self,
        customer_id: &str,
        today: NaiveDate,
    ) -> ApiResult<Option<Invoice>> {
        let invoices = self.current_month_invoices(customer_id, today).await?;
        Ok(invoices.into_iter().next())
    }

    /// 账单汇总（合计/已付/应付）
    pub fn invoice_totals(&self, invoices: &[Invoice]) -> InvoiceTotals {
        statement::invoice_totals(invoices)
    }

    /// 月度对账单: 全量账单与付款并发拉取后按月聚合
    pub async fn monthly_statements(
        &self,
        customer_id: &str,
        filter: StatementFilter,
    ) -> ApiResult<Vec<MonthlyStatement>> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户ID不能为空".to_string()));
        }

        let (invoices, payments) = futures::join!(
            self.billing.list_invoices(customer_id, None, None),
            self.billing.list_payments(customer_id),
        );
        let invoices: Vec<Invoice> = invoices?
            .into_iter()
            .map(Self::normalize_invoice)
            .collect();
        let payments = payments?;

        let statements = statement::monthly_statements(&invoices, &payments);
        Ok(statement::filter_statements(statements, filter))
    }

    /// 发起付款
    ///
    /// 金额必须为正有限值；本侧生成 UUID 参考号随请求下发。
    pub async fn pay_invoice(
        &self,
        customer_id: &str,
        invoice_id: &str,
        amount: f64,
    ) -> ApiResult<PaymentOutcome> {
        if customer_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("客户ID不能为空".to_string()));
        }
        if invoice_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("账单ID不能为空".to_string()));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ApiError::ValidationError(format!(
                "付款金额必须为正数: {}",
                amount
            )));
        }

        let reference = Uuid::new_v4().to_string();
        tracing::info!(
            invoice_id,
            amount,
            reference = %reference,
            "发起账单付款"
        );
        let outcome = self
            .billing
            .initiate_payment(customer_id, invoice_id, amount, &reference)
            .await?;
        Ok(outcome)
    }

    fn normalize_invoice(dto: InvoiceDto) -> Invoice {
        Invoice {
            invoice_id: dto.invoice_id,
            invoice_number: dto.invoice_number,
            issue_date: dto.issue_date,
            status: dto
                .status
                .as_deref()
                .map(InvoiceStatus::from_str)
                .unwrap_or(InvoiceStatus::Issued),
            line_totals: dto.line_totals,
            notes: dto.notes,
            pdf_url: dto.pdf_url,
        }
    }
}
