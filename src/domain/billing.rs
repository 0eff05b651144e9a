// ==========================================
// 鲜奶订送系统 - 账务领域模型
// ==========================================
// 职责: 账单、付款、月度对账单的只读视图
// 说明: 账务数据由远端服务生成，本侧只做汇总展示
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::InvoiceStatus;

// ==========================================
// Invoice - 账单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,           // 账单ID
    pub invoice_number: String,       // 账单编号
    pub issue_date: Option<NaiveDate>,// 开具日期
    pub status: InvoiceStatus,        // 状态
    pub line_totals: Vec<f64>,        // 明细行金额
    pub notes: Option<String>,        // 备注
    pub pdf_url: Option<String>,      // 账单文件链接
}

impl Invoice {
    /// 账单总额（明细行金额合计）
    pub fn amount(&self) -> f64 {
        self.line_totals.iter().sum()
    }
}

// ==========================================
// Payment - 付款记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: String,          // 付款ID
    pub amount: f64,                 // 金额
    pub paid_on: Option<NaiveDate>,  // 付款日期
}

// ==========================================
// InvoiceTotals - 账单汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub total: f64, // 合计
    pub paid: f64,  // 已付
    pub due: f64,   // 应付
}

// ==========================================
// MonthlyStatement - 月度对账单
// ==========================================
// 按自然月聚合: purchased 为当月账单合计，paid 为当月付款合计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStatement {
    pub year: i32,      // 年
    pub month: u32,     // 月 (1-12)
    pub purchased: f64, // 当月购买金额
    pub paid: f64,      // 当月付款金额
}

impl MonthlyStatement {
    /// 当月欠款（不为负）
    pub fn due(&self) -> f64 {
        (self.purchased - self.paid).max(0.0)
    }

    /// 月份键，如 "2024-05"
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// 是否已结清
    pub fn is_settled(&self) -> bool {
        self.due() < 1e-6
    }
}

// ==========================================
// PaymentOutcome - 付款发起结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub accepted: bool,          // 远端是否受理
    pub reference: String,       // 客户端参考号
    pub message: Option<String>, // 远端返回的说明
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_amount_sums_line_totals() {
        let inv = Invoice {
            invoice_id: "INV-1".to_string(),
            invoice_number: "2024-0001".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 5, 3),
            status: InvoiceStatus::Issued,
            line_totals: vec![120.0, 60.0, 20.0],
            notes: None,
            pdf_url: None,
        };
        assert_eq!(inv.amount(), 200.0);
    }

    #[test]
    fn test_statement_due_not_negative() {
        let st = MonthlyStatement {
            year: 2024,
            month: 5,
            purchased: 100.0,
            paid: 150.0,
        };
        assert_eq!(st.due(), 0.0);
        assert!(st.is_settled());
        assert_eq!(st.month_key(), "2024-05");
    }
}
