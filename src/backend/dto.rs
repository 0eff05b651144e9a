// ==========================================
// 鲜奶订送系统 - 远端服务数据传输对象
// ==========================================
// 职责: 承载远端返回的原始行，字段口径与远端一致
// 说明: 归一化（班次字符串、账单状态）在 API 层完成
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// DeliveryRowDto - 配送记录原始行
// ==========================================
// shift 为远端原始字符串（历史取值不一），由 API 层归一化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRowDto {
    pub date: NaiveDate,
    pub shift: String,
    #[serde(default)]
    pub liters: f64,
    #[serde(default)]
    pub delivered: bool,
    pub delivered_at: Option<NaiveDateTime>,
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
    pub agent_phone: Option<String>,
}

// ==========================================
// InvoiceDto - 账单原始行
// ==========================================
// status 为远端原始字符串（大小写不一），由 API 层归一化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDto {
    pub invoice_id: String,
    pub invoice_number: String,
    pub issue_date: Option<NaiveDate>,
    pub status: Option<String>,
    #[serde(default)]
    pub line_totals: Vec<f64>,
    pub notes: Option<String>,
    pub pdf_url: Option<String>,
}
