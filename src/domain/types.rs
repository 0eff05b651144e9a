// ==========================================
// 鲜奶订送系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 配送班次 (Shift)
// ==========================================
// 每个配送日分早/晚两个班次
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    Morning, // 早班
    Evening, // 晚班
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Morning => write!(f, "MORNING"),
            Shift::Evening => write!(f, "EVENING"),
        }
    }
}

impl Shift {
    /// 从后端原始班次字符串归一化
    ///
    /// 规则（与配送记录接口的历史取值对齐）:
    /// - 包含 "even" 或 "pm" → Evening
    /// - 其余（含空值）→ Morning
    pub fn normalize(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("even") || lower.contains("pm") {
            Shift::Evening
        } else {
            Shift::Morning
        }
    }

    /// 严格解析（仅识别标准存储值）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MORNING" => Some(Shift::Morning),
            "EVENING" => Some(Shift::Evening),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Shift::Morning => "MORNING",
            Shift::Evening => "EVENING",
        }
    }

    /// 本地化显示名
    pub fn label(&self) -> String {
        match self {
            Shift::Morning => crate::i18n::t("shift.morning"),
            Shift::Evening => crate::i18n::t("shift.evening"),
        }
    }
}

// ==========================================
// 账单状态 (Invoice Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Issued,    // 已开具
    Paid,      // 已支付
    Cancelled, // 已作废
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Issued => write!(f, "ISSUED"),
            InvoiceStatus::Paid => write!(f, "PAID"),
            InvoiceStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl InvoiceStatus {
    /// 从后端状态字符串解析
    ///
    /// 后端历史数据大小写不一，这里统一忽略大小写；未识别值按已开具处理。
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "PAID" => InvoiceStatus::Paid,
            "CANCELLED" | "VOID" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Issued,
        }
    }

    pub fn is_paid(&self) -> bool {
        *self == InvoiceStatus::Paid
    }
}

// ==========================================
// 月度对账单筛选 (Statement Filter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementFilter {
    All,  // 全部月份
    Paid, // 已结清月份
    Due,  // 有欠款月份
}

impl fmt::Display for StatementFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementFilter::All => write!(f, "ALL"),
            StatementFilter::Paid => write!(f, "PAID"),
            StatementFilter::Due => write!(f, "DUE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_normalize() {
        assert_eq!(Shift::normalize("morning"), Shift::Morning);
        assert_eq!(Shift::normalize("MORNING"), Shift::Morning);
        assert_eq!(Shift::normalize("evening"), Shift::Evening);
        assert_eq!(Shift::normalize("EVENING"), Shift::Evening);
        assert_eq!(Shift::normalize("pm"), Shift::Evening);
        assert_eq!(Shift::normalize("AM"), Shift::Morning);
        // 空值与未知值回落到早班
        assert_eq!(Shift::normalize(""), Shift::Morning);
        assert_eq!(Shift::normalize("noon"), Shift::Morning);
    }

    #[test]
    fn test_invoice_status_parse() {
        assert_eq!(InvoiceStatus::from_str("paid"), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::from_str("PAID"), InvoiceStatus::Paid);
        assert_eq!(InvoiceStatus::from_str("void"), InvoiceStatus::Cancelled);
        assert_eq!(InvoiceStatus::from_str("issued"), InvoiceStatus::Issued);
        assert_eq!(InvoiceStatus::from_str("whatever"), InvoiceStatus::Issued);
    }
}
