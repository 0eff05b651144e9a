// ==========================================
// 鲜奶订送系统 - 月度对账聚合
// ==========================================
// 职责: 对远端返回的账单/付款行做纯函数聚合
// 输入: Invoice / Payment 列表
// 输出: 账单汇总与按月对账单
// ==========================================

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::domain::billing::{Invoice, InvoiceTotals, MonthlyStatement, Payment};
use crate::domain::types::StatementFilter;

/// 自然月边界 (首日, 末日)
///
/// 月份非法时返回 None。
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))?;
    Some((first, last))
}

/// 账单汇总: 合计 / 已付 / 应付
///
/// 已付口径与账单状态对齐（status=PAID 的账单金额计入已付）。
pub fn invoice_totals(invoices: &[Invoice]) -> InvoiceTotals {
    let total: f64 = invoices.iter().map(|inv| inv.amount()).sum();
    let paid: f64 = invoices
        .iter()
        .filter(|inv| inv.status.is_paid())
        .map(|inv| inv.amount())
        .sum();
    InvoiceTotals {
        total,
        paid,
        due: total - paid,
    }
}

/// 按自然月聚合账单（购买）与付款（已付）
///
/// 无开具/付款日期的行不参与聚合；结果按月份倒序。
pub fn monthly_statements(invoices: &[Invoice], payments: &[Payment]) -> Vec<MonthlyStatement> {
    // BTreeMap 键 (year, month)，天然有序
    let mut months: BTreeMap<(i32, u32), MonthlyStatement> = BTreeMap::new();

    fn entry<'a>(
        months: &'a mut BTreeMap<(i32, u32), MonthlyStatement>,
        date: NaiveDate,
    ) -> &'a mut MonthlyStatement {
        months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthlyStatement {
                year: date.year(),
                month: date.month(),
                purchased: 0.0,
                paid: 0.0,
            })
    }

    for inv in invoices {
        let Some(date) = inv.issue_date else { continue };
        entry(&mut months, date).purchased += inv.amount();
    }

    for payment in payments {
        let Some(date) = payment.paid_on else { continue };
        entry(&mut months, date).paid += payment.amount;
    }

    months.into_values().rev().collect()
}

/// 按筛选条件过滤月度对账单
pub fn filter_statements(
    statements: Vec<MonthlyStatement>,
    filter: StatementFilter,
) -> Vec<MonthlyStatement> {
    match filter {
        StatementFilter::All => statements,
        StatementFilter::Paid => statements.into_iter().filter(|s| s.is_settled()).collect(),
        StatementFilter::Due => statements.into_iter().filter(|s| !s.is_settled()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::InvoiceStatus;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn invoice(id: &str, date: &str, status: InvoiceStatus, line_totals: Vec<f64>) -> Invoice {
        Invoice {
            invoice_id: id.to_string(),
            invoice_number: format!("N-{}", id),
            issue_date: Some(d(date)),
            status,
            line_totals,
            notes: None,
            pdf_url: None,
        }
    }

    fn payment(id: &str, date: &str, amount: f64) -> Payment {
        Payment {
            payment_id: id.to_string(),
            amount,
            paid_on: Some(d(date)),
        }
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 5),
            Some((d("2024-05-01"), d("2024-05-31")))
        );
        // 闰年二月
        assert_eq!(
            month_bounds(2024, 2),
            Some((d("2024-02-01"), d("2024-02-29")))
        );
        assert_eq!(
            month_bounds(2023, 2),
            Some((d("2023-02-01"), d("2023-02-28")))
        );
        // 跨年
        assert_eq!(
            month_bounds(2024, 12),
            Some((d("2024-12-01"), d("2024-12-31")))
        );
        assert_eq!(month_bounds(2024, 13), None);
    }

    #[test]
    fn test_invoice_totals() {
        let invoices = vec![
            invoice("a", "2024-05-03", InvoiceStatus::Paid, vec![100.0, 20.0]),
            invoice("b", "2024-05-10", InvoiceStatus::Issued, vec![80.0]),
        ];
        let totals = invoice_totals(&invoices);
        assert_eq!(totals.total, 200.0);
        assert_eq!(totals.paid, 120.0);
        assert_eq!(totals.due, 80.0);
    }

    #[test]
    fn test_monthly_statements_aggregation() {
        let invoices = vec![
            invoice("a", "2024-05-03", InvoiceStatus::Issued, vec![100.0]),
            invoice("b", "2024-05-20", InvoiceStatus::Issued, vec![50.0]),
            invoice("c", "2024-04-10", InvoiceStatus::Issued, vec![70.0]),
        ];
        let payments = vec![
            payment("p1", "2024-05-25", 120.0),
            payment("p2", "2024-04-11", 70.0),
        ];

        let statements = monthly_statements(&invoices, &payments);
        assert_eq!(statements.len(), 2);
        // 倒序: 2024-05 在前
        assert_eq!(statements[0].month_key(), "2024-05");
        assert_eq!(statements[0].purchased, 150.0);
        assert_eq!(statements[0].paid, 120.0);
        assert_eq!(statements[0].due(), 30.0);
        assert_eq!(statements[1].month_key(), "2024-04");
        assert!(statements[1].is_settled());
    }

    #[test]
    fn test_monthly_statements_skip_undated_rows() {
        let mut inv = invoice("a", "2024-05-03", InvoiceStatus::Issued, vec![100.0]);
        inv.issue_date = None;
        let mut pay = payment("p1", "2024-05-25", 50.0);
        pay.paid_on = None;
        assert!(monthly_statements(&[inv], &[pay]).is_empty());
    }

    #[test]
    fn test_payment_only_month_appears() {
        let payments = vec![payment("p1", "2024-03-02", 40.0)];
        let statements = monthly_statements(&[], &payments);
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].purchased, 0.0);
        assert_eq!(statements[0].paid, 40.0);
        assert!(statements[0].is_settled());
    }

    #[test]
    fn test_filter_statements() {
        let statements = vec![
            MonthlyStatement {
                year: 2024,
                month: 5,
                purchased: 150.0,
                paid: 120.0,
            },
            MonthlyStatement {
                year: 2024,
                month: 4,
                purchased: 70.0,
                paid: 70.0,
            },
        ];
        let due = filter_statements(statements.clone(), StatementFilter::Due);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].month, 5);
        let paid = filter_statements(statements.clone(), StatementFilter::Paid);
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].month, 4);
        assert_eq!(filter_statements(statements, StatementFilter::All).len(), 2);
    }
}
