//! 세금계산서 관리

use crate::{
    aggregate::{Aggregate, StatFormat, StatSpec},
    chart::{ChartKind, ChartSpec, SeriesSpec},
    definition::PageDefinition,
    filter::{FilterSchema, SelectFilter},
    sort::{SortKey, SortSpec},
    view::{Cell, Column, ListView},
};
use erp_core::{ChipColor, RecordId, Status, status::InvoiceStatus, types::Invoice};
use std::sync::Arc;

fn invoice_number(invoice: &Invoice) -> &str {
    &invoice.invoice_number
}

fn customer_name(invoice: &Invoice) -> &str {
    &invoice.customer_name
}

fn issue_date(invoice: &Invoice) -> &str {
    &invoice.issue_date
}

fn status(invoice: &Invoice) -> &str {
    invoice.status.as_str()
}

fn total(invoice: &Invoice) -> f64 {
    invoice.total_amount
}

const fn is_paid(invoice: &Invoice) -> bool {
    matches!(invoice.status, InvoiceStatus::Paid)
}

const fn is_outstanding(invoice: &Invoice) -> bool {
    matches!(invoice.status, InvoiceStatus::Sent | InvoiceStatus::Overdue)
}

const fn is_overdue(invoice: &Invoice) -> bool {
    matches!(invoice.status, InvoiceStatus::Overdue)
}

fn issue_month(invoice: &Invoice) -> String {
    super::month_of(&invoice.issue_date)
}

fn draft(id: RecordId) -> Invoice {
    Invoice {
        id,
        invoice_number: format!("INV-2024-{id:03}"),
        customer_name: String::new(),
        issue_date: String::new(),
        due_date: String::new(),
        status: InvoiceStatus::Draft,
        items: Vec::new(),
        total_amount: 0.0,
        memo: None,
    }
}

/// Invoice page
pub fn definition() -> PageDefinition<Invoice> {
    let schema = FilterSchema::new("세금계산서 번호, 거래처 검색")
        .search_field(invoice_number)
        .search_field(customer_name)
        .select(SelectFilter::status::<InvoiceStatus>("status", "상태", status))
        .date("발행일", issue_date);

    let list = ListView::new(vec![
        Column::new("invoice_number", "세금계산서 번호", |i: &Invoice| {
            Cell::text(&i.invoice_number)
        }),
        Column::new("customer_name", "거래처", |i: &Invoice| {
            Cell::text(&i.customer_name)
        }),
        Column::new("issue_date", "발행일", |i: &Invoice| Cell::date(&i.issue_date)),
        Column::new("due_date", "만기일", |i: &Invoice| Cell::date(&i.due_date)),
        Column::new("total_amount", "금액", |i: &Invoice| {
            Cell::currency(i.total_amount)
        }),
        Column::new("status", "상태", |i: &Invoice| Cell::status(i.status)),
    ]);

    let stats = vec![
        StatSpec::new("issued", "총 발행액", Aggregate::Sum(total), StatFormat::Won),
        StatSpec::new(
            "paid",
            "결제 완료",
            Aggregate::SumWhere(is_paid, total),
            StatFormat::Won,
        )
        .color(ChipColor::Success),
        StatSpec::new(
            "outstanding",
            "미수금",
            Aggregate::SumWhere(is_outstanding, total),
            StatFormat::Won,
        )
        .color(ChipColor::Warning),
        StatSpec::new(
            "overdue",
            "연체 건수",
            Aggregate::CountWhere(is_overdue),
            StatFormat::Number,
        )
        .color(ChipColor::Error),
    ];

    let chart = ChartSpec::new("월별 발행액", ChartKind::Bar, issue_month, StatFormat::Won)
        .series(SeriesSpec::sum("amount", "발행액", total));

    PageDefinition {
        schema: Arc::new(schema),
        list,
        stats,
        chart: Some(chart),
        sorts: vec![
            SortSpec::descending("issue_date", SortKey::Text(issue_date)),
            SortSpec::descending("total_amount", SortKey::Number(total)),
            SortSpec::ascending("customer_name", SortKey::Text(customer_name)),
        ],
        draft,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::sample;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stat_cards_over_samples() {
        let invoices = sample::invoices();
        let cards = definition().stat_cards(&invoices);
        let total: f64 = invoices.iter().map(|i| i.total_amount).sum();

        assert_eq!(cards[0].value, total);
        assert_eq!(cards[3].value, 2.0);
        assert_eq!(cards[3].display, "2");
    }

    #[test]
    fn test_chart_groups_by_issue_month() {
        let invoices: Vec<Invoice> = sample::invoices().into_iter().take(3).collect();
        let chart = definition().chart(&invoices).unwrap();

        assert_eq!(chart.value("2024-01", "amount"), Some(4_250_000.0));
        assert_eq!(chart.tooltip("2024-01", "amount").unwrap(), "발행액: ₩4,250,000");
    }

    #[test]
    fn test_draft_is_invalid_until_filled() {
        use validator::Validate;
        let draft = (definition().draft)(13);
        assert_eq!(draft.invoice_number, "INV-2024-013");
        assert!(draft.validate().is_err());
    }
}
