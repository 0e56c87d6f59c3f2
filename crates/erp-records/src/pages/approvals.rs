//! 전자결재

use crate::{
    aggregate::{Aggregate, StatFormat, StatSpec},
    chart::{ChartKind, ChartSpec, SeriesSpec},
    definition::PageDefinition,
    filter::{FilterSchema, SelectFilter, SelectOption},
    sort::{SortKey, SortSpec},
    view::{Cell, Column, ListView},
};
use erp_core::{
    ChipColor, RecordId, Status,
    status::{ApprovalStatus, StepDecision},
    types::ApprovalDocument,
};
use std::sync::Arc;

/// Document types
pub const DOC_TYPES: &[(&str, &str)] = &[
    ("expense", "지출결의"),
    ("leave", "휴가신청"),
    ("purchase", "구매요청"),
    ("training", "교육신청"),
];

fn doc_type_label(doc_type: &str) -> &str {
    DOC_TYPES
        .iter()
        .find(|(value, _)| *value == doc_type)
        .map_or(doc_type, |(_, label)| *label)
}

/// Approval line progress, e.g. `1/2`
pub fn progress(document: &ApprovalDocument) -> String {
    let approved = document
        .steps
        .iter()
        .filter(|step| step.decision == StepDecision::Approved)
        .count();
    format!("{approved}/{}", document.steps.len())
}

fn document_id(document: &ApprovalDocument) -> &str {
    &document.document_id
}

fn title(document: &ApprovalDocument) -> &str {
    &document.title
}

fn requester(document: &ApprovalDocument) -> &str {
    &document.requester
}

fn doc_type(document: &ApprovalDocument) -> &str {
    &document.doc_type
}

fn department(document: &ApprovalDocument) -> &str {
    &document.department
}

fn status(document: &ApprovalDocument) -> &str {
    document.status.as_str()
}

fn submitted_at(document: &ApprovalDocument) -> &str {
    &document.submitted_at
}

fn amount(document: &ApprovalDocument) -> f64 {
    document.amount
}

const fn is_pending(document: &ApprovalDocument) -> bool {
    matches!(document.status, ApprovalStatus::Submitted)
}

const fn is_approved(document: &ApprovalDocument) -> bool {
    matches!(document.status, ApprovalStatus::Approved)
}

const fn is_rejected(document: &ApprovalDocument) -> bool {
    matches!(document.status, ApprovalStatus::Rejected)
}

fn doc_type_name(document: &ApprovalDocument) -> String {
    doc_type_label(&document.doc_type).to_string()
}

fn draft(id: RecordId) -> ApprovalDocument {
    ApprovalDocument {
        id,
        document_id: format!("AP-2024-{id:03}"),
        title: String::new(),
        doc_type: "expense".to_string(),
        requester: String::new(),
        department: String::new(),
        amount: 0.0,
        submitted_at: String::new(),
        status: ApprovalStatus::Draft,
        steps: Vec::new(),
    }
}

/// Electronic approval page
pub fn definition() -> PageDefinition<ApprovalDocument> {
    let doc_types = DOC_TYPES
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect();

    let schema = FilterSchema::new("문서번호, 제목, 기안자 검색")
        .search_field(document_id)
        .search_field(title)
        .search_field(requester)
        .select(SelectFilter::new("doc_type", "문서 유형", doc_type, doc_types))
        .select(SelectFilter::status::<ApprovalStatus>("status", "상태", status))
        .select(SelectFilter::from_values(
            "department",
            "부서",
            department,
            &["개발팀", "디자인팀", "영업팀", "인사팀", "정보보안팀"],
        ))
        .date("상신일", submitted_at);

    let list = ListView::new(vec![
        Column::new("document_id", "문서번호", |d: &ApprovalDocument| {
            Cell::text(&d.document_id)
        }),
        Column::new("title", "제목", |d: &ApprovalDocument| Cell::text(&d.title)),
        Column::new("doc_type", "유형", |d: &ApprovalDocument| {
            Cell::text(doc_type_label(&d.doc_type))
        }),
        Column::new("requester", "기안자", |d: &ApprovalDocument| {
            Cell::text(&d.requester)
        }),
        Column::new("amount", "금액", |d: &ApprovalDocument| Cell::currency(d.amount)),
        Column::new("submitted_at", "상신일", |d: &ApprovalDocument| {
            Cell::datetime(&d.submitted_at)
        }),
        Column::new("steps", "결재 진행", |d: &ApprovalDocument| Cell::text(progress(d))),
        Column::new("status", "상태", |d: &ApprovalDocument| Cell::status(d.status)),
    ]);

    let stats = vec![
        StatSpec::new("count", "전체 문서", Aggregate::Count, StatFormat::Number),
        StatSpec::new(
            "pending",
            "결재 대기",
            Aggregate::CountWhere(is_pending),
            StatFormat::Number,
        )
        .color(ChipColor::Warning),
        StatSpec::new(
            "approved",
            "승인",
            Aggregate::CountWhere(is_approved),
            StatFormat::Number,
        )
        .color(ChipColor::Success),
        StatSpec::new(
            "rejected",
            "반려",
            Aggregate::CountWhere(is_rejected),
            StatFormat::Number,
        )
        .color(ChipColor::Error),
        StatSpec::new(
            "approved_amount",
            "승인 금액",
            Aggregate::SumWhere(is_approved, amount),
            StatFormat::Won,
        ),
    ];

    let chart = ChartSpec::new("유형별 결재 금액", ChartKind::Bar, doc_type_name, StatFormat::Won)
        .series(SeriesSpec::sum("amount", "금액", amount));

    PageDefinition {
        schema: Arc::new(schema),
        list,
        stats,
        chart: Some(chart),
        sorts: vec![
            SortSpec::descending("submitted_at", SortKey::Text(submitted_at)),
            SortSpec::descending("amount", SortKey::Number(amount)),
        ],
        draft,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{filter::FilterBar, sample};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_progress() {
        let documents = sample::approvals();
        assert_eq!(progress(&documents[0]), "1/2");
        assert_eq!(progress(&documents[5]), "2/2");
    }

    #[test]
    fn test_requester_search_with_status() {
        let documents = sample::approvals();
        let mut bar = FilterBar::new(definition().schema);
        bar.set_search("김민수");
        bar.select("status", "submitted").unwrap();
        assert_eq!(bar.filter_set().apply(&documents).len(), 2);

        bar.select("doc_type", "expense").unwrap();
        bar.select("department", "인사팀").unwrap();
        assert!(bar.filter_set().apply(&documents).is_empty());
    }

    #[test]
    fn test_stats() {
        let cards = definition().stat_cards(&sample::approvals());
        let values: Vec<f64> = cards.iter().map(|card| card.value).collect();
        assert_eq!(values, vec![6.0, 2.0, 2.0, 1.0, 600_000.0]);
        assert_eq!(cards[4].display, "₩600,000");
    }
}
