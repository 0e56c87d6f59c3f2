//! List view: typed columns, formatted cells and row actions

use crate::pagination::{Page, PageMeta};
use erp_core::{
    ChipColor, Record, RecordId, Status,
    utils::{format_date_ko, format_datetime_ko, format_number, format_won},
};
use serde::Serialize;
use std::{borrow::Borrow, fmt};

/// A formatted table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    /// Plain text
    Text {
        /// Content
        value: String,
    },
    /// Plain number
    Number {
        /// Raw value
        value: f64,
    },
    /// Amount in won
    Currency {
        /// Raw amount
        value: f64,
    },
    /// Date or timestamp string
    Date {
        /// Raw string
        value: String,
        /// Whether to show the time of day
        with_time: bool,
    },
    /// Status chip
    Status {
        /// Wire name
        value: &'static str,
        /// Label
        label: &'static str,
        /// Chip colour
        color: ChipColor,
    },
    /// Yes/no flag
    Flag {
        /// Raw value
        value: bool,
    },
}

impl Cell {
    /// Text cell
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Number cell
    pub const fn number(value: f64) -> Self {
        Self::Number { value }
    }

    /// Currency cell
    pub const fn currency(value: f64) -> Self {
        Self::Currency { value }
    }

    /// Date cell
    pub fn date(value: impl Into<String>) -> Self {
        Self::Date {
            value: value.into(),
            with_time: false,
        }
    }

    /// Timestamp cell
    pub fn datetime(value: impl Into<String>) -> Self {
        Self::Date {
            value: value.into(),
            with_time: true,
        }
    }

    /// Status chip cell
    pub fn status<S: Status>(status: S) -> Self {
        Self::Status {
            value: status.as_str(),
            label: status.label(),
            color: status.color(),
        }
    }

    /// Flag cell
    pub const fn flag(value: bool) -> Self {
        Self::Flag { value }
    }

    /// Display text
    pub fn display(&self) -> String {
        match self {
            Self::Text { value } => value.clone(),
            Self::Number { value } => format_number(*value),
            Self::Currency { value } => format_won(*value),
            Self::Date {
                value,
                with_time: false,
            } => format_date_ko(value),
            Self::Date {
                value,
                with_time: true,
            } => format_datetime_ko(value),
            Self::Status { label, .. } => (*label).to_string(),
            Self::Flag { value } => (if *value { "Y" } else { "-" }).to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// One table column
pub struct Column<R> {
    /// Stable key
    pub key: &'static str,
    /// Header text
    pub header: &'static str,
    /// Cell of a record
    pub cell: fn(&R) -> Cell,
}

impl<R> Column<R> {
    /// Create a column
    pub const fn new(key: &'static str, header: &'static str, cell: fn(&R) -> Cell) -> Self {
        Self { key, header, cell }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// An action button on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "status", rename_all = "snake_case")]
pub enum RowAction<S> {
    /// Open the detail dialog read-only
    View,
    /// Open the detail dialog for editing
    Edit,
    /// Delete after confirmation
    Delete,
    /// Move the record to another status
    Transition(S),
}

impl<S: Status> RowAction<S> {
    /// Button verb
    pub fn verb(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Transition(status) => status.action(),
        }
    }
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row<S> {
    /// Record id
    pub id: RecordId,
    /// Cells, aligned with the headers
    pub cells: Vec<Cell>,
    /// Available actions
    pub actions: Vec<RowAction<S>>,
}

/// A rendered page of rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<S> {
    /// Header texts
    pub headers: Vec<&'static str>,
    /// Rows on this page
    pub rows: Vec<Row<S>>,
    /// Page position
    pub meta: PageMeta,
}

impl<S: Status> Table<S> {
    /// Plain-text rendering with aligned columns and a page caption
    pub fn to_text(&self) -> String {
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(self.rows.len() + 1);
        let mut header: Vec<String> = vec!["ID".to_string()];
        header.extend(self.headers.iter().map(ToString::to_string));
        header.push("작업".to_string());
        grid.push(header);

        for row in &self.rows {
            let mut line = vec![row.id.to_string()];
            line.extend(row.cells.iter().map(Cell::display));
            line.push(
                row.actions
                    .iter()
                    .map(RowAction::verb)
                    .collect::<Vec<_>>()
                    .join("|"),
            );
            grid.push(line);
        }

        let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|index| {
                grid.iter()
                    .filter_map(|line| line.get(index))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        for line in &grid {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width.saturating_sub(cell.chars().count());
                    format!("{cell}{}", " ".repeat(pad))
                })
                .collect();
            out.push_str(padded.join("  ").trim_end());
            out.push('\n');
        }

        if self.rows.is_empty() {
            out.push_str("(데이터가 없습니다)\n");
        }
        out.push_str(&format!(
            "{} · {}/{} 페이지\n",
            self.meta.range_label(),
            self.meta.page,
            self.meta.total_pages.max(1)
        ));
        out
    }
}

/// Columns and row actions of a record list
pub struct ListView<R: Record> {
    columns: Vec<Column<R>>,
    editable: bool,
    deletable: bool,
}

impl<R: Record> ListView<R> {
    /// List with view, edit and delete actions
    pub const fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            editable: true,
            deletable: true,
        }
    }

    /// List without edit and delete buttons
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.editable = false;
        self.deletable = false;
        self
    }

    /// Column definitions
    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Header texts
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.header).collect()
    }

    /// Actions offered for a record: view, edit, delete, then every legal transition
    pub fn actions(&self, record: &R) -> Vec<RowAction<R::Status>> {
        let mut actions = vec![RowAction::View];
        if self.editable {
            actions.push(RowAction::Edit);
        }
        if self.deletable {
            actions.push(RowAction::Delete);
        }
        actions.extend(
            record
                .status()
                .transitions()
                .iter()
                .copied()
                .map(RowAction::Transition),
        );
        actions
    }

    /// Render one record
    pub fn row(&self, record: &R) -> Row<R::Status> {
        Row {
            id: record.id(),
            cells: self.columns.iter().map(|column| (column.cell)(record)).collect(),
            actions: self.actions(record),
        }
    }

    /// Render a page
    pub fn render<T: Borrow<R>>(&self, page: &Page<T>) -> Table<R::Status> {
        Table {
            headers: self.headers(),
            rows: page
                .items
                .iter()
                .map(|item| self.row(<T as Borrow<R>>::borrow(item)))
                .collect(),
            meta: page.meta,
        }
    }
}

impl<R: Record> fmt::Debug for ListView<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListView")
            .field("columns", &self.columns)
            .field("editable", &self.editable)
            .field("deletable", &self.deletable)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::pagination::{PageRequest, paginate};
    use erp_core::{status::ApprovalStatus, types::ApprovalDocument};
    use pretty_assertions::assert_eq;

    fn document(id: RecordId, status: ApprovalStatus) -> ApprovalDocument {
        ApprovalDocument {
            id,
            document_id: format!("AP-{id:03}"),
            title: "출장비 정산".to_string(),
            doc_type: "expense".to_string(),
            requester: "김민수".to_string(),
            department: "영업팀".to_string(),
            amount: 350_000.0,
            submitted_at: "2024-01-15 09:30:00".to_string(),
            status,
            steps: Vec::new(),
        }
    }

    fn view() -> ListView<ApprovalDocument> {
        ListView::new(vec![
            Column::new("document_id", "문서번호", |d: &ApprovalDocument| Cell::text(&d.document_id)),
            Column::new("amount", "금액", |d: &ApprovalDocument| Cell::currency(d.amount)),
            Column::new("submitted_at", "상신일", |d: &ApprovalDocument| Cell::datetime(&d.submitted_at)),
            Column::new("status", "상태", |d: &ApprovalDocument| Cell::status(d.status)),
        ])
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::currency(1_500_000.0).display(), "₩1,500,000");
        assert_eq!(Cell::date("2024-01-15").display(), "2024. 1. 15.");
        assert_eq!(Cell::date("미정").display(), "미정");
        assert_eq!(Cell::status(ApprovalStatus::Approved).display(), "승인");
        assert_eq!(Cell::number(1234.0).to_string(), "1,234");
        assert_eq!(Cell::flag(true).display(), "Y");
    }

    #[test]
    fn test_row_actions_follow_transition_table() {
        let view = view();

        let submitted = view.row(&document(1, ApprovalStatus::Submitted));
        let verbs: Vec<_> = submitted.actions.iter().map(RowAction::verb).collect();
        assert_eq!(verbs, vec!["view", "edit", "delete", "approve", "reject"]);

        let approved = view.row(&document(2, ApprovalStatus::Approved));
        assert_eq!(approved.actions.len(), 3);
    }

    #[test]
    fn test_read_only_view() {
        let row = view().read_only().row(&document(1, ApprovalStatus::Draft));
        assert_eq!(
            row.actions,
            vec![
                RowAction::View,
                RowAction::Transition(ApprovalStatus::Submitted)
            ]
        );
    }

    #[test]
    fn test_render_page() {
        let records: Vec<_> = (1..=12)
            .map(|id| document(id, ApprovalStatus::Draft))
            .collect();
        let table = view().render(&paginate(records, PageRequest::new(2, 10)));

        assert_eq!(table.headers, vec!["문서번호", "금액", "상신일", "상태"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].id, 11);
        assert_eq!(table.rows[0].cells[0].display(), "AP-011");
        assert_eq!(table.rows[0].cells[2].display(), "2024. 1. 15. 09:30");

        let text = table.to_text();
        assert!(text.contains("AP-012"));
        assert!(text.contains("11-12 / 12"));
    }

    #[test]
    fn test_empty_table_text() {
        let table = view().render(&paginate(Vec::<ApprovalDocument>::new(), PageRequest::default()));
        assert!(table.to_text().contains("데이터가 없습니다"));
    }
}
