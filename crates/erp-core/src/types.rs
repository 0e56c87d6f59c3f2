//! Record types for the ERP pages
//!
//! Every page works on a flat record with a numeric `id`, an optional
//! human-readable code and a closed status. Money is whole won held in `f64`;
//! timestamps stay strings in `YYYY-MM-DD` or `YYYY-MM-DD HH:mm:ss` form.

use crate::status::{
    ApprovalStatus, AssetStatus, BackupStatus, InvoiceStatus, NoticeStatus, Status, StepDecision,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use validator::Validate;

/// Primary key of a record within its list
pub type RecordId = i64;

/// A record managed by a page
pub trait Record:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
    /// Partial update applied by edit dialogs
    type Patch: Patch<Self>;

    /// Closed status enumeration
    type Status: Status;

    /// REST collection name, e.g. `invoices`
    const RESOURCE: &'static str;

    /// Display name of the page
    const TITLE: &'static str;

    /// Primary key
    fn id(&self) -> RecordId;

    /// Overwrite the primary key (used when a new record is appended)
    fn set_id(&mut self, id: RecordId);

    /// Human-readable business code
    fn code(&self) -> &str;

    /// Current status
    fn status(&self) -> Self::Status;

    /// Overwrite the status
    fn set_status(&mut self, status: Self::Status);
}

/// Partial update for a record
///
/// Fields left `None` are not touched by [`Patch::apply`]. Status is not part
/// of any patch; it only changes through a checked transition.
pub trait Patch<R>:
    Clone + fmt::Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Write the present fields into `target`
    fn apply(&self, target: &mut R);

    /// Whether no field is present
    fn is_empty(&self) -> bool;
}

macro_rules! apply_fields {
    ($patch:expr, $target:expr, [$($field:ident),+ $(,)?]) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
}

macro_rules! patch_is_empty {
    ($patch:expr, [$($field:ident),+ $(,)?]) => {
        true $(&& $patch.$field.is_none())+
    };
}

/// One line on an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItem {
    /// Id unique within the parent invoice
    pub id: RecordId,
    /// Item description
    #[validate(length(min = 1))]
    pub description: String,
    /// Quantity
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    /// Unit price in won
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

impl LineItem {
    /// Line amount (`quantity * unit_price`)
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Sales invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Invoice {
    /// Primary key
    pub id: RecordId,
    /// Business code, e.g. `INV-2024-001`
    #[validate(length(min = 1))]
    pub invoice_number: String,
    /// Customer name
    #[validate(length(min = 1))]
    pub customer_name: String,
    /// Issue date (`YYYY-MM-DD`)
    #[validate(length(min = 1))]
    pub issue_date: String,
    /// Due date (`YYYY-MM-DD`)
    #[validate(length(min = 1))]
    pub due_date: String,
    /// Status
    #[serde(default)]
    pub status: InvoiceStatus,
    /// Line items
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<LineItem>,
    /// Total amount in won
    #[validate(range(min = 0.0))]
    pub total_amount: f64,
    /// Free-form memo
    #[serde(default)]
    pub memo: Option<String>,
}

impl Invoice {
    /// Sum of the line item amounts
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(LineItem::amount).sum()
    }
}

/// Partial update for [`Invoice`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoicePatch {
    /// New business code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// New customer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// New issue date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    /// New due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Replacement line items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
    /// New total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    /// New memo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<Option<String>>,
}

impl Patch<Invoice> for InvoicePatch {
    fn apply(&self, target: &mut Invoice) {
        apply_fields!(
            self,
            target,
            [
                invoice_number,
                customer_name,
                issue_date,
                due_date,
                items,
                total_amount,
                memo
            ]
        );
    }

    fn is_empty(&self) -> bool {
        patch_is_empty!(
            self,
            [
                invoice_number,
                customer_name,
                issue_date,
                due_date,
                items,
                total_amount,
                memo
            ]
        )
    }
}

impl Record for Invoice {
    type Patch = InvoicePatch;
    type Status = InvoiceStatus;

    const RESOURCE: &'static str = "invoices";
    const TITLE: &'static str = "세금계산서 관리";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn code(&self) -> &str {
        &self.invoice_number
    }

    fn status(&self) -> InvoiceStatus {
        self.status
    }

    fn set_status(&mut self, status: InvoiceStatus) {
        self.status = status;
    }
}

/// Fixed asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Asset {
    /// Primary key
    pub id: RecordId,
    /// Business code, e.g. `AST-0001`
    #[validate(length(min = 1))]
    pub asset_code: String,
    /// Asset name
    #[validate(length(min = 1))]
    pub name: String,
    /// Category shown in the category dropdown
    #[validate(length(min = 1))]
    pub category: String,
    /// Owning department
    pub department: String,
    /// Physical location
    #[serde(default)]
    pub location: String,
    /// Purchase date (`YYYY-MM-DD`)
    pub purchase_date: String,
    /// Purchase price in won
    #[validate(range(min = 0.0))]
    pub purchase_price: f64,
    /// Book value in won
    #[validate(range(min = 0.0))]
    pub current_value: f64,
    /// Status
    #[serde(default)]
    pub status: AssetStatus,
    /// Responsible employee
    #[serde(default)]
    pub manager: String,
}

/// Partial update for [`Asset`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetPatch {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New department
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// New location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New book value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    /// New manager
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
}

impl Patch<Asset> for AssetPatch {
    fn apply(&self, target: &mut Asset) {
        apply_fields!(
            self,
            target,
            [name, category, department, location, current_value, manager]
        );
    }

    fn is_empty(&self) -> bool {
        patch_is_empty!(
            self,
            [name, category, department, location, current_value, manager]
        )
    }
}

impl Record for Asset {
    type Patch = AssetPatch;
    type Status = AssetStatus;

    const RESOURCE: &'static str = "assets";
    const TITLE: &'static str = "자산 관리";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn code(&self) -> &str {
        &self.asset_code
    }

    fn status(&self) -> AssetStatus {
        self.status
    }

    fn set_status(&mut self, status: AssetStatus) {
        self.status = status;
    }
}

/// Notice board post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Notice {
    /// Primary key
    pub id: RecordId,
    /// Business code
    #[serde(alias = "documentId")]
    #[validate(length(min = 1))]
    pub document_id: String,
    /// Title
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Category shown in the category dropdown
    #[validate(length(min = 1))]
    pub category: String,
    /// Author name
    pub author: String,
    /// Body text
    #[serde(default)]
    pub content: String,
    /// Creation timestamp
    pub created_at: String,
    /// View counter
    #[serde(default)]
    pub views: u32,
    /// Pinned to the top of the board
    #[serde(default)]
    pub is_pinned: bool,
    /// Status
    #[serde(default)]
    pub status: NoticeStatus,
}

/// Partial update for [`Notice`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoticePatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Pin or unpin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
}

impl Patch<Notice> for NoticePatch {
    fn apply(&self, target: &mut Notice) {
        apply_fields!(self, target, [title, category, content, is_pinned]);
    }

    fn is_empty(&self) -> bool {
        patch_is_empty!(self, [title, category, content, is_pinned])
    }
}

impl Record for Notice {
    type Patch = NoticePatch;
    type Status = NoticeStatus;

    const RESOURCE: &'static str = "notices";
    const TITLE: &'static str = "공지사항";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn code(&self) -> &str {
        &self.document_id
    }

    fn status(&self) -> NoticeStatus {
        self.status
    }

    fn set_status(&mut self, status: NoticeStatus) {
        self.status = status;
    }
}

/// Scheduled backup job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BackupJob {
    /// Primary key
    pub id: RecordId,
    /// Business code
    #[validate(length(min = 1))]
    pub job_code: String,
    /// Job name
    #[validate(length(min = 1))]
    pub name: String,
    /// What is backed up (`database`, `files`, `full`)
    #[validate(length(min = 1))]
    pub target: String,
    /// Schedule expression as entered by the operator
    pub schedule: String,
    /// Last run timestamp
    #[serde(default)]
    pub last_run: Option<String>,
    /// Size of the last archive in megabytes
    #[serde(default)]
    pub size_mb: f64,
    /// Duration of the last run in seconds
    #[serde(default)]
    pub duration_seconds: f64,
    /// Status
    #[serde(default)]
    pub status: BackupStatus,
}

/// Partial update for [`BackupJob`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupJobPatch {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// New schedule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

impl Patch<BackupJob> for BackupJobPatch {
    fn apply(&self, target: &mut BackupJob) {
        apply_fields!(self, target, [name, target, schedule]);
    }

    fn is_empty(&self) -> bool {
        patch_is_empty!(self, [name, target, schedule])
    }
}

impl Record for BackupJob {
    type Patch = BackupJobPatch;
    type Status = BackupStatus;

    const RESOURCE: &'static str = "backups";
    const TITLE: &'static str = "백업 관리";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn code(&self) -> &str {
        &self.job_code
    }

    fn status(&self) -> BackupStatus {
        self.status
    }

    fn set_status(&mut self, status: BackupStatus) {
        self.status = status;
    }
}

/// One approver in an approval line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ApprovalStep {
    /// Id unique within the parent document
    pub id: RecordId,
    /// Approver name
    #[validate(length(min = 1))]
    pub approver: String,
    /// Approver position
    pub position: String,
    /// Decision
    #[serde(default)]
    pub decision: StepDecision,
    /// When the decision was made
    #[serde(default)]
    pub decided_at: Option<String>,
    /// Approver comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// Electronic approval document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ApprovalDocument {
    /// Primary key
    pub id: RecordId,
    /// Business code
    #[serde(alias = "documentId")]
    #[validate(length(min = 1))]
    pub document_id: String,
    /// Title
    #[validate(length(min = 1))]
    pub title: String,
    /// Document type (`expense`, `leave`, `purchase`, ...)
    #[validate(length(min = 1))]
    pub doc_type: String,
    /// Requester name
    pub requester: String,
    /// Requester department
    pub department: String,
    /// Requested amount in won, zero when not monetary
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub amount: f64,
    /// Submission timestamp
    pub submitted_at: String,
    /// Status
    #[serde(default)]
    pub status: ApprovalStatus,
    /// Approval line
    #[serde(default)]
    #[validate(nested)]
    pub steps: Vec<ApprovalStep>,
}

/// Partial update for [`ApprovalDocument`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalDocumentPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New document type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// New amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Replacement approval line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<ApprovalStep>>,
}

impl Patch<ApprovalDocument> for ApprovalDocumentPatch {
    fn apply(&self, target: &mut ApprovalDocument) {
        apply_fields!(self, target, [title, doc_type, amount, steps]);
    }

    fn is_empty(&self) -> bool {
        patch_is_empty!(self, [title, doc_type, amount, steps])
    }
}

impl Record for ApprovalDocument {
    type Patch = ApprovalDocumentPatch;
    type Status = ApprovalStatus;

    const RESOURCE: &'static str = "approvals";
    const TITLE: &'static str = "전자결재";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn code(&self) -> &str {
        &self.document_id
    }

    fn status(&self) -> ApprovalStatus {
        self.status
    }

    fn set_status(&mut self, status: ApprovalStatus) {
        self.status = status;
    }
}
