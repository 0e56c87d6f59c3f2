//! Page controller: the state of one record page and the actions on it
//!
//! The controller owns the record array loaded from a [`Repository`], the
//! filter bar, pagination, sorting, the detail dialog and notifications.
//! State lives behind a [`parking_lot::Mutex`] that is never held across an
//! `.await`; every repository call happens with the lock released.

use crate::{
    aggregate::StatCard,
    chart::ChartData,
    definition::PageDefinition,
    dialog::{DetailDialog, DialogState, Submission},
    error::{RecordError, RecordResult},
    filter::FilterBar,
    loader::LoadTracker,
    mutation::{Confirm, RecordSet, delete_prompt},
    notify::{
        DELETE_FAILED, DELETE_SUCCEEDED, LOAD_FAILED, Notifications, SAVE_FAILED, SAVE_SUCCEEDED,
        TRANSITION_FAILED, TRANSITION_SUCCEEDED, Toast,
    },
    pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest, clamp_page, paginate},
    repository::{Backend, Repository},
    sort::{SortDirection, SortSpec},
    view::Table,
};
use chrono::NaiveDate;
use erp_core::{Record, RecordId, Status};
use parking_lot::Mutex;
use std::{fmt, sync::Arc};
use tracing::{debug, info, warn};

/// What happened to a finished load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the record array
    Applied,
    /// A newer load started meanwhile; the response was discarded
    Stale,
}

struct PageState<R: Record> {
    records: RecordSet<R>,
    filters: FilterBar<R>,
    page: usize,
    page_size: usize,
    sort: Option<SortSpec<R>>,
    dialog: DetailDialog<R>,
    notifications: Notifications,
    loading: bool,
}

impl<R: Record> PageState<R> {
    fn visible(&self) -> Vec<Arc<R>> {
        let mut rows = self.filters.filter_set().apply_cloned(self.records.records());
        if let Some(sort) = &self.sort {
            sort.sort(&mut rows);
        }
        rows
    }

    fn clamp(&mut self) {
        let total = self.visible().len();
        self.page = clamp_page(self.page, total, self.page_size);
    }
}

/// Controller of one record page
pub struct PageController<R: Record> {
    repository: Arc<dyn Repository<R>>,
    definition: Arc<PageDefinition<R>>,
    state: Mutex<PageState<R>>,
    loads: LoadTracker,
}

impl<R: Record> PageController<R> {
    /// Controller with an empty record array; call [`Self::reload`] to fill it
    pub fn new(repository: Arc<dyn Repository<R>>, definition: PageDefinition<R>) -> Self {
        let filters = FilterBar::new(Arc::clone(&definition.schema));
        Self {
            repository,
            definition: Arc::new(definition),
            state: Mutex::new(PageState {
                records: RecordSet::default(),
                filters,
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
                sort: None,
                dialog: DetailDialog::new(),
                notifications: Notifications::new(),
                loading: false,
            }),
            loads: LoadTracker::new(),
        }
    }

    /// Rows per page
    #[must_use]
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    /// Page definition
    pub fn definition(&self) -> &PageDefinition<R> {
        &self.definition
    }

    /// Implementation backing the repository
    pub fn backend(&self) -> Backend {
        self.repository.backend()
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Full, unfiltered record array
    pub fn records(&self) -> Vec<Arc<R>> {
        self.state.lock().records.records().to_vec()
    }

    /// Fetch the record array from the repository
    ///
    /// A response that arrives after a newer load started is discarded. On
    /// failure the current records stay and an error notification is shown.
    pub async fn reload(&self) -> RecordResult<LoadOutcome> {
        let ticket = self.loads.begin();
        self.state.lock().loading = true;
        debug!(resource = R::RESOURCE, generation = ticket.generation(), "load started");

        let result = self.repository.list().await;

        let mut state = self.state.lock();
        if !self.loads.is_current(ticket) {
            drop(state);
            debug!(
                resource = R::RESOURCE,
                generation = ticket.generation(),
                "stale load discarded"
            );
            return Ok(LoadOutcome::Stale);
        }
        state.loading = false;

        match result {
            Ok(records) => {
                info!(resource = R::RESOURCE, count = records.len(), "records loaded");
                state.records = RecordSet::new(records);
                state.clamp();
                Ok(LoadOutcome::Applied)
            }
            Err(error) => {
                warn!(resource = R::RESOURCE, %error, "load failed");
                state.notifications.error(LOAD_FAILED);
                Err(error)
            }
        }
    }

    /// Current filter values
    pub fn filters(&self) -> FilterBar<R> {
        self.state.lock().filters.clone()
    }

    /// Replace the search text and go back to the first page
    pub fn set_search(&self, query: impl Into<String>) {
        let mut state = self.state.lock();
        state.filters.set_search(query);
        state.page = 1;
    }

    /// Pick a dropdown value and go back to the first page
    pub fn select(&self, key: &str, value: &str) -> RecordResult<()> {
        let mut state = self.state.lock();
        state.filters.select(key, value)?;
        state.page = 1;
        Ok(())
    }

    /// Set or clear the date filter and go back to the first page
    pub fn set_date(&self, date: Option<NaiveDate>) {
        let mut state = self.state.lock();
        state.filters.set_date(date);
        state.page = 1;
    }

    /// Clear every filter and go back to the first page
    pub fn clear_filters(&self) {
        let mut state = self.state.lock();
        state.filters.clear();
        state.page = 1;
    }

    /// Sort by a column the page offers
    pub fn sort_by(&self, column: &str, direction: SortDirection) -> RecordResult<()> {
        let sort = self
            .definition
            .sort(column)
            .ok_or_else(|| RecordError::UnknownSort {
                column: column.to_string(),
            })?;
        let mut sort = sort.clone();
        sort.direction = direction;
        self.state.lock().sort = Some(sort);
        Ok(())
    }

    /// Back to source order
    pub fn clear_sort(&self) {
        self.state.lock().sort = None;
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&self, page_size: usize) {
        let mut state = self.state.lock();
        state.page_size = page_size.max(1);
        state.page = 1;
    }

    /// Move to a page, clamped to the pages that exist; returns the page shown
    pub fn go_to_page(&self, page: usize) -> usize {
        let mut state = self.state.lock();
        state.page = page;
        state.clamp();
        state.page
    }

    /// Current page number
    pub fn current_page(&self) -> usize {
        self.state.lock().page
    }

    /// Filtered and sorted records, before pagination
    pub fn visible(&self) -> Vec<Arc<R>> {
        self.state.lock().visible()
    }

    /// Records on the current page
    pub fn page(&self) -> Page<Arc<R>> {
        let state = self.state.lock();
        paginate(
            state.visible(),
            PageRequest::new(state.page, state.page_size),
        )
    }

    /// The current page rendered as table rows
    pub fn list_view(&self) -> Table<R::Status> {
        self.definition.list.render(&self.page())
    }

    /// Stat cards over the full record array
    pub fn stat_cards(&self) -> Vec<StatCard> {
        let records = self.records();
        self.definition.stat_cards(&records)
    }

    /// Chart panel over the full record array
    pub fn chart(&self) -> Option<ChartData> {
        let records = self.records();
        self.definition.chart(&records)
    }

    /// Current dialog state
    pub fn dialog(&self) -> DialogState<R> {
        self.state.lock().dialog.state().clone()
    }

    /// Open a record read-only
    pub fn open_view(&self, id: RecordId) -> RecordResult<Arc<R>> {
        let mut state = self.state.lock();
        let record = Arc::clone(state.records.require(id)?);
        state.dialog.view(id);
        Ok(record)
    }

    /// Open an empty create form
    pub fn open_create(&self) {
        let mut state = self.state.lock();
        let draft = (self.definition.draft)(state.records.next_id());
        state.dialog.create(draft);
    }

    /// Open the edit form of a record
    pub fn open_edit(&self, id: RecordId) -> RecordResult<()> {
        let mut state = self.state.lock();
        state.records.require(id)?;
        state.dialog.edit(id);
        Ok(())
    }

    /// Change the create form; `false` when no create form is open
    pub fn update_draft(&self, change: impl FnOnce(&mut R)) -> bool {
        self.state.lock().dialog.update_draft(change)
    }

    /// Change the edit form; `false` when no edit form is open
    pub fn update_patch(&self, change: impl FnOnce(&mut R::Patch)) -> bool {
        self.state.lock().dialog.update_patch(change)
    }

    /// Close the dialog without saving
    pub fn close_dialog(&self) {
        self.state.lock().dialog.close();
    }

    /// Save the open form through the repository
    ///
    /// On success the record array is updated, the dialog closes and a
    /// success notification is shown. On failure the dialog stays open and a
    /// generic failure notification is shown.
    pub async fn save(&self) -> RecordResult<Arc<R>> {
        let submission = {
            let state = self.state.lock();
            let current = state
                .dialog
                .target()
                .and_then(|id| state.records.get(id))
                .map(|record| R::clone(record));
            state.dialog.submission(current.as_ref())
        };

        let result = match submission {
            Ok(Submission::Create(draft)) => self.repository.create(draft).await,
            Ok(Submission::Update { id, patch }) => self.repository.update(id, &patch).await,
            Err(error) => Err(error),
        };

        let mut state = self.state.lock();
        match result {
            Ok(saved) => {
                self.loads.invalidate();
                state.loading = false;
                let saved = state.records.upsert(saved);
                state.dialog.close();
                state.notifications.success(SAVE_SUCCEEDED);
                info!(resource = R::RESOURCE, id = saved.id(), "record saved");
                Ok(saved)
            }
            Err(error) => {
                warn!(resource = R::RESOURCE, %error, "save failed");
                state.notifications.error(SAVE_FAILED);
                Err(error)
            }
        }
    }

    /// Delete a record after `confirm` accepts; `Ok(false)` when declined
    pub async fn delete(&self, id: RecordId, confirm: &dyn Confirm) -> RecordResult<bool> {
        let prompt = {
            let state = self.state.lock();
            delete_prompt(state.records.require(id)?.as_ref())
        };
        if !confirm.confirm(&prompt) {
            debug!(resource = R::RESOURCE, id, "delete declined");
            return Ok(false);
        }

        let result = self.repository.delete(id).await;

        let mut state = self.state.lock();
        match result {
            Ok(()) => {
                self.loads.invalidate();
                state.loading = false;
                // A concurrent reload may already have dropped it.
                let _ = state.records.remove(id);
                if state.dialog.target() == Some(id) {
                    state.dialog.close();
                }
                state.clamp();
                state.notifications.success(DELETE_SUCCEEDED);
                info!(resource = R::RESOURCE, id, "record deleted");
                Ok(true)
            }
            Err(error) => {
                warn!(resource = R::RESOURCE, id, %error, "delete failed");
                state.notifications.error(DELETE_FAILED);
                Err(error)
            }
        }
    }

    /// Move a record to another status
    ///
    /// The transition table is checked before the repository is called.
    pub async fn transition(&self, id: RecordId, next: R::Status) -> RecordResult<Arc<R>> {
        let checked = {
            let mut state = self.state.lock();
            let from = state.records.require(id)?.status();
            if from.can_transition_to(next) {
                Ok(())
            } else {
                state.notifications.error(TRANSITION_FAILED);
                Err(RecordError::InvalidTransition {
                    from: from.to_string(),
                    to: next.to_string(),
                })
            }
        };
        checked?;

        let result = self.repository.transition(id, next).await;

        let mut state = self.state.lock();
        match result {
            Ok(moved) => {
                self.loads.invalidate();
                state.loading = false;
                let moved = state.records.upsert(moved);
                state.clamp();
                state.notifications.success(TRANSITION_SUCCEEDED);
                info!(resource = R::RESOURCE, id, to = %next, "status changed");
                Ok(moved)
            }
            Err(error) => {
                warn!(resource = R::RESOURCE, id, %error, "status change failed");
                state.notifications.error(TRANSITION_FAILED);
                Err(error)
            }
        }
    }

    /// Visible notifications, oldest first
    pub fn notifications(&self) -> Vec<Toast> {
        self.state.lock().notifications.toasts().to_vec()
    }

    /// Hide a notification
    pub fn dismiss(&self, id: u64) -> bool {
        self.state.lock().notifications.dismiss(id)
    }
}

impl<R: Record> fmt::Debug for PageController<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PageController")
            .field("resource", &R::RESOURCE)
            .field("backend", &self.repository.backend())
            .field("records", &state.records.len())
            .field("filters", &state.filters)
            .field("page", &state.page)
            .field("dialog", &state.dialog.state().name())
            .field("loading", &state.loading)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::{
        mutation::{AlwaysConfirm, NeverConfirm},
        notify::Severity,
        pages, sample,
        repository::InMemoryRepository,
    };
    use erp_core::{
        status::{AssetStatus, InvoiceStatus},
        types::{Asset, Invoice},
    };
    use pretty_assertions::assert_eq;

    async fn invoices() -> PageController<Invoice> {
        let repository = Arc::new(InMemoryRepository::new(sample::invoices()));
        let controller = PageController::new(repository, pages::invoices::definition());
        controller.reload().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_filter_resets_page() {
        let controller = invoices().await;
        assert_eq!(controller.go_to_page(2), 2);
        assert_eq!(controller.page().items.len(), 2);

        controller.select("status", "paid").unwrap();
        assert_eq!(controller.current_page(), 1);
        assert_eq!(controller.page().meta.total, 4);
        assert_eq!(controller.go_to_page(9), 1);
    }

    #[tokio::test]
    async fn test_stats_ignore_filters() {
        let controller = invoices().await;
        let before = controller.stat_cards();
        controller.set_search("한빛");
        assert_eq!(controller.visible().len(), 2);
        assert_eq!(controller.stat_cards(), before);
    }

    #[tokio::test]
    async fn test_unknown_sort_column() {
        let controller = invoices().await;
        assert!(matches!(
            controller.sort_by("memo", SortDirection::Asc),
            Err(RecordError::UnknownSort { .. })
        ));
        controller
            .sort_by("total_amount", SortDirection::Desc)
            .unwrap();
        assert_eq!(controller.visible()[0].id, 2);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_dialog_open() {
        let controller = invoices().await;
        controller.open_create();
        let err = controller.save().await.unwrap_err();
        assert!(matches!(err, RecordError::Validation { .. }));
        assert!(controller.dialog().is_open());
        assert_eq!(
            controller.notifications().last().unwrap().severity,
            Severity::Error
        );
    }

    #[tokio::test]
    async fn test_transition_rejected_locally() {
        let controller = invoices().await;
        let err = controller
            .transition(2, InvoiceStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidTransition { .. }));
        assert_eq!(
            controller.records()[1].status,
            InvoiceStatus::Paid,
            "record untouched"
        );
    }

    #[tokio::test]
    async fn test_declined_delete() {
        let repository = Arc::new(InMemoryRepository::new(sample::assets()));
        let controller: PageController<Asset> =
            PageController::new(repository, pages::assets::definition());
        controller.reload().await.unwrap();

        assert!(!controller.delete(3, &NeverConfirm).await.unwrap());
        assert_eq!(controller.records().len(), 8);

        assert!(controller.delete(3, &AlwaysConfirm).await.unwrap());
        assert_eq!(controller.records().len(), 7);
        assert!(controller.records().iter().all(|a| a.status != AssetStatus::Repair));
    }
}
