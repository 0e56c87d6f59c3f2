//! Record repositories: the data source behind a page

use crate::{
    error::{RecordError, RecordResult},
    mutation::RecordSet,
};
use async_trait::async_trait;
use erp_core::{Record, RecordId, Status};
use parking_lot::{Mutex, RwLock};
use std::{fmt, time::Duration};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Which implementation backs a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Sample data held in memory
    InMemory,
    /// REST API
    Http,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InMemory => "in-memory",
            Self::Http => "http",
        })
    }
}

/// Source and sink of the records of one page
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Every record, in source order
    async fn list(&self) -> RecordResult<Vec<R>>;

    /// One record
    async fn get(&self, id: RecordId) -> RecordResult<R>;

    /// Store a new record; the repository assigns the id
    async fn create(&self, draft: R) -> RecordResult<R>;

    /// Apply a partial update
    async fn update(&self, id: RecordId, patch: &R::Patch) -> RecordResult<R>;

    /// Overwrite a whole record
    async fn replace(&self, record: R) -> RecordResult<R>;

    /// Remove a record
    async fn delete(&self, id: RecordId) -> RecordResult<()>;

    /// Implementation kind
    fn backend(&self) -> Backend;

    /// Move a record to another status, checked against the transition table
    async fn transition(&self, id: RecordId, next: R::Status) -> RecordResult<R> {
        let mut record = self.get(id).await?;
        let from = record.status();
        if !from.can_transition_to(next) {
            return Err(RecordError::InvalidTransition {
                from: from.to_string(),
                to: next.to_string(),
            });
        }
        record.set_status(next);
        self.replace(record).await
    }
}

/// Repository over an in-memory record array
pub struct InMemoryRepository<R: Record> {
    records: RwLock<RecordSet<R>>,
    delay: Duration,
    failure: Mutex<Option<String>>,
}

impl<R: Record> InMemoryRepository<R> {
    /// Repository holding `records`
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(RecordSet::new(records)),
            delay: Duration::ZERO,
            failure: Mutex::new(None),
        }
    }

    /// Empty repository
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Wait this long before answering each call
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail every call with `message`
    #[must_use]
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.set_failing(Some(message.into()));
        self
    }

    /// Start or stop failing calls
    pub fn set_failing(&self, message: Option<String>) {
        *self.failure.lock() = message;
    }

    /// Copy of the current records
    pub fn snapshot(&self) -> Vec<R> {
        self.records.read().to_vec()
    }

    async fn ready(&self, operation: &'static str) -> RecordResult<()> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        let failure = self.failure.lock().clone();
        if let Some(message) = failure {
            warn!(resource = R::RESOURCE, operation, %message, "simulated failure");
            return Err(RecordError::backend_message(message));
        }
        debug!(resource = R::RESOURCE, operation, "in-memory call");
        Ok(())
    }
}

impl<R: Record> fmt::Debug for InMemoryRepository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("resource", &R::RESOURCE)
            .field("records", &self.records.read().len())
            .field("delay", &self.delay)
            .field("failing", &self.failure.lock().is_some())
            .finish()
    }
}

impl<R: Record> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl<R: Record> Repository<R> for InMemoryRepository<R> {
    async fn list(&self) -> RecordResult<Vec<R>> {
        self.ready("list").await?;
        Ok(self.snapshot())
    }

    async fn get(&self, id: RecordId) -> RecordResult<R> {
        self.ready("get").await?;
        let records = self.records.read();
        let record = records.require(id)?;
        Ok(R::clone(record))
    }

    async fn create(&self, draft: R) -> RecordResult<R> {
        self.ready("create").await?;
        let created = self.records.write().create(draft)?;
        Ok(R::clone(&created))
    }

    async fn update(&self, id: RecordId, patch: &R::Patch) -> RecordResult<R> {
        self.ready("update").await?;
        let updated = self.records.write().update(id, patch)?;
        Ok(R::clone(&updated))
    }

    async fn replace(&self, record: R) -> RecordResult<R> {
        self.ready("replace").await?;
        let replaced = self.records.write().replace(record)?;
        Ok(R::clone(&replaced))
    }

    async fn delete(&self, id: RecordId) -> RecordResult<()> {
        self.ready("delete").await?;
        self.records.write().remove(id)?;
        Ok(())
    }

    fn backend(&self) -> Backend {
        Backend::InMemory
    }

    async fn transition(&self, id: RecordId, next: R::Status) -> RecordResult<R> {
        self.ready("transition").await?;
        let moved = self.records.write().transition(id, next)?;
        Ok(R::clone(&moved))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sample;
    use erp_core::{
        status::NoticeStatus,
        types::{Notice, NoticePatch},
    };
    use pretty_assertions::assert_eq;

    fn repository() -> InMemoryRepository<Notice> {
        InMemoryRepository::new(sample::notices())
    }

    #[tokio::test]
    async fn test_crud_round() {
        let repo = repository();
        let count = repo.list().await.unwrap().len();

        let mut draft = repo.get(1).await.unwrap();
        draft.title = "새 공지".to_string();
        let created = repo.create(draft).await.unwrap();
        assert_eq!(created.id, 7);

        let patch = NoticePatch {
            is_pinned: Some(false),
            ..NoticePatch::default()
        };
        let updated = repo.update(created.id, &patch).await.unwrap();
        assert!(!updated.is_pinned);

        repo.delete(created.id).await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), count);
        assert!(matches!(
            repo.get(created.id).await.unwrap_err(),
            RecordError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_transition_uses_table() {
        let repo = repository();
        let archived = repo.transition(1, NoticeStatus::Archived).await.unwrap();
        assert_eq!(archived.status, NoticeStatus::Archived);

        let err = repo.transition(1, NoticeStatus::Draft).await.unwrap_err();
        assert!(matches!(err, RecordError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_failure_switch() {
        let repo = repository().with_failure("connection refused");
        let err = repo.list().await.unwrap_err();
        assert!(err.is_backend());
        assert_eq!(err.to_string(), "Backend error: connection refused");

        repo.set_failing(None);
        assert!(repo.list().await.is_ok());
        assert_eq!(repo.backend().to_string(), "in-memory");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_applied() {
        let repo = repository().with_delay(Duration::from_millis(300));
        let started = tokio::time::Instant::now();
        repo.list().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
