//! The record array of a page and the operations that change it
//!
//! Records are held behind [`Arc`] so an update replaces only the touched
//! element; every other element keeps its identity.

use crate::error::{RecordError, RecordResult};
use erp_core::{Patch, Record, RecordId, Status, utils::next_id};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

/// Blocking confirmation prompt gating destructive actions
pub trait Confirm: Send + Sync {
    /// Ask the user; `true` proceeds
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Prompt that always accepts
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Prompt that always declines
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _message: &str) -> bool {
        false
    }
}

/// Confirmation text shown before deleting a record
pub fn delete_prompt<R: Record>(record: &R) -> String {
    format!("{} 항목을 삭제하시겠습니까?", record.code())
}

/// Ordered record array with id-based mutation
#[derive(Debug)]
pub struct RecordSet<R> {
    records: Vec<Arc<R>>,
}

impl<R> Clone for RecordSet<R> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
        }
    }
}

impl<R> Default for RecordSet<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> RecordSet<R> {
    /// Wrap owned records
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    /// Records in display order
    pub fn records(&self) -> &[Arc<R>] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record
    pub fn get(&self, id: RecordId) -> Option<&Arc<R>> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Look up a record or fail with `NotFound`
    pub fn require(&self, id: RecordId) -> RecordResult<&Arc<R>> {
        self.get(id).ok_or(RecordError::NotFound {
            resource: R::RESOURCE,
            id,
        })
    }

    fn position(&self, id: RecordId) -> RecordResult<usize> {
        self.records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(RecordError::NotFound {
                resource: R::RESOURCE,
                id,
            })
    }

    /// Id the next created record receives
    pub fn next_id(&self) -> RecordId {
        next_id(self.records.iter().map(|record| record.id()))
    }

    /// Validate `draft`, give it the next id and append it
    pub fn create(&mut self, mut draft: R) -> RecordResult<Arc<R>> {
        draft.validate()?;
        draft.set_id(self.next_id());
        let record = Arc::new(draft);
        self.records.push(Arc::clone(&record));
        debug!(resource = R::RESOURCE, id = record.id(), "record created");
        Ok(record)
    }

    /// Append a record that already carries its id, replacing any record with the same id
    pub fn upsert(&mut self, record: R) -> Arc<R> {
        let id = record.id();
        let record = Arc::new(record);
        match self.records.iter_mut().find(|existing| existing.id() == id) {
            Some(slot) => *slot = Arc::clone(&record),
            None => self.records.push(Arc::clone(&record)),
        }
        record
    }

    /// Apply `patch` to one record
    ///
    /// Only the fields present in the patch change. The patched record is
    /// validated before it replaces the old one.
    pub fn update(&mut self, id: RecordId, patch: &R::Patch) -> RecordResult<Arc<R>> {
        let index = self.position(id)?;
        let slot = self
            .records
            .get_mut(index)
            .ok_or(RecordError::NotFound {
                resource: R::RESOURCE,
                id,
            })?;

        let mut updated = R::clone(slot);
        patch.apply(&mut updated);
        updated.validate()?;

        *slot = Arc::new(updated);
        debug!(resource = R::RESOURCE, id, "record updated");
        Ok(Arc::clone(slot))
    }

    /// Replace a whole record with the same id
    pub fn replace(&mut self, record: R) -> RecordResult<Arc<R>> {
        let id = record.id();
        record.validate()?;
        let index = self.position(id)?;
        let record = Arc::new(record);
        if let Some(slot) = self.records.get_mut(index) {
            *slot = Arc::clone(&record);
        }
        Ok(record)
    }

    /// Move a record to `next` if the transition table allows it
    pub fn transition(&mut self, id: RecordId, next: R::Status) -> RecordResult<Arc<R>> {
        let current = self.require(id)?;
        let from = current.status();
        if !from.can_transition_to(next) {
            return Err(RecordError::InvalidTransition {
                from: from.to_string(),
                to: next.to_string(),
            });
        }

        let mut updated = R::clone(current);
        updated.set_status(next);
        debug!(resource = R::RESOURCE, id, %from, to = %next, "status changed");
        self.replace(updated)
    }

    /// Remove a record unconditionally
    pub fn remove(&mut self, id: RecordId) -> RecordResult<Arc<R>> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        debug!(resource = R::RESOURCE, id, "record removed");
        Ok(removed)
    }

    /// Remove a record after the prompt accepts; `Ok(false)` when declined
    pub fn delete(&mut self, id: RecordId, confirm: &dyn Confirm) -> RecordResult<bool> {
        let prompt = delete_prompt(self.require(id)?.as_ref());
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        self.remove(id)?;
        Ok(true)
    }

    /// Owned copies of every record
    pub fn to_vec(&self) -> Vec<R> {
        self.records.iter().map(|record| R::clone(record)).collect()
    }
}

impl<R: Record> FromIterator<R> for RecordSet<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
