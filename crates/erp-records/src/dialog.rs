//! Detail dialog state machine

use crate::error::{RecordError, RecordResult};
use erp_core::{Patch, Record, RecordId};
use validator::Validate;

/// What the detail dialog currently shows
#[derive(Debug, Clone)]
pub enum DialogState<R: Record> {
    /// Dialog hidden
    Closed,
    /// Read-only view of a record
    Viewing(RecordId),
    /// Form for a new record
    Creating(R),
    /// Form editing an existing record
    Editing {
        /// Record being edited
        id: RecordId,
        /// Fields changed so far
        patch: R::Patch,
    },
}

impl<R: Record> DialogState<R> {
    /// Name of the state, for logs and errors
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Viewing(_) => "viewing",
            Self::Creating(_) => "creating",
            Self::Editing { .. } => "editing",
        }
    }

    /// Whether the dialog is visible
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// A save the dialog is ready to submit
#[derive(Debug, Clone)]
pub enum Submission<R: Record> {
    /// Create a new record from a validated draft
    Create(R),
    /// Apply a patch to an existing record
    Update {
        /// Target id
        id: RecordId,
        /// Changed fields
        patch: R::Patch,
    },
}

/// The detail dialog of a page
#[derive(Debug, Clone)]
pub struct DetailDialog<R: Record> {
    state: DialogState<R>,
}

impl<R: Record> DetailDialog<R> {
    /// Closed dialog
    pub const fn new() -> Self {
        Self {
            state: DialogState::Closed,
        }
    }

    /// Current state
    pub const fn state(&self) -> &DialogState<R> {
        &self.state
    }

    /// Show a record read-only
    pub fn view(&mut self, id: RecordId) {
        self.state = DialogState::Viewing(id);
    }

    /// Start a new record from `draft`
    pub fn create(&mut self, draft: R) {
        self.state = DialogState::Creating(draft);
    }

    /// Start editing a record with an empty patch
    pub fn edit(&mut self, id: RecordId) {
        self.state = DialogState::Editing {
            id,
            patch: R::Patch::default(),
        };
    }

    /// Change the draft of a create form; ignored in other states
    pub fn update_draft(&mut self, change: impl FnOnce(&mut R)) -> bool {
        if let DialogState::Creating(draft) = &mut self.state {
            change(draft);
            true
        } else {
            false
        }
    }

    /// Change the patch of an edit form; ignored in other states
    pub fn update_patch(&mut self, change: impl FnOnce(&mut R::Patch)) -> bool {
        if let DialogState::Editing { patch, .. } = &mut self.state {
            change(patch);
            true
        } else {
            false
        }
    }

    /// Hide the dialog, discarding unsaved input
    pub fn close(&mut self) {
        self.state = DialogState::Closed;
    }

    /// Validate the form and produce the save to perform
    ///
    /// Edits are validated against `current` with the patch applied.
    pub fn submission(&self, current: Option<&R>) -> RecordResult<Submission<R>> {
        match &self.state {
            DialogState::Creating(draft) => {
                draft.validate()?;
                Ok(Submission::Create(draft.clone()))
            }
            DialogState::Editing { id, patch } => {
                let current = current.ok_or(RecordError::NotFound {
                    resource: R::RESOURCE,
                    id: *id,
                })?;
                let mut preview = current.clone();
                patch.apply(&mut preview);
                preview.validate()?;
                Ok(Submission::Update {
                    id: *id,
                    patch: patch.clone(),
                })
            }
            other => Err(RecordError::NothingToSave {
                state: other.name(),
            }),
        }
    }

    /// Id of the record the dialog is about, if any
    pub const fn target(&self) -> Option<RecordId> {
        match &self.state {
            DialogState::Viewing(id) | DialogState::Editing { id, .. } => Some(*id),
            DialogState::Closed | DialogState::Creating(_) => None,
        }
    }
}

impl<R: Record> Default for DetailDialog<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use erp_core::{
        status::NoticeStatus,
        types::{Notice, NoticePatch},
    };
    use pretty_assertions::assert_eq;

    fn notice() -> Notice {
        Notice {
            id: 4,
            document_id: "NT-004".to_string(),
            title: "연말 정산 안내".to_string(),
            category: "hr".to_string(),
            author: "인사팀".to_string(),
            content: "서류 제출 기한은 1월 31일입니다.".to_string(),
            created_at: "2024-01-02 10:00:00".to_string(),
            views: 12,
            is_pinned: false,
            status: NoticeStatus::Published,
        }
    }

    #[test]
    fn test_state_transitions() {
        let mut dialog = DetailDialog::<Notice>::new();
        assert!(!dialog.state().is_open());

        dialog.view(4);
        assert_eq!(dialog.state().name(), "viewing");
        assert_eq!(dialog.target(), Some(4));

        dialog.edit(4);
        assert!(dialog.update_patch(|patch| patch.is_pinned = Some(true)));
        assert!(!dialog.update_draft(|draft| draft.views = 0));

        dialog.close();
        assert_eq!(dialog.state().name(), "closed");
        assert_eq!(dialog.target(), None);
    }

    #[test]
    fn test_create_submission_validates_draft() {
        let mut dialog = DetailDialog::new();
        let mut draft = notice();
        draft.title = String::new();
        dialog.create(draft);

        let err = dialog.submission(None).unwrap_err();
        assert!(matches!(err, RecordError::Validation { ref fields } if fields == "title"));

        dialog.update_draft(|draft| draft.title = "새 공지".to_string());
        assert!(matches!(
            dialog.submission(None).unwrap(),
            Submission::Create(_)
        ));
    }

    #[test]
    fn test_edit_submission_validates_patched_record() {
        let current = notice();
        let mut dialog = DetailDialog::<Notice>::new();
        dialog.edit(current.id);
        dialog.update_patch(|patch| patch.title = Some(String::new()));

        assert!(dialog.submission(Some(&current)).is_err());

        dialog.update_patch(|patch| patch.title = Some("수정된 제목".to_string()));
        match dialog.submission(Some(&current)).unwrap() {
            Submission::Update { id, patch } => {
                assert_eq!(id, 4);
                assert_eq!(
                    patch,
                    NoticePatch {
                        title: Some("수정된 제목".to_string()),
                        ..NoticePatch::default()
                    }
                );
            }
            Submission::Create(_) => panic!("expected update"),
        }
    }

    #[test]
    fn test_edit_of_missing_record() {
        let mut dialog = DetailDialog::<Notice>::new();
        dialog.edit(99);
        let err = dialog.submission(None).unwrap_err();
        assert!(matches!(err, RecordError::NotFound { id: 99, .. }));
    }

    #[test]
    fn test_closed_dialog_has_nothing_to_save() {
        let dialog = DetailDialog::<Notice>::new();
        let err = dialog.submission(None).unwrap_err();
        assert!(matches!(err, RecordError::NothingToSave { state: "closed" }));
    }
}
