//! Keeps the local list and form draft consistent with the remote collection.
//!
//! Every successful mutation is followed by a full LIST; the list is never
//! patched locally. All operations take `&mut self`, so requests issued through
//! one synchronizer are strictly sequential and at most one refresh is ever in
//! flight. Failures are reported to the notifier before the operation returns.

use tracing::{debug, info, warn};

use super::notice::{Notice, Notifier};
use crate::domain::collection::TodoCollection;
use crate::domain::todo::{Draft, Field, Todo, TodoId};
use crate::error::SyncError;

pub const ADDED: &str = "Todo added successfully";
pub const UPDATED: &str = "Todo updated successfully";
pub const REMOVED: &str = "Todo removed.";
pub const ADD_FAILED: &str = "Failed to add todo";
pub const UPDATE_FAILED: &str = "Failed to update todo";
pub const DELETE_FAILED: &str = "Failed to delete todo";
pub const FETCH_FAILED: &str = "Some error occured.";

/// Operations return the failure for callers that want to branch on it; it has
/// already been reported to the notifier, so ignoring the value is fine.
pub struct TodoSynchronizer<C: TodoCollection, N: Notifier> {
    collection: C,
    notifier: N,
    list: Vec<Todo>,
    draft: Draft,
}

impl<C: TodoCollection, N: Notifier> TodoSynchronizer<C, N> {
    pub fn new(collection: C, notifier: N) -> Self {
        Self { collection, notifier, list: Vec::new(), draft: Draft::default() }
    }

    /// The last successfully fetched list.
    pub fn list(&self) -> &[Todo] { &self.list }

    pub fn draft(&self) -> &Draft { &self.draft }

    pub fn notifier(&self) -> &N { &self.notifier }

    pub fn notifier_mut(&mut self) -> &mut N { &mut self.notifier }

    pub async fn fetch_all(&mut self) -> Result<(), SyncError> {
        match self.collection.list().await {
            Ok(todos) => {
                debug!(count = todos.len(), "list refreshed");
                self.list = todos;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "list fetch failed");
                self.notifier.notify(Notice::error(FETCH_FAILED));
                Err(SyncError::Fetch(e))
            }
        }
    }

    /// Creates or updates depending on whether the draft already has an id.
    pub async fn submit(&mut self) -> Result<(), SyncError> {
        match self.draft {
            Draft::New(_) => self.create().await,
            Draft::Editing(..) => self.update().await,
        }
    }

    pub async fn create(&mut self) -> Result<(), SyncError> {
        if self.draft.is_editing() {
            return self.reject(SyncError::WrongMode { expected: "create" });
        }
        if let Err(e) = self.draft.fields().validate() { return self.reject(e); }
        let payload = self.draft.payload();
        match self.collection.create(&payload).await {
            Ok(()) => {
                info!(title = %payload.title, "todo created");
                self.after_mutation(Notice::success(ADDED), true).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "create failed");
                self.notifier.notify(Notice::error(ADD_FAILED));
                Err(SyncError::Create(e))
            }
        }
    }

    /// On failure the draft is kept so the edit can be retried.
    pub async fn update(&mut self) -> Result<(), SyncError> {
        let Some(id) = self.draft.id() else {
            return self.reject(SyncError::WrongMode { expected: "edit" });
        };
        if let Err(e) = self.draft.fields().validate() { return self.reject(e); }
        let payload = self.draft.payload();
        match self.collection.update(id, &payload).await {
            Ok(()) => {
                info!(%id, "todo updated");
                self.after_mutation(Notice::info(UPDATED), true).await;
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "update failed");
                self.notifier.notify(Notice::error(UPDATE_FAILED));
                Err(SyncError::Update(e))
            }
        }
    }

    /// Deleting leaves the draft alone, even when it is editing the removed todo.
    pub async fn remove(&mut self, id: TodoId) -> Result<(), SyncError> {
        match self.collection.delete(id).await {
            Ok(()) => {
                info!(%id, "todo deleted");
                self.after_mutation(Notice::info(REMOVED), false).await;
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "delete failed");
                self.notifier.notify(Notice::error(DELETE_FAILED));
                Err(SyncError::Delete(e))
            }
        }
    }

    pub fn begin_edit(&mut self, todo: &Todo) {
        debug!(id = %todo.id, "editing");
        self.draft = Draft::from(todo);
    }

    /// Back to an empty draft in create mode.
    pub fn reset(&mut self) { self.draft = Draft::default(); }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) { self.draft.set(field, value); }

    /// Applies a form edit addressed by input name. Unknown names leave the draft untouched.
    pub fn apply_input(&mut self, name: &str, value: impl Into<String>) -> Result<(), SyncError> {
        match name.parse::<Field>() {
            Ok(field) => {
                self.draft.set(field, value);
                Ok(())
            }
            Err(e) => self.reject(e),
        }
    }

    async fn after_mutation(&mut self, notice: Notice, reset_draft: bool) {
        if reset_draft { self.draft = Draft::default(); }
        self.notifier.notify(notice);
        // a failed refresh has already been reported and keeps the previous list
        let _ = self.fetch_all().await;
    }

    fn reject(&mut self, e: SyncError) -> Result<(), SyncError> {
        debug!(error = %e, "rejected locally");
        self.notifier.notify(Notice::error(e.to_string()));
        Err(e)
    }
}
