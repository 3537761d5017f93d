use async_trait::async_trait;

use super::todo::{Todo, TodoId, TodoPayload};
use crate::error::CollectionError;

/// The remote set of persisted todos, as seen by the client. Create and
/// update send the draft's payload as is.
#[async_trait]
pub trait TodoCollection: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Todo>, CollectionError>;
    async fn create(&self, payload: &TodoPayload) -> Result<(), CollectionError>;
    async fn update(&self, id: TodoId, payload: &TodoPayload) -> Result<(), CollectionError>;
    async fn delete(&self, id: TodoId) -> Result<(), CollectionError>;
}
