use async_trait::async_trait;
use super::todo::{Todo, TodoFields, TodoId};

/// Server-side persistence behind the reference collection.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn create(&self, input: TodoFields) -> anyhow::Result<Todo>;
    async fn get(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    async fn list(&self) -> anyhow::Result<Vec<Todo>>;
    async fn update(&self, id: TodoId, input: TodoFields) -> anyhow::Result<Option<Todo>>;
    async fn delete(&self, id: TodoId) -> anyhow::Result<bool>;
}
