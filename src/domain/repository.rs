use async_trait::async_trait;
use super::todo::{Todo, TodoId};

/// Storage collaborator behind the todo service.
///
/// `save` is an upsert: a todo without an id gets a fresh one, a todo with an
/// id replaces whatever is stored under it (or is inserted under it).
/// `delete_by_id` on an unknown id is a no-op.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn find_all(&self) -> anyhow::Result<Vec<Todo>>;
    async fn find_by_id(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    async fn save(&self, todo: Todo) -> anyhow::Result<Todo>;
    async fn delete_by_id(&self, id: TodoId) -> anyhow::Result<()>;
}
