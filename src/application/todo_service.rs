use crate::domain::repository::TodoRepository;
use crate::domain::todo::{Todo, TodoId};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn find_all(&self) -> Result<Vec<Todo>>;
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>>;
    async fn save(&self, todo: Todo) -> Result<Todo>;
    async fn delete_by_id(&self, id: TodoId) -> Result<()>;
}

/// Pass-through service; every call goes straight to the repository.
#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn find_all(&self) -> Result<Vec<Todo>> { self.repo.find_all().await }
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> { self.repo.find_by_id(id).await }
    async fn save(&self, todo: Todo) -> Result<Todo> { self.repo.save(todo).await }
    async fn delete_by_id(&self, id: TodoId) -> Result<()> { self.repo.delete_by_id(id).await }
}
