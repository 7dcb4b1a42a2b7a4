use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use async_trait::async_trait;

use super::error::StorageError;
use crate::domain::{
    repository::TodoRepository,
    todo::{Todo, TodoId},
};

#[derive(Debug)]
struct State {
    items: BTreeMap<TodoId, Todo>,
    // `None` once an explicit id of `i64::MAX` has been stored.
    next_id: Option<i64>,
}

impl Default for State {
    fn default() -> Self { Self { items: BTreeMap::new(), next_id: Some(1) } }
}

/// Process-local store. Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryTodoRepository {
    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        Ok(self.state.lock().map_err(|_| StorageError::Poisoned)?)
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn init(&self) -> Result<()> { Ok(()) }

    async fn find_all(&self) -> Result<Vec<Todo>> {
        Ok(self.lock()?.items.values().cloned().collect())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        Ok(self.lock()?.items.get(&id).cloned())
    }

    async fn save(&self, mut todo: Todo) -> Result<Todo> {
        let mut state = self.lock()?;
        let id = match todo.id {
            Some(id) => id,
            None => TodoId(state.next_id.ok_or(StorageError::IdsExhausted)?),
        };
        // Keep the sequence ahead of explicitly supplied ids.
        state.next_id = match (state.next_id, id.0.checked_add(1)) {
            (Some(next), Some(after)) => Some(next.max(after)),
            _ => None,
        };
        todo.id = Some(id);
        state.items.insert(id, todo.clone());
        Ok(todo)
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<()> {
        self.lock()?.items.remove(&id);
        Ok(())
    }
}
