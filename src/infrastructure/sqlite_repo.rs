use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::{SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use super::error::StorageError;
use crate::domain::{
    repository::TodoRepository,
    todo::{Todo, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = if is_memory_url(database_url) {
            // Every in-memory connection is its own database; pin one and never recycle it.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options.connect(database_url).await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        tracing::debug!("todos table ready");
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, title, completed FROM todos ORDER BY id")
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, title, completed FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_todo).transpose()
    }

    async fn save(&self, mut todo: Todo) -> Result<Todo> {
        let id = match todo.id {
            None => {
                let result = sqlx::query("INSERT INTO todos (title, completed) VALUES (?1, ?2)")
                    .bind(&todo.title)
                    .bind(todo.completed)
                    .execute(&*self.pool)
                    .await?;
                TodoId(result.last_insert_rowid())
            }
            Some(id) => {
                // Full overwrite; an unknown id is inserted as-is.
                sqlx::query(
                    "INSERT INTO todos (id, title, completed) VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET title = excluded.title, completed = excluded.completed",
                )
                .bind(id.0)
                .bind(&todo.title)
                .bind(todo.completed)
                .execute(&*self.pool)
                .await?;
                id
            }
        };
        tracing::debug!(%id, "todo saved");
        todo.id = Some(id);
        Ok(todo)
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        tracing::debug!(%id, removed = result.rows_affected(), "todo delete");
        Ok(())
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    let id: i64 = row.try_get("id").map_err(|e| StorageError::InvalidRow(e.to_string()))?;
    let title: String = row.try_get("title").map_err(|e| StorageError::InvalidRow(e.to_string()))?;
    let completed: bool = row.try_get("completed").map_err(|e| StorageError::InvalidRow(e.to_string()))?;
    Ok(Todo { id: Some(TodoId(id)), title, completed })
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

/// Makes sure a file-backed `sqlite://` URL points at an existing file, creating
/// parent directories as needed.
pub fn prepare_sqlite_file(database_url: &str) -> Result<()> {
    if is_memory_url(database_url) { return Ok(()); }
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        // On Windows, absolute paths may look like /C:/path; strip the leading slash
        let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
            &path[1..]
        } else {
            path
        };
        use std::{fs, fs::OpenOptions, path::Path};
        let p = Path::new(path);
        if let Some(parent) = p.parent() { if !parent.as_os_str().is_empty() { fs::create_dir_all(parent)?; } }
        if !p.exists() {
            let _ = OpenOptions::new().create(true).append(true).open(p)?;
        }
    }
    Ok(())
}
