use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A todo item. `id` stays `None` until the storage layer persists it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(default)]
    pub id: Option<TodoId>,
    #[serde(default)]
    pub title: String,
    // Wire name is fixed; clients key on "completed".
    #[serde(rename = "completed", default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self { id: None, title: title.into(), completed }
    }

    pub fn is_completed(&self) -> bool { self.completed }

    pub fn set_completed(&mut self, completed: bool) { self.completed = completed; }
}
