//! Todo records and the filtered projection over them.

use serde::{Deserialize, Serialize};

// ============================================================================
// Records
// ============================================================================

/// A todo persisted by the remote store.
///
/// `id` is assigned by the server and unique within a session's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u32,
    pub title: String,
    pub completed: bool,
    pub user_id: u32,
}

impl Todo {
    /// Copy of this todo with `completed` set to `completed`.
    pub fn with_completed(&self, completed: bool) -> Self {
        Self {
            completed,
            ..self.clone()
        }
    }

    /// Copy of this todo with a new title.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// A todo that has not been persisted yet.
///
/// Sent as the body of a create call and shown as the pending row while
/// that call is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub user_id: u32,
}

impl NewTodo {
    /// Build a candidate from raw entry text.
    ///
    /// The title is trimmed; an empty result yields `None`.
    pub fn from_input(raw: &str, user_id: u32) -> Option<Self> {
        let title = raw.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            completed: false,
            user_id,
        })
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Which todos the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// Next filter in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }
}

/// Todos matching `filter`, in collection order.
pub fn project(todos: &[Todo], filter: Filter) -> Vec<&Todo> {
    todos.iter().filter(|t| filter.matches(t)).collect()
}
