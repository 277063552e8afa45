//! Session state of the synchronization controller.
//!
//! [`App`] owns the authoritative todo collection and everything the
//! presentation layer renders: the filter, the selected todo, per-item
//! in-flight markers, the pending row of an unresolved create and the
//! single-slot notification. It is only mutated on the event loop's thread,
//! either by [`crate::sync::Dispatcher`] when an operation is issued or by
//! [`crate::sync::handle_app_event`] when one resolves.

use crate::model::{project, Filter, NewTodo, Todo};
use std::borrow::Cow;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

/// Default lifetime of a notification.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Notification Texts
// ============================================================================

pub const ERR_LOAD: &str = "Unable to load todos";
pub const ERR_CREATE: &str = "Unable to add a todo";
pub const ERR_DELETE: &str = "Unable to delete a todo";
pub const ERR_UPDATE: &str = "Unable to update a todo";
pub const ERR_TOGGLE_ALL: &str = "Unable to update some todos";
pub const ERR_EMPTY_TITLE: &str = "Title should not be empty";

// ============================================================================
// Events and Rows
// ============================================================================

/// Results of remote calls, sent from spawned tasks back to the event loop.
///
/// Errors are carried as strings: the controller only needs the outcome and
/// something to log.
#[derive(Debug)]
pub enum AppEvent {
    /// Fetch-all resolved.
    Loaded(Result<Vec<Todo>, String>),
    /// Create resolved. `Ok` carries the server-assigned record.
    Created(Result<Todo, String>),
    /// Delete of `id` resolved.
    Deleted { id: u32, result: Result<(), String> },
    /// Update of `todo.id` resolved. `todo` is the record that was sent.
    Updated {
        todo: Todo,
        result: Result<Todo, String>,
    },
    /// Every call of a toggle-all batch has settled.
    ///
    /// Fields:
    /// - `completed`: the target value of the batch
    /// - `ids`: the todos the batch sent to the store
    /// - `failed`: how many of those calls failed
    ToggleAllSettled {
        completed: bool,
        ids: Vec<u32>,
        failed: usize,
    },
}

/// One line of the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    /// A todo from the authoritative collection.
    Persisted(&'a Todo),
    /// The candidate of an unresolved create.
    Pending(&'a NewTodo),
}

/// The single visible notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: Cow<'static, str>,
    pub raised_at: Instant,
}

// ============================================================================
// Application State
// ============================================================================

/// Central session state.
pub struct App {
    /// Owning user; `None` means the session is not configured and no remote
    /// call may be issued.
    user_id: Option<u32>,

    // Data
    /// Authoritative collection, in server order then append order.
    pub(crate) todos: Vec<Todo>,
    /// Candidate shown while a create is in flight. At most one.
    pub(crate) pending: Option<NewTodo>,

    // UI-facing state
    pub(crate) filter: Filter,
    /// Todo currently being edited.
    pub(crate) selected: Option<Todo>,
    pub(crate) notification: Option<Notification>,
    notification_ttl: Duration,

    // In-flight markers
    pub(crate) loading: bool,
    pub(crate) deleting_ids: HashSet<u32>,
    pub(crate) updating_ids: HashSet<u32>,
    pub(crate) toggling_ids: HashSet<u32>,

    // Requests to the presentation layer, consumed with take_*
    focus_requested: bool,
    clear_input_requested: bool,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(user_id: Option<u32>) -> Self {
        Self::with_notification_ttl(user_id, NOTIFICATION_TTL)
    }

    pub fn with_notification_ttl(user_id: Option<u32>, notification_ttl: Duration) -> Self {
        Self {
            user_id,
            todos: Vec::new(),
            pending: None,
            filter: Filter::All,
            selected: None,
            notification: None,
            notification_ttl,
            loading: false,
            deleting_ids: HashSet::new(),
            updating_ids: HashSet::new(),
            toggling_ids: HashSet::new(),
            focus_requested: false,
            clear_input_requested: false,
            needs_redraw: true,
        }
    }

    pub fn user_id(&self) -> Option<u32> {
        self.user_id
    }

    /// False when no owning user was supplied at startup.
    pub fn is_configured(&self) -> bool {
        self.user_id.is_some()
    }

    // ------------------------------------------------------------------
    // Collection and projection
    // ------------------------------------------------------------------

    /// The authoritative collection.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn todo(&self, id: u32) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Todos matching the active filter, in collection order.
    pub fn visible_todos(&self) -> Vec<&Todo> {
        project(&self.todos, self.filter)
    }

    /// What the list renders: the filtered todos followed by the pending
    /// row, which is shown whatever the filter.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows: Vec<Row<'_>> = self
            .visible_todos()
            .into_iter()
            .map(Row::Persisted)
            .collect();
        if let Some(pending) = &self.pending {
            rows.push(Row::Pending(pending));
        }
        rows
    }

    pub fn pending(&self) -> Option<&NewTodo> {
        self.pending.as_ref()
    }

    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.len() - self.active_count()
    }

    /// True when the list is non-empty and every todo is completed.
    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    // ------------------------------------------------------------------
    // Filter and selection
    // ------------------------------------------------------------------

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.needs_redraw = true;
    }

    pub fn selected(&self) -> Option<&Todo> {
        self.selected.as_ref()
    }

    /// Mark `todo` as the one being edited.
    pub fn select(&mut self, todo: Todo) {
        self.selected = Some(todo);
        self.needs_redraw = true;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.needs_redraw = true;
    }

    /// Clear the selection if it refers to `id`.
    pub(crate) fn deselect_if(&mut self, id: u32) {
        if self.selected.as_ref().is_some_and(|t| t.id == id) {
            self.clear_selection();
        }
    }

    // ------------------------------------------------------------------
    // In-flight status
    // ------------------------------------------------------------------

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_creating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deleting_ids(&self) -> &HashSet<u32> {
        &self.deleting_ids
    }

    pub fn updating_ids(&self) -> &HashSet<u32> {
        &self.updating_ids
    }

    pub fn toggling_ids(&self) -> &HashSet<u32> {
        &self.toggling_ids
    }

    /// True while any remote call touching `id` is unresolved.
    pub fn is_busy(&self, id: u32) -> bool {
        self.deleting_ids.contains(&id)
            || self.updating_ids.contains(&id)
            || self.toggling_ids.contains(&id)
    }

    // ------------------------------------------------------------------
    // Notification
    // ------------------------------------------------------------------

    /// Show `msg`, replacing whatever is visible. Expires after the TTL.
    pub fn notify(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.notification = Some(Notification {
            message: msg.into(),
            raised_at: Instant::now(),
        });
        self.needs_redraw = true;
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.message.as_ref())
    }

    pub fn dismiss_notification(&mut self) {
        if self.notification.take().is_some() {
            self.needs_redraw = true;
        }
    }

    /// Clear the notification if it has outlived the TTL.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_notification(&mut self) -> bool {
        let expired = self
            .notification
            .as_ref()
            .is_some_and(|n| n.raised_at.elapsed() >= self.notification_ttl);
        if expired {
            self.notification = None;
            self.needs_redraw = true;
        }
        expired
    }

    // ------------------------------------------------------------------
    // Presentation requests
    // ------------------------------------------------------------------

    /// Ask the presentation layer to move focus back to the entry line.
    pub fn request_focus(&mut self) {
        self.focus_requested = true;
        self.needs_redraw = true;
    }

    /// Consume a pending focus request.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub(crate) fn request_clear_input(&mut self) {
        self.clear_input_requested = true;
    }

    /// Consume a pending request to clear the entry line.
    pub fn take_clear_input(&mut self) -> bool {
        std::mem::take(&mut self.clear_input_requested)
    }
}
