//! Terminal User Interface.
//!
//! A thin presentation layer over [`crate::app::App`] and
//! [`crate::sync::Dispatcher`]: it turns key presses into controller
//! operations and renders whatever the session currently holds.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling per mode
//! - `render` - Frame rendering

mod input;
mod loop_runner;
mod render;

pub use loop_runner::{run, Action};

use crate::app::{App, Row};
use crate::model::Todo;

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Typing a new todo into the entry line.
    Entry,
    /// Moving through the list and acting on rows.
    List,
    /// Rewriting the title of the selected todo.
    Edit,
}

/// UI-local state that the controller does not need to know about.
#[derive(Debug)]
pub(crate) struct Screen {
    pub(crate) mode: Mode,
    /// Text of the new-todo entry line.
    pub(crate) entry: String,
    /// Title being edited in [`Mode::Edit`].
    pub(crate) edit: String,
    /// Index into [`App::rows`].
    pub(crate) cursor: usize,
}

impl Screen {
    pub(crate) fn new() -> Self {
        Self {
            mode: Mode::Entry,
            entry: String::new(),
            edit: String::new(),
            cursor: 0,
        }
    }

    /// The persisted todo under the cursor, if any.
    pub(crate) fn todo_at_cursor(&self, app: &App) -> Option<Todo> {
        match app.rows().get(self.cursor) {
            Some(Row::Persisted(todo)) => Some((*todo).clone()),
            _ => None,
        }
    }

    /// Keep the cursor inside the rendered rows.
    pub(crate) fn clamp_cursor(&mut self, app: &App) {
        let len = app.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Apply the requests the controller raised since the last frame.
    ///
    /// - a clear-input request empties the entry line
    /// - an edit whose selection was released returns to the list, or to the
    ///   entry line if focus was requested alongside it
    pub(crate) fn sync_with(&mut self, app: &mut App) {
        if app.take_clear_input() {
            self.entry.clear();
        }
        let focus = app.take_focus_request();
        if self.mode == Mode::Edit && app.selected().is_none() {
            self.edit.clear();
            self.mode = if focus { Mode::Entry } else { Mode::List };
        }
        self.clamp_cursor(app);
    }
}
