//! Resolution side of the controller.
//!
//! Applies the outcome of each remote call to [`App`]. This is the only place
//! the authoritative collection changes after the initial load is issued.

use crate::app::{
    App, AppEvent, ERR_CREATE, ERR_DELETE, ERR_LOAD, ERR_TOGGLE_ALL, ERR_UPDATE,
};
use crate::model::Todo;

/// Handle one event sent by a background task.
pub fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Loaded(result) => handle_loaded(app, result),
        AppEvent::Created(result) => handle_created(app, result),
        AppEvent::Deleted { id, result } => handle_deleted(app, id, result),
        AppEvent::Updated { todo, result } => handle_updated(app, todo, result),
        AppEvent::ToggleAllSettled {
            completed,
            ids,
            failed,
        } => handle_toggle_all_settled(app, completed, &ids, failed),
    }
    app.request_focus();
    app.needs_redraw = true;
}

fn handle_loaded(app: &mut App, result: Result<Vec<Todo>, String>) {
    app.loading = false;
    match result {
        Ok(todos) => {
            tracing::info!(count = todos.len(), "Loaded todos");
            app.todos = todos;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load todos");
            app.notify(ERR_LOAD);
        }
    }
}

fn handle_created(app: &mut App, result: Result<Todo, String>) {
    app.pending = None;
    match result {
        Ok(todo) => {
            tracing::debug!(id = todo.id, "Todo created");
            // A reload issued while the create was in flight may already
            // hold the new record.
            match app.todos.iter_mut().find(|t| t.id == todo.id) {
                Some(slot) => *slot = todo,
                None => app.todos.push(todo),
            }
            app.request_clear_input();
        }
        Err(e) => {
            tracing::warn!(error = %e, "Create failed, candidate discarded");
            app.notify(ERR_CREATE);
        }
    }
}

fn handle_deleted(app: &mut App, id: u32, result: Result<(), String>) {
    app.deleting_ids.remove(&id);
    match result {
        Ok(()) => {
            tracing::debug!(id, "Todo deleted");
            app.todos.retain(|t| t.id != id);
            app.deselect_if(id);
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "Delete failed");
            app.notify(ERR_DELETE);
        }
    }
}

fn handle_updated(app: &mut App, todo: Todo, result: Result<Todo, String>) {
    let id = todo.id;
    app.updating_ids.remove(&id);
    match result {
        Ok(_) => {
            tracing::debug!(id, "Todo updated");
            if let Some(slot) = app.todos.iter_mut().find(|t| t.id == id) {
                *slot = todo;
            }
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "Update failed");
            app.notify(ERR_UPDATE);
        }
    }
    app.deselect_if(id);
}

fn handle_toggle_all_settled(app: &mut App, completed: bool, ids: &[u32], failed: usize) {
    for id in ids {
        app.toggling_ids.remove(id);
    }

    if failed > 0 {
        // Local state still converges below, so it now differs from the store
        // for the failed todos until the next load.
        tracing::warn!(
            failed,
            total = ids.len(),
            completed,
            "Toggle-all partially failed, applying target locally"
        );
        app.notify(ERR_TOGGLE_ALL);
    }

    for todo in &mut app.todos {
        todo.completed = completed;
    }
}
