//! Issuing side of the controller.
//!
//! Every operation marks its in-flight state on [`App`] synchronously, then
//! spawns one tokio task that performs the remote call(s) and sends a single
//! [`AppEvent`] describing the outcome. Spawned tasks never touch `App`.

use crate::api::{ApiError, TodoStore};
use crate::app::{App, AppEvent};
use crate::model::{NewTodo, Todo};
use crate::util::catch_task_panic;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Await a store call, collapsing both errors and panics into `Err(String)`.
async fn settle<T, F>(task: &'static str, call: F) -> Result<T, String>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match catch_task_panic(call).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(panic_msg) => {
            tracing::error!(task, error = %panic_msg, "Remote call panicked");
            Err(panic_msg)
        }
    }
}

/// Issues controller operations against a [`TodoStore`].
pub struct Dispatcher<S> {
    store: Arc<S>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            event_tx: self.event_tx.clone(),
        }
    }
}

impl<S: TodoStore> Dispatcher<S> {
    pub fn new(store: Arc<S>, event_tx: mpsc::Sender<AppEvent>) -> Self {
        Self { store, event_tx }
    }

    /// Run `work` in the background and deliver its event to the loop.
    fn spawn<F>(&self, task: &'static str, work: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = work.await;
            if let Err(e) = tx.send(event).await {
                tracing::warn!(task, error = %e, "Failed to deliver result (receiver dropped)");
            }
        });
    }

    /// Unconfigured sessions never reach the store.
    fn ready(app: &App, op: &'static str) -> bool {
        if !app.is_configured() {
            tracing::warn!(op, "Session has no user id, operation skipped");
            return false;
        }
        true
    }

    /// Populate the collection with the session user's todos.
    ///
    /// Ignored while another load is in flight.
    pub fn load(&self, app: &mut App) {
        let Some(user_id) = app.user_id() else {
            tracing::warn!(op = "load", "Session has no user id, operation skipped");
            return;
        };
        if app.loading {
            tracing::debug!(user_id, "Load already in flight, ignoring");
            return;
        }

        app.loading = true;
        app.needs_redraw = true;
        tracing::debug!(user_id, "Loading todos");

        let store = Arc::clone(&self.store);
        self.spawn("load", async move {
            AppEvent::Loaded(settle("load", store.fetch_all(user_id)).await)
        });
    }

    /// Create `candidate` optimistically.
    ///
    /// The candidate is shown as the pending row until the call resolves.
    /// Returns false when nothing was issued: no candidate, an unconfigured
    /// session, or another create still in flight.
    pub fn create(&self, app: &mut App, candidate: Option<NewTodo>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        if !Self::ready(app, "create") {
            return false;
        }
        if app.pending.is_some() {
            tracing::debug!(title = %candidate.title, "Create already in flight, ignoring");
            return false;
        }

        app.pending = Some(candidate.clone());
        app.needs_redraw = true;

        let store = Arc::clone(&self.store);
        self.spawn("create", async move {
            AppEvent::Created(settle("create", store.create(&candidate)).await)
        });
        true
    }

    /// Delete `todo` from the store; removed locally once confirmed.
    pub fn delete(&self, app: &mut App, todo: Option<&Todo>) {
        let Some(todo) = todo else {
            return;
        };
        if !Self::ready(app, "delete") {
            return;
        }

        let id = todo.id;
        app.deleting_ids.insert(id);
        app.needs_redraw = true;

        let store = Arc::clone(&self.store);
        self.spawn("delete", async move {
            let result = settle("delete", store.delete(id)).await;
            AppEvent::Deleted { id, result }
        });
    }

    /// Replace the stored record with `todo`; applied locally once confirmed.
    pub fn update(&self, app: &mut App, todo: Option<Todo>) {
        let Some(todo) = todo else {
            return;
        };
        if !Self::ready(app, "update") {
            return;
        }

        app.updating_ids.insert(todo.id);
        app.needs_redraw = true;

        let store = Arc::clone(&self.store);
        self.spawn("update", async move {
            let result = settle("update", store.update(&todo)).await;
            AppEvent::Updated { todo, result }
        });
    }

    /// Flip the completion of the todo with `id`.
    pub fn toggle(&self, app: &mut App, id: u32) {
        let flipped = app.todo(id).map(|t| t.with_completed(!t.completed));
        self.update(app, flipped);
    }

    /// Finish editing the title of the todo with `id`.
    ///
    /// A blank title deletes the todo, an unchanged one just ends the edit,
    /// anything else is sent as an update.
    pub fn commit_edit(&self, app: &mut App, id: u32, raw_title: &str) {
        let Some(current) = app.todo(id).cloned() else {
            app.clear_selection();
            return;
        };

        let title = raw_title.trim();
        if title.is_empty() {
            self.delete(app, Some(&current));
        } else if title == current.title {
            app.clear_selection();
        } else {
            self.update(app, Some(current.with_title(title)));
        }
    }

    /// Complete every todo, or un-complete all of them if none is active.
    ///
    /// Only todos whose state differs from the target are sent. All calls
    /// are awaited together and settle independently; the local collection
    /// converges to the target whatever their outcome.
    pub fn toggle_all(&self, app: &mut App) {
        if !Self::ready(app, "toggle_all") {
            return;
        }

        let completed = app.todos.iter().any(|t| !t.completed);
        let changes: Vec<Todo> = app
            .todos
            .iter()
            .filter(|t| t.completed != completed)
            .map(|t| t.with_completed(completed))
            .collect();
        let ids: Vec<u32> = changes.iter().map(|t| t.id).collect();

        app.toggling_ids.extend(ids.iter().copied());
        app.needs_redraw = true;
        tracing::debug!(completed, count = ids.len(), "Toggling all todos");

        let calls: Vec<_> = changes
            .into_iter()
            .map(|todo| {
                let store = Arc::clone(&self.store);
                async move {
                    let result = settle("toggle_all", store.update(&todo)).await;
                    (todo.id, result)
                }
            })
            .collect();

        self.spawn("toggle_all", async move {
            let mut failed = 0;
            for (id, result) in join_all(calls).await {
                if let Err(e) = result {
                    tracing::warn!(id, error = %e, "Toggle-all update failed");
                    failed += 1;
                }
            }

            AppEvent::ToggleAllSettled {
                completed,
                ids,
                failed,
            }
        });
    }

    /// Delete every completed todo.
    ///
    /// Each delete is issued on its own and reports on its own; nothing waits
    /// for the batch.
    pub fn delete_completed(&self, app: &mut App) {
        let completed: Vec<Todo> = app.todos.iter().filter(|t| t.completed).cloned().collect();
        for todo in &completed {
            self.delete(app, Some(todo));
        }
        app.request_focus();
    }
}
