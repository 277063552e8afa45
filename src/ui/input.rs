//! Input handling for the TUI.
//!
//! Routes each key press to the handler for the current [`Mode`] and turns it
//! into a controller operation. Nothing here talks to the store directly.

use crate::api::TodoStore;
use crate::app::{App, ERR_EMPTY_TITLE};
use crate::model::{Filter, NewTodo};
use crate::sync::Dispatcher;
use crossterm::event::{KeyCode, KeyModifiers};

use super::{Action, Mode, Screen};

/// Main input dispatch function.
pub(super) fn handle_input<S: TodoStore>(
    app: &mut App,
    screen: &mut Screen,
    dispatcher: &Dispatcher<S>,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    // Nothing to operate on without a user: only quitting is meaningful.
    if !app.is_configured() {
        return match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::Continue,
        };
    }

    match screen.mode {
        Mode::Entry => handle_entry_input(app, screen, dispatcher, code, modifiers),
        Mode::List => handle_list_input(app, screen, dispatcher, code),
        Mode::Edit => handle_edit_input(app, screen, dispatcher, code, modifiers),
    }
}

/// Typing into the new-todo line.
fn handle_entry_input<S: TodoStore>(
    app: &mut App,
    screen: &mut Screen,
    dispatcher: &Dispatcher<S>,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Action {
    match code {
        KeyCode::Enter => submit_entry(app, screen, dispatcher),
        KeyCode::Backspace => {
            screen.entry.pop();
        }
        KeyCode::Esc | KeyCode::Down | KeyCode::Tab => {
            screen.mode = Mode::List;
            screen.clamp_cursor(app);
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            screen.entry.push(c);
        }
        _ => {}
    }
    Action::Continue
}

fn submit_entry<S: TodoStore>(app: &mut App, screen: &Screen, dispatcher: &Dispatcher<S>) {
    let Some(user_id) = app.user_id() else {
        return;
    };
    match NewTodo::from_input(&screen.entry, user_id) {
        Some(candidate) => {
            // The entry keeps its text until the create succeeds.
            dispatcher.create(app, Some(candidate));
        }
        None => app.notify(ERR_EMPTY_TITLE),
    }
}

/// Navigating the list.
fn handle_list_input<S: TodoStore>(
    app: &mut App,
    screen: &mut Screen,
    dispatcher: &Dispatcher<S>,
    code: KeyCode,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            screen.cursor = screen.cursor.saturating_add(1);
            screen.clamp_cursor(app);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            screen.cursor = screen.cursor.saturating_sub(1);
        }
        KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Esc | KeyCode::Tab => {
            screen.mode = Mode::Entry;
        }
        KeyCode::Char(' ') => {
            if let Some(todo) = screen.todo_at_cursor(app) {
                dispatcher.toggle(app, todo.id);
            }
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            if let Some(todo) = screen.todo_at_cursor(app) {
                screen.edit = todo.title.clone();
                screen.mode = Mode::Edit;
                app.select(todo);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            let todo = screen.todo_at_cursor(app);
            dispatcher.delete(app, todo.as_ref());
        }
        KeyCode::Char('t') => dispatcher.toggle_all(app),
        KeyCode::Char('c') => {
            if app.completed_count() > 0 {
                dispatcher.delete_completed(app);
            }
        }
        KeyCode::Char('r') => dispatcher.load(app),
        KeyCode::Char('f') => {
            app.set_filter(app.filter().next());
            screen.clamp_cursor(app);
        }
        KeyCode::Char(c @ '1'..='3') => {
            let idx = (c as usize) - ('1' as usize);
            app.set_filter(Filter::ALL[idx]);
            screen.clamp_cursor(app);
        }
        KeyCode::Char('x') => app.dismiss_notification(),
        _ => {}
    }
    Action::Continue
}

/// Rewriting the selected todo's title.
fn handle_edit_input<S: TodoStore>(
    app: &mut App,
    screen: &mut Screen,
    dispatcher: &Dispatcher<S>,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Action {
    let Some(id) = app.selected().map(|t| t.id) else {
        screen.mode = Mode::List;
        return Action::Continue;
    };

    // The edit is committed; wait for it to resolve. A toggle-all batch
    // covering the same todo does not count.
    if app.updating_ids().contains(&id) || app.deleting_ids().contains(&id) {
        return Action::Continue;
    }

    match code {
        KeyCode::Enter => dispatcher.commit_edit(app, id, &screen.edit),
        KeyCode::Esc => {
            app.clear_selection();
            screen.edit.clear();
            screen.mode = Mode::List;
        }
        KeyCode::Backspace => {
            screen.edit.pop();
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            screen.edit.push(c);
        }
        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::app::AppEvent;
    use crate::model::Todo;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// Store that answers every call with a rejection.
    struct RejectingStore;

    impl TodoStore for RejectingStore {
        async fn fetch_all(&self, _user_id: u32) -> Result<Vec<Todo>, ApiError> {
            Err(ApiError::HttpStatus(503))
        }
        async fn create(&self, _todo: &NewTodo) -> Result<Todo, ApiError> {
            Err(ApiError::HttpStatus(503))
        }
        async fn update(&self, _todo: &Todo) -> Result<Todo, ApiError> {
            Err(ApiError::HttpStatus(503))
        }
        async fn delete(&self, _id: u32) -> Result<(), ApiError> {
            Err(ApiError::HttpStatus(503))
        }
    }

    fn todo(id: u32, completed: bool) -> Todo {
        Todo {
            id,
            title: format!("todo {}", id),
            completed,
            user_id: 1,
        }
    }

    fn setup(todos: Vec<Todo>) -> (App, Screen, Dispatcher<RejectingStore>, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let mut app = App::new(Some(1));
        app.todos = todos;
        (app, Screen::new(), Dispatcher::new(Arc::new(RejectingStore), tx), rx)
    }

    fn press<S: TodoStore>(
        app: &mut App,
        screen: &mut Screen,
        dispatcher: &Dispatcher<S>,
        code: KeyCode,
    ) -> Action {
        handle_input(app, screen, dispatcher, code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_typing_and_submitting_creates() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![]);
        for c in "  milk ".chars() {
            press(&mut app, &mut screen, &dispatcher, KeyCode::Char(c));
        }
        press(&mut app, &mut screen, &dispatcher, KeyCode::Enter);

        assert_eq!(app.pending().map(|p| p.title.as_str()), Some("milk"));
        assert_eq!(screen.entry, "  milk ");
    }

    #[tokio::test]
    async fn test_blank_submit_notifies() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![]);
        press(&mut app, &mut screen, &dispatcher, KeyCode::Char(' '));
        press(&mut app, &mut screen, &dispatcher, KeyCode::Enter);

        assert!(!app.is_creating());
        assert_eq!(app.notification(), Some(ERR_EMPTY_TITLE));
    }

    #[tokio::test]
    async fn test_list_keys_issue_operations() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![todo(1, false), todo(2, true)]);
        press(&mut app, &mut screen, &dispatcher, KeyCode::Esc);
        assert_eq!(screen.mode, Mode::List);

        press(&mut app, &mut screen, &dispatcher, KeyCode::Char(' '));
        assert!(app.updating_ids().contains(&1));

        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('j'));
        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('d'));
        assert!(app.deleting_ids().contains(&2));

        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('t'));
        assert!(app.toggling_ids().contains(&1));
    }

    #[tokio::test]
    async fn test_filter_keys() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![todo(1, false)]);
        screen.mode = Mode::List;

        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('3'));
        assert_eq!(app.filter(), Filter::Completed);
        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('f'));
        assert_eq!(app.filter(), Filter::All);
    }

    #[tokio::test]
    async fn test_edit_flow_selects_and_cancels() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![todo(1, false)]);
        screen.mode = Mode::List;

        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('e'));
        assert_eq!(screen.mode, Mode::Edit);
        assert_eq!(screen.edit, "todo 1");
        assert_eq!(app.selected().map(|t| t.id), Some(1));

        press(&mut app, &mut screen, &dispatcher, KeyCode::Esc);
        assert_eq!(screen.mode, Mode::List);
        assert!(app.selected().is_none());
    }

    #[tokio::test]
    async fn test_edit_commit_sends_update() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![todo(1, false)]);
        screen.mode = Mode::List;

        press(&mut app, &mut screen, &dispatcher, KeyCode::Enter);
        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('!'));
        press(&mut app, &mut screen, &dispatcher, KeyCode::Enter);

        assert!(app.updating_ids().contains(&1));
        // Further keys are ignored until the update resolves.
        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('?'));
        assert_eq!(screen.edit, "todo 1!");
    }

    #[tokio::test]
    async fn test_edit_cancellable_during_toggle_all() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![todo(1, false)]);
        screen.mode = Mode::List;

        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('e'));
        dispatcher.toggle_all(&mut app);
        assert!(app.toggling_ids().contains(&1));

        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('!'));
        assert_eq!(screen.edit, "todo 1!");

        press(&mut app, &mut screen, &dispatcher, KeyCode::Esc);
        assert_eq!(screen.mode, Mode::List);
        assert!(app.selected().is_none());
    }

    #[tokio::test]
    async fn test_clear_completed_skipped_when_nothing_completed() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![todo(1, false)]);
        screen.mode = Mode::List;

        press(&mut app, &mut screen, &dispatcher, KeyCode::Char('c'));
        assert!(app.deleting_ids().is_empty());
        assert!(!app.take_focus_request());
    }

    #[tokio::test]
    async fn test_unconfigured_session_only_quits() {
        let (tx, _rx) = mpsc::channel(4);
        let dispatcher = Dispatcher::new(Arc::new(RejectingStore), tx);
        let mut app = App::new(None);
        let mut screen = Screen::new();

        for c in "abc".chars() {
            press(&mut app, &mut screen, &dispatcher, KeyCode::Char(c));
        }
        assert!(screen.entry.is_empty());
        assert!(matches!(
            press(&mut app, &mut screen, &dispatcher, KeyCode::Char('q')),
            Action::Quit
        ));
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_any_mode() {
        let (mut app, mut screen, dispatcher, _rx) = setup(vec![]);
        screen.mode = Mode::Edit;
        let action = handle_input(
            &mut app,
            &mut screen,
            &dispatcher,
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        );
        assert!(matches!(action, Action::Quit));
    }
}
