//! Render functions for the TUI.

use crate::app::{App, Row};
use crate::model::Filter;
use crate::util::{display_title, fit_width, tail_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::borrow::Cow;
use unicode_width::UnicodeWidthStr;

use super::{Mode, Screen};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Columns taken by the checkbox and busy marker in front of a title.
const ROW_PREFIX_WIDTH: usize = 6;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App, screen: &Screen) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    if !app.is_configured() {
        render_unconfigured(f, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_entry(f, app, screen, chunks[0]);
    render_list(f, app, screen, chunks[1]);
    render_footer(f, app, screen, chunks[2]);
    render_notification(f, app, chunks[3]);
}

fn render_unconfigured(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "No user configured",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("tend needs the id of the user whose todos it manages."),
        Line::from("Pass --user-id, set TEND_USER_ID, or add user_id to"),
        Line::from("~/.config/tend/config.toml, then start tend again."),
        Line::from(""),
        Line::from("[q]uit"),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" todos "))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// The new-todo line, with the toggle-all marker in its title.
fn render_entry(f: &mut Frame, app: &App, screen: &Screen, area: Rect) {
    let toggle = if app.todos().is_empty() {
        ""
    } else if app.all_completed() {
        " [x] all "
    } else {
        " [ ] all "
    };
    let focused = screen.mode == Mode::Entry;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    // While typing, show the end of the buffer and leave a column for the caret.
    let content: Cow<'_, str> = if focused {
        Cow::Borrowed(tail_width(&screen.entry, inner_width.saturating_sub(1)))
    } else if screen.entry.is_empty() {
        Cow::Borrowed("What needs to be done?")
    } else {
        fit_width(&screen.entry, inner_width)
    };
    let caret = UnicodeWidthStr::width(content.as_ref()) as u16;

    let paragraph = Paragraph::new(content.into_owned()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" todos{}", toggle)),
    );
    f.render_widget(paragraph, area);

    if focused {
        f.set_cursor_position((area.x + 1 + caret, area.y + 1));
    }
}

fn render_list(f: &mut Frame, app: &App, screen: &Screen, area: Rect) {
    let title_width = (area.width as usize).saturating_sub(ROW_PREFIX_WIDTH + 2);

    let items: Vec<ListItem> = if app.is_loading() && app.todos().is_empty() {
        vec![ListItem::new("Loading...").style(Style::default().fg(Color::DarkGray))]
    } else {
        app.rows()
            .into_iter()
            .map(|row| row_item(app, screen, row, title_width))
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::LEFT | Borders::RIGHT))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if screen.mode != Mode::Entry && !app.rows().is_empty() {
        state.select(Some(screen.cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn row_item<'a>(app: &App, screen: &Screen, row: Row<'_>, title_width: usize) -> ListItem<'a> {
    match row {
        Row::Persisted(todo) => {
            let editing = screen.mode == Mode::Edit
                && app.selected().is_some_and(|s| s.id == todo.id);
            let check = if todo.completed { "[x]" } else { "[ ]" };
            let busy = if app.is_busy(todo.id) { "~" } else { " " };

            let title: Cow<'_, str> = if editing {
                Cow::Borrowed(screen.edit.as_str())
            } else {
                display_title(&todo.title)
            };
            let text = format!(
                "{} {} {}",
                check,
                busy,
                fit_width(&title, title_width)
            );

            let style = if editing {
                Style::default().fg(Color::Yellow)
            } else if app.is_busy(todo.id) {
                Style::default().fg(Color::DarkGray)
            } else if todo.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            ListItem::new(text).style(style)
        }
        Row::Pending(pending) => {
            let text = format!(
                "[ ] ~ {}",
                fit_width(&display_title(&pending.title), title_width)
            );
            ListItem::new(text).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        }
    }
}

/// Counter, filter tabs, clear-completed hint; key hints when the list is empty.
fn render_footer(f: &mut Frame, app: &App, screen: &Screen, area: Rect) {
    let style = Style::default().bg(Color::DarkGray).fg(Color::White);

    if app.todos().is_empty() {
        let hint = match screen.mode {
            Mode::Entry => "[Enter] add  [Esc] list  [Ctrl+c] quit",
            _ => "[i] new todo  [r] reload  [q] quit",
        };
        f.render_widget(Paragraph::new(hint).style(style), area);
        return;
    }

    let active = app.active_count();
    let mut spans = vec![Span::raw(format!(
        " {} {} left  ",
        active,
        if active == 1 { "item" } else { "items" }
    ))];

    for filter in Filter::ALL {
        let label = format!(" {} ", filter.name());
        if filter == app.filter() {
            spans.push(Span::styled(
                label,
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            spans.push(Span::raw(label));
        }
    }

    if app.completed_count() > 0 {
        spans.push(Span::raw("  [c]lear completed"));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}

fn render_notification(f: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.notification() else {
        return;
    };
    let text = format!(" {}  [x]", fit_width(message, (area.width as usize).saturating_sub(6)));
    let paragraph = Paragraph::new(text).style(Style::default().bg(Color::Red).fg(Color::White));
    f.render_widget(paragraph, area);
}
