use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::clipboard::ClipboardWriter;
use crate::models::FocusArea;

#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    /// A generation was accepted; the caller dispatches it.
    Generate(String),
    Quit,
}

pub fn handle_key(
    app: &mut App,
    key: KeyEvent,
    clipboard: &mut dyn ClipboardWriter,
    now: Instant,
) -> KeyOutcome {
    if key.kind == KeyEventKind::Release {
        return KeyOutcome::Continue;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    match app.focus {
        FocusArea::Topic => handle_topic_key(app, key.code, ctrl),
        FocusArea::Results => handle_results_key(app, key.code, clipboard, now),
    }
}

fn handle_topic_key(app: &mut App, code: KeyCode, ctrl: bool) -> KeyOutcome {
    match code {
        KeyCode::Char('t') if ctrl => app.toggle_theme(),
        KeyCode::Char('u') if ctrl => app.clear_topic(),
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Char(c) => app.push_char(c),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Enter => {
            if let Some(topic) = app.submit() {
                return KeyOutcome::Generate(topic);
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            if !app.visible_categories().is_empty() {
                app.focus = FocusArea::Results;
            }
        }
        KeyCode::Esc => return KeyOutcome::Quit,
        _ => {}
    }
    KeyOutcome::Continue
}

fn handle_results_key(
    app: &mut App,
    code: KeyCode,
    clipboard: &mut dyn ClipboardWriter,
    now: Instant,
) -> KeyOutcome {
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor_down(),
        KeyCode::Char(' ') => app.toggle_current(),
        KeyCode::Char('c') => {
            app.copy_current(clipboard, now);
        }
        KeyCode::Char('a') | KeyCode::Char('y') => {
            app.copy_all(clipboard, now);
        }
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc | KeyCode::Char('i') | KeyCode::Char('/') => {
            app.focus = FocusArea::Topic;
        }
        KeyCode::Char('q') => return KeyOutcome::Quit,
        _ => {}
    }
    KeyOutcome::Continue
}
