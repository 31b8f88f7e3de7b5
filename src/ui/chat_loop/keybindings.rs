//! Key handling for the chat view.
//!
//! View-local effects (textarea edits, scrolling) are applied directly; anything
//! that changes the transcript or request state is returned as an action for
//! the reducer.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use tui_textarea::{CursorMove, Input as TAInput};

use crate::core::app::{App, AppAction};
use crate::ui::renderer::{chat_areas, max_scroll_offset};

const SCROLL_STEP: u16 = 1;

fn transcript_area(app: &App, term_width: u16, term_height: u16) -> Rect {
    let (_, transcript, _) = chat_areas(
        Rect::new(0, 0, term_width, term_height),
        app.ui.input_area_height(),
    );
    transcript
}

fn scroll_up(app: &mut App, lines: u16) {
    app.ui.auto_scroll = false;
    app.ui.scroll_offset = app.ui.scroll_offset.saturating_sub(lines);
}

fn scroll_down(app: &mut App, lines: u16, area: Rect) {
    let max_scroll = max_scroll_offset(app, area);
    app.ui.scroll_offset = app.ui.scroll_offset.saturating_add(lines).min(max_scroll);
    if app.ui.scroll_offset >= max_scroll {
        app.ui.auto_scroll = true;
    }
}

/// Enter sends, Shift+Enter or Alt+Enter inserts a newline (many terminals
/// do not report Shift with Enter).
fn is_newline_chord(key: &KeyEvent) -> bool {
    key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT)
}

pub fn handle_key(app: &mut App, key: KeyEvent, term_width: u16, term_height: u16) -> Vec<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => return vec![AppAction::Quit],
        KeyCode::Char('l') if ctrl => return vec![AppAction::Reset],
        KeyCode::PageUp => {
            let page = transcript_area(app, term_width, term_height).height.max(1);
            scroll_up(app, page);
            return Vec::new();
        }
        KeyCode::PageDown => {
            let area = transcript_area(app, term_width, term_height);
            scroll_down(app, area.height.max(1), area);
            return Vec::new();
        }
        _ => {}
    }

    let single_line_input = app.ui.input_area_height() <= 1;
    match key.code {
        KeyCode::Up if single_line_input || ctrl => {
            scroll_up(app, SCROLL_STEP);
            return Vec::new();
        }
        KeyCode::Down if single_line_input || ctrl => {
            let area = transcript_area(app, term_width, term_height);
            scroll_down(app, SCROLL_STEP, area);
            return Vec::new();
        }
        _ => {}
    }

    if app.is_awaiting() {
        return Vec::new();
    }

    match key.code {
        KeyCode::Enter if is_newline_chord(&key) => {
            app.ui.apply_textarea_edit(|ta| ta.insert_newline());
            Vec::new()
        }
        KeyCode::Enter => vec![AppAction::SubmitPrompt {
            text: app.ui.get_input_text(),
        }],
        KeyCode::Esc => vec![AppAction::ClearInput],
        KeyCode::Up => {
            app.ui.apply_textarea_edit(|ta| ta.move_cursor(CursorMove::Up));
            Vec::new()
        }
        KeyCode::Down => {
            app.ui.apply_textarea_edit(|ta| ta.move_cursor(CursorMove::Down));
            Vec::new()
        }
        _ => {
            app.ui.apply_textarea_edit(|ta| {
                ta.input(TAInput::from(key));
            });
            Vec::new()
        }
    }
}
