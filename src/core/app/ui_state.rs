use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

use crate::core::constants::{INPUT_PLACEHOLDER, MAX_INPUT_LINES};

/// View-only state: the input buffer, scroll position and quit flag.
pub struct UiState {
    textarea: TextArea<'static>,
    pub title: String,
    pub scroll_offset: u16,
    /// Pin the view to the newest record. Cleared by manual scrolling and
    /// restored whenever the transcript changes.
    pub auto_scroll: bool,
    pub exit_requested: bool,
}

impl UiState {
    pub fn new(title: impl Into<String>) -> Self {
        let mut ui = Self {
            textarea: TextArea::default(),
            title: title.into(),
            scroll_offset: 0,
            auto_scroll: true,
            exit_requested: false,
        };
        ui.configure_textarea();
        ui
    }

    fn configure_textarea(&mut self) {
        self.textarea.set_placeholder_text(INPUT_PLACEHOLDER);
        self.textarea
            .set_placeholder_style(Style::default().fg(Color::DarkGray));
        self.textarea
            .set_cursor_line_style(Style::default());
        self.textarea
            .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    }

    /// Hand the textarea to the renderer with its block for this frame.
    pub fn textarea_with_block(&mut self, block: Block<'static>, enabled: bool) -> &TextArea<'static> {
        let text_style = if enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let cursor_style = if enabled {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_style(text_style);
        self.textarea.set_cursor_style(cursor_style);
        self.textarea.set_block(block.borders(Borders::ALL));
        &self.textarea
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn input_is_blank(&self) -> bool {
        self.textarea
            .lines()
            .iter()
            .all(|line| line.trim().is_empty())
    }

    pub fn set_input_text(&mut self, text: String) {
        let lines: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(str::to_string).collect()
        };
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
        self.configure_textarea();
    }

    pub fn clear_input(&mut self) {
        self.set_input_text(String::new());
    }

    pub fn insert_into_input(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    pub fn apply_textarea_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        f(&mut self.textarea);
    }

    /// Visible rows of the input box, not counting borders.
    pub fn input_area_height(&self) -> u16 {
        let lines = self.textarea.lines().len().max(1) as u16;
        lines.min(MAX_INPUT_LINES)
    }

    pub fn follow_latest(&mut self) {
        self.auto_scroll = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection_ignores_whitespace_and_newlines() {
        let mut ui = UiState::new("t");
        assert!(ui.input_is_blank());
        ui.set_input_text("  \n\t ".into());
        assert!(ui.input_is_blank());
        ui.set_input_text(" a ".into());
        assert!(!ui.input_is_blank());
    }

    #[test]
    fn input_text_round_trips_multiline_content() {
        let mut ui = UiState::new("t");
        ui.set_input_text("first\nsecond".into());
        assert_eq!(ui.get_input_text(), "first\nsecond");
        ui.insert_into_input("!");
        assert_eq!(ui.get_input_text(), "first\nsecond!");
    }

    #[test]
    fn input_height_grows_then_caps() {
        let mut ui = UiState::new("t");
        assert_eq!(ui.input_area_height(), 1);
        ui.set_input_text("a\nb\nc".into());
        assert_eq!(ui.input_area_height(), 3);
        ui.set_input_text("1\n2\n3\n4\n5\n6\n7\n8".into());
        assert_eq!(ui.input_area_height(), MAX_INPUT_LINES);
    }
}
