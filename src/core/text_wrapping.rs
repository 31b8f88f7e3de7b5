//! Word wrapping for transcript rendering.
//!
//! The transcript is pre-wrapped to the viewport width and rendered without
//! ratatui's own wrapping, so the line count used for scrolling matches what
//! is drawn exactly.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Configuration for text wrapping behavior
#[derive(Debug, Clone, Copy)]
pub struct WrapConfig {
    /// Maximum display width of a wrapped line
    pub width: usize,
}

impl WrapConfig {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

pub struct TextWrapper;

impl TextWrapper {
    /// Wrap `text` at word boundaries. Explicit newlines are kept, words wider
    /// than the line are split by character. Always yields at least one line.
    pub fn wrap_lines(text: &str, config: &WrapConfig) -> Vec<String> {
        let width = config.width.max(1);
        let mut out = Vec::new();

        for raw_line in text.split('\n') {
            let mut current = String::new();
            let mut current_width = 0usize;

            for word in raw_line.split(' ') {
                let word_width = word.width();
                let separator = usize::from(!current.is_empty());

                if current_width + separator + word_width <= width {
                    if separator == 1 {
                        current.push(' ');
                    }
                    current.push_str(word);
                    current_width += separator + word_width;
                    continue;
                }

                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                    current_width = 0;
                }

                if word_width <= width {
                    current.push_str(word);
                    current_width = word_width;
                } else {
                    for ch in word.chars() {
                        let ch_width = ch.width().unwrap_or(0);
                        if current_width + ch_width > width && !current.is_empty() {
                            out.push(std::mem::take(&mut current));
                            current_width = 0;
                        }
                        current.push(ch);
                        current_width += ch_width;
                    }
                }
            }

            out.push(current);
        }

        out
    }
}
