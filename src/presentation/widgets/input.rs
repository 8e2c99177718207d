//! Single-line text input widget.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Text input field widget. The cursor counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    cursor: usize,
    focused: bool,
    placeholder: String,
    label: String,
    error: Option<String>,
}

impl TextInput {
    /// Creates new input with label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            focused: false,
            placeholder: String::new(),
            label: label.into(),
            error: None,
        }
    }

    /// Sets placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value and moves the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    /// Shows a validation message under the label, or clears it.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Inserts character at cursor.
    pub fn input_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Deletes character before cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index();
            self.value.remove(idx);
        }
    }

    /// Deletes character at cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let idx = self.byte_index();
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Applies an editing key. Returns true if the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.input_char(c);
                true
            }
            KeyCode::Backspace => {
                let before = self.value.len();
                self.backspace();
                before != self.value.len()
            }
            KeyCode::Delete => {
                let before = self.value.len();
                self.delete();
                before != self.value.len()
            }
            KeyCode::Left => {
                self.move_left();
                false
            }
            KeyCode::Right => {
                self.move_right();
                false
            }
            KeyCode::Home => {
                self.move_start();
                false
            }
            KeyCode::End => {
                self.move_end();
                false
            }
            _ => false,
        }
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.error.is_some() {
            Style::default().fg(Color::Red)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let text_style = if self.value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        let title = match &self.error {
            Some(error) => format!(" {} · {error} ", self.label),
            None => format!(" {} ", self.label),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let inner = block.inner(area);

        let display = if self.value.is_empty() {
            self.placeholder.as_str()
        } else {
            self.value.as_str()
        };

        // Scroll horizontally so the cursor stays visible.
        let before_cursor: String = self.value.chars().take(self.cursor).collect();
        let cursor_width = before_cursor.width();
        let scroll = cursor_width.saturating_sub(usize::from(inner.width.saturating_sub(1)));

        #[allow(clippy::cast_possible_truncation)]
        let paragraph = Paragraph::new(display)
            .style(text_style)
            .scroll((0, scroll as u16));

        block.render(area, buf);
        paragraph.render(inner, buf);

        if self.focused && inner.width > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let cursor_x = inner.x + (cursor_width - scroll) as u16;
            if cursor_x < inner.x + inner.width {
                buf[(cursor_x, inner.y)]
                    .set_style(Style::default().bg(Color::White).fg(Color::Black));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_basic() {
        let mut input = TextInput::new("Test");
        assert!(input.value().is_empty());

        input.input_char('a');
        input.input_char('b');
        assert_eq!(input.value(), "ab");

        input.backspace();
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new("Title");
        input.set_value("café");
        input.move_left();
        input.input_char('x');
        assert_eq!(input.value(), "cafxé");

        input.move_end();
        input.backspace();
        assert_eq!(input.value(), "cafx");
    }

    #[test]
    fn test_control_keys_are_not_typed() {
        let mut input = TextInput::new("Title");
        let changed = input.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(!changed);
        assert!(input.value().is_empty());
    }
}
