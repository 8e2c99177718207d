//! Multi-line Markdown body editor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};
use tui_textarea::{CursorMove, TextArea};
use unicode_width::UnicodeWidthChar;

/// Body editor backed by a [`TextArea`].
///
/// The text area is driven and drawn by hand; only its buffer and cursor
/// bookkeeping are used.
pub struct BodyEditor {
    textarea: TextArea<'static>,
    focused: bool,
    label: String,
    error: Option<String>,
}

impl BodyEditor {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            textarea: TextArea::default(),
            focused: false,
            label: label.into(),
            error: None,
        }
    }

    /// Current text with lines joined by `\n`.
    #[must_use]
    pub fn value(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_value(&mut self, value: &str) {
        let lines: Vec<String> = value.split('\n').map(String::from).collect();
        self.textarea = TextArea::new(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Applies an editing key. Returns true if the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('w') if ctrl => self.textarea.delete_word(),
            KeyCode::Char(_) if ctrl => false,
            KeyCode::Char(c) => {
                self.textarea.insert_char(c);
                true
            }
            KeyCode::Enter => {
                self.textarea.insert_newline();
                true
            }
            KeyCode::Backspace if alt => self.textarea.delete_word(),
            KeyCode::Backspace => self.textarea.delete_char(),
            KeyCode::Delete => self.textarea.delete_next_char(),
            KeyCode::Left => {
                self.textarea.move_cursor(if alt {
                    CursorMove::WordBack
                } else {
                    CursorMove::Back
                });
                false
            }
            KeyCode::Right => {
                self.textarea
                    .move_cursor(if alt { CursorMove::WordForward } else { CursorMove::Forward });
                false
            }
            KeyCode::Up => {
                self.textarea.move_cursor(CursorMove::Up);
                false
            }
            KeyCode::Down => {
                self.textarea.move_cursor(CursorMove::Down);
                false
            }
            KeyCode::Home => {
                self.textarea.move_cursor(CursorMove::Head);
                false
            }
            KeyCode::End => {
                self.textarea.move_cursor(CursorMove::End);
                false
            }
            _ => false,
        }
    }

    /// Wraps logical lines to `width` columns and locates the cursor.
    fn visual_lines(&self, width: usize) -> (Vec<String>, usize, usize) {
        let (cursor_row, cursor_col) = self.textarea.cursor();
        if width == 0 {
            return (self.textarea.lines().to_vec(), cursor_row, cursor_col);
        }

        let mut visual = Vec::new();
        let mut v_row = 0;
        let mut v_col = 0;

        for (i, line) in self.textarea.lines().iter().enumerate() {
            let is_cursor_line = i == cursor_row;
            let mut current = String::new();
            let mut current_width = 0;

            for (j, ch) in line.chars().enumerate() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width {
                    visual.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                if is_cursor_line && j == cursor_col {
                    v_row = visual.len();
                    v_col = current_width;
                }
                current.push(ch);
                current_width += ch_width;
            }

            if is_cursor_line && cursor_col >= line.chars().count() {
                if current_width >= width {
                    visual.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                v_row = visual.len();
                v_col = current_width;
            }
            visual.push(current);
        }

        (visual, v_row, v_col)
    }
}

impl Widget for &BodyEditor {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.error.is_some() {
            Style::default().fg(Color::Red)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
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
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        let (lines, cursor_row, cursor_col) = self.visual_lines(usize::from(inner.width));
        let height = usize::from(inner.height);
        let scroll = cursor_row.saturating_sub(height - 1);

        let visible: Vec<Line> = lines
            .into_iter()
            .skip(scroll)
            .take(height)
            .map(Line::from)
            .collect();
        Paragraph::new(visible)
            .style(Style::default().fg(Color::White))
            .render(inner, buf);

        if self.focused {
            #[allow(clippy::cast_possible_truncation)]
            let (x, y) = (
                inner.x + cursor_col as u16,
                inner.y + (cursor_row - scroll) as u16,
            );
            if x < inner.x + inner.width && y < inner.y + inner.height {
                buf[(x, y)].set_style(Style::default().bg(Color::White).fg(Color::Black));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_and_newlines() {
        let mut editor = BodyEditor::new("Content");
        assert!(editor.handle_key(key(KeyCode::Char('a'))));
        assert!(editor.handle_key(key(KeyCode::Enter)));
        assert!(editor.handle_key(key(KeyCode::Enter)));
        assert!(editor.handle_key(key(KeyCode::Char('b'))));
        assert_eq!(editor.value(), "a\n\nb");
        assert!(!editor.handle_key(key(KeyCode::Left)));
    }

    #[test]
    fn test_set_value_round_trips() {
        let mut editor = BodyEditor::new("Content");
        editor.set_value("# Heading\n\nParagraph");
        assert_eq!(editor.value(), "# Heading\n\nParagraph");
    }

    #[test]
    fn test_wrapping_places_cursor_on_last_row() {
        let mut editor = BodyEditor::new("Content");
        editor.set_value("abcdefgh");
        let (lines, row, col) = editor.visual_lines(4);
        assert_eq!(lines, ["abcd", "efgh", ""]);
        assert_eq!((row, col), (2, 0));
    }
}
