//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Status bar severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// A transient message with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

impl StatusMessage {
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Info,
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Success,
        }
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Warning,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Error,
        }
    }
}

/// One-line bar: status message on the left, key hints on the right.
#[derive(Debug, Clone, Default)]
pub struct StatusBar<'a> {
    message: Option<&'a StatusMessage>,
    hints: &'a str,
}

impl<'a> StatusBar<'a> {
    #[must_use]
    pub const fn new(message: Option<&'a StatusMessage>, hints: &'a str) -> Self {
        Self { message, hints }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = usize::from(area.width);
        let mut spans = Vec::new();
        let mut used = 0;

        if let Some(message) = self.message {
            let style = Style::default()
                .fg(message.level.color())
                .add_modifier(Modifier::BOLD);
            used = message.text.width();
            spans.push(Span::styled(message.text.as_str(), style));
        }

        let hints_width = self.hints.width();
        if used + hints_width + 1 <= width {
            spans.push(Span::raw(" ".repeat(width - used - hints_width)));
            spans.push(Span::styled(self.hints, Style::default().fg(Color::DarkGray)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_dropped_when_too_narrow() {
        let message = StatusMessage::warning("Draft not saved: storage full");
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new(Some(&message), "Ctrl+S save").render(area, &mut buf);

        let row: String = (0..30).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(row.starts_with("Draft not saved"));
        assert!(!row.contains("Ctrl+S"));
    }
}
