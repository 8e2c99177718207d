//! Top-level error boundary screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::utils::centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    None,
    Retry,
    Home,
    Quit,
}

/// Shown instead of a blank screen when handling fails unexpectedly.
#[derive(Debug, Clone)]
pub struct ErrorScreen {
    message: String,
}

impl ErrorScreen {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn handle_key(&self, key: KeyEvent) -> ErrorAction {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => ErrorAction::Retry,
            KeyCode::Char('h') | KeyCode::Esc => ErrorAction::Home,
            KeyCode::Char('q') => ErrorAction::Quit,
            _ => ErrorAction::None,
        }
    }
}

impl Widget for &ErrorScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(70, 40, area);

        let lines = vec![
            Line::from(Span::styled(
                "Something went wrong",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.message.as_str(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from("r retry   h home   q quit"),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_keys() {
        let screen = ErrorScreen::new("boom");
        let key = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(screen.handle_key(key('r')), ErrorAction::Retry);
        assert_eq!(screen.handle_key(key('h')), ErrorAction::Home);
        assert_eq!(screen.handle_key(key('q')), ErrorAction::Quit);
        assert_eq!(screen.handle_key(key('z')), ErrorAction::None);
    }
}
