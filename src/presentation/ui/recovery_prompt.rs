//! Draft recovery modal.

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::utils::{centered_rect, format_local};
use crate::domain::entities::Draft;

/// The author's answer to the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryChoice {
    /// Still waiting.
    Pending,
    /// Load the draft into the editor.
    Restore,
    /// Keep blank fields. The stored draft stays.
    Decline,
}

/// Binary choice offered when a new post has an unsaved draft.
#[derive(Debug, Clone)]
pub struct RecoveryPrompt {
    draft: Draft,
    timestamp_format: String,
}

impl RecoveryPrompt {
    #[must_use]
    pub fn new(draft: Draft, timestamp_format: impl Into<String>) -> Self {
        Self {
            draft,
            timestamp_format: timestamp_format.into(),
        }
    }

    #[must_use]
    pub const fn saved_at(&self) -> DateTime<Utc> {
        self.draft.saved_at
    }

    /// Consumes the prompt and yields the draft to restore.
    #[must_use]
    pub fn into_draft(self) -> Draft {
        self.draft
    }

    pub fn handle_key(&self, key: KeyEvent) -> RecoveryChoice {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => RecoveryChoice::Restore,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => RecoveryChoice::Decline,
            _ => RecoveryChoice::Pending,
        }
    }
}

impl Widget for &RecoveryPrompt {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(60, 30, area);
        Clear.render(popup, buf);

        let title = if self.draft.fields.title.trim().is_empty() {
            "(untitled)".to_string()
        } else {
            self.draft.fields.title.clone()
        };
        let words = self.draft.fields.body.split_whitespace().count();

        let lines = vec![
            Line::from(Span::styled(
                "An unsaved draft was found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("{title}, {words} words")),
            Line::from(Span::styled(
                format!(
                    "saved {}",
                    format_local(self.draft.saved_at, &self.timestamp_format)
                ),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().fg(Color::Green)),
                Span::raw(" restore   "),
                Span::styled("n", Style::default().fg(Color::Red)),
                Span::raw(" start blank"),
            ]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Recover draft? "),
            )
            .render(popup, buf);
    }
}
