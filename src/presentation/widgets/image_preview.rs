//! Preview rendering for image slots.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget, Wrap},
};
use ratatui_image::protocol::StatefulProtocol;
use ratatui_image::{Resize, StatefulImage};

use super::image_renderer::fitted_area;
use crate::domain::entities::{Attempt, ImageLoadState, ImageSlot};

/// One-cell status marker for list rows.
#[must_use]
pub fn status_glyph(state: &ImageLoadState) -> (&'static str, Color) {
    match state {
        ImageLoadState::Pending => ("·", Color::DarkGray),
        ImageLoadState::Loading(Attempt::Original) => ("◌", Color::Yellow),
        ImageLoadState::Loading(Attempt::Fallback(_)) => ("◍", Color::Yellow),
        ImageLoadState::Loaded {
            attempt: Attempt::Original,
            ..
        } => ("▣", Color::Green),
        ImageLoadState::Loaded { .. } => ("▢", Color::Cyan),
        ImageLoadState::Error => ("⊘", Color::Red),
    }
}

/// Boxed preview of a single slot.
///
/// A loaded slot with a protocol draws the picture; without one it falls back
/// to a size summary.
pub struct ImagePreview<'a> {
    slot: Option<&'a ImageSlot>,
    picture: Option<&'a mut StatefulProtocol>,
    revealing: bool,
    title: &'a str,
}

impl<'a> ImagePreview<'a> {
    #[must_use]
    pub const fn new(slot: Option<&'a ImageSlot>) -> Self {
        Self {
            slot,
            picture: None,
            revealing: false,
            title: " Preview ",
        }
    }

    /// Encoded picture for a loaded slot.
    #[must_use]
    pub fn picture(mut self, picture: Option<&'a mut StatefulProtocol>) -> Self {
        self.picture = picture;
        self
    }

    #[must_use]
    pub const fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Renders dimmed while a fresh load fades in.
    #[must_use]
    pub const fn revealing(mut self, revealing: bool) -> Self {
        self.revealing = revealing;
        self
    }

    fn lines(&self) -> (Vec<Line<'a>>, Style) {
        let Some(slot) = self.slot else {
            return (
                vec![Line::from("No cover image")],
                Style::default().fg(Color::DarkGray),
            );
        };

        match slot.state() {
            ImageLoadState::Pending => (
                vec![Line::from("◌"), Line::from("Waiting")],
                Style::default().fg(Color::DarkGray),
            ),
            ImageLoadState::Loading(attempt) => {
                let note = match attempt {
                    Attempt::Original => "Loading…".to_string(),
                    Attempt::Fallback(kind) => format!("Trying {kind} fallback…"),
                };
                (
                    vec![Line::from("◌"), Line::from(note)],
                    Style::default().fg(Color::Yellow),
                )
            }
            ImageLoadState::Loaded {
                attempt,
                width,
                height,
            } => {
                let mut lines = vec![
                    Line::from("▣"),
                    Line::from(format!("{width}×{height}")),
                ];
                if let Attempt::Fallback(kind) = attempt {
                    lines.push(Line::from(Span::styled(
                        format!("{kind} fallback"),
                        Style::default().fg(Color::Cyan),
                    )));
                }
                let mut style = Style::default().fg(Color::Green);
                if self.revealing {
                    style = style.add_modifier(Modifier::DIM);
                }
                (lines, style)
            }
            ImageLoadState::Error => (
                vec![Line::from("⊘"), Line::from(slot.caption().to_string())],
                Style::default().fg(Color::Red),
            ),
        }
    }
}

impl Widget for ImagePreview<'_> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(self.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let loaded = self.slot.is_some_and(|slot| slot.state().is_loaded());
        if loaded && let Some(picture) = self.picture.take() {
            let target = fitted_area(picture, inner);
            StatefulImage::default()
                .resize(Resize::Fit(None))
                .render(target, buf, picture);
            if self.revealing {
                buf.set_style(target, Style::default().add_modifier(Modifier::DIM));
            }
            return;
        }

        let (lines, style) = self.lines();
        let top_pad = inner.height.saturating_sub(u16::try_from(lines.len()).unwrap_or(0)) / 2;
        let body = Rect {
            y: inner.y + top_pad,
            height: inner.height - top_pad,
            ..inner
        };

        Paragraph::new(lines)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(body, buf);
    }
}
