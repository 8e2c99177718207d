//! Post collection screen.

use std::ops::Range;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use super::utils::{format_local, truncate_to_width};
use crate::application::services::content_service::Sourced;
use crate::application::services::image_coordinator::{ImageEvent, ImageLoadCoordinator};
use crate::domain::entities::{BlogPost, ImageLoadState, PostId};
use crate::presentation::events::is_char;
use crate::presentation::widgets::{
    ImagePreview, ImageRenderer, StatusBar, StatusMessage, status_glyph,
};

const HINTS: &str = "↑↓ select  ⏎ edit  n new  d delete  r refresh  q quit";
const COVER_LABEL: &str = "Blog cover";
const IMAGE_KEY_PREFIX: &str = "list:";
const PREVIEW_WIDTH: u16 = 30;
const PREVIEW_MIN_TOTAL: u16 = 90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostListAction {
    None,
    Quit,
    New,
    Edit(BlogPost),
    Delete(PostId),
    Refresh,
}

/// Lists stored posts with a cover status per row.
pub struct PostListScreen {
    posts: Vec<BlogPost>,
    demo: bool,
    loading: bool,
    list_state: ListState,
    images: ImageLoadCoordinator,
    pending_delete: Option<PostId>,
    status: Option<StatusMessage>,
    timestamp_format: String,
    viewport: Range<usize>,
}

impl PostListScreen {
    #[must_use]
    pub fn new(images: ImageLoadCoordinator, timestamp_format: impl Into<String>) -> Self {
        Self {
            posts: Vec::new(),
            demo: false,
            loading: true,
            list_state: ListState::default(),
            images,
            pending_delete: None,
            status: None,
            timestamp_format: timestamp_format.into(),
            viewport: 0..0,
        }
    }

    fn image_key(id: &PostId) -> String {
        format!("{IMAGE_KEY_PREFIX}{id}")
    }

    /// Returns true if an image event belongs to this screen's rows.
    #[must_use]
    pub fn owns_image(key: &str) -> bool {
        key.starts_with(IMAGE_KEY_PREFIX)
    }

    /// Replaces the rows after a load.
    pub fn set_posts(&mut self, posts: Sourced<Vec<BlogPost>>) {
        self.demo = posts.demo;
        self.loading = false;
        self.posts = posts.value;
        self.pending_delete = None;

        self.images.set_rows(self.posts.iter().map(|p| {
            (
                Self::image_key(&p.id),
                p.fields.image.clone(),
                Some(COVER_LABEL.to_string()),
            )
        }));

        let selected = match self.list_state.selected() {
            _ if self.posts.is_empty() => None,
            Some(i) => Some(i.min(self.posts.len() - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    #[must_use]
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    #[must_use]
    pub const fn is_demo(&self) -> bool {
        self.demo
    }

    #[must_use]
    pub fn selected(&self) -> Option<&BlogPost> {
        self.list_state.selected().and_then(|i| self.posts.get(i))
    }

    #[must_use]
    pub fn image_state(&self, id: &PostId) -> Option<&ImageLoadState> {
        self.images.slot(&Self::image_key(id)).map(|s| s.state())
    }

    /// Issues fetches for the rows drawn by the last render.
    pub fn sync_visibility(&mut self) -> usize {
        self.images.set_visible(self.viewport.clone())
    }

    pub fn handle_image_event(&mut self, event: ImageEvent) -> bool {
        self.images.handle_event(event)
    }

    #[must_use]
    pub fn any_revealing(&self) -> bool {
        self.images.any_revealing()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PostListAction {
        let confirming = self.pending_delete.take();

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_offset(1);
                PostListAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_offset(-1);
                PostListAction::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                if !self.posts.is_empty() {
                    self.list_state.select(Some(0));
                }
                PostListAction::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                if !self.posts.is_empty() {
                    self.list_state.select(Some(self.posts.len() - 1));
                }
                PostListAction::None
            }
            KeyCode::Enter => self
                .selected()
                .cloned()
                .map_or(PostListAction::None, PostListAction::Edit),
            _ if is_char(&key, 'n') => PostListAction::New,
            _ if is_char(&key, 'r') => PostListAction::Refresh,
            _ if is_char(&key, 'q') => PostListAction::Quit,
            _ if is_char(&key, 'd') => {
                let Some(post) = self.selected() else {
                    return PostListAction::None;
                };
                let id = post.id.clone();
                if confirming.as_ref() == Some(&id) {
                    return PostListAction::Delete(id);
                }
                self.status = Some(StatusMessage::warning(format!(
                    "Press d again to delete \"{}\"",
                    post.title()
                )));
                self.pending_delete = Some(id);
                PostListAction::None
            }
            _ => PostListAction::None,
        }
    }

    fn select_offset(&mut self, delta: isize) {
        if self.posts.is_empty() {
            return;
        }
        let last = self.posts.len() - 1;
        let current = self.list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.list_state.select(Some(next));
    }

    fn row(&self, post: &BlogPost, width: usize) -> ListItem<'static> {
        let (glyph, color) = self
            .image_state(&post.id)
            .map_or(("·", Color::DarkGray), status_glyph);

        let (badge, badge_style) = if post.is_published() {
            ("published", Style::default().fg(Color::Green))
        } else {
            ("draft    ", Style::default().fg(Color::Yellow))
        };
        let updated = format_local(post.updated_at, &self.timestamp_format);
        let fixed = 2 + badge.len() + 1 + updated.len() + 2 + post.fields.category.len() + 3;
        let title = truncate_to_width(post.title(), width.saturating_sub(fixed).max(8));

        ListItem::new(Line::from(vec![
            Span::styled(format!("{glyph} "), Style::default().fg(color)),
            Span::styled(badge, badge_style),
            Span::raw(" "),
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", post.fields.category),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" "),
            Span::styled(updated, Style::default().fg(Color::DarkGray)),
        ]))
    }

    /// Cover of the selected post, beside the list on wide terminals.
    fn render_preview(&self, area: Rect, buf: &mut Buffer, renderer: &mut ImageRenderer) {
        let key = self.selected().map(|p| Self::image_key(&p.id));
        renderer.retain(|k| key.as_deref() == Some(k));

        let Some(key) = key else {
            ImagePreview::new(None).title(" Cover ").render(area, buf);
            return;
        };
        ImagePreview::new(self.images.slot(&key))
            .picture(renderer.protocol(&key, self.images.pixels(&key)))
            .revealing(self.images.is_revealing(&key))
            .title(" Cover ")
            .render(area, buf);
    }

    /// Draws the screen and remembers which rows were visible.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, renderer: &mut ImageRenderer) {
        let banner_height = u16::from(self.demo);
        let [banner, body, status] = Layout::vertical([
            Constraint::Length(banner_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let body = if body.width >= PREVIEW_MIN_TOTAL && !self.posts.is_empty() {
            let [list, preview] =
                Layout::horizontal([Constraint::Min(40), Constraint::Length(PREVIEW_WIDTH)])
                    .areas(body);
            self.render_preview(preview, buf, renderer);
            list
        } else {
            body
        };

        if self.demo {
            Paragraph::new(Line::from(Span::styled(
                " Demo data: the content store is unreachable, changes may not persist ",
                Style::default().fg(Color::Black).bg(Color::Yellow),
            )))
            .render(banner, buf);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Posts ({}) ", self.posts.len()));
        let inner = block.inner(body);

        if self.loading && self.posts.is_empty() {
            Paragraph::new("Loading posts…")
                .block(block)
                .render(body, buf);
            self.viewport = 0..0;
        } else if self.posts.is_empty() {
            Paragraph::new("No posts yet. Press n to write one.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(body, buf);
            self.viewport = 0..0;
        } else {
            let width = usize::from(inner.width);
            let items: Vec<ListItem<'static>> =
                self.posts.iter().map(|p| self.row(p, width)).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("▌");
            StatefulWidget::render(list, body, buf, &mut self.list_state);

            let start = self.list_state.offset();
            let end = (start + usize::from(inner.height)).min(self.posts.len());
            self.viewport = start..end;
        }

        let hints = if self.loading { "loading…" } else { HINTS };
        StatusBar::new(self.status.as_ref(), hints).render(status, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FallbackSources;
    use crate::domain::ports::mocks::ScriptedFetcher;
    use crate::infrastructure::content::demo_posts;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn screen() -> (PostListScreen, mpsc::UnboundedReceiver<ImageEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fallbacks = FallbackSources {
            team: "https://img.test/team.jpg".to_string(),
            blog: "https://img.test/blog.jpg".to_string(),
            generic: "https://img.test/generic.jpg".to_string(),
        };
        let coordinator =
            ImageLoadCoordinator::new(Arc::new(ScriptedFetcher::new()), fallbacks, tx);
        (PostListScreen::new(coordinator, "%Y-%m-%d"), rx)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_selection_and_edit() {
        let (mut screen, _rx) = screen();
        screen.set_posts(Sourced::live(demo_posts()));

        assert_eq!(screen.selected().map(|p| p.id.as_str()), Some("demo-3"));
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Down));
        assert_eq!(screen.selected().map(|p| p.id.as_str()), Some("demo-1"));

        let action = screen.handle_key(key(KeyCode::Enter));
        assert!(matches!(action, PostListAction::Edit(post) if post.id.as_str() == "demo-1"));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (mut screen, _rx) = screen();
        screen.set_posts(Sourced::live(demo_posts()));

        assert_eq!(screen.handle_key(key(KeyCode::Char('d'))), PostListAction::None);
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('d'))),
            PostListAction::Delete(PostId::new("demo-3"))
        );

        screen.handle_key(key(KeyCode::Char('d')));
        screen.handle_key(key(KeyCode::Down));
        assert_eq!(screen.handle_key(key(KeyCode::Char('d'))), PostListAction::None);
    }

    #[tokio::test]
    async fn test_render_reveals_visible_rows() {
        let (mut screen, mut rx) = screen();
        screen.set_posts(Sourced::demo(demo_posts()));
        assert!(screen.is_demo());

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf, &mut ImageRenderer::halfblocks());

        assert_eq!(screen.sync_visibility(), 3);
        for _ in 0..3 {
            let event = rx.recv().await.expect("fetch finished");
            assert!(screen.handle_image_event(event));
        }
        assert!(
            screen
                .image_state(&PostId::new("demo-2"))
                .is_some_and(ImageLoadState::is_loaded)
        );
    }

    #[tokio::test]
    async fn test_wide_layout_previews_selected_cover() {
        let (mut screen, mut rx) = screen();
        screen.set_posts(Sourced::live(demo_posts()));
        let mut renderer = ImageRenderer::halfblocks();
        let area = Rect::new(0, 0, 120, 12);

        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf, &mut renderer);
        screen.sync_visibility();
        for _ in 0..3 {
            let event = rx.recv().await.expect("fetch finished");
            screen.handle_image_event(event);
        }

        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf, &mut renderer);
        assert_eq!(renderer.len(), 1);

        screen.handle_key(key(KeyCode::Down));
        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf, &mut renderer);
        assert_eq!(renderer.len(), 1);

        let right = area.width - PREVIEW_WIDTH;
        let preview: String = (right..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(preview.contains("Cover"));
    }

    #[tokio::test]
    async fn test_empty_collection_has_no_selection() {
        let (mut screen, _rx) = screen();
        screen.set_posts(Sourced::live(Vec::new()));
        assert!(screen.selected().is_none());
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), PostListAction::None);
    }
}
