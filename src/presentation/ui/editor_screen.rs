//! Post editor screen with autosave and draft recovery.

use std::time::Duration;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::recovery_prompt::{RecoveryChoice, RecoveryPrompt};
use super::utils::format_local;
use crate::application::services::draft_manager::{AutosaveOutcome, Autosaver, DraftManager};
use crate::application::services::editor_session::{EditorField, EditorSession};
use crate::application::services::image_coordinator::{ImageEvent, ImageLoadCoordinator};
use crate::domain::entities::{ContentIdentity, ImageLoadState, LoadMode};
use crate::domain::errors::ContentError;
use crate::domain::services::{ValidationErrors, is_absolute_url};
use crate::presentation::events::is_ctrl;
use crate::presentation::widgets::{
    BodyEditor, ImagePreview, ImageRenderer, StatusBar, StatusMessage, TextInput,
};

const COVER_KEY: &str = "cover";
const COVER_LABEL: &str = "Blog cover";
const HINTS: &str = "Tab next  ^S save  ^D discard  Esc back";

#[derive(Debug, Clone)]
pub enum EditorAction {
    None,
    /// Leave the editor; the draft stays.
    Back,
    /// Validated fields ready to persist.
    Save(EditorSession),
    /// The draft was discarded and the editor should close.
    Discarded,
}

/// Settings taken from the `[editor]` and `[ui]` config sections.
#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub autosave_interval: Duration,
    pub categories: Vec<String>,
    pub timestamp_format: String,
}

pub struct EditorScreen {
    session: EditorSession,
    focus: EditorField,
    title: TextInput,
    excerpt: TextInput,
    image: TextInput,
    tags: TextInput,
    body: BodyEditor,
    categories: Vec<String>,
    drafts: DraftManager,
    autosaver: Autosaver,
    recovery: Option<RecoveryPrompt>,
    images: ImageLoadCoordinator,
    cover_shown: bool,
    status: Option<StatusMessage>,
    last_autosave: Option<DateTime<Utc>>,
    saving: bool,
    timestamp_format: String,
}

impl EditorScreen {
    /// Opens the editor and starts autosaving.
    ///
    /// For a new post with a non-empty stored draft, the recovery prompt is
    /// shown before anything else.
    #[must_use]
    pub fn open(
        session: EditorSession,
        drafts: DraftManager,
        images: ImageLoadCoordinator,
        autosave_tx: mpsc::UnboundedSender<AutosaveOutcome>,
        options: EditorOptions,
    ) -> Self {
        let recovery = drafts
            .offer_recovery(session.identity())
            .map(|draft| RecoveryPrompt::new(draft, options.timestamp_format.clone()));
        if recovery.is_some() {
            info!("Offering draft recovery");
        }

        let autosaver = Autosaver::spawn(
            drafts.clone(),
            session.identity().clone(),
            session.fields().clone(),
            options.autosave_interval,
            Some(autosave_tx),
        );

        let mut categories = options.categories;
        let current = &session.fields().category;
        if !current.is_empty() && !categories.contains(current) {
            categories.push(current.clone());
        }

        let mut screen = Self {
            session,
            focus: EditorField::Title,
            title: TextInput::new(EditorField::Title.label()).placeholder("10 to 100 characters"),
            excerpt: TextInput::new(EditorField::Excerpt.label())
                .placeholder("Filled from the first paragraph if left empty"),
            image: TextInput::new(EditorField::Image.label()).placeholder("https://…"),
            tags: TextInput::new(EditorField::Tags.label()).placeholder("startups, ventures"),
            body: BodyEditor::new(EditorField::Body.label()),
            categories,
            drafts,
            autosaver,
            recovery,
            images,
            cover_shown: false,
            status: None,
            last_autosave: None,
            saving: false,
            timestamp_format: options.timestamp_format,
        };
        screen.load_inputs();
        screen.apply_focus();
        screen.refresh_cover();
        screen
    }

    #[must_use]
    pub const fn session(&self) -> &EditorSession {
        &self.session
    }

    #[must_use]
    pub const fn focus(&self) -> EditorField {
        self.focus
    }

    #[must_use]
    pub const fn is_recovering(&self) -> bool {
        self.recovery.is_some()
    }

    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    #[must_use]
    pub fn cover_state(&self) -> Option<&ImageLoadState> {
        self.images.slot(COVER_KEY).map(|s| s.state())
    }

    fn load_inputs(&mut self) {
        let fields = self.session.fields();
        self.title.set_value(fields.title.clone());
        self.excerpt.set_value(fields.excerpt.clone());
        self.image.set_value(fields.image.clone());
        self.tags.set_value(fields.tags_csv());
        self.body.set_value(&fields.body);
        self.apply_errors(&ValidationErrors::default());
    }

    fn apply_errors(&mut self, errors: &ValidationErrors) {
        self.title.set_error(errors.title.clone());
        self.excerpt.set_error(errors.excerpt.clone());
        self.image.set_error(errors.image.clone());
        self.tags.set_error(errors.tags.clone());
        self.body.set_error(errors.body.clone());
    }

    fn apply_focus(&mut self) {
        self.title.set_focused(self.focus == EditorField::Title);
        self.excerpt.set_focused(self.focus == EditorField::Excerpt);
        self.image.set_focused(self.focus == EditorField::Image);
        self.tags.set_focused(self.focus == EditorField::Tags);
        self.body.set_focused(self.focus == EditorField::Body);
    }

    fn set_focus(&mut self, next: EditorField) {
        if self.focus == EditorField::Image && next != EditorField::Image {
            self.refresh_cover();
        }
        self.focus = next;
        self.apply_focus();
    }

    /// Points the eager cover preview at the current image field.
    fn refresh_cover(&mut self) {
        let url = self.session.fields().image.trim().to_string();
        if is_absolute_url(&url) {
            self.images
                .upsert(COVER_KEY, &url, Some(COVER_LABEL.to_string()), LoadMode::Eager);
            self.cover_shown = true;
        } else {
            self.cover_shown = false;
        }
    }

    fn publish_fields(&self) {
        self.autosaver.update(self.session.fields().clone());
    }

    /// Writes a draft immediately, outside the autosave interval.
    ///
    /// Does nothing while a save is in flight.
    pub fn flush_draft(&self) {
        if self.session.is_dirty() && !self.saving {
            let outcome = self
                .drafts
                .autosave(self.session.identity(), self.session.fields());
            debug!(outcome = ?outcome, "Draft flushed on leave");
        }
    }

    pub fn handle_autosave(&mut self, outcome: AutosaveOutcome) {
        match outcome {
            AutosaveOutcome::Skipped => {}
            AutosaveOutcome::Saved(at) => self.last_autosave = Some(at),
            AutosaveOutcome::Failed(reason) => {
                self.status = Some(StatusMessage::warning(format!(
                    "Draft not saved: {reason}"
                )));
            }
        }
    }

    pub fn handle_image_event(&mut self, event: ImageEvent) -> bool {
        self.images.handle_event(event)
    }

    #[must_use]
    pub fn any_revealing(&self) -> bool {
        self.images.any_revealing()
    }

    /// Rejected by validation in the background save.
    pub fn save_rejected(&mut self, errors: &ValidationErrors) {
        self.saving = false;
        self.autosaver.resume();
        self.apply_errors(errors);
        self.status = Some(StatusMessage::error(format!(
            "Fix {} field(s) before saving",
            errors.len()
        )));
    }

    /// The store refused the post. Fields and draft are kept.
    pub fn save_failed(&mut self, error: &ContentError) {
        self.saving = false;
        self.autosaver.resume();
        self.status = Some(StatusMessage::error(format!(
            "Save failed: {error}. Your draft is kept."
        )));
    }

    fn request_save(&mut self) -> EditorAction {
        if self.saving {
            return EditorAction::None;
        }
        if !self.session.validate() {
            let errors = self.session.errors().clone();
            self.save_rejected(&errors);
            return EditorAction::None;
        }
        self.apply_errors(&ValidationErrors::default());
        self.saving = true;
        self.autosaver.pause();
        self.status = Some(StatusMessage::info("Saving…"));
        EditorAction::Save(self.session.clone())
    }

    fn discard(&mut self) -> EditorAction {
        if self.drafts.discard(self.session.identity()) {
            EditorAction::Discarded
        } else {
            self.status = Some(StatusMessage::error("Could not discard the draft"));
            EditorAction::None
        }
    }

    fn handle_recovery_key(&mut self, key: KeyEvent) {
        let Some(prompt) = &self.recovery else {
            return;
        };
        match prompt.handle_key(key) {
            RecoveryChoice::Pending => {}
            RecoveryChoice::Restore => {
                if let Some(prompt) = self.recovery.take() {
                    self.session.restore(prompt.into_draft());
                    self.load_inputs();
                    self.publish_fields();
                    self.refresh_cover();
                    self.status = Some(StatusMessage::success("Draft restored"));
                }
            }
            RecoveryChoice::Decline => {
                self.recovery = None;
                self.status = Some(StatusMessage::info("Starting blank, the stored draft is kept"));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if self.recovery.is_some() {
            self.handle_recovery_key(key);
            return EditorAction::None;
        }

        if is_ctrl(&key, 's') {
            return self.request_save();
        }
        if self.saving {
            return EditorAction::None;
        }
        if is_ctrl(&key, 'd') {
            return self.discard();
        }

        match key.code {
            KeyCode::Esc => {
                self.flush_draft();
                return EditorAction::Back;
            }
            KeyCode::Tab => {
                self.set_focus(self.focus.next());
                return EditorAction::None;
            }
            KeyCode::BackTab => {
                self.set_focus(self.focus.previous());
                return EditorAction::None;
            }
            _ => {}
        }

        if self.edit_focused(key) {
            self.publish_fields();
        }
        EditorAction::None
    }

    fn edit_focused(&mut self, key: KeyEvent) -> bool {
        match self.focus {
            EditorField::Title => {
                let changed = self.title.handle_key(key);
                if changed {
                    self.session.set_title(self.title.value());
                }
                changed
            }
            EditorField::Excerpt => {
                let changed = self.excerpt.handle_key(key);
                if changed {
                    self.session.set_excerpt(self.excerpt.value());
                }
                changed
            }
            EditorField::Image => {
                let changed = self.image.handle_key(key);
                if changed {
                    self.session.set_image(self.image.value());
                }
                changed
            }
            EditorField::Tags => {
                let changed = self.tags.handle_key(key);
                if changed {
                    self.session.set_tags_csv(self.tags.value());
                }
                changed
            }
            EditorField::Category => self.cycle_category(key),
            EditorField::Published => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => {
                    let published = !self.session.fields().published;
                    self.session.set_published(published);
                    true
                }
                _ => false,
            },
            EditorField::Body => {
                let changed = self.body.handle_key(key);
                if changed {
                    self.session.set_body(self.body.value());
                    let excerpt = &self.session.fields().excerpt;
                    if excerpt != self.excerpt.value() {
                        self.excerpt.set_value(excerpt.clone());
                    }
                }
                changed
            }
        }
    }

    fn cycle_category(&mut self, key: KeyEvent) -> bool {
        if self.categories.is_empty() {
            return false;
        }
        let step: isize = match key.code {
            KeyCode::Right | KeyCode::Char(' ') => 1,
            KeyCode::Left => -1,
            _ => return false,
        };
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        let len = self.categories.len();
        let current = self
            .categories
            .iter()
            .position(|c| *c == self.session.fields().category)
            .unwrap_or(0);
        let next = (current + len).wrapping_add_signed(step) % len;
        self.session.set_category(self.categories[next].clone());
        true
    }

    fn render_choice(&self, field: EditorField, value: Line<'_>, area: Rect, buf: &mut Buffer) {
        let border = if self.focus == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        Paragraph::new(value)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" {} ", field.label())),
            )
            .render(area, buf);
    }

    fn render_info(&self, area: Rect, buf: &mut Buffer) {
        let fields = self.session.fields();
        let label = Style::default().fg(Color::DarkGray);
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Post      ", label),
                Span::raw(match self.session.identity() {
                    ContentIdentity::New => "new".to_string(),
                    ContentIdentity::Existing(id) => id.to_string(),
                }),
            ]),
            Line::from(vec![
                Span::styled("Read time ", label),
                Span::raw(fields.read_time.clone().unwrap_or_else(|| "–".to_string())),
            ]),
            Line::from(vec![
                Span::styled("Words     ", label),
                Span::raw(fields.body.split_whitespace().count().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Autosaved ", label),
                Span::raw(self.last_autosave.map_or_else(
                    || "not yet".to_string(),
                    |at| format_local(at, &self.timestamp_format),
                )),
            ]),
        ];
        if self.session.is_dirty() {
            lines.push(Line::from(Span::styled(
                "unsaved changes",
                Style::default().fg(Color::Yellow),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Details "))
            .render(area, buf);
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, renderer: &mut ImageRenderer) {
        let [header, main, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(area);

        let heading = match self.session.identity() {
            ContentIdentity::New => "New post".to_string(),
            ContentIdentity::Existing(_) => format!("Editing: {}", self.session.fields().title),
        };
        Paragraph::new(Span::styled(
            heading,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .render(header, buf);

        let [form, side] =
            Layout::horizontal([Constraint::Min(40), Constraint::Length(32)]).areas(main);
        let [title, excerpt, image, tags, meta, body] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .areas(form);

        self.title.render(title, buf);
        self.excerpt.render(excerpt, buf);
        self.image.render(image, buf);
        self.tags.render(tags, buf);

        let [category, published] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(meta);
        let fields = self.session.fields();
        self.render_choice(
            EditorField::Category,
            Line::from(format!("‹ {} ›", fields.category)),
            category,
            buf,
        );
        let toggle = if fields.published {
            Span::styled("[x] published", Style::default().fg(Color::Green))
        } else {
            Span::styled("[ ] draft", Style::default().fg(Color::Yellow))
        };
        self.render_choice(EditorField::Published, Line::from(toggle), published, buf);

        self.body.render(body, buf);

        let [preview, info] =
            Layout::vertical([Constraint::Length(9), Constraint::Min(6)]).areas(side);
        let (slot, pixels) = if self.cover_shown {
            (self.images.slot(COVER_KEY), self.images.pixels(COVER_KEY))
        } else {
            (None, None)
        };
        ImagePreview::new(slot)
            .picture(renderer.protocol(COVER_KEY, pixels))
            .revealing(self.images.is_revealing(COVER_KEY))
            .render(preview, buf);
        self.render_info(info, buf);

        StatusBar::new(self.status.as_ref(), HINTS).render(status, buf);

        if let Some(prompt) = &self.recovery {
            prompt.render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::diagnostics::ErrorReporter;
    use crate::domain::entities::{FallbackSources, PostFields};
    use crate::domain::ports::mocks::ScriptedFetcher;
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use std::sync::Arc;

    struct Fixture {
        drafts: DraftManager,
        autosave_rx: mpsc::UnboundedReceiver<AutosaveOutcome>,
        image_rx: mpsc::UnboundedReceiver<ImageEvent>,
        screen: EditorScreen,
    }

    fn drafts() -> DraftManager {
        let store = Arc::new(MemoryKeyValueStore::new());
        let reporter = ErrorReporter::new(store.clone(), "test");
        DraftManager::new(store, reporter)
    }

    fn open(drafts: DraftManager, session: EditorSession) -> Fixture {
        let (autosave_tx, autosave_rx) = mpsc::unbounded_channel();
        let (image_tx, image_rx) = mpsc::unbounded_channel();
        let fallbacks = FallbackSources {
            team: "https://img.test/team.jpg".to_string(),
            blog: "https://img.test/blog.jpg".to_string(),
            generic: "https://img.test/generic.jpg".to_string(),
        };
        let images =
            ImageLoadCoordinator::new(Arc::new(ScriptedFetcher::new()), fallbacks, image_tx);
        let options = EditorOptions {
            autosave_interval: Duration::from_secs(30),
            categories: vec!["news".to_string(), "insights".to_string()],
            timestamp_format: "%H:%M".to_string(),
        };
        let screen = EditorScreen::open(session, drafts.clone(), images, autosave_tx, options);
        Fixture {
            drafts,
            autosave_rx,
            image_rx,
            screen,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut EditorScreen, text: &str) {
        for c in text.chars() {
            let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            screen.handle_key(key(code));
        }
    }

    fn focus(screen: &mut EditorScreen, field: EditorField) {
        while screen.focus() != field {
            screen.handle_key(key(KeyCode::Tab));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_body_is_autosaved() {
        let mut f = open(drafts(), EditorSession::new_post("news"));
        focus(&mut f.screen, EditorField::Body);
        type_text(&mut f.screen, "A body typed key by key");

        let outcome = f.autosave_rx.recv().await.expect("tick");
        assert!(matches!(outcome, AutosaveOutcome::Saved(_)));
        f.screen.handle_autosave(outcome);

        let draft = f.drafts.load(&ContentIdentity::New).expect("draft stored");
        assert_eq!(draft.fields.body, "A body typed key by key");
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_draft_survives_reopen_and_restores() {
        let drafts = drafts();
        let body = (1..=150)
            .map(|i| format!("word{i}"))
            .collect::<Vec<_>>()
            .join(" ");

        let mut f = open(drafts.clone(), EditorSession::new_post("news"));
        type_text(&mut f.screen, "Studio notes");
        focus(&mut f.screen, EditorField::Body);
        type_text(&mut f.screen, &body);

        let outcome = f.autosave_rx.recv().await.expect("tick");
        assert!(matches!(outcome, AutosaveOutcome::Saved(_)));
        drop(f);

        let mut g = open(drafts, EditorSession::new_post("news"));
        assert!(g.screen.is_recovering());
        g.screen.handle_key(key(KeyCode::Char('y')));

        let fields = g.screen.session().fields();
        assert_eq!(fields.title, "Studio notes");
        assert_eq!(fields.body, body);
        assert_eq!(fields.read_time.as_deref(), Some("1 min read"));
        assert_eq!(g.screen.body.value(), body);
        assert_eq!(g.screen.title.value(), "Studio notes");
    }

    #[tokio::test]
    async fn test_excerpt_fills_once_while_typing() {
        let mut f = open(drafts(), EditorSession::new_post("news"));
        focus(&mut f.screen, EditorField::Body);
        let opening = "Venture studios share talent, capital and playbooks across many startups.";
        type_text(&mut f.screen, opening);

        let excerpt = f.screen.session().fields().excerpt.clone();
        assert!(excerpt.chars().count() > 50);
        assert!(opening.starts_with(&excerpt));
        assert_eq!(f.screen.excerpt.value(), excerpt);
    }

    #[tokio::test]
    async fn test_recovery_restore_and_decline() {
        let drafts = drafts();
        let fields = PostFields {
            title: "Recovered title".to_string(),
            body: "Recovered body".to_string(),
            ..PostFields::default()
        };
        drafts.autosave(&ContentIdentity::New, &fields);

        let mut f = open(drafts.clone(), EditorSession::new_post("news"));
        assert!(f.screen.is_recovering());
        f.screen.handle_key(key(KeyCode::Char('y')));
        assert!(!f.screen.is_recovering());
        assert_eq!(f.screen.session().fields().title, "Recovered title");
        assert_eq!(f.screen.title.value(), "Recovered title");

        let mut g = open(drafts.clone(), EditorSession::new_post("news"));
        g.screen.handle_key(key(KeyCode::Char('n')));
        assert!(g.screen.session().fields().title.is_empty());
        assert!(drafts.load(&ContentIdentity::New).is_some());
    }

    #[tokio::test]
    async fn test_invalid_save_marks_fields() {
        let mut f = open(drafts(), EditorSession::new_post("news"));
        type_text(&mut f.screen, "Short");

        let action = f.screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(matches!(action, EditorAction::None));
        assert!(!f.screen.is_saving());
        assert!(f.screen.session().errors().title.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_draft_written_while_save_in_flight() {
        let drafts = drafts();
        let mut session = EditorSession::new_post("news");
        session.set_title("Venture studio playbook");
        session.set_excerpt("How studios share talent, capital and playbooks across startups.");
        session.set_image("https://img.test/cover.jpg");
        session.set_tags_csv("studios, ventures");
        session.set_body("Studios build companies side by side. ".repeat(5));
        let mut f = open(drafts.clone(), session);

        let action = f.screen.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(matches!(action, EditorAction::Save(_)));

        // A successful save of a new post removes its draft.
        drafts.discard(&ContentIdentity::New);
        tokio::time::sleep(Duration::from_secs(61)).await;
        f.screen.flush_draft();
        assert!(f.autosave_rx.try_recv().is_err());
        assert!(drafts.load(&ContentIdentity::New).is_none());

        f.screen.save_failed(&ContentError::Network {
            message: "connection refused".to_string(),
        });
        let outcome = f.autosave_rx.recv().await.expect("tick");
        assert!(matches!(outcome, AutosaveOutcome::Saved(_)));
        assert!(drafts.load(&ContentIdentity::New).is_some());
    }

    #[tokio::test]
    async fn test_category_and_published_controls() {
        let mut f = open(drafts(), EditorSession::new_post("news"));
        focus(&mut f.screen, EditorField::Category);
        f.screen.handle_key(key(KeyCode::Right));
        assert_eq!(f.screen.session().fields().category, "insights");
        f.screen.handle_key(key(KeyCode::Right));
        assert_eq!(f.screen.session().fields().category, "news");
        f.screen.handle_key(key(KeyCode::Left));
        assert_eq!(f.screen.session().fields().category, "insights");

        f.screen.handle_key(key(KeyCode::Tab));
        f.screen.handle_key(key(KeyCode::Char(' ')));
        assert!(f.screen.session().fields().published);
    }

    #[tokio::test]
    async fn test_leaving_image_field_loads_cover() {
        let mut f = open(drafts(), EditorSession::new_post("news"));
        focus(&mut f.screen, EditorField::Image);
        type_text(&mut f.screen, "https://img.test/cover.jpg");
        assert!(f.screen.cover_state().is_none());

        f.screen.handle_key(key(KeyCode::Tab));
        let event = f.image_rx.recv().await.expect("cover fetched");
        assert!(f.screen.handle_image_event(event));
        assert!(f.screen.cover_state().is_some_and(|s| s.is_loaded()));
    }

    #[tokio::test]
    async fn test_discard_closes_editor() {
        let drafts = drafts();
        let mut f = open(drafts.clone(), EditorSession::new_post("news"));
        type_text(&mut f.screen, "Some title here");
        f.screen.flush_draft();
        assert!(drafts.load(&ContentIdentity::New).is_some());

        let action = f.screen.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert!(matches!(action, EditorAction::Discarded));
        assert!(drafts.load(&ContentIdentity::New).is_none());
    }
}
