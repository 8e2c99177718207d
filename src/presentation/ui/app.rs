//! Main application orchestrator.

use std::future::Future;
use std::io::stdout;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
    KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use futures_util::{FutureExt, StreamExt};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use super::boundary::{contain, panic_message};
use super::editor_screen::{EditorAction, EditorOptions, EditorScreen};
use super::error_screen::{ErrorAction, ErrorScreen};
use super::post_list_screen::{PostListAction, PostListScreen};
use crate::application::AppContext;
use crate::application::services::content_service::Sourced;
use crate::application::services::draft_manager::AutosaveOutcome;
use crate::application::services::editor_session::EditorSession;
use crate::application::services::image_coordinator::{ImageEvent, ImageLoadCoordinator};
use crate::application::use_cases::{SavePostError, SavedPost};
use crate::domain::entities::{BlogPost, PostId};
use crate::domain::errors::ContentError;
use crate::presentation::events::{EventResult, is_force_quit, is_press};
use crate::presentation::widgets::{ImageRenderer, StatusMessage};

const REVEAL_TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Debug)]
enum Action {
    PostsLoaded(Result<Sourced<Vec<BlogPost>>, ContentError>),
    Saved(Result<SavedPost, SavePostError>),
    Deleted {
        id: PostId,
        result: Result<(), ContentError>,
    },
    TaskFailed {
        context: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Running,
    Exiting,
}

pub struct App {
    ctx: AppContext,
    state: AppState,
    list: PostListScreen,
    editor: Option<Box<EditorScreen>>,
    error: Option<ErrorScreen>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    autosave_tx: mpsc::UnboundedSender<AutosaveOutcome>,
    autosave_rx: mpsc::UnboundedReceiver<AutosaveOutcome>,
    image_tx: mpsc::UnboundedSender<ImageEvent>,
    image_rx: mpsc::UnboundedReceiver<ImageEvent>,
    renderer: ImageRenderer,
}

impl App {
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (autosave_tx, autosave_rx) = mpsc::unbounded_channel();
        let (image_tx, image_rx) = mpsc::unbounded_channel();

        let list = PostListScreen::new(
            Self::coordinator(&ctx, image_tx.clone()),
            ctx.config.ui.timestamp_format.clone(),
        );

        Self {
            ctx,
            state: AppState::Running,
            list,
            editor: None,
            error: None,
            action_tx,
            action_rx,
            autosave_tx,
            autosave_rx,
            image_tx,
            image_rx,
            renderer: ImageRenderer::halfblocks(),
        }
    }

    fn coordinator(
        ctx: &AppContext,
        tx: mpsc::UnboundedSender<ImageEvent>,
    ) -> ImageLoadCoordinator {
        ImageLoadCoordinator::new(ctx.images.clone(), ctx.fallbacks(), tx)
            .with_recorder(ctx.recorder.clone())
            .with_reveal(Duration::from_millis(ctx.config.ui.reveal_millis))
    }

    /// # Errors
    /// Returns error if the terminal cannot be drawn.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mouse = self.ctx.config.ui.mouse;
        if mouse {
            execute!(stdout(), EnableMouseCapture)?;
        }

        self.renderer = ImageRenderer::new();
        self.load_posts();
        let result = self.run_event_loop(terminal).await;

        if let Some(editor) = &self.editor {
            editor.flush_draft();
        }
        if mouse {
            execute!(stdout(), DisableMouseCapture)?;
        }

        self.ctx.shutdown();
        info!("Application exiting normally");
        result
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut reveal_interval = interval(REVEAL_TICK_RATE);

        self.draw(terminal)?;

        while self.state != AppState::Exiting {
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                    self.draw(terminal)?;
                }

                Some(outcome) = self.autosave_rx.recv() => {
                    if let Some(editor) = self.editor.as_mut() {
                        editor.handle_autosave(outcome);
                        self.draw(terminal)?;
                    }
                }

                Some(event) = self.image_rx.recv() => {
                    if self.handle_image_event(event) {
                        self.draw(terminal)?;
                    }
                }

                _ = reveal_interval.tick() => {
                    if self.any_revealing() {
                        self.draw(terminal)?;
                    }
                }

                Some(Ok(event)) = terminal_events.next() => {
                    if self.handle_terminal_event(event) == EventResult::Exit {
                        self.state = AppState::Exiting;
                    }
                    self.draw(terminal)?;
                }
            }
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut crashed = None;
        terminal.draw(|frame| {
            if let Err(message) = contain(|| self.render(frame)) {
                crashed = Some(message);
            }
        })?;
        if let Some(message) = crashed {
            self.fail("render", &message);
            terminal.draw(|frame| self.render(frame))?;
        }
        if self.editor.is_none() && self.error.is_none() {
            self.list.sync_visibility();
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if let Some(error) = &self.error {
            frame.render_widget(error, area);
        } else if let Some(editor) = &self.editor {
            editor.render(area, frame.buffer_mut(), &mut self.renderer);
        } else {
            self.list.render(area, frame.buffer_mut(), &mut self.renderer);
        }
    }

    fn any_revealing(&self) -> bool {
        match &self.editor {
            Some(editor) => editor.any_revealing(),
            None => self.list.any_revealing(),
        }
    }

    fn handle_image_event(&mut self, event: ImageEvent) -> bool {
        if PostListScreen::owns_image(&event.key) {
            self.list.handle_image_event(event)
        } else if let Some(editor) = self.editor.as_mut() {
            editor.handle_image_event(event)
        } else {
            false
        }
    }

    /// Runs `work` in the background. A task that panics lands on the error screen.
    fn spawn_action<F>(&self, context: &'static str, work: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(action) => action,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(context, panic = %message, "Background task panicked");
                    Action::TaskFailed {
                        context,
                        message: format!("{context} panicked: {message}"),
                    }
                }
            };
            let _ = tx.send(action);
        });
    }

    fn load_posts(&mut self) {
        self.list.set_loading();
        let content = self.ctx.content.clone();
        self.spawn_action("load_posts", async move {
            Action::PostsLoaded(content.list_posts().await)
        });
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::PostsLoaded(Ok(posts)) => {
                debug!(count = posts.value.len(), demo = posts.demo, "Posts loaded");
                self.list.set_posts(posts);
            }
            Action::PostsLoaded(Err(e)) => {
                self.fail("load_posts", &e);
            }
            Action::Saved(Ok(saved)) => {
                info!(post_id = %saved.post.id, backend = %saved.backend, "Save completed");
                self.editor = None;
                self.list.set_status(StatusMessage::success(format!(
                    "Saved \"{}\" to {} storage",
                    saved.post.title(),
                    saved.backend
                )));
                self.load_posts();
            }
            Action::Saved(Err(SavePostError::Invalid(errors))) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.save_rejected(&errors);
                }
            }
            Action::Saved(Err(SavePostError::Content(e))) => {
                warn!(error = %e, "Save failed");
                self.ctx.reporter.report("save_post", &e);
                if let Some(editor) = self.editor.as_mut() {
                    editor.save_failed(&e);
                }
            }
            Action::Deleted { id, result: Ok(()) } => {
                info!(post_id = %id, "Post deleted");
                self.list.set_status(StatusMessage::success("Post deleted"));
                self.load_posts();
            }
            Action::Deleted { id, result: Err(e) } => {
                warn!(post_id = %id, error = %e, "Delete failed");
                self.ctx.reporter.report("delete_post", &e);
                self.list
                    .set_status(StatusMessage::error(format!("Delete failed: {e}")));
            }
            Action::TaskFailed { context, message } => {
                self.fail(context, &message);
            }
        }
    }

    /// Error boundary: records the failure and replaces the screen.
    fn fail(&mut self, context: &str, error: &dyn std::fmt::Display) {
        error!(context, error = %error, "Unhandled failure");
        self.ctx.reporter.report(context, error);
        if let Some(editor) = &self.editor {
            editor.flush_draft();
        }
        self.error = Some(ErrorScreen::new(error.to_string()));
    }

    fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) if is_press(&key) => self.handle_key(key),
            Event::Mouse(mouse) if self.editor.is_none() && self.error.is_none() => {
                let code = match mouse.kind {
                    MouseEventKind::ScrollDown => KeyCode::Down,
                    MouseEventKind::ScrollUp => KeyCode::Up,
                    _ => return EventResult::Continue,
                };
                self.list.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
                EventResult::Consumed
            }
            _ => EventResult::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if is_force_quit(&key) {
            return EventResult::Exit;
        }

        if let Some(error) = &self.error {
            return match error.handle_key(key) {
                ErrorAction::None => EventResult::Continue,
                ErrorAction::Quit => EventResult::Exit,
                ErrorAction::Retry => {
                    self.error = None;
                    self.editor = None;
                    self.load_posts();
                    EventResult::Consumed
                }
                ErrorAction::Home => {
                    self.error = None;
                    self.editor = None;
                    EventResult::Consumed
                }
            };
        }

        if let Some(editor) = self.editor.as_mut() {
            match editor.handle_key(key) {
                EditorAction::None => {}
                EditorAction::Back => {
                    self.editor = None;
                    self.list.set_status(StatusMessage::info("Left the editor, draft kept"));
                }
                EditorAction::Discarded => {
                    self.editor = None;
                    self.list.set_status(StatusMessage::info("Draft discarded"));
                }
                EditorAction::Save(session) => self.save(session),
            }
            return EventResult::Consumed;
        }

        match self.list.handle_key(key) {
            PostListAction::None => EventResult::Continue,
            PostListAction::Quit => EventResult::Exit,
            PostListAction::Refresh => {
                self.load_posts();
                EventResult::Consumed
            }
            PostListAction::New => {
                let session = EditorSession::new_post(self.ctx.config.editor.default_category());
                self.open_editor(session);
                EventResult::Consumed
            }
            PostListAction::Edit(post) => {
                self.open_editor(EditorSession::edit(&post));
                EventResult::Consumed
            }
            PostListAction::Delete(id) => {
                let use_case = self.ctx.delete_post();
                self.spawn_action("delete_post", async move {
                    let result = use_case.execute(&id).await;
                    Action::Deleted { id, result }
                });
                EventResult::Consumed
            }
        }
    }

    fn open_editor(&mut self, session: EditorSession) {
        debug!(identity = %session.identity(), "Opening editor");
        let options = EditorOptions {
            autosave_interval: self.ctx.config.editor.autosave_interval(),
            categories: self.ctx.config.editor.categories.clone(),
            timestamp_format: self.ctx.config.ui.timestamp_format.clone(),
        };
        self.editor = Some(Box::new(EditorScreen::open(
            session,
            self.ctx.drafts.clone(),
            Self::coordinator(&self.ctx, self.image_tx.clone()),
            self.autosave_tx.clone(),
            options,
        )));
    }

    fn save(&self, mut session: EditorSession) {
        let use_case = self.ctx.save_post();
        self.spawn_action("save_post", async move {
            Action::Saved(use_case.execute(&mut session).await)
        });
    }
}
