//! UI screens.

mod app;
mod boundary;
mod editor_screen;
mod error_screen;
mod post_list_screen;
mod recovery_prompt;
mod utils;

pub use app::App;
pub use boundary::{contain, install_panic_hook};
pub use editor_screen::{EditorAction, EditorOptions, EditorScreen};
pub use error_screen::{ErrorAction, ErrorScreen};
pub use post_list_screen::{PostListAction, PostListScreen};
pub use recovery_prompt::{RecoveryChoice, RecoveryPrompt};
pub use utils::{centered_rect, format_local, truncate_to_width};
