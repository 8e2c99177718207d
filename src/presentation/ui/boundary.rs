//! Panic containment for the terminal UI.
//!
//! `ratatui::init` installs a hook that restores the terminal on every panic.
//! That is wrong for panics the app recovers from: a crashed background task or
//! a failed frame should end on the error screen, not in a cooked terminal.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

thread_local! {
    static CONTAINED: Cell<bool> = const { Cell::new(false) };
}

/// Wraps the current panic hook.
///
/// Panics on runtime worker threads or inside [`contain`] are only logged;
/// their boundary turns them into an error screen. Anything else goes to the
/// previous hook, which restores the terminal and prints the report.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let thread = std::thread::current();
        let name = thread.name().unwrap_or("unnamed");
        error!(thread = name, panic = %info, "Panic");

        if CONTAINED.get() || name != "main" {
            return;
        }
        previous(info);
    }));
}

/// Runs `f` and turns a panic into its message.
///
/// # Errors
/// Returns the panic message if `f` panicked.
pub fn contain<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    let outer = CONTAINED.replace(true);
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CONTAINED.set(outer);
    result.map_err(|payload| panic_message(payload.as_ref()))
}

/// Extracts the text of a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
