//! Event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of event handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Continue processing.
    Continue,
    /// Exit application.
    Exit,
    /// Event was consumed.
    Consumed,
}

/// Returns true for key presses; repeats and releases are ignored.
#[must_use]
pub fn is_press(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
}

/// Checks for `Ctrl+<c>`.
#[must_use]
pub fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Ctrl+C quits from any screen.
#[must_use]
pub fn is_force_quit(key: &KeyEvent) -> bool {
    is_ctrl(key, 'c')
}

/// Checks for a bare character key, with or without shift.
#[must_use]
pub fn is_char(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c)
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_detection() {
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert!(is_ctrl(&ctrl_s, 's'));
        assert!(!is_char(&ctrl_s, 's'));

        let plain = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert!(!is_ctrl(&plain, 's'));
        assert!(is_char(&plain, 's'));
    }

    #[test]
    fn test_force_quit() {
        assert!(is_force_quit(&KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_force_quit(&KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE
        )));
    }
}
