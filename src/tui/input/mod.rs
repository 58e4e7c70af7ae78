mod drag;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

use super::app::App;

use drag::*;
use navigate::*;

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        cancel_drag(app);
        app.should_quit = true;
        return;
    }

    // An active session owns the keyboard
    if app.drag.is_active() {
        handle_drag_key(app, key);
    } else {
        handle_navigate(app, key);
    }
}

/// Handle a mouse event
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    handle_pointer(app, mouse);
}

/// The terminal lost focus: a gesture in progress can't finish cleanly
pub fn handle_focus_lost(app: &mut App) {
    if app.drag.is_active() {
        cancel_drag(app);
    }
}
