use crossterm::event::{KeyCode, KeyEvent};

use crate::model::Status;
use crate::tui::app::{App, StatusMessage};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('h') | KeyCode::Left => move_column(app, -1),
        KeyCode::Char('l') | KeyCode::Right => move_column(app, 1),
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('g') | KeyCode::Home => move_cursor(app, isize::MIN),
        KeyCode::Char('G') | KeyCode::End => move_cursor(app, isize::MAX),
        KeyCode::Char(' ') | KeyCode::Char('m') => pick_up(app),
        KeyCode::Enter => {
            if let Some((_, _, record)) = app.focused_card() {
                let id = record.id.clone();
                describe(app, &id);
            }
        }
        KeyCode::Esc => app.message = None,
        _ => {}
    }
}

fn move_column(app: &mut App, delta: isize) {
    let count = app.stages().len();
    if count == 0 {
        return;
    }
    let next = app.focused_column.saturating_add_signed(delta).min(count - 1);
    app.focused_column = next;
}

fn move_cursor(app: &mut App, delta: isize) {
    let Some(status) = app.focused_status() else {
        return;
    };
    let len = app.column_len(status);
    if len == 0 {
        return;
    }
    let next = app.cursor(status).saturating_add_signed(delta).min(len - 1);
    app.cursors.insert(status, next);
    reveal(app, status, next);
}

/// Scroll a column just enough to show card `index`
pub(super) fn reveal(app: &mut App, status: Status, index: usize) {
    let Some(viewport) = viewport_height(app, status) else {
        return;
    };
    let scroll = app.scroll.get(&status).copied().unwrap_or(0.0);
    let scroll = app.window_config.scroll_to_reveal(index, scroll, viewport);
    app.scroll.insert(status, scroll);
}

/// Scroll a column by `delta` rows, clamped to its content
pub(super) fn scroll_column(app: &mut App, status: Status, delta: f64) {
    let Some(viewport) = viewport_height(app, status) else {
        return;
    };
    let len = app.column_len(status);
    let scroll = app.scroll.get(&status).copied().unwrap_or(0.0);
    let scroll = app.window_config.clamp_scroll(scroll + delta, viewport, len);
    app.scroll.insert(status, scroll);
}

fn viewport_height(app: &App, status: Status) -> Option<f64> {
    app.geometry
        .column(status)
        .and_then(|c| c.rect)
        .map(|r| r.height)
}

/// Show a one-line summary of an application in the status row
pub(super) fn describe(app: &mut App, id: &str) {
    let Some(record) = app.board.find(id) else {
        return;
    };
    let mut text = format!("{}  {} - {}", record.id, record.company, record.role);
    if let Some(location) = &record.location {
        text.push_str(&format!(" ({})", location));
    }
    app.message = Some(StatusMessage::info(text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Application;
    use crate::tui::render::test_helpers::{app_rendered, sample_board};

    #[test]
    fn cursor_reveals_offscreen_cards() {
        let mut board = sample_board();
        for i in 0..20 {
            board.applications.push(Application::new(
                format!("APP-{:03}", 100 + i),
                "Globex",
                "Engineer",
                Status::Applied,
            ));
        }
        let mut app = app_rendered(board);
        move_cursor(&mut app, isize::MAX);
        assert_eq!(app.cursor(Status::Applied), 22);
        // 23 cards of 3 rows in a 20-row body
        assert_eq!(app.scroll.get(&Status::Applied), Some(&49.0));

        move_cursor(&mut app, isize::MIN);
        assert_eq!(app.scroll.get(&Status::Applied), Some(&0.0));
    }

    #[test]
    fn scroll_is_clamped() {
        let mut app = app_rendered(sample_board());
        // Three cards fit, nothing to scroll
        scroll_column(&mut app, Status::Applied, 3.0);
        assert_eq!(app.scroll.get(&Status::Applied), Some(&0.0));
    }

    #[test]
    fn describe_sets_message() {
        let mut app = app_rendered(sample_board());
        describe(&mut app, "APP-004");
        assert_eq!(
            app.message.map(|m| m.text),
            Some("APP-004  Initech - Platform Engineer (Austin)".to_string())
        );
    }
}
