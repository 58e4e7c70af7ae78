use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

const NAVIGATE_HINTS: &str = "hjkl move  space pick up  enter details  q quit";
const DRAG_HINTS: &str = "arrows move  enter drop  esc cancel";

/// Text describing the session in progress, if any
fn drag_text(app: &App) -> Option<String> {
    if !app.drag.is_dragging() {
        return None;
    }
    let id = app.drag.dragged_id()?;
    Some(match app.drag.current_target() {
        Some(t) => format!("{} -> {} #{}", id, t.column.label(), t.index + 1),
        None => format!("{} (no drop target)", id),
    })
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    // A live drag outranks any message
    let (text, fg) = match (drag_text(app), &app.message) {
        (Some(text), _) => (text, app.theme.highlight),
        (None, Some(msg)) if msg.is_error => (msg.text.clone(), app.theme.red),
        (None, Some(msg)) => (msg.text.clone(), app.theme.text),
        (None, None) => (String::new(), app.theme.text),
    };
    let text = truncate_to_width(&format!(" {}", text), width);

    let mut spans = vec![Span::styled(text, Style::default().fg(fg).bg(bg))];
    if app.board.config.ui.show_key_hints || app.drag.is_dragging() {
        let hint = if app.drag.is_dragging() {
            DRAG_HINTS
        } else {
            NAVIGATE_HINTS
        };
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint) + 1;
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(
                format!("{} ", hint),
                Style::default().fg(app.theme.dim).bg(bg),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{DragSource, Point};
    use crate::model::Status;
    use crate::tui::app::StatusMessage;
    use crate::tui::render::test_helpers::*;

    fn status_line(app: &mut App) -> String {
        let output = render_app(app);
        output.lines().nth(TERM_H as usize - 1).unwrap_or("").to_string()
    }

    #[test]
    fn message_is_shown() {
        let mut app = app_rendered(sample_board());
        app.message = Some(StatusMessage::error("save failed: disk full"));
        assert_eq!(status_line(&mut app), " save failed: disk full");
    }

    #[test]
    fn hints_only_when_enabled() {
        let mut app = app_rendered(sample_board());
        app.message = Some(StatusMessage::info("hello"));
        assert_eq!(status_line(&mut app), " hello");

        app.board.config.ui.show_key_hints = true;
        let line = status_line(&mut app);
        assert!(line.starts_with(" hello"));
        assert!(line.ends_with(NAVIGATE_HINTS));
    }

    #[test]
    fn drag_shows_target() {
        let mut app = app_rendered(sample_board());
        let rect = app.geometry.column(Status::Applied).unwrap().cards[0].rect;
        app.drag.begin_keyboard(
            DragSource::new("APP-001", Status::Applied, 0),
            rect.center(),
            20.0,
            3.0,
            None,
        );
        let line = status_line(&mut app);
        assert!(line.starts_with(" APP-001 -> Applied #1"));
        assert!(line.ends_with(DRAG_HINTS));

        // Pending pointer sessions are not announced
        let mut app = app_rendered(sample_board());
        app.drag
            .begin_pointer(DragSource::new("APP-001", Status::Applied, 0), Point::new(2.5, 2.5));
        assert_eq!(status_line(&mut app), "");
    }
}
