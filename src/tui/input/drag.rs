use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::board::{DragOutcome, DragSource, Movement, Point, Rect, Step, layout_column};
use crate::model::Status;
use crate::tui::app::{App, BoardSink, StatusMessage};

use super::*;

/// Mouse cells are addressed by their center
fn cell_center(column: u16, row: u16) -> Point {
    Point::new(column as f64 + 0.5, row as f64 + 0.5)
}

pub(super) fn handle_pointer(app: &mut App, mouse: MouseEvent) {
    let p = cell_center(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => press(app, p),
        MouseEventKind::Drag(MouseButton::Left) => drag_to(app, Movement::Pointer(p)),
        MouseEventKind::Up(MouseButton::Left) => drop_here(app),
        MouseEventKind::ScrollDown => wheel(app, p, 1.0),
        MouseEventKind::ScrollUp => wheel(app, p, -1.0),
        _ => {}
    }
}

pub(super) fn handle_drag_key(app: &mut App, key: KeyEvent) {
    let step = match key.code {
        KeyCode::Char('h') | KeyCode::Left => Step::Left,
        KeyCode::Char('l') | KeyCode::Right => Step::Right,
        KeyCode::Char('k') | KeyCode::Up => Step::Up,
        KeyCode::Char('j') | KeyCode::Down => Step::Down,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => {
            drop_here(app);
            return;
        }
        KeyCode::Esc => {
            cancel_drag(app);
            return;
        }
        KeyCode::Char('q') => {
            cancel_drag(app);
            app.should_quit = true;
            return;
        }
        _ => return,
    };
    drag_to(app, Movement::Key(step));
}

fn press(app: &mut App, p: Point) {
    if app.drag.is_active() {
        return;
    }
    let source = app
        .geometry
        .card_at(p)
        .map(|(column, card)| DragSource::new(card.id.clone(), column.status, card.index));
    match source {
        Some(source) => {
            app.drag.begin_pointer(source, p);
        }
        None => {
            // Pressing empty column space focuses the column
            let status = app.geometry.column_at(p).map(|c| c.status);
            if let Some(status) = status
                && let Some(col) = app.board.config.board.stages.position(status)
            {
                app.focused_column = col;
            }
        }
    }
}

/// Pick up the focused card with the keyboard
pub(super) fn pick_up(app: &mut App) {
    let Some((status, index, record)) = app.focused_card() else {
        return;
    };
    let id = record.id.clone();
    // Only cards on screen can be picked up
    let Some(rect) = app
        .geometry
        .column(status)
        .and_then(|c| c.card(&id))
        .map(|c| c.rect)
    else {
        return;
    };

    let bodies: Vec<Rect> = app.geometry.columns.iter().filter_map(|c| c.rect).collect();
    let column_pitch = match bodies.as_slice() {
        [first, second, ..] => second.x - first.x,
        [only] => only.width,
        [] => return,
    };
    let bounds = bounding_rect(&bodies);
    let row_pitch = app.window_config.item_size;

    // Below the midline the card itself is the closest candidate; at the
    // center it ties with its upper neighbour
    let start = Point::new(rect.center().x, rect.y + rect.height * 0.75);
    if app.drag.begin_keyboard(
        DragSource::new(id.clone(), status, index),
        start,
        column_pitch,
        row_pitch,
        bounds,
    ) {
        app.message = Some(StatusMessage::info(format!(
            "moving {}: arrows to move, enter to drop, esc to cancel",
            id
        )));
    }
}

fn bounding_rect(rects: &[Rect]) -> Option<Rect> {
    let first = rects.first()?;
    let (mut left, mut top, mut right, mut bottom) =
        (first.x, first.y, first.right(), first.bottom());
    for r in &rects[1..] {
        left = left.min(r.x);
        top = top.min(r.y);
        right = right.max(r.right());
        bottom = bottom.max(r.bottom());
    }
    Some(Rect::new(left, top, right - left, bottom - top))
}

fn drag_to(app: &mut App, movement: Movement) {
    let scrolled = match movement {
        Movement::Key(step) => scroll_under(app, step),
        Movement::Pointer(_) => false,
    };
    let mut sink = BoardSink {
        applications: &mut app.board.applications,
        outbox: &mut app.outbox,
    };
    let update = if scrolled {
        app.drag.refresh(&app.geometry, &mut sink)
    } else {
        app.drag.movement(movement, &app.geometry, &mut sink)
    };
    if let Some(status) = update.provisional
        && let Some(col) = app.board.config.board.stages.position(status)
    {
        // Focus travels with the card
        app.focused_column = col;
    }
}

/// A vertical key step that would leave the column body scrolls the column
/// under the card by one card instead. Returns false when the step should
/// move the point as usual.
fn scroll_under(app: &mut App, step: Step) -> bool {
    let direction = match step {
        Step::Up => -1.0,
        Step::Down => 1.0,
        Step::Left | Step::Right => return false,
    };
    let Some(position) = app.drag.session().map(|s| s.position()) else {
        return false;
    };
    let Some((status, body, before)) = app
        .geometry
        .column_at(position)
        .and_then(|c| c.rect.map(|r| (c.status, r, c.scroll_offset)))
    else {
        return false;
    };

    let delta = direction * app.window_config.item_size;
    let next_y = position.y + delta;
    if next_y >= body.y && next_y < body.bottom() {
        return false;
    }
    scroll_column(app, status, delta);
    let after = app.scroll.get(&status).copied().unwrap_or(0.0);
    if after == before {
        return false;
    }
    relayout_column(app, status, body);
    true
}

/// Rebuild one column's geometry after its scroll offset changed, so hit
/// testing is current before the next frame.
fn relayout_column(app: &mut App, status: Status, body: Rect) {
    let scroll = app.scroll.get(&status).copied().unwrap_or(0.0);
    let column = layout_column(&app.board.applications, status, body, &app.window_config, scroll);
    if let Some(slot) = app.geometry.columns.iter_mut().find(|c| c.status == status) {
        *slot = column;
    }
}

fn drop_here(app: &mut App) {
    // The displayed collection already carries any provisional status
    let collection = app.board.applications.clone();
    let mut sink = BoardSink {
        applications: &mut app.board.applications,
        outbox: &mut app.outbox,
    };
    match app.drag.release(&collection, &mut sink) {
        DragOutcome::Click { id } => {
            app.focus_card(&id);
            describe(app, &id);
        }
        DragOutcome::Committed { id, .. } => {
            app.focus_card(&id);
            app.message = None;
        }
        DragOutcome::Discarded { .. } => {
            app.clamp_cursors();
            app.message = None;
        }
        DragOutcome::Idle => {}
    }
}

pub(super) fn cancel_drag(app: &mut App) {
    let mut sink = BoardSink {
        applications: &mut app.board.applications,
        outbox: &mut app.outbox,
    };
    if let DragOutcome::Discarded { id } = app.drag.cancel(&mut sink) {
        app.focus_card(&id);
        app.message = None;
    }
}

fn wheel(app: &mut App, p: Point, direction: f64) {
    let Some(status) = app.geometry.column_at(p).map(|c| c.status) else {
        return;
    };
    let delta = direction * app.window_config.item_size;
    scroll_column(app, status, delta);
}
