use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect as CellRect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::board::{BoardGeometry, CardGeometry, ColumnGeometry, Rect, layout_column};
use crate::model::{Application, Status};
use crate::ops::partition::column_counts;
use crate::ops::reorder::DropTarget;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

/// How a card should be highlighted
#[derive(Debug, Clone, Copy, Default)]
struct CardState {
    focused: bool,
    dragged: bool,
    drop_target: bool,
}

/// Render every column side by side and record where things landed in
/// `app.geometry` for hit testing.
pub fn render_board(frame: &mut Frame, app: &mut App, area: CellRect) {
    let stages = app.stages().to_vec();
    if stages.is_empty() || area.width == 0 || area.height == 0 {
        app.geometry = BoardGeometry::default();
        return;
    }

    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            stages
                .iter()
                .map(|_| Constraint::Ratio(1, stages.len() as u32)),
        )
        .split(area);

    let target = if app.drag.is_dragging() {
        app.drag.current_target()
    } else {
        None
    };

    let counts = column_counts(&app.board.applications, &stages);
    let mut columns = Vec::with_capacity(stages.len());
    for (i, ((status, len), col_area)) in counts.into_iter().zip(areas.iter()).enumerate() {
        let focused = i == app.focused_column;
        columns.push(render_column(frame, app, status, len, *col_area, focused, target));
    }
    app.geometry = BoardGeometry { columns };
}

fn render_column(
    frame: &mut Frame,
    app: &mut App,
    status: Status,
    len: usize,
    area: CellRect,
    focused: bool,
    target: Option<DropTarget>,
) -> ColumnGeometry {
    let bg = app.theme.background;

    let border_color = if target.is_some_and(|t| t.column == status) {
        app.theme.highlight
    } else if focused {
        app.theme.selection_border
    } else {
        app.theme.dim
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", status.label()),
            Style::default()
                .fg(app.theme.stage_color(status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("({}) ", len), Style::default().fg(app.theme.dim)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let scroll = app.scroll.get(&status).copied().unwrap_or(0.0);
    let geometry = layout_column(
        &app.board.applications,
        status,
        Rect::from(inner),
        &app.window_config,
        scroll,
    );
    app.scroll.insert(status, geometry.scroll_offset);

    let app: &App = app;
    let cursor = (focused && !app.drag.is_dragging()).then(|| app.cursor(status));
    let dragged = app.drag.dragged_id();
    for card in &geometry.cards {
        let state = CardState {
            focused: cursor == Some(card.index),
            dragged: dragged == Some(card.id.as_str()),
            drop_target: target == Some(DropTarget::new(status, card.index)),
        };
        let record = &app.board.applications[card.flat_index];
        render_card(frame, app, record, card, inner, state);
    }

    if !geometry.window.bypassed
        && let Some((first, last)) = visible_range(&geometry, app.window_config.item_size)
    {
        render_range(frame, app, area, format!(" {}-{}/{} ", first + 1, last + 1, len));
    }

    geometry
}

/// Cards at least partly inside the column body
fn visible_range(geometry: &ColumnGeometry, item_size: f64) -> Option<(usize, usize)> {
    let body = geometry.rect?;
    if geometry.len == 0 || item_size <= 0.0 {
        return None;
    }
    let first = (geometry.scroll_offset / item_size).floor() as usize;
    let end = ((geometry.scroll_offset + body.height) / item_size).ceil() as usize;
    let last = end.min(geometry.len).checked_sub(1)?;
    (first <= last).then_some((first, last))
}

/// Range indicator on the bottom border, right-aligned
fn render_range(frame: &mut Frame, app: &App, area: CellRect, label: String) {
    let w = display_width(&label) as u16;
    if area.height < 2 || w + 2 > area.width {
        return;
    }
    let rect = CellRect {
        x: area.x + area.width - w - 1,
        y: area.y + area.height - 1,
        width: w,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            label,
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )),
        rect,
    );
}

/// Draw one card, row by row, skipping rows outside `clip`.
///
/// The last row of each card slot is left blank as a gap.
fn render_card(
    frame: &mut Frame,
    app: &App,
    record: &Application,
    card: &CardGeometry,
    clip: CellRect,
    state: CardState,
) {
    let theme = &app.theme;
    let size = app.window_config.item_size.max(1.0) as usize;
    let text_rows = if size > 1 { size - 1 } else { 1 };
    let width = clip.width as usize;

    let bg = if state.drop_target {
        theme.drop_target_bg
    } else if state.focused {
        theme.selection_bg
    } else {
        theme.background
    };
    let (title_fg, body_fg) = if state.dragged {
        (theme.dim, theme.dim)
    } else {
        (theme.text_bright, theme.text)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&format!(" {}", record.company), width),
            Style::default()
                .fg(title_fg)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        role_line(app, record, width, body_fg, bg, state.dragged),
    ];
    if let Some(location) = &record.location {
        lines.push(Line::from(Span::styled(
            truncate_to_width(&format!(" {}", location), width),
            Style::default().fg(theme.dim).bg(bg),
        )));
    }

    let top = card.rect.y.floor() as i64;
    for (k, line) in lines.into_iter().take(text_rows).enumerate() {
        let y = top + k as i64;
        if y < clip.y as i64 || y >= clip.bottom() as i64 {
            continue;
        }
        let row = CellRect {
            x: clip.x,
            y: y as u16,
            width: clip.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), row);
    }
}

/// Role followed by as many tags as fit
fn role_line(
    app: &App,
    record: &Application,
    width: usize,
    fg: ratatui::style::Color,
    bg: ratatui::style::Color,
    dragged: bool,
) -> Line<'static> {
    let role = truncate_to_width(&format!(" {}", record.role), width);
    let mut used = display_width(&role);
    let mut spans = vec![Span::styled(role, Style::default().fg(fg).bg(bg))];
    for tag in &record.tags {
        let text = format!(" #{}", tag);
        let w = display_width(&text);
        if used + w > width {
            break;
        }
        used += w;
        let color = if dragged {
            app.theme.dim
        } else {
            app.theme.tag_color(tag)
        };
        spans.push(Span::styled(text, Style::default().fg(color).bg(bg)));
    }
    Line::from(spans)
}
