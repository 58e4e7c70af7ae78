//! Board geometry: where each rendered card and column sits on screen.
//!
//! Rebuilt on every render from the collection, the column bodies supplied
//! by the hosting layout, and each column's scroll offset. Only cards inside
//! a column's virtual window are registered; everything else is unmeasured
//! and therefore never a drop candidate.

use std::collections::HashMap;

use crate::model::{Application, Status};
use crate::ops::reorder::DropTarget;

use super::collision::{Candidate, DropId};
use super::geometry::{Point, Rect};
use super::window::{VirtualWindow, WindowConfig};

/// A rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardGeometry {
    pub id: String,
    /// Index within the column
    pub index: usize,
    /// Index into the flat collection
    pub flat_index: usize,
    pub rect: Rect,
}

/// One column: its body rect, window and rendered cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGeometry {
    pub status: Status,
    /// Card area of the column (inside borders)
    pub rect: Option<Rect>,
    /// Number of cards in the column, rendered or not
    pub len: usize,
    pub scroll_offset: f64,
    pub window: VirtualWindow,
    pub cards: Vec<CardGeometry>,
}

impl ColumnGeometry {
    /// Drop candidates in traversal order: cards top to bottom, then the
    /// column container.
    pub fn candidates(&self) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = self
            .cards
            .iter()
            .map(|c| Candidate::new(DropId::Card(c.id.clone()), Some(c.rect)))
            .collect();
        out.push(Candidate::new(DropId::Column(self.status), self.rect));
        out
    }

    pub fn card(&self, id: &str) -> Option<&CardGeometry> {
        self.cards.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardGeometry {
    pub columns: Vec<ColumnGeometry>,
}

impl BoardGeometry {
    pub fn column(&self, status: Status) -> Option<&ColumnGeometry> {
        self.columns.iter().find(|c| c.status == status)
    }

    /// The column whose body contains `p`
    pub fn column_at(&self, p: Point) -> Option<&ColumnGeometry> {
        self.columns
            .iter()
            .find(|c| c.rect.is_some_and(|r| r.contains(p)))
    }

    /// The rendered card under `p`, clipped to its column body
    pub fn card_at(&self, p: Point) -> Option<(&ColumnGeometry, &CardGeometry)> {
        let column = self.column_at(p)?;
        let card = column.cards.iter().find(|c| c.rect.contains(p))?;
        Some((column, card))
    }

    /// Every candidate on the board, columns in stage order.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.columns.iter().flat_map(|c| c.candidates()).collect()
    }

    /// Candidates considered for a pointer at `p`.
    ///
    /// Inside a column body only that column competes, so a card in the
    /// neighbouring column cannot win just because one of its corners is
    /// near the column boundary. Outside every body, all candidates compete
    /// (and the resolver will find nothing unless `p` is inside a card).
    pub fn candidates_at(&self, p: Point) -> Vec<Candidate> {
        match self.column_at(p) {
            Some(column) => column.candidates(),
            None => self.candidates(),
        }
    }

    /// Translate a resolved drop id into a column position.
    ///
    /// `dragged_column` is the column the dragged card currently shows in;
    /// dropping on a container appends, which excludes the dragged card from
    /// the count when it already lives there.
    pub fn target_for(&self, id: &DropId, dragged_column: Status) -> Option<DropTarget> {
        match id {
            DropId::Card(card_id) => self.columns.iter().find_map(|col| {
                col.card(card_id)
                    .map(|card| DropTarget::new(col.status, card.index))
            }),
            DropId::Column(status) => {
                let col = self.column(*status)?;
                let len = if *status == dragged_column {
                    col.len.saturating_sub(1)
                } else {
                    col.len
                };
                Some(DropTarget::new(*status, len))
            }
        }
    }
}

/// Lay out one column: compute its virtual window and place each card in it.
///
/// Card `i` sits at `body.y + i * item_size - scroll_offset`. Cards in the
/// overscan can fall outside `body`; they keep their computed rects.
pub fn layout_column(
    records: &[Application],
    status: Status,
    body: Rect,
    window_config: &WindowConfig,
    scroll_offset: f64,
) -> ColumnGeometry {
    let members: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.status == status)
        .map(|(i, _)| i)
        .collect();
    let scroll_offset = window_config.clamp_scroll(scroll_offset, body.height, members.len());
    let window = window_config.window(scroll_offset, body.height, members.len());

    let size = window_config.item_size;
    let cards = window
        .indices()
        .map(|index| {
            let flat_index = members[index];
            CardGeometry {
                id: records[flat_index].id.clone(),
                index,
                flat_index,
                rect: Rect::new(
                    body.x,
                    body.y + index as f64 * size - scroll_offset,
                    body.width,
                    size,
                ),
            }
        })
        .collect();

    ColumnGeometry {
        status,
        rect: Some(body),
        len: members.len(),
        scroll_offset,
        window,
        cards,
    }
}

/// Lay out every column. `bodies` gives the card area of each column in
/// display order; missing scroll offsets default to the top.
pub fn layout_board(
    records: &[Application],
    bodies: &[(Status, Rect)],
    window_config: &WindowConfig,
    scroll_offsets: &HashMap<Status, f64>,
) -> BoardGeometry {
    let columns = bodies
        .iter()
        .map(|(status, body)| {
            let scroll = scroll_offsets.get(status).copied().unwrap_or(0.0);
            layout_column(records, *status, *body, window_config, scroll)
        })
        .collect();
    BoardGeometry { columns }
}

/// Column bodies of equal width laid side by side, for callers without a
/// layout engine of their own.
pub fn uniform_bodies(
    order: &[Status],
    origin: Point,
    column_width: f64,
    height: f64,
) -> Vec<(Status, Rect)> {
    order
        .iter()
        .enumerate()
        .map(|(i, s)| {
            (
                *s,
                Rect::new(origin.x + i as f64 * column_width, origin.y, column_width, height),
            )
        })
        .collect()
}
