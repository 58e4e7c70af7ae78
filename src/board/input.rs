//! Input modalities for drag sessions.
//!
//! The drag controller only ever sees a [`Point`]. Adapters turn raw
//! movement (absolute pointer positions or discrete key steps) into that
//! point and decide when the gesture counts as a drag.

use std::fmt::Debug;

use super::geometry::{Point, Rect};

/// Direction of a keyboard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
    Left,
    Right,
}

/// One raw movement event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// Absolute pointer position
    Pointer(Point),
    /// One discrete keyboard step
    Key(Step),
}

/// Converts movement events into positions for collision resolution.
pub trait InputAdapter: Debug {
    /// Apply a movement and return the new position, or `None` if this
    /// adapter does not handle that kind of movement.
    fn translate(&mut self, movement: Movement) -> Option<Point>;

    /// Whether the gesture has travelled far enough to count as a drag.
    fn activated(&self) -> bool;

    /// Current position.
    fn position(&self) -> Point;
}

/// Continuous pointer input with an activation distance.
///
/// A press only becomes a drag once the pointer has moved strictly further
/// than `activation_distance` from where it went down. Once activated it
/// stays activated even if the pointer returns to the origin.
#[derive(Debug, Clone)]
pub struct PointerAdapter {
    origin: Point,
    position: Point,
    activation_distance: f64,
    activated: bool,
}

impl PointerAdapter {
    pub fn new(origin: Point, activation_distance: f64) -> Self {
        PointerAdapter {
            origin,
            position: origin,
            activation_distance: activation_distance.max(0.0),
            activated: false,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }
}

impl InputAdapter for PointerAdapter {
    fn translate(&mut self, movement: Movement) -> Option<Point> {
        let Movement::Pointer(p) = movement else {
            return None;
        };
        self.position = p;
        if !self.activated && self.origin.distance(p) > self.activation_distance {
            self.activated = true;
        }
        Some(p)
    }

    fn activated(&self) -> bool {
        self.activated
    }

    fn position(&self) -> Point {
        self.position
    }
}

/// Discrete keyboard input.
///
/// Up and Down move by one row (a card height), Left and Right by one column
/// pitch. Keyboard pick-up is deliberate, so there is no activation distance.
#[derive(Debug, Clone)]
pub struct KeyboardAdapter {
    position: Point,
    column_pitch: f64,
    row_pitch: f64,
    bounds: Option<Rect>,
}

impl KeyboardAdapter {
    /// `start` should be a point inside the picked-up card, usually its center.
    pub fn new(start: Point, column_pitch: f64, row_pitch: f64) -> Self {
        KeyboardAdapter {
            position: start,
            column_pitch,
            row_pitch,
            bounds: None,
        }
    }

    /// Keep the position inside `bounds` (typically the board area).
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    fn clamp(&self, p: Point) -> Point {
        let Some(b) = self.bounds else {
            return p;
        };
        if b.is_empty() {
            return p;
        }
        // Stay strictly inside the half-open rect
        let max_x = (b.right() - 0.5).max(b.x);
        let max_y = (b.bottom() - 0.5).max(b.y);
        Point::new(p.x.clamp(b.x, max_x), p.y.clamp(b.y, max_y))
    }
}

impl InputAdapter for KeyboardAdapter {
    fn translate(&mut self, movement: Movement) -> Option<Point> {
        let Movement::Key(step) = movement else {
            return None;
        };
        let (dx, dy) = match step {
            Step::Up => (0.0, -self.row_pitch),
            Step::Down => (0.0, self.row_pitch),
            Step::Left => (-self.column_pitch, 0.0),
            Step::Right => (self.column_pitch, 0.0),
        };
        self.position = self.clamp(self.position.offset(dx, dy));
        Some(self.position)
    }

    fn activated(&self) -> bool {
        true
    }

    fn position(&self) -> Point {
        self.position
    }
}
