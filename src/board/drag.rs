//! Drag session lifecycle.
//!
//! One [`DragSessionController`] owns at most one session at a time:
//!
//! ```text
//! Idle --begin--> Pending --travel > activation--> Dragging --release--> Idle
//!                    |                                 |
//!                    +--release (click)--> Idle        +--cancel--> Idle
//! ```
//!
//! Keyboard sessions skip `Pending`. Every movement, whatever its source, is
//! turned into a point by the session's [`InputAdapter`] and resolved against
//! the current [`BoardGeometry`] with the closest-corners policy.

use crate::model::{Application, DragConfig, Status};
use crate::ops::reorder::{self, DropTarget};

use super::collision::closest_corners;
use super::geometry::{Point, Rect};
use super::input::{InputAdapter, KeyboardAdapter, Movement, PointerAdapter};
use super::layout::BoardGeometry;

/// Receives the effects of a drag.
///
/// `on_provisional_status` is a local, visual change only and must not be
/// persisted. `on_status_change` and `on_reorder` fire once on commit, in
/// that order; the receiver owns persistence.
pub trait DragListener {
    fn on_provisional_status(&mut self, id: &str, status: Status);
    fn on_status_change(&mut self, id: &str, status: Status);
    fn on_reorder(&mut self, collection: Vec<Application>);
}

/// The card a session starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSource {
    pub id: String,
    pub column: Status,
    /// Index within the column
    pub index: usize,
}

impl DragSource {
    pub fn new(id: impl Into<String>, column: Status, index: usize) -> Self {
        DragSource {
            id: id.into(),
            column,
            index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Pressed, activation distance not yet exceeded
    Pending,
    Dragging,
}

/// The state of one gesture.
#[derive(Debug)]
pub struct DragSession {
    pub dragged_id: String,
    /// Where the card started
    pub origin: DropTarget,
    pub current_target: Option<DropTarget>,
    /// Column the card currently shows in, after provisional changes
    pub display_column: Status,
    adapter: Box<dyn InputAdapter>,
}

impl DragSession {
    pub fn position(&self) -> Point {
        self.adapter.position()
    }

    fn has_provisional_status(&self) -> bool {
        self.display_column != self.origin.column
    }
}

/// Result of feeding one movement to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragUpdate {
    pub phase: Phase,
    pub target: Option<DropTarget>,
    /// Set when this movement moved the card into another column
    pub provisional: Option<Status>,
}

impl DragUpdate {
    const IDLE: DragUpdate = DragUpdate {
        phase: Phase::Idle,
        target: None,
        provisional: None,
    };
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// There was no session
    Idle,
    /// Released before the activation distance was exceeded
    Click { id: String },
    Committed {
        id: String,
        target: DropTarget,
        new_status: Option<Status>,
    },
    /// Released outside every target, on the origin, or cancelled
    Discarded { id: String },
}

/// Owns the current drag session.
#[derive(Debug)]
pub struct DragSessionController {
    activation_distance: f64,
    phase: Phase,
    session: Option<DragSession>,
}

impl DragSessionController {
    pub fn new(config: &DragConfig) -> Self {
        DragSessionController {
            activation_distance: config.activation_distance,
            phase: Phase::Idle,
            session: None,
        }
    }

    /// Applies to sessions started from now on
    pub fn set_activation_distance(&mut self, distance: f64) {
        self.activation_distance = distance;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// True once the gesture is a real drag (not a pending press).
    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Dragging
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn dragged_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.dragged_id.as_str())
    }

    pub fn current_target(&self) -> Option<DropTarget> {
        self.session.as_ref().and_then(|s| s.current_target)
    }

    /// Start a session. Returns false (and changes nothing) if one is
    /// already active.
    pub fn begin(&mut self, source: DragSource, adapter: Box<dyn InputAdapter>) -> bool {
        if let Some(active) = &self.session {
            tracing::warn!(
                active = %active.dragged_id,
                requested = %source.id,
                "drag already in progress"
            );
            return false;
        }

        let origin = DropTarget::new(source.column, source.index);
        let dragging = adapter.activated();
        self.phase = if dragging {
            Phase::Dragging
        } else {
            Phase::Pending
        };
        tracing::debug!(id = %source.id, ?origin, phase = ?self.phase, "drag begin");
        self.session = Some(DragSession {
            dragged_id: source.id,
            origin,
            // A card picked up with the keyboard starts over its own slot
            current_target: dragging.then_some(origin),
            display_column: source.column,
            adapter,
        });
        true
    }

    /// Press with a pointer at `at`.
    pub fn begin_pointer(&mut self, source: DragSource, at: Point) -> bool {
        let adapter = PointerAdapter::new(at, self.activation_distance);
        self.begin(source, Box::new(adapter))
    }

    /// Pick up a card with the keyboard. `start` should lie inside the card.
    pub fn begin_keyboard(
        &mut self,
        source: DragSource,
        start: Point,
        column_pitch: f64,
        row_pitch: f64,
        bounds: Option<Rect>,
    ) -> bool {
        let mut adapter = KeyboardAdapter::new(start, column_pitch, row_pitch);
        if let Some(bounds) = bounds {
            adapter = adapter.with_bounds(bounds);
        }
        self.begin(source, Box::new(adapter))
    }

    /// Feed one movement and re-resolve the drop target.
    pub fn movement(
        &mut self,
        movement: Movement,
        geometry: &BoardGeometry,
        listener: &mut dyn DragListener,
    ) -> DragUpdate {
        let Some(session) = self.session.as_mut() else {
            return DragUpdate::IDLE;
        };
        let Some(point) = session.adapter.translate(movement) else {
            return DragUpdate {
                phase: self.phase,
                target: session.current_target,
                provisional: None,
            };
        };

        if self.phase == Phase::Pending {
            if !session.adapter.activated() {
                return DragUpdate {
                    phase: Phase::Pending,
                    target: None,
                    provisional: None,
                };
            }
            self.phase = Phase::Dragging;
            tracing::debug!(id = %session.dragged_id, "drag activated");
        }

        self.resolve(point, geometry, listener)
    }

    /// Re-resolve the target at the current position after the geometry
    /// under it changed, for example when a column scrolled.
    pub fn refresh(
        &mut self,
        geometry: &BoardGeometry,
        listener: &mut dyn DragListener,
    ) -> DragUpdate {
        match self.session.as_ref().map(|s| s.position()) {
            Some(point) if self.phase == Phase::Dragging => {
                self.resolve(point, geometry, listener)
            }
            _ => DragUpdate {
                phase: self.phase,
                target: self.current_target(),
                provisional: None,
            },
        }
    }

    fn resolve(
        &mut self,
        point: Point,
        geometry: &BoardGeometry,
        listener: &mut dyn DragListener,
    ) -> DragUpdate {
        let Some(session) = self.session.as_mut() else {
            return DragUpdate::IDLE;
        };
        let candidates = geometry.candidates_at(point);
        let target = closest_corners(point, &candidates)
            .and_then(|drop_id| geometry.target_for(&drop_id, session.display_column));
        if target != session.current_target {
            tracing::trace!(id = %session.dragged_id, ?target, "drop target changed");
        }
        session.current_target = target;

        let mut provisional = None;
        if let Some(t) = target
            && t.column != session.display_column
        {
            tracing::debug!(
                id = %session.dragged_id,
                from = %session.display_column,
                to = %t.column,
                "provisional status"
            );
            session.display_column = t.column;
            listener.on_provisional_status(&session.dragged_id, t.column);
            provisional = Some(t.column);
        }

        DragUpdate {
            phase: self.phase,
            target,
            provisional,
        }
    }

    /// End the gesture, committing the move into `collection` when there is
    /// a target that differs from the origin.
    pub fn release(
        &mut self,
        collection: &[Application],
        listener: &mut dyn DragListener,
    ) -> DragOutcome {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let Some(session) = self.session.take() else {
            return DragOutcome::Idle;
        };

        if phase == Phase::Pending {
            tracing::debug!(id = %session.dragged_id, "released below activation distance");
            return DragOutcome::Click {
                id: session.dragged_id,
            };
        }

        let target = match session.current_target {
            Some(t) if t != session.origin => t,
            _ => return Self::discard(session, listener),
        };

        let result = match reorder::reorder(collection, &session.dragged_id, target) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "drop discarded");
                return Self::discard(session, listener);
            }
        };

        let new_status = (target.column != session.origin.column).then_some(target.column);
        if let Some(status) = new_status {
            listener.on_status_change(&session.dragged_id, status);
        }
        listener.on_reorder(result.collection);
        tracing::debug!(id = %session.dragged_id, ?target, ?new_status, "drag committed");

        DragOutcome::Committed {
            id: session.dragged_id,
            target,
            new_status,
        }
    }

    /// Abandon the session (escape, focus loss). Reverts any provisional
    /// status change.
    pub fn cancel(&mut self, listener: &mut dyn DragListener) -> DragOutcome {
        self.phase = Phase::Idle;
        match self.session.take() {
            Some(session) => {
                tracing::debug!(id = %session.dragged_id, "drag cancelled");
                Self::discard(session, listener)
            }
            None => DragOutcome::Idle,
        }
    }

    fn discard(session: DragSession, listener: &mut dyn DragListener) -> DragOutcome {
        if session.has_provisional_status() {
            listener.on_provisional_status(&session.dragged_id, session.origin.column);
        }
        DragOutcome::Discarded {
            id: session.dragged_id,
        }
    }
}
