//! The pipeline board engine: virtual windows, geometry, collision
//! resolution and drag sessions.

pub mod collision;
pub mod drag;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod window;

pub use collision::{Candidate, DropId, closest_corners};
pub use drag::{
    DragListener, DragOutcome, DragSession, DragSessionController, DragSource, DragUpdate, Phase,
};
pub use geometry::{Point, Rect};
pub use input::{InputAdapter, KeyboardAdapter, Movement, PointerAdapter, Step};
pub use layout::{BoardGeometry, CardGeometry, ColumnGeometry, layout_board, layout_column};
pub use window::{VirtualWindow, WindowConfig, WindowParams, compute_window};
