//! jobtrack: a job application pipeline board.
//!
//! The [`board`] module holds the drag-and-drop and virtualization engine;
//! [`ops`] holds the pure collection operations it commits through. The
//! terminal UI and the `jt` CLI are thin callers of both.

pub mod board;
pub mod cli;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod tui;
pub mod util;
