pub mod application;
pub mod board;
pub mod config;
pub mod status;

pub use application::*;
pub use board::*;
pub use config::*;
pub use status::*;
