use std::path::PathBuf;

use super::application::Application;
use super::config::BoardConfig;

/// A fully loaded jobtrack board
#[derive(Debug)]
pub struct Board {
    /// Root directory of the board (parent of `jobtrack/`)
    pub root: PathBuf,
    /// Path to the `jobtrack/` directory
    pub data_dir: PathBuf,
    /// Parsed board.toml
    pub config: BoardConfig,
    /// All applications in presentation order
    pub applications: Vec<Application>,
}

impl Board {
    pub fn find(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }
}
