use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Status;

/// Persisted board view state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiState {
    /// Focused column
    #[serde(default)]
    pub focused: Option<Status>,
    /// Per-column state
    #[serde(default)]
    pub columns: HashMap<Status, ColumnUiState>,
}

/// Per-column UI state
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ColumnUiState {
    /// Index of the focused card in the column
    #[serde(default)]
    pub cursor: usize,
    /// Scroll offset in rows
    #[serde(default)]
    pub scroll_offset: usize,
}

/// Read .state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let path = data_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed .state.json");
            None
        }
    }
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = data_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
