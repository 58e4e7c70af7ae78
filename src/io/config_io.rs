use std::fs;
use std::path::Path;

use crate::io::board_io::{BoardError, CONFIG_FILE, atomic_write};
use crate::model::{BoardConfig, StageOrder};

/// Read and parse board.toml from the data directory.
pub fn read_config(data_dir: &Path) -> Result<BoardConfig, BoardError> {
    let text = read_config_text(data_dir)?;
    Ok(toml::from_str(&text)?)
}

/// Read the board config, returning both the parsed config and the raw
/// toml_edit document for edits that keep the user's comments.
pub fn read_config_doc(data_dir: &Path) -> Result<(BoardConfig, toml_edit::DocumentMut), BoardError> {
    let text = read_config_text(data_dir)?;
    let config: BoardConfig = toml::from_str(&text)?;
    // Anything toml accepts, toml_edit accepts too
    let doc: toml_edit::DocumentMut = text.parse().map_err(|e: toml_edit::TomlError| {
        BoardError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    Ok((config, doc))
}

fn read_config_text(data_dir: &Path) -> Result<String, BoardError> {
    let path = data_dir.join(CONFIG_FILE);
    fs::read_to_string(&path).map_err(|e| BoardError::ReadError { path, source: e })
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), BoardError> {
    let path = data_dir.join(CONFIG_FILE);
    atomic_write(&path, doc.to_string().as_bytes())
        .map_err(|e| BoardError::WriteError { path, source: e })
}

/// Replace the column order in the config document
pub fn set_stages(doc: &mut toml_edit::DocumentMut, order: &StageOrder) {
    if !doc.contains_key("board") {
        doc["board"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    let mut stages = toml_edit::Array::new();
    for status in order.stages() {
        stages.push(status.key());
    }
    doc["board"]["stages"] = toml_edit::value(stages);
}

/// Rename the board in the config document
pub fn set_board_name(doc: &mut toml_edit::DocumentMut, name: &str) {
    if !doc.contains_key("board") {
        doc["board"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["board"]["name"] = toml_edit::value(name);
}
