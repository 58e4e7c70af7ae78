use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::{Application, Board, BoardConfig};
use crate::ops::application_ops::{ApplicationError, validate_unique_ids};

/// Name of the data directory at the board root
pub const DATA_DIR: &str = "jobtrack";
pub const CONFIG_FILE: &str = "board.toml";
pub const APPLICATIONS_FILE: &str = "applications.json";

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not a jobtrack board: no jobtrack/ directory found")]
    NotABoard,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not serialize board.toml: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),
    #[error("could not parse applications.json: {0}")]
    DataParseError(#[from] serde_json::Error),
    #[error("applications.json: duplicate application id {0}")]
    DuplicateId(String),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Locked(#[from] crate::io::lock::LockError),
}

/// Discover the board by walking up from the given directory,
/// looking for a `jobtrack/` subdirectory with a board.toml.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR);
        if data_dir.is_dir() && data_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Load a complete board from the given root directory.
pub fn load_board(root: &Path) -> Result<Board, BoardError> {
    let data_dir = root.join(DATA_DIR);
    if !data_dir.is_dir() {
        return Err(BoardError::NotABoard);
    }

    let config: BoardConfig = crate::io::config_io::read_config(&data_dir)?;
    let applications = load_applications(&data_dir)?;
    tracing::debug!(
        root = %root.display(),
        applications = applications.len(),
        "loaded board"
    );

    Ok(Board {
        root: root.to_path_buf(),
        data_dir,
        config,
        applications,
    })
}

/// Read applications.json. A missing file is an empty board.
pub fn load_applications(data_dir: &Path) -> Result<Vec<Application>, BoardError> {
    let path = data_dir.join(APPLICATIONS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&path).map_err(|e| BoardError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    parse_applications(&text)
}

/// Parse the contents of applications.json, rejecting duplicate ids.
pub fn parse_applications(text: &str) -> Result<Vec<Application>, BoardError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let applications: Vec<Application> = serde_json::from_str(text)?;
    if let Err(ApplicationError::DuplicateId(id)) = validate_unique_ids(&applications) {
        return Err(BoardError::DuplicateId(id));
    }
    Ok(applications)
}

/// Serialize the collection the way it is stored on disk
pub fn serialize_applications(applications: &[Application]) -> Result<String, BoardError> {
    let mut text = serde_json::to_string_pretty(applications)?;
    text.push('\n');
    Ok(text)
}

/// Save applications.json atomically. Returns the fingerprint of what was
/// written, so the caller can recognise its own write when the watcher
/// reports it.
pub fn save_applications(data_dir: &Path, applications: &[Application]) -> Result<u64, BoardError> {
    let path = data_dir.join(APPLICATIONS_FILE);
    let content = serialize_applications(applications)?;
    atomic_write(&path, content.as_bytes()).map_err(|e| BoardError::WriteError {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), count = applications.len(), "saved applications");
    Ok(fingerprint(content.as_bytes()))
}

/// Fingerprint of applications.json as it is on disk now, if readable
pub fn applications_fingerprint(data_dir: &Path) -> Option<u64> {
    fs::read(data_dir.join(APPLICATIONS_FILE))
        .ok()
        .map(|bytes| fingerprint(&bytes))
}

pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create the `jobtrack/` directory with a board.toml and an empty
/// applications.json. An existing board.toml is only replaced with `force`;
/// existing applications are never touched.
pub fn init_board(root: &Path, config_text: &str, force: bool) -> Result<PathBuf, BoardError> {
    // Make sure the template parses before writing anything
    let _: BoardConfig = toml::from_str(config_text)?;

    let data_dir = root.join(DATA_DIR);
    fs::create_dir_all(&data_dir).map_err(|e| BoardError::WriteError {
        path: data_dir.clone(),
        source: e,
    })?;

    let config_path = data_dir.join(CONFIG_FILE);
    if force || !config_path.exists() {
        atomic_write(&config_path, config_text.as_bytes()).map_err(|e| BoardError::WriteError {
            path: config_path.clone(),
            source: e,
        })?;
    }

    if !data_dir.join(APPLICATIONS_FILE).exists() {
        save_applications(&data_dir, &[])?;
    }
    Ok(data_dir)
}
