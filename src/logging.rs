//! Diagnostic logging.
//!
//! Off unless `JT_LOG` is set (e.g. `JT_LOG=jobtrack=debug`). The board UI
//! owns the terminal, so it logs to `jobtrack/jt.log`; CLI commands log to
//! stderr.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "JT_LOG";

/// Name of the log file inside the data directory
pub const LOG_FILE: &str = "jt.log";

/// Where log lines go
#[derive(Debug, Clone, PartialEq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// The log file of the board whose data directory is `data_dir`
    pub fn board_file(data_dir: &Path) -> Self {
        LogTarget::File(data_dir.join(LOG_FILE))
    }
}

/// Install the global subscriber if `JT_LOG` is set.
///
/// Returns whether a subscriber was installed. Failing to open the log file
/// or a second call leaves logging off rather than failing the command.
pub fn init(target: LogTarget) -> bool {
    let Ok(directives) = std::env::var(LOG_ENV) else {
        return false;
    };
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("warning: ignoring invalid {}: {}", LOG_ENV, e);
        EnvFilter::new("jobtrack=info")
    });

    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
        LogTarget::File(path) => {
            let file = match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("warning: could not open {}: {}", path.display(), e);
                    return false;
                }
            };
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
                .is_ok()
        }
    };

    if installed {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialised");
    }
    installed
}
