//! Advisory locking of the `jobtrack/` directory.
//!
//! Every read-modify-write of applications.json or board.toml runs inside
//! [`with_lock`], whether it comes from a `jt` command or the running board.
//! The lock file itself stays on disk; only the flock on it matters, and it
//! is released when the handle closes.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const LOCK_FILE: &str = ".lock";

/// How long a `jt` command waits for the board
pub const CLI_TIMEOUT: Duration = Duration::from_secs(5);

/// How long the board view waits before giving up on a save
pub const TUI_TIMEOUT: Duration = Duration::from_millis(500);

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("board is busy ({path} is held by another jt process)")]
    Busy { path: PathBuf },
}

/// An exclusive hold on the board. Dropping it unlocks.
#[derive(Debug)]
pub struct BoardLock {
    _file: File,
}

impl BoardLock {
    /// Lock `data_dir`, retrying until `timeout` has passed.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while let Err(e) = flock_exclusive(&file) {
            if Instant::now() >= deadline {
                tracing::warn!(path = %path.display(), error = %e, "board lock timed out");
                return Err(LockError::Busy { path });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
        tracing::trace!(path = %path.display(), "board locked");
        Ok(BoardLock { _file: file })
    }
}

/// Run `f` with the board locked, from before its first read until after
/// its last write.
pub fn with_lock<T, E>(
    data_dir: &Path,
    timeout: Duration,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E>
where
    E: From<LockError>,
{
    let _lock = BoardLock::acquire(data_dir, timeout)?;
    f()
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and open for the call
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lock_is_released_on_drop() {
        let tmp = TempDir::new().unwrap();
        let lock = BoardLock::acquire(tmp.path(), CLI_TIMEOUT).unwrap();
        drop(lock);
        assert!(BoardLock::acquire(tmp.path(), Duration::ZERO).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn held_lock_makes_others_wait_then_fail() {
        let tmp = TempDir::new().unwrap();
        let _held = BoardLock::acquire(tmp.path(), CLI_TIMEOUT).unwrap();
        let second = BoardLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Busy { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn busy_board_skips_the_body() {
        let tmp = TempDir::new().unwrap();
        let _held = BoardLock::acquire(tmp.path(), CLI_TIMEOUT).unwrap();
        let mut ran = false;
        let result = with_lock(tmp.path(), Duration::from_millis(20), || {
            ran = true;
            Ok::<_, LockError>(())
        });
        assert!(matches!(result, Err(LockError::Busy { .. })));
        assert!(!ran);
    }

    #[cfg(unix)]
    #[test]
    fn concurrent_updates_are_not_lost() {
        let tmp = TempDir::new().unwrap();
        let counter = tmp.path().join("count");
        fs::write(&counter, "0").unwrap();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let dir = tmp.path().to_path_buf();
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        with_lock(&dir, Duration::from_secs(10), || {
                            let n: u32 = fs::read_to_string(&counter).unwrap().parse().unwrap();
                            fs::write(&counter, (n + 1).to_string()).unwrap();
                            Ok::<_, LockError>(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(fs::read_to_string(&counter).unwrap(), "100");
    }
}
