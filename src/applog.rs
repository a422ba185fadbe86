//! Append-only user action log.
//!
//! Distinct from the tracing diagnostics: this file records what the user
//! did ("Saved order 12") in a plain, human-readable format shown back to
//! them inside the application. One line per action, newest entries read
//! first.

use crate::errors::Result;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Handle to the action log file. Opening creates the parent directory but
/// not the file itself; the first append does that.
#[derive(Debug, Clone)]
pub struct ActionLog {
    path: PathBuf,
}

impl ActionLog {
    /// Binds a log to `path`, creating parent directories as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Appends one timestamped line: `YYYY-MM-DD HH:MM:SS - message`.
    #[instrument(skip(self))]
    pub fn log(&self, message: &str) -> Result<()> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{stamp} - {message}")?;
        debug!("Action logged: {}", message);
        Ok(())
    }

    /// Returns all entries, newest first. A log that does not exist yet
    /// reads as empty rather than failing.
    pub fn read(&self) -> Result<Vec<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Action log {:?} does not exist yet.", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mut lines: Vec<String> = contents
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        lines.reverse();
        Ok(lines)
    }

    /// Truncates the log, leaving a single entry marking the clear.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        fs::write(&self.path, "")?;
        self.log("Action log cleared.")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_and_read_newest_first() -> Result<()> {
        let dir = tempdir().unwrap();
        let log = ActionLog::open(dir.path().join("actions.log"))?;

        log.log("first action")?;
        log.log("second action")?;

        let entries = log.read()?;
        assert_eq!(entries.len(), 2);
        assert!(entries[0].ends_with("second action"));
        assert!(entries[1].ends_with("first action"));
        // Timestamp prefix, e.g. "2025-03-10 14:05:31 - first action"
        assert!(entries[0].contains(" - "));
        Ok(())
    }

    #[test]
    fn test_read_missing_log_is_empty() -> Result<()> {
        let dir = tempdir().unwrap();
        let log = ActionLog::open(dir.path().join("never-written.log"))?;
        assert!(log.read()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_clear_leaves_marker_entry() -> Result<()> {
        let dir = tempdir().unwrap();
        let log = ActionLog::open(dir.path().join("actions.log"))?;
        log.log("something")?;
        log.log("something else")?;

        log.clear()?;

        let entries = log.read()?;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("Action log cleared."));
        Ok(())
    }

    #[test]
    fn test_open_creates_parent_directories() -> Result<()> {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/actions.log");
        let log = ActionLog::open(&nested)?;
        log.log("hello")?;
        assert!(nested.exists());
        Ok(())
    }
}
