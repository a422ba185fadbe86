//! CSV and PDF rendering of resolved orders and report rows.
//!
//! Pure formatting over [`crate::models::OrderDetails`] and
//! [`crate::models::ReportRow`]; nothing here touches the database.

pub mod csv;
pub mod pdf;

use crate::errors::Result;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Builds `<dir>/<prefix>_<YYYYMMDD_HHMMSS>.<ext>`, creating `dir` if it
/// does not exist yet.
pub fn export_filepath<P: AsRef<Path>>(dir: P, prefix: &str, ext: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(dir.join(format!("{prefix}_{stamp}.{ext}")))
}

/// Two-decimal currency rendering used by every export column.
pub(crate) fn money(value: f64) -> String {
    format!("{value:.2}")
}

// Removes a half-written file after a failed render so callers never find a
// truncated export next to a reported error.
pub(crate) fn discard_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!("Could not remove partial export {:?}: {}", path, e);
    }
}
