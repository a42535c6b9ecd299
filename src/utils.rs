//! Utility functions for date formatting and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - Date formatting for `lastmod` values (scan date and file mtimes)
//! - File system validation for the output directory

use chrono::{DateTime, Local};
use std::error::Error;
use std::fs as stdfs;
use std::time::SystemTime;
use tokio::fs;
use tracing::{info, instrument};

/// The current local date in `YYYY-MM-DD` format.
///
/// Used as the `lastmod` fallback whenever a file carries no usable date:
/// content without a frontmatter `publishDate`, or a route whose mtime
/// cannot be read.
pub fn today_date() -> String {
    Local::now().date_naive().to_string()
}

/// Format a file modification time as a `YYYY-MM-DD` date.
///
/// # Arguments
///
/// * `mtime` - The modification time reported by the filesystem
///
/// # Returns
///
/// The local calendar date of the timestamp.
///
/// # Examples
///
/// ```ignore
/// let date = mtime_date(std::time::SystemTime::now());
/// assert_eq!(date.len(), 10);
/// ```
pub fn mtime_date(mtime: SystemTime) -> String {
    DateTime::<Local>::from(mtime).format("%Y-%m-%d").to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file. Called for the sitemap
/// output directory before any scanning so a doomed run fails early.
///
/// # Arguments
///
/// * `path` - The directory path to validate
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
