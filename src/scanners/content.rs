//! Content discovery for configured content directories.
//!
//! Each content type in `[content_types]` (and every directory matched by a
//! `[[glob]]` section) maps to one flat directory of `.md`/`.svx` files.
//! Every file becomes a [`ContentEntry`] whose URL is `/` + slug-prefix +
//! `/` + file-slug.
//!
//! # Publish dates
//!
//! The `lastmod` value comes from the `publishDate` field of the file's
//! frontmatter block (the YAML between `---` delimiter lines). The value is
//! trimmed and truncated to its first 10 characters, so both plain dates
//! and full timestamps yield `YYYY-MM-DD`. A missing field, a malformed
//! block, or a value shorter than 10 characters all fall back to the scan
//! date.
//!
//! # Error handling
//!
//! An unreadable content directory is logged and contributes nothing; one
//! bad source never prevents the sitemap from being generated from the
//! others.

use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use super::CONTENT_EXTENSIONS;
use crate::models::{ChangeFrequency, ContentEntry};
use crate::utils::today_date;

/// Typed view of the frontmatter fields this tool cares about.
///
/// The field name is camelCase to match the frontmatter schema used by the
/// content files, hence the `#[allow(non_snake_case)]`.
#[allow(non_snake_case)]
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    /// The item's publish date; free-form, truncated to 10 characters.
    #[serde(default)]
    publishDate: Option<String>,
}

/// Scan one content directory and return one entry per markdown file.
///
/// The scan is flat: subdirectories are not descended into. Directory read
/// failures are downgraded to a warning and an empty result.
///
/// # Arguments
///
/// * `root` - The content directory to scan
/// * `slug_prefix` - The content type slug prefixed to every item URL
/// * `changefreq` - Configured frequency for this content type
#[instrument(level = "info", skip_all, fields(root = %root, slug = %slug_prefix))]
pub async fn scan_content(
    root: &str,
    slug_prefix: &str,
    changefreq: Option<ChangeFrequency>,
) -> Vec<ContentEntry> {
    let mut dir = match fs::read_dir(root).await {
        Ok(dir) => dir,
        Err(e) => {
            warn!(root, error = %e, "Skipping unreadable content directory");
            return Vec::new();
        }
    };

    let mut metas = Vec::new();
    loop {
        let entry = match dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(root, error = %e, "Error reading content directory");
                break;
            }
        };
        if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(true) {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let Some(slug) = content_slug(&name) else {
            continue;
        };

        let url = format!("/{slug_prefix}/{slug}").replace("//", "/");
        let lastmod = publish_date(&entry.path()).await;
        debug!(url = %url, lastmod = %lastmod, "Discovered content item");

        metas.push(ContentEntry { url, lastmod, changefreq });
    }

    info!(count = metas.len(), "Discovered content items");
    metas
}

/// The URL slug for a content file name, or `None` for non-content files.
fn content_slug(name: &str) -> Option<&str> {
    CONTENT_EXTENSIONS.iter().find_map(|ext| name.strip_suffix(ext))
}

/// Read a content file's publish date, falling back to today.
async fn publish_date(path: &Path) -> String {
    match fs::read_to_string(path).await {
        Ok(text) => parse_publish_date(&text).unwrap_or_else(today_date),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Could not read content file");
            today_date()
        }
    }
}

/// Extract `publishDate` from a document's frontmatter block.
///
/// Returns `None` when there is no block, the YAML does not parse, the
/// field is absent, or the trimmed value is shorter than 10 characters.
fn parse_publish_date(text: &str) -> Option<String> {
    let block = frontmatter_block(text)?;
    let fm: FrontMatter = serde_yaml::from_str(&block).ok()?;
    let date = fm.publishDate?;
    let date = date.trim();
    date.get(..10).map(str::to_string)
}

/// The lines between the first `---` delimiter line and the next one
/// (or the end of the document when the block is never closed).
fn frontmatter_block(text: &str) -> Option<String> {
    let mut lines = text.lines();
    if lines.next()?.trim() != "---" {
        return None;
    }
    let block: Vec<&str> = lines.take_while(|line| line.trim() != "---").collect();
    Some(block.join("\n"))
}
