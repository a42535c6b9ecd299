//! Route discovery for the SvelteKit routes tree.
//!
//! Walks `src/routes` (or the directory given on the command line) and turns
//! every page file into a [`RouteEntry`]. A file counts as a page when it is
//! a `+page.svelte` index marker or carries a markdown extension
//! (`.md`/`.svx`).
//!
//! # URL construction
//!
//! Two separate passes build the canonical URL path:
//!
//! 1. [`route_url_path`] converts the file path into a URL path: separators
//!    become `/`, the extension or `+page.svelte` marker is stripped, and
//!    root artifacts collapse to `/`.
//! 2. [`strip_layout_groups`] removes `(group)` segments, which exist only
//!    to organize layouts and never appear in the public URL.
//!
//! Exclusion patterns run between the two passes, so a bare `(flow)`
//! pattern can still see the group segment it is meant to match.
//!
//! Directories named `[param]` are dynamic route parameters; they are
//! pruned during traversal and nothing below them produces an entry.

use itertools::Itertools;
use std::collections::BTreeMap;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use super::CONTENT_EXTENSIONS;
use crate::exclude::is_excluded;
use crate::models::{ChangeFrequency, RouteEntry};
use crate::utils::{mtime_date, today_date};

/// File names that mark a directory as a page.
const PAGE_MARKERS: &[&str] = &["+page.svelte"];

/// Scan the routes tree and return one entry per discovered page.
///
/// # Arguments
///
/// * `root` - The routes directory, typically `src/routes`
/// * `exclude` - Exclusion patterns from the configuration
/// * `freq_overrides` - `[route_changefreq]` config map, URL path -> frequency
///
/// # Errors
///
/// Returns an error when the walk itself fails (missing or unreadable
/// routes directory). Unlike content sources, a broken routes tree aborts
/// the run: without it there is nothing meaningful to generate.
#[instrument(level = "info", skip_all, fields(root = %root))]
pub fn scan_routes(
    root: &str,
    exclude: &[String],
    freq_overrides: &BTreeMap<String, String>,
) -> Result<Vec<RouteEntry>, Box<dyn Error>> {
    let mut metas = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && is_dynamic_segment(e.file_name())));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let is_page_marker = PAGE_MARKERS.contains(&name.as_ref());
        let has_content_ext = CONTENT_EXTENSIONS.iter().any(|ext| name.ends_with(ext));
        debug!(path = %entry.path().display(), "Scanning route file");
        if !is_page_marker && !has_content_ext {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .to_string();

        let raw_url = route_url_path(&rel);
        if is_excluded(&raw_url, exclude) {
            debug!(url = %raw_url, "Route excluded by pattern");
            continue;
        }
        let url = strip_layout_groups(&raw_url);

        let lastmod = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(mtime_date)
            .unwrap_or_else(today_date);

        let changefreq = route_changefreq(&url, freq_overrides);

        metas.push(RouteEntry { url, lastmod, changefreq });
    }

    info!(count = metas.len(), "Discovered routes");
    Ok(metas)
}

/// Whether a path component is a `[param]` dynamic route segment.
fn is_dynamic_segment(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('[') && name.ends_with(']')
}

/// First normalization pass: file path to URL path.
///
/// Converts separators, prefixes `/`, strips a markdown extension or a
/// trailing `+page.svelte` marker, and collapses the artifacts that
/// stripping leaves at the root. Layout-group segments are kept; they are
/// removed by [`strip_layout_groups`] after exclusion matching.
///
/// Idempotent: normalizing an already-normalized path returns it unchanged.
pub fn route_url_path(rel: &str) -> String {
    let rel = rel.replace('\\', "/");
    let mut url = format!("/{}", rel.trim_start_matches('/'));

    if let Some(stripped) = CONTENT_EXTENSIONS.iter().find_map(|ext| url.strip_suffix(ext)) {
        url = stripped.to_string();
    } else if let Some(stripped) = url.strip_suffix("/+page.svelte") {
        url = stripped.to_string();
    }

    if url.is_empty() || url == "/+page.svelte" || url == "/." {
        return "/".to_string();
    }
    url
}

/// Second normalization pass: drop `(group)` segments and empty segments.
///
/// Layout groups organize routes on disk without contributing to the URL.
/// Idempotent, and collapses to `/` when nothing remains.
pub fn strip_layout_groups(url: &str) -> String {
    let segments = url
        .split('/')
        .filter(|s| !s.is_empty() && !(s.starts_with('(') && s.ends_with(')')))
        .join("/");
    format!("/{segments}")
}

/// Change frequency for a route URL.
///
/// The `[route_changefreq]` config map wins when it has an entry for the
/// URL (an empty value omits the element). Otherwise the defaults apply:
/// the root omits the element, `/blog` is `weekly`, everything else `never`.
fn route_changefreq(
    url: &str,
    overrides: &BTreeMap<String, String>,
) -> Option<ChangeFrequency> {
    if let Some(value) = overrides.get(url) {
        if value.is_empty() {
            return None;
        }
        match value.parse::<ChangeFrequency>() {
            Ok(freq) => return Some(freq),
            Err(e) => warn!(url, error = %e, "Ignoring invalid route_changefreq in config"),
        }
    }
    match url {
        "/" => None,
        "/blog" => Some(ChangeFrequency::Weekly),
        _ => Some(ChangeFrequency::Never),
    }
}
