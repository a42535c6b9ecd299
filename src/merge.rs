//! The merge engine: reconcile freshly discovered entries with an existing
//! sitemap.
//!
//! This is the core of the tool. Discovered routes and content items are
//! combined with the previously generated document into a single entry set
//! keyed by location (base URL + path), with one of two policies:
//!
//! - **Preserve** (default): entries already present in the existing
//!   sitemap keep their stored `lastmod`/`changefreq`; fresh scan data for
//!   a known location is discarded. Entries no longer discovered persist;
//!   the engine never prunes in this mode.
//! - **Overwrite** (`preserve_existing = false`): the set starts empty and
//!   is rebuilt from the current scan, so the output converges to exactly
//!   what is discovered now. A location discovered twice keeps the later
//!   scan's metadata.
//!
//! The entry set is a `BTreeMap` keyed by location, so iteration yields
//! entries in ascending lexicographic order and the serialized document is
//! deterministic and diffable across runs.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{info, instrument};

use crate::models::{ChangeFrequency, ContentEntry, RouteEntry, SitemapUrl};

/// Merge discovered routes and content with existing sitemap entries.
///
/// # Arguments
///
/// * `base` - Validated base URL; trailing slashes are stripped here so the
///   caller cannot produce doubled slashes in locations
/// * `routes` - Entries from the routes scan
/// * `content` - Entries from all content scans
/// * `existing` - Entries loaded from the previous sitemap, possibly empty
/// * `overwrite_existing` - Overwrite policy (see module docs)
///
/// # Returns
///
/// The merged entries, deduplicated by location and sorted ascending by
/// location. The operation is deterministic for identical inputs, and in
/// preserve mode it is idempotent: merging a scan into its own previous
/// output changes nothing.
#[instrument(level = "info", skip_all, fields(
    routes = routes.len(),
    content = content.len(),
    existing = existing.len(),
    overwrite_existing
))]
pub fn merge_entries(
    base: &str,
    routes: &[RouteEntry],
    content: &[ContentEntry],
    existing: Vec<SitemapUrl>,
    overwrite_existing: bool,
) -> Vec<SitemapUrl> {
    let base = base.trim_end_matches('/');
    let mut entries: BTreeMap<String, SitemapUrl> = BTreeMap::new();

    if !overwrite_existing {
        for url in existing {
            entries.insert(url.loc.clone(), url);
        }
    }

    for route in routes {
        upsert(
            &mut entries,
            format!("{base}{}", route.url),
            &route.lastmod,
            route.changefreq,
            overwrite_existing,
        );
    }

    for item in content {
        // Content without a configured frequency defaults to `never`
        let changefreq = Some(item.changefreq.unwrap_or(ChangeFrequency::Never));
        upsert(
            &mut entries,
            format!("{base}{}", item.url),
            &item.lastmod,
            changefreq,
            overwrite_existing,
        );
    }

    info!(count = entries.len(), "Merged sitemap entries");
    entries.into_values().collect()
}

/// Insert a discovered entry, or refresh an already-known location when the
/// overwrite policy allows it. The location itself is never rewritten.
fn upsert(
    entries: &mut BTreeMap<String, SitemapUrl>,
    loc: String,
    lastmod: &str,
    changefreq: Option<ChangeFrequency>,
    overwrite_existing: bool,
) {
    match entries.entry(loc) {
        Entry::Occupied(mut occupied) => {
            if overwrite_existing {
                let entry = occupied.get_mut();
                entry.lastmod = lastmod.to_string();
                entry.changefreq = changefreq;
            }
        }
        Entry::Vacant(vacant) => {
            let loc = vacant.key().clone();
            vacant.insert(SitemapUrl {
                loc,
                lastmod: lastmod.to_string(),
                changefreq,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com";

    fn route(url: &str, lastmod: &str, changefreq: Option<ChangeFrequency>) -> RouteEntry {
        RouteEntry {
            url: url.to_string(),
            lastmod: lastmod.to_string(),
            changefreq,
        }
    }

    fn article(url: &str, lastmod: &str, changefreq: Option<ChangeFrequency>) -> ContentEntry {
        ContentEntry {
            url: url.to_string(),
            lastmod: lastmod.to_string(),
            changefreq,
        }
    }

    fn existing(loc: &str, lastmod: &str) -> SitemapUrl {
        SitemapUrl {
            loc: loc.to_string(),
            lastmod: lastmod.to_string(),
            changefreq: None,
        }
    }

    #[test]
    fn test_fresh_entries_are_inserted_with_base_prefix() {
        let routes = vec![route("/", "2025-08-01", None)];
        let content = vec![article("/blog/hello", "2025-07-18", Some(ChangeFrequency::Weekly))];

        let merged = merge_entries(BASE, &routes, &content, Vec::new(), false);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].loc, "https://example.com/");
        assert_eq!(merged[1].loc, "https://example.com/blog/hello");
        assert_eq!(merged[1].lastmod, "2025-07-18");
    }

    #[test]
    fn test_trailing_slash_on_base_is_stripped() {
        let routes = vec![route("/about", "2025-08-01", Some(ChangeFrequency::Never))];
        let merged = merge_entries("https://example.com/", &routes, &[], Vec::new(), false);
        assert_eq!(merged[0].loc, "https://example.com/about");
    }

    #[test]
    fn test_preserve_mode_keeps_existing_metadata() {
        let prior = vec![existing("https://example.com/a", "2020-01-01")];
        let routes = vec![route("/a", "2025-08-01", Some(ChangeFrequency::Never))];

        let merged = merge_entries(BASE, &routes, &[], prior, false);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].lastmod, "2020-01-01");
        assert_eq!(merged[0].changefreq, None);
    }

    #[test]
    fn test_overwrite_mode_refreshes_rediscovered_metadata() {
        let prior = vec![existing("https://example.com/a", "2020-01-01")];
        let routes = vec![route("/a", "2025-08-01", Some(ChangeFrequency::Never))];

        let merged = merge_entries(BASE, &routes, &[], prior, true);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].lastmod, "2025-08-01");
        assert_eq!(merged[0].changefreq, Some(ChangeFrequency::Never));
    }

    #[test]
    fn test_overwrite_mode_converges_to_current_discovery() {
        // An old entry that is no longer discovered does not survive a
        // rebuild; the output is exactly the current scan.
        let prior = vec![existing("https://example.com/old-page", "2020-01-01")];
        let routes = vec![route("/", "2025-08-01", None)];

        let merged = merge_entries(BASE, &routes, &[], prior, true);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].loc, "https://example.com/");
    }

    #[test]
    fn test_preserve_mode_never_prunes_stale_entries() {
        let prior = vec![existing("https://example.com/old-page", "2020-01-01")];
        let routes = vec![route("/", "2025-08-01", None)];
        let content = vec![article("/blog/hello", "2025-07-18", None)];

        let merged = merge_entries(BASE, &routes, &content, prior, false);
        let locs: Vec<&str> = merged.iter().map(|u| u.loc.as_str()).collect();

        assert_eq!(
            locs,
            vec![
                "https://example.com/",
                "https://example.com/blog/hello",
                "https://example.com/old-page",
            ]
        );
        let old = merged.iter().find(|u| u.loc.ends_with("/old-page")).unwrap();
        assert_eq!(old.lastmod, "2020-01-01");
    }

    #[test]
    fn test_locations_are_unique() {
        let routes = vec![route("/blog/hello", "2025-08-01", Some(ChangeFrequency::Never))];
        let content = vec![article("/blog/hello", "2025-07-18", Some(ChangeFrequency::Weekly))];

        let merged = merge_entries(BASE, &routes, &content, Vec::new(), false);

        assert_eq!(merged.len(), 1);
        // Preserve mode: the first insertion (the route) wins
        assert_eq!(merged[0].lastmod, "2025-08-01");
    }

    #[test]
    fn test_duplicate_discovery_in_overwrite_mode_keeps_later_scan() {
        let routes = vec![route("/blog/hello", "2025-08-01", Some(ChangeFrequency::Never))];
        let content = vec![article("/blog/hello", "2025-07-18", Some(ChangeFrequency::Weekly))];

        let merged = merge_entries(BASE, &routes, &content, Vec::new(), true);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].lastmod, "2025-07-18");
        assert_eq!(merged[0].changefreq, Some(ChangeFrequency::Weekly));
    }

    #[test]
    fn test_content_without_frequency_defaults_to_never() {
        let content = vec![article("/blog/hello", "2025-07-18", None)];
        let merged = merge_entries(BASE, &[], &content, Vec::new(), false);
        assert_eq!(merged[0].changefreq, Some(ChangeFrequency::Never));
    }

    #[test]
    fn test_output_is_sorted_by_location() {
        let routes = vec![
            route("/b", "2025-08-01", None),
            route("/a", "2025-08-01", None),
            route("/a/c", "2025-08-01", None),
        ];
        let merged = merge_entries(BASE, &routes, &[], Vec::new(), false);
        let locs: Vec<&str> = merged.iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.com/a",
                "https://example.com/a/c",
                "https://example.com/b",
            ]
        );
    }

    #[test]
    fn test_preserve_merge_is_idempotent() {
        let routes = vec![
            route("/", "2025-08-01", None),
            route("/about", "2025-08-02", Some(ChangeFrequency::Never)),
        ];
        let content = vec![article("/blog/hello", "2025-07-18", Some(ChangeFrequency::Weekly))];

        let first = merge_entries(BASE, &routes, &content, Vec::new(), false);
        let second = merge_entries(BASE, &routes, &content, first.clone(), false);

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_inputs_produce_empty_output() {
        let merged = merge_entries(BASE, &[], &[], Vec::new(), false);
        assert!(merged.is_empty());
    }
}
