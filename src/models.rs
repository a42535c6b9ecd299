//! Data models for discovered pages and sitemap entries.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RouteEntry`]: A page discovered by walking the SvelteKit routes tree
//! - [`ContentEntry`]: An article discovered in a configured content directory
//! - [`SitemapUrl`]: A single `<url>` entry as stored in and emitted to `sitemap.xml`
//! - [`ChangeFrequency`]: The sitemap protocol's `changefreq` hint values
//!
//! Route and content entries are ephemeral: they are recomputed on every run,
//! handed to the merge engine once, and discarded. `SitemapUrl` values either
//! come from the previously generated document or are freshly constructed
//! during the merge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How frequently a page is likely to change, per the sitemap protocol.
///
/// These values are hints for crawlers; they are emitted verbatim as the
/// `<changefreq>` element. An entry without a frequency omits the element
/// entirely, which is why the models carry `Option<ChangeFrequency>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    /// The page changes every time it is accessed.
    Always,
    /// The page changes hourly.
    Hourly,
    /// The page changes daily.
    Daily,
    /// The page changes weekly.
    Weekly,
    /// The page changes monthly.
    Monthly,
    /// The page changes yearly.
    Yearly,
    /// The page is archived and will not change.
    Never,
}

impl ChangeFrequency {
    /// The lowercase protocol string for this frequency.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(format!("invalid changefreq value: {s}")),
        }
    }
}

/// A page discovered by walking the routes tree.
///
/// # Fields
///
/// * `url` - Canonical URL path, always starting with `/`
/// * `lastmod` - The source file's modification date in `YYYY-MM-DD` format
/// * `changefreq` - Frequency hint; `None` means the element is omitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Canonical URL path starting with `/`.
    pub url: String,
    /// Last modification date in `YYYY-MM-DD` format.
    pub lastmod: String,
    /// Change frequency hint, omitted from output when `None`.
    pub changefreq: Option<ChangeFrequency>,
}

/// An article-like item discovered in a configured content directory.
///
/// The URL is `/` + slug-prefix + `/` + item-slug, normalized so that an
/// empty slug prefix never produces a doubled slash. `lastmod` comes from
/// the frontmatter `publishDate` when present, otherwise the scan date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Canonical URL path starting with `/`.
    pub url: String,
    /// Publish date in `YYYY-MM-DD` format.
    pub lastmod: String,
    /// Configured frequency for this content type; `None` defaults to
    /// `never` when the entry is inserted into the sitemap.
    pub changefreq: Option<ChangeFrequency>,
}

/// A single `<url>` entry of a sitemap document.
///
/// `loc` is the fully qualified location (base URL + path) and is unique
/// within a generated document; it is the key the merge engine dedups on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapUrl {
    /// Fully qualified location, e.g. `https://example.com/blog/hello`.
    pub loc: String,
    /// Last modification date in `YYYY-MM-DD` format.
    pub lastmod: String,
    /// Change frequency hint; the `<changefreq>` element is omitted when `None`.
    pub changefreq: Option<ChangeFrequency>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changefreq_parses_all_protocol_values() {
        let cases = [
            ("always", ChangeFrequency::Always),
            ("hourly", ChangeFrequency::Hourly),
            ("daily", ChangeFrequency::Daily),
            ("weekly", ChangeFrequency::Weekly),
            ("monthly", ChangeFrequency::Monthly),
            ("yearly", ChangeFrequency::Yearly),
            ("never", ChangeFrequency::Never),
            ("WEEKLY", ChangeFrequency::Weekly),
            ("Never", ChangeFrequency::Never),
        ];

        for (value, expected) in cases {
            assert_eq!(value.parse::<ChangeFrequency>().unwrap(), expected);
        }
    }

    #[test]
    fn test_changefreq_rejects_unknown_value() {
        assert!("sometimes".parse::<ChangeFrequency>().is_err());
        assert!("".parse::<ChangeFrequency>().is_err());
    }

    #[test]
    fn test_changefreq_round_trips_through_as_str() {
        for freq in [
            ChangeFrequency::Always,
            ChangeFrequency::Hourly,
            ChangeFrequency::Daily,
            ChangeFrequency::Weekly,
            ChangeFrequency::Monthly,
            ChangeFrequency::Yearly,
            ChangeFrequency::Never,
        ] {
            assert_eq!(freq.as_str().parse::<ChangeFrequency>().unwrap(), freq);
        }
    }

    #[test]
    fn test_changefreq_display_matches_protocol_string() {
        assert_eq!(ChangeFrequency::Weekly.to_string(), "weekly");
        assert_eq!(format!("{}", ChangeFrequency::Never), "never");
    }

    #[test]
    fn test_sitemap_url_construction() {
        let url = SitemapUrl {
            loc: "https://example.com/blog/hello".to_string(),
            lastmod: "2025-07-18".to_string(),
            changefreq: Some(ChangeFrequency::Weekly),
        };
        assert_eq!(url.loc, "https://example.com/blog/hello");
        assert_eq!(url.lastmod, "2025-07-18");
        assert_eq!(url.changefreq, Some(ChangeFrequency::Weekly));
    }
}
