//! Configuration loading, validation, and first-run bootstrapping.
//!
//! Configuration lives in a `svelte-sitemap.toml` file at the project root
//! and is deserialized with `serde`/`toml`. All sections are optional; a
//! config consisting of nothing but `base_url` is valid.
//!
//! # Example configuration
//!
//! ```toml
//! base_url = "https://yoursite.com"
//!
//! preserve_existing = true
//!
//! exclude = [
//!   "/admin",
//!   "(flow)",
//! ]
//!
//! [content_types]
//! blog = "src/lib/content"
//! portfolio = "src/lib/portfolio"
//!
//! [changefreq]
//! blog = "weekly"
//! portfolio = "monthly"
//!
//! [route_changefreq]
//! "/news" = "daily"
//!
//! [[glob]]
//! paths = ["src/lib/collections/*"]
//! ```
//!
//! When the file is missing, [`bootstrap`] asks for the base URL on stdin
//! and writes a commented starter file before the run proceeds.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::io::{self, Write};
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

use crate::models::ChangeFrequency;

/// Default location of the configuration file, relative to the project root.
pub const DEFAULT_CONFIG_PATH: &str = "svelte-sitemap.toml";

/// Base URL used when the config file exists but leaves `base_url` empty.
const FALLBACK_BASE_URL: &str = "http://localhost";

/// Parsed contents of `svelte-sitemap.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// The site's base URL, e.g. `https://yoursite.com`.
    #[serde(default)]
    pub base_url: String,
    /// Exclusion patterns applied to discovered routes.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Content type slug -> source directory.
    #[serde(default)]
    pub content_types: BTreeMap<String, String>,
    /// Content type slug (or directory) -> change frequency.
    #[serde(default)]
    pub changefreq: BTreeMap<String, String>,
    /// Route URL path -> change frequency override. An empty value omits
    /// the `<changefreq>` element for that route.
    #[serde(default)]
    pub route_changefreq: BTreeMap<String, String>,
    /// Keep lastmod/changefreq of entries already present in the existing
    /// sitemap. Unset means preserve.
    #[serde(default)]
    pub preserve_existing: Option<bool>,
    /// Glob sections expanding to additional content directories.
    #[serde(default)]
    pub glob: Vec<GlobSection>,
}

/// One `[[glob]]` section of the configuration.
#[derive(Debug, Default, Deserialize)]
pub struct GlobSection {
    /// Glob patterns; every matching directory is scanned as a content type
    /// named after its final path component.
    #[serde(default)]
    pub paths: Vec<String>,
}

impl Config {
    /// Load and parse the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    #[instrument(level = "info", skip_all, fields(path = %path))]
    pub async fn load(path: &str) -> Result<Config, Box<dyn Error>> {
        let data = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&data)?;
        info!(
            content_types = config.content_types.len(),
            exclude_patterns = config.exclude.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The configured base URL, or `http://localhost` when left empty.
    pub fn base_url_or_default(&self) -> &str {
        if self.base_url.is_empty() {
            FALLBACK_BASE_URL
        } else {
            &self.base_url
        }
    }

    /// Whether existing sitemap entries should be overwritten with freshly
    /// scanned metadata. Preserve is the default; only an explicit
    /// `preserve_existing = false` flips to overwrite.
    pub fn overwrite_existing(&self) -> bool {
        matches!(self.preserve_existing, Some(false))
    }

    /// The configured change frequency for a content type key, if any.
    ///
    /// Empty values count as unconfigured. Invalid values are logged and
    /// ignored so one typo never aborts the run.
    pub fn content_changefreq(&self, key: &str) -> Option<ChangeFrequency> {
        let value = self.changefreq.get(key)?;
        if value.is_empty() {
            return None;
        }
        match value.parse::<ChangeFrequency>() {
            Ok(freq) => Some(freq),
            Err(e) => {
                warn!(key, error = %e, "Ignoring invalid changefreq in config");
                None
            }
        }
    }
}

/// Validate a base URL and strip its trailing slashes.
///
/// The URL must parse as an absolute URL with a scheme and a non-empty
/// host. Validation happens before any filesystem scanning so a bad config
/// fails the run immediately.
///
/// # Errors
///
/// Returns an error when the URL does not parse or has no host.
pub fn validate_base_url(base: &str) -> Result<String, Box<dyn Error>> {
    let parsed = Url::parse(base).map_err(|e| {
        format!("invalid base_url in config: {e} (expected something like https://mysite.com)")
    })?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("invalid base_url in config: '{base}' has no host").into());
    }
    Ok(base.trim_end_matches('/').to_string())
}

/// Create a starter configuration file, asking for the base URL on stdin.
///
/// Called when the config file does not exist. The written file mirrors the
/// documented example so the commented sections are easy to fill in later.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn bootstrap(path: &str) -> Result<(), Box<dyn Error>> {
    print!("Config file '{path}' not found. Please enter your website base URL (e.g. https://mysite.com): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let base_url = line.trim();

    let starter = format!(
        "base_url = \"{base_url}\"\n\n\
         # You can exclude routes from the sitemap here.\n\
         exclude = [\n  \"/admin\",\n]\n\n\
         # You can define content types that have frontmatter here.\n\
         [content_types]\n\
         blog = \"src/lib/content\"\n"
    );
    fs::write(path, starter).await?;
    info!(path, "Created starter config with your base URL");
    Ok(())
}
