//! # svelte_sitemap
//!
//! A sitemap generator for SvelteKit static sites that walks the routes
//! tree and configured content directories, merges what it finds with the
//! previously generated `sitemap.xml`, and writes the result back.
//!
//! ## Features
//!
//! - Discovers pages from `+page.svelte` markers and markdown routes
//!   (`.md`/`.svx`), pruning `[param]` dynamic segments and hiding
//!   `(group)` layout directories from URLs
//! - Discovers articles in configured content directories (plus glob
//!   patterns), reading `publishDate` from frontmatter for `lastmod`
//! - Merges with the existing sitemap: preserve mode keeps prior metadata
//!   and never drops entries, overwrite mode rebuilds from the current scan
//! - Deterministic output: entries deduplicated by location and sorted,
//!   fixed 2-space indentation, so consecutive runs diff cleanly
//!
//! ## Usage
//!
//! ```sh
//! svelte_sitemap            # writes static/sitemap.xml
//! svelte_sitemap --dry-run  # prints the document to stdout
//! ```
//!
//! ## Architecture
//!
//! The application is a one-shot batch pipeline:
//! 1. **Configuration**: Load (or bootstrap) `svelte-sitemap.toml`, validate
//!    the base URL before touching anything else
//! 2. **Discovery**: Scan content directories, glob matches, and the routes
//!    tree into flat entry lists
//! 3. **Merge**: Reconcile discovered entries with the existing sitemap
//! 4. **Output**: Serialize and write (or print in dry-run mode)

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod exclude;
mod merge;
mod models;
mod outputs;
mod scanners;
mod utils;

use cli::Cli;
use config::Config;
use merge::merge_entries;
use models::ContentEntry;
use outputs::xml::{load_sitemap, render_sitemap};
use scanners::content::scan_content;
use scanners::routes::scan_routes;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // Parse CLI first so --quiet can shape the default filter
    let args = Cli::parse();

    // --- Tracing init ---
    let default_filter = if args.quiet { "error" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("svelte_sitemap starting up");
    debug!(?args.config, ?args.routes_dir, ?args.output, "Parsed CLI arguments");

    // --- Configuration ---
    if !Path::new(&args.config).exists() {
        config::bootstrap(&args.config).await?;
    }
    let config = Config::load(&args.config).await?;

    // Validate base_url before any scanning
    let base = config::validate_base_url(config.base_url_or_default())?;
    info!(base = %base, "Validated base URL");

    // Early check: ensure the output directory is writable
    if !args.dry_run {
        let out_dir = output_dir(&args.output);
        if let Err(e) = ensure_writable_dir(&out_dir).await {
            error!(
                path = %out_dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Scan content directories ----
    let mut content_types = config.content_types.clone();
    if content_types.is_empty() {
        content_types.insert("blog".to_string(), "src/lib/content".to_string());
    }

    let mut all_content: Vec<ContentEntry> = Vec::new();
    for (slug, dir) in &content_types {
        let freq = config.content_changefreq(slug);
        all_content.extend(scan_content(dir, slug, freq).await);
    }

    // ---- Expand glob sections into extra content directories ----
    for section in &config.glob {
        for pattern in &section.paths {
            let matches = match glob::glob(pattern) {
                Ok(paths) => paths,
                Err(e) => {
                    warn!(pattern = %pattern, error = %e, "Skipping invalid glob pattern");
                    continue;
                }
            };
            for entry in matches {
                let dir = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        warn!(pattern = %pattern, error = %e, "Skipping unreadable glob match");
                        continue;
                    }
                };
                if !dir.is_dir() {
                    continue;
                }
                let slug = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let dir = dir.to_string_lossy().to_string();
                // The full directory path wins over the basename key
                let freq = config
                    .content_changefreq(&dir)
                    .or_else(|| config.content_changefreq(&slug));
                all_content.extend(scan_content(&dir, &slug, freq).await);
            }
        }
    }

    // ---- Scan routes ----
    let routes = match scan_routes(&args.routes_dir, &config.exclude, &config.route_changefreq) {
        Ok(routes) => routes,
        Err(e) => {
            error!(root = %args.routes_dir, error = %e, "Error scanning routes");
            return Err(e);
        }
    };

    // ---- Load the existing sitemap ----
    let existing = match load_sitemap(&args.output).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                path = %args.output,
                error = %e,
                "Could not load existing sitemap; continuing with an empty entry list"
            );
            Vec::new()
        }
    };

    if routes.is_empty() && all_content.is_empty() && existing.is_empty() {
        info!("No page or article found, nothing to do");
        return Ok(());
    }

    for route in &routes {
        info!(
            url = %route.url,
            lastmod = %route.lastmod,
            changefreq = route.changefreq.map(models::ChangeFrequency::as_str).unwrap_or(""),
            "Detected page"
        );
    }
    for item in &all_content {
        info!(
            url = %item.url,
            lastmod = %item.lastmod,
            changefreq = item.changefreq.map(models::ChangeFrequency::as_str).unwrap_or(""),
            "Detected article"
        );
    }

    // ---- Merge and serialize ----
    let overwrite_existing = config.overwrite_existing();
    let entries = merge_entries(&base, &routes, &all_content, existing, overwrite_existing);
    let sitemap_xml = render_sitemap(&entries)?;

    if args.dry_run {
        if !overwrite_existing && Path::new(&args.output).exists() {
            info!(
                path = %args.output,
                "Sitemap file already exists; new entries would be added, existing entries preserved"
            );
        }
        print!("{sitemap_xml}");
        let elapsed = start_time.elapsed();
        info!(?elapsed, "Dry run complete");
        return Ok(());
    }

    if let Err(e) = fs::write(&args.output, &sitemap_xml).await {
        error!(path = %args.output, error = %e, "Error writing sitemap");
        return Err(e.into());
    }
    info!(
        path = %args.output,
        entries = entries.len(),
        "Sitemap successfully generated"
    );

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// The directory the output file lives in, for the writability probe.
fn output_dir(output: &str) -> String {
    Path::new(output)
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| ".".to_string())
}
