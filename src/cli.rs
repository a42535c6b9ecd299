//! Command-line interface definitions for svelte_sitemap.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Everything of substance lives in `svelte-sitemap.toml`; the flags only
//! control where files are read from and whether the run writes anything.

use clap::Parser;

use crate::config::DEFAULT_CONFIG_PATH;

/// Command-line arguments for the svelte_sitemap application.
///
/// # Examples
///
/// ```sh
/// # Generate static/sitemap.xml from src/routes and the configured content
/// svelte_sitemap
///
/// # Print the document to stdout without touching the filesystem
/// svelte_sitemap --dry-run
///
/// # Non-standard project layout
/// svelte_sitemap --routes-dir app/routes --output build/sitemap.xml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Print the sitemap to stdout instead of writing it to the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress all output except errors
    #[arg(long)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Directory containing the SvelteKit routes tree
    #[arg(long, default_value = "src/routes")]
    pub routes_dir: String,

    /// Path the sitemap document is written to
    #[arg(short, long, default_value = "static/sitemap.xml")]
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["svelte_sitemap"]);

        assert!(!cli.dry_run);
        assert!(!cli.quiet);
        assert_eq!(cli.config, "svelte-sitemap.toml");
        assert_eq!(cli.routes_dir, "src/routes");
        assert_eq!(cli.output, "static/sitemap.xml");
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["svelte_sitemap", "--dry-run", "--quiet"]);

        assert!(cli.dry_run);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "svelte_sitemap",
            "--routes-dir",
            "app/routes",
            "-o",
            "build/sitemap.xml",
            "-c",
            "custom.toml",
        ]);

        assert_eq!(cli.routes_dir, "app/routes");
        assert_eq!(cli.output, "build/sitemap.xml");
        assert_eq!(cli.config, "custom.toml");
    }
}
