//! Sitemap document input/output.
//!
//! This module contains the submodule responsible for turning merged
//! entries into the final document and for reading the previous run's
//! document back in:
//!
//! # Submodules
//!
//! - [`xml`]: Renders the `<urlset>` document, parses an existing one, and
//!   loads it from disk (missing file is an empty prior-entry list)
//!
//! # Output Structure
//!
//! ```text
//! static/
//! └── sitemap.xml   # overwritten on every non-dry-run invocation
//! ```

pub mod xml;
