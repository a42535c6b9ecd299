//! Exclusion pattern matching for discovered routes.
//!
//! Patterns come from the `exclude` list in `svelte-sitemap.toml` and take
//! two forms:
//!
//! - Patterns starting with `/` match as a path prefix, so `/admin` excludes
//!   `/admin` itself and everything under it.
//! - Bare patterns match a whole path segment anywhere in the URL, so
//!   `(flow)` excludes `/(flow)/checkout` and `drafts` excludes
//!   `/blog/drafts/post`.
//!
//! Matching happens on the route URL before layout-group segments are
//! stripped, so group names are still visible to bare patterns.

/// Whether `url` matches any of the exclusion patterns.
///
/// Pure predicate; pattern order does not matter and the first match wins.
///
/// # Arguments
///
/// * `url` - A URL path starting with `/`
/// * `patterns` - Exclusion patterns from the configuration
///
/// # Examples
///
/// ```ignore
/// assert!(is_excluded("/admin/users", &["/admin".to_string()]));
/// assert!(is_excluded("/(flow)/checkout", &["(flow)".to_string()]));
/// assert!(!is_excluded("/blog", &["/admin".to_string()]));
/// ```
pub fn is_excluded(url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if pattern.starts_with('/') {
            url.starts_with(pattern.as_str())
        } else {
            url.split('/').any(|segment| segment == pattern)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prefix_pattern_excludes_subtree() {
        let pats = patterns(&["/admin"]);
        assert!(is_excluded("/admin", &pats));
        assert!(is_excluded("/admin/users", &pats));
        assert!(is_excluded("/admin/users/42", &pats));
    }

    #[test]
    fn test_prefix_pattern_does_not_match_elsewhere() {
        let pats = patterns(&["/admin"]);
        assert!(!is_excluded("/blog/admin-tips", &pats));
        assert!(!is_excluded("/", &pats));
    }

    #[test]
    fn test_bare_pattern_matches_exact_segment_anywhere() {
        let pats = patterns(&["drafts"]);
        assert!(is_excluded("/drafts", &pats));
        assert!(is_excluded("/blog/drafts", &pats));
        assert!(is_excluded("/blog/drafts/post", &pats));
    }

    #[test]
    fn test_bare_pattern_requires_whole_segment() {
        let pats = patterns(&["drafts"]);
        assert!(!is_excluded("/blog/drafts-2024", &pats));
        assert!(!is_excluded("/mydrafts", &pats));
    }

    #[test]
    fn test_layout_group_pattern_matches_group_segment() {
        let pats = patterns(&["(flow)"]);
        assert!(is_excluded("/(flow)/checkout", &pats));
        assert!(!is_excluded("/checkout", &pats));
    }

    #[test]
    fn test_any_pattern_matching_excludes() {
        let pats = patterns(&["/secret", "drafts"]);
        assert!(is_excluded("/secret/page", &pats));
        assert!(is_excluded("/blog/drafts", &pats));
        assert!(!is_excluded("/blog/post", &pats));
    }

    #[test]
    fn test_empty_pattern_list_excludes_nothing() {
        assert!(!is_excluded("/anything", &[]));
    }
}
