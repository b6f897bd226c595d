//! Entry URL normalization.
//!
//! Optional transform applied between reading the sitemap and rendering the
//! note. Two independent knobs, both off by default:
//!
//! - strip a legacy leading path prefix (whole segments only)
//! - rebase onto a configured site URL, keeping path, query, and fragment
//!
//! An entry URL that does not parse as an absolute URL is carried through
//! unchanged.

use super::SitemapDocument;
use crate::debug;
use url::Url;

/// Normalization knobs, borrowed from the run configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOpts<'a> {
    /// Base URL entries are rebased onto.
    pub site_url: Option<&'a Url>,
    /// Leading path prefix to remove, in `/segment` form.
    pub strip_prefix: Option<&'a str>,
}

impl NormalizeOpts<'_> {
    fn is_noop(&self) -> bool {
        self.site_url.is_none() && self.strip_prefix.is_none()
    }
}

/// Rewrite every entry URL in place. With no knobs set this is a no-op and
/// URLs stay byte-for-byte as read.
pub fn normalize_document(document: &mut SitemapDocument, opts: &NormalizeOpts<'_>) {
    if opts.is_noop() {
        return;
    }
    for entry in &mut document.entries {
        let normalized = normalize_entry_url(&entry.url, opts);
        if normalized != entry.url {
            debug!("sitemap"; "rewrote {} -> {}", entry.url, normalized);
            entry.url = normalized;
        }
    }
}

/// Normalize one entry URL. Returns the input unchanged when it is not an
/// absolute URL or when rebasing fails.
pub fn normalize_entry_url(raw: &str, opts: &NormalizeOpts<'_>) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    let path = match opts.strip_prefix {
        Some(prefix) => strip_path_prefix(parsed.path(), prefix),
        None => parsed.path().to_string(),
    };

    match opts.site_url {
        Some(base) => {
            let mut target = path;
            if let Some(query) = parsed.query() {
                target.push('?');
                target.push_str(query);
            }
            if let Some(fragment) = parsed.fragment() {
                target.push('#');
                target.push_str(fragment);
            }
            match base.join(&target) {
                Ok(rebased) => rebased.to_string(),
                Err(_) => raw.to_string(),
            }
        }
        None => {
            let mut stripped = parsed;
            stripped.set_path(&path);
            stripped.to_string()
        }
    }
}

/// Remove `prefix` from the front of `path`, but only when it covers whole
/// segments: the prefix must be followed by `/` or end the path. A path
/// that becomes empty collapses to the root.
fn strip_path_prefix(path: &str, prefix: &str) -> String {
    match path.strip_prefix(prefix) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::SitemapEntry;

    fn opts<'a>(site_url: Option<&'a Url>, strip_prefix: Option<&'a str>) -> NormalizeOpts<'a> {
        NormalizeOpts {
            site_url,
            strip_prefix,
        }
    }

    #[test]
    fn test_noop_when_unconfigured() {
        let mut doc = SitemapDocument {
            entries: vec![SitemapEntry {
                url: "https://bdelanghe.github.io/fold-engine/about/".to_string(),
                lastmod: "2024-01-01".to_string(),
            }],
        };
        normalize_document(&mut doc, &NormalizeOpts::default());
        assert_eq!(doc.entries[0].url, "https://bdelanghe.github.io/fold-engine/about/");
    }

    #[test]
    fn test_rebase_onto_site_url() {
        let base = Url::parse("https://unfold.example").unwrap();
        let out = normalize_entry_url(
            "https://bdelanghe.github.io/about/",
            &opts(Some(&base), None),
        );
        assert_eq!(out, "https://unfold.example/about/");
    }

    #[test]
    fn test_strip_prefix_then_rebase() {
        let base = Url::parse("https://unfold.example").unwrap();
        let out = normalize_entry_url(
            "https://bdelanghe.github.io/fold-engine/about/",
            &opts(Some(&base), Some("/fold-engine")),
        );
        assert_eq!(out, "https://unfold.example/about/");
    }

    #[test]
    fn test_fully_stripped_path_collapses_to_root() {
        let base = Url::parse("https://unfold.example").unwrap();
        let out = normalize_entry_url(
            "https://bdelanghe.github.io/fold-engine",
            &opts(Some(&base), Some("/fold-engine")),
        );
        assert_eq!(out, "https://unfold.example/");
    }

    #[test]
    fn test_prefix_only_strips_whole_segments() {
        // /fold-engineering must not lose its /fold-engine head
        assert_eq!(
            strip_path_prefix("/fold-engineering/about/", "/fold-engine"),
            "/fold-engineering/about/"
        );
        assert_eq!(
            strip_path_prefix("/fold-engine/about/", "/fold-engine"),
            "/about/"
        );
        assert_eq!(strip_path_prefix("/fold-engine", "/fold-engine"), "/");
        assert_eq!(strip_path_prefix("/other/", "/fold-engine"), "/other/");
    }

    #[test]
    fn test_strip_prefix_without_rebase_keeps_origin() {
        let out = normalize_entry_url(
            "https://bdelanghe.github.io/fold-engine/about/",
            &opts(None, Some("/fold-engine")),
        );
        assert_eq!(out, "https://bdelanghe.github.io/about/");
    }

    #[test]
    fn test_rebase_preserves_query_and_fragment() {
        let base = Url::parse("https://unfold.example").unwrap();
        let out = normalize_entry_url(
            "https://old.example/posts/?page=2#latest",
            &opts(Some(&base), None),
        );
        assert_eq!(out, "https://unfold.example/posts/?page=2#latest");
    }

    #[test]
    fn test_non_absolute_url_passes_through() {
        let base = Url::parse("https://unfold.example").unwrap();
        let out = normalize_entry_url("/relative/only/", &opts(Some(&base), Some("/relative")));
        assert_eq!(out, "/relative/only/");
    }
}
