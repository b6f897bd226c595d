//! Run configuration resolved from CLI flags and environment variables.
//!
//! Resolution order for every knob: explicit flag, then environment
//! variable, then built-in default. Environment values are trimmed and a
//! whitespace-only value falls back to the default. Resolution is a pure
//! function of the flag set and an environment snapshot so it stays
//! testable without mutating the process environment.

use crate::cli::Cli;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Input directory used when neither --input nor SITE_OUTPUT_DIR is given.
const DEFAULT_SITE_OUTPUT_DIR: &str = ".unfold/site";

/// Output directory used when neither --output nor VAULT_PATH is given.
const DEFAULT_VAULT_DIR: &str = "vault";

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid site URL `{0}` (expected an absolute URL)")]
    SiteUrl(String, #[source] url::ParseError),
}

/// Effective configuration for one export run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sitemap XML file to read.
    pub input: PathBuf,
    /// Markdown note to write.
    pub output: PathBuf,
    /// Base URL entry URLs are rebased onto; `None` leaves URLs verbatim.
    pub site_url: Option<Url>,
    /// Leading path prefix stripped from entry URLs before rebasing.
    /// Normalized to a single leading slash and no trailing slash.
    pub strip_prefix: Option<String>,
}

/// Environment variables read at startup.
#[derive(Debug, Default)]
struct EnvSnapshot {
    site_output_dir: Option<String>,
    vault_path: Option<String>,
    site_url: Option<String>,
}

impl EnvSnapshot {
    fn capture() -> Self {
        Self {
            site_output_dir: std::env::var("SITE_OUTPUT_DIR").ok(),
            vault_path: std::env::var("VAULT_PATH").ok(),
            site_url: std::env::var("SITE_URL").ok(),
        }
    }

    /// Trimmed value of a variable, with whitespace-only treated as unset.
    fn get(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

impl Config {
    /// Load configuration from CLI flags and the process environment.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, &EnvSnapshot::capture())
    }

    fn resolve(cli: &Cli, env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let input = match &cli.input {
            Some(path) => expand_path(path),
            None => {
                let dir = EnvSnapshot::get(&env.site_output_dir).unwrap_or(DEFAULT_SITE_OUTPUT_DIR);
                expand_path(Path::new(dir)).join("sitemap.xml")
            }
        };

        let output = match &cli.output {
            Some(path) => expand_path(path),
            None => {
                let dir = EnvSnapshot::get(&env.vault_path).unwrap_or(DEFAULT_VAULT_DIR);
                expand_path(Path::new(dir)).join("sitemap.md")
            }
        };

        let site_url = cli
            .site_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| EnvSnapshot::get(&env.site_url))
            .map(|raw| Url::parse(raw).map_err(|e| ConfigError::SiteUrl(raw.to_string(), e)))
            .transpose()?;

        let strip_prefix = cli.strip_prefix.as_deref().and_then(normalize_prefix);

        Ok(Self {
            input,
            output,
            site_url,
            strip_prefix,
        })
    }
}

/// Expand a leading `~` in a path.
fn expand_path(path: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(path.to_str().unwrap_or_default()).into_owned();
    PathBuf::from(expanded)
}

/// Normalize a strip prefix to `/segment[/segment...]` form.
///
/// Empty after trimming means the flag was given without a usable value
/// and is treated as unset.
fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("vaultmap").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_flags_or_env() {
        let config = Config::resolve(&cli(&[]), &EnvSnapshot::default()).unwrap();
        assert_eq!(config.input, Path::new(".unfold/site/sitemap.xml"));
        assert_eq!(config.output, Path::new("vault/sitemap.md"));
        assert!(config.site_url.is_none());
        assert!(config.strip_prefix.is_none());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = EnvSnapshot {
            site_output_dir: Some("_site".to_string()),
            vault_path: Some("notes".to_string()),
            site_url: Some("https://unfold.example".to_string()),
        };
        let config = Config::resolve(&cli(&[]), &env).unwrap();
        assert_eq!(config.input, Path::new("_site/sitemap.xml"));
        assert_eq!(config.output, Path::new("notes/sitemap.md"));
        assert_eq!(
            config.site_url.unwrap().as_str(),
            "https://unfold.example/"
        );
    }

    #[test]
    fn test_flags_win_over_env() {
        let env = EnvSnapshot {
            site_output_dir: Some("_site".to_string()),
            vault_path: Some("notes".to_string()),
            site_url: Some("https://env.example".to_string()),
        };
        let config = Config::resolve(
            &cli(&[
                "--input",
                "other/sitemap.xml",
                "--output",
                "out/map.md",
                "--site-url",
                "https://flag.example",
            ]),
            &env,
        )
        .unwrap();
        assert_eq!(config.input, Path::new("other/sitemap.xml"));
        assert_eq!(config.output, Path::new("out/map.md"));
        assert_eq!(config.site_url.unwrap().as_str(), "https://flag.example/");
    }

    #[test]
    fn test_whitespace_env_falls_back_to_default() {
        let env = EnvSnapshot {
            site_output_dir: Some("   ".to_string()),
            vault_path: Some(String::new()),
            site_url: None,
        };
        let config = Config::resolve(&cli(&[]), &env).unwrap();
        assert_eq!(config.input, Path::new(".unfold/site/sitemap.xml"));
        assert_eq!(config.output, Path::new("vault/sitemap.md"));
    }

    #[test]
    fn test_invalid_site_url_is_rejected() {
        let env = EnvSnapshot {
            site_url: Some("not a url".to_string()),
            ..EnvSnapshot::default()
        };
        let err = Config::resolve(&cli(&[]), &env).unwrap_err();
        assert!(matches!(err, ConfigError::SiteUrl(value, _) if value == "not a url"));
    }

    #[test]
    fn test_relative_site_url_is_rejected() {
        // url::Url::parse only accepts absolute URLs
        let err = Config::resolve(&cli(&["--site-url", "/just/a/path"]), &EnvSnapshot::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::SiteUrl(..)));
    }

    #[test]
    fn test_strip_prefix_normalization() {
        assert_eq!(
            normalize_prefix("fold-engine/"),
            Some("/fold-engine".to_string())
        );
        assert_eq!(
            normalize_prefix("/fold-engine"),
            Some("/fold-engine".to_string())
        );
        assert_eq!(normalize_prefix("/a/b/"), Some("/a/b".to_string()));
        assert_eq!(normalize_prefix("  "), None);
        assert_eq!(normalize_prefix("///"), None);
    }

    #[test]
    fn test_tilde_expansion() {
        let config = Config::resolve(&cli(&["--input", "~/sitemap.xml"]), &EnvSnapshot::default())
            .unwrap();
        assert!(!config.input.starts_with("~"));
        assert!(config.input.ends_with("sitemap.xml"));
    }
}
