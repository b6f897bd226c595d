//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Vaultmap sitemap-to-markdown exporter CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Sitemap XML file to read (default: $SITE_OUTPUT_DIR/sitemap.xml)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Markdown note to write (default: $VAULT_PATH/sitemap.md)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Base URL to rebase entry URLs onto (overrides $SITE_URL)
    #[arg(short = 'u', long, value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Leading path prefix to strip from entry URLs (e.g. /fold-engine)
    #[arg(short = 'p', long, value_name = "PATH")]
    pub strip_prefix: Option<String>,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,
}
