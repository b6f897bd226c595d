//! Vaultmap - export a sitemap.xml as a markdown note for a knowledge-base vault.

mod cli;
mod config;
mod logger;
mod note;
mod sitemap;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::Config;
use sitemap::normalize::{NormalizeOpts, normalize_document};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;
    debug!("config"; "input: {}", config.input.display());
    debug!("config"; "output: {}", config.output.display());
    if let Some(site_url) = &config.site_url {
        debug!("config"; "site url: {site_url}");
    }
    if let Some(prefix) = &config.strip_prefix {
        debug!("config"; "strip prefix: {prefix}");
    }

    let mut document = sitemap::read_sitemap(&config.input)?;
    normalize_document(
        &mut document,
        &NormalizeOpts {
            site_url: config.site_url.as_ref(),
            strip_prefix: config.strip_prefix.as_deref(),
        },
    );
    note::write_note(&document, &config.output)?;

    Ok(())
}
