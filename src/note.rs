//! Vault note generation.
//!
//! Renders a parsed sitemap as a markdown note: a heading, a short
//! explanatory paragraph, and a two-column table linking every page. The
//! note is regenerated wholesale on every run; any existing file at the
//! output path is overwritten.

use crate::log;
use crate::sitemap::SitemapDocument;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const NOTE_TITLE: &str = "# Fold Engine Sitemap";
const NOTE_INTRO: &str = "This note captures every canonical page from the sitemap so we can build individual vault notes for each URL.";
const TABLE_HEADER: &str = "| Page | Last modified |";
const TABLE_DIVIDER: &str = "| --- | --- |";

/// Note writing errors
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create vault directory `{0}`")]
    Dir(PathBuf, #[source] std::io::Error),

    #[error("failed to write vault note `{0}`")]
    File(PathBuf, #[source] std::io::Error),
}

/// Render the note and write it to `path`, creating parent directories as
/// needed.
pub fn write_note(document: &SitemapDocument, path: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| WriteError::Dir(parent.to_path_buf(), e))?;
    }

    let note = render_note(document);
    fs::write(path, &note).map_err(|e| WriteError::File(path.to_path_buf(), e))?;

    log!("export"; "{}", path.display());
    Ok(())
}

/// Render the full markdown note. Pure function of the document, so two
/// runs over the same sitemap produce byte-identical output.
fn render_note(document: &SitemapDocument) -> String {
    let mut note = String::with_capacity(256 + document.entries.len() * 96);

    note.push_str(NOTE_TITLE);
    note.push_str("\n\n");
    note.push_str(NOTE_INTRO);
    note.push_str("\n\n");
    note.push_str(TABLE_HEADER);
    note.push('\n');
    note.push_str(TABLE_DIVIDER);
    note.push('\n');

    for entry in &document.entries {
        note.push_str("| [");
        note.push_str(&anchor_label(&entry.url));
        note.push_str("](");
        note.push_str(&entry.url);
        note.push_str(") | ");
        note.push_str(&entry.lastmod);
        note.push_str(" |\n");
    }

    note
}

/// Derive the link display label from a URL.
///
/// Splits on `/` and takes the segment immediately before the trailing
/// slash. When that segment is empty (no clear folder segment), falls back
/// to the URL with leading and trailing slashes stripped.
fn anchor_label(url: &str) -> String {
    let segments: Vec<&str> = url.split('/').collect();
    let candidate = if segments.len() >= 2 {
        segments[segments.len() - 2]
    } else {
        ""
    };

    if candidate.is_empty() {
        url.trim_matches('/').to_string()
    } else {
        candidate.to_string()
    }
}
