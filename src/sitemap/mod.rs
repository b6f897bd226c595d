//! Sitemap parsing.
//!
//! Reads a sitemap.xml file and extracts (URL, last-modified) pairs for the
//! vault note.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```
//!
//! Elements are resolved within the sitemap protocol namespace; documents
//! using a different namespace (or none) yield zero entries. A `url` element
//! missing either child is skipped, not an error.

pub mod normalize;

use crate::log;
use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SITEMAP_NS: &[u8] = b"http://www.sitemaps.org/schemas/sitemap/0.9";

/// Sitemap reading errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read sitemap `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed sitemap XML at byte {position}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
}

/// One `<url>` entry: canonical URL plus its last-modified marker.
///
/// Both fields are opaque text; `lastmod` is carried verbatim and never
/// parsed into a date type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub url: String,
    pub lastmod: String,
}

/// All entries of one sitemap, in document order.
#[derive(Debug, Default)]
pub struct SitemapDocument {
    pub entries: Vec<SitemapEntry>,
}

/// Read and parse a sitemap file.
pub fn read_sitemap(path: &Path) -> Result<SitemapDocument, ParseError> {
    let xml = fs::read_to_string(path).map_err(|e| ParseError::Io(path.to_path_buf(), e))?;
    let (document, skipped) = parse_sitemap(&xml)?;

    log!("sitemap"; "{} page{} found in {}",
        document.entries.len(),
        if document.entries.len() == 1 { "" } else { "s" },
        path.display());
    if skipped > 0 {
        log!("sitemap"; "skipped {} entr{} missing loc or lastmod",
            skipped, if skipped == 1 { "y" } else { "ies" });
    }

    Ok(document)
}

/// Which child of a `<url>` element is currently being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    Lastmod,
}

/// Children of the `<url>` element seen so far.
///
/// `Some("")` means the child was present but empty, which still counts as
/// present. When a child repeats, the first occurrence wins.
#[derive(Default)]
struct PendingEntry {
    loc: Option<String>,
    lastmod: Option<String>,
}

impl PendingEntry {
    fn field(&self, field: Field) -> &Option<String> {
        match field {
            Field::Loc => &self.loc,
            Field::Lastmod => &self.lastmod,
        }
    }

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Loc => self.loc = Some(value),
            Field::Lastmod => self.lastmod = Some(value),
        }
    }

    fn finish(self) -> Option<SitemapEntry> {
        Some(SitemapEntry {
            url: self.loc?,
            lastmod: self.lastmod?,
        })
    }
}

/// Parse sitemap XML into entries plus a count of skipped `<url>` elements.
///
/// Only `url` elements that are direct children of the document root are
/// considered, and only when bound to the sitemap namespace (a default
/// `xmlns` and a `xmlns:prefix` declaration resolve the same way).
fn parse_sitemap(xml: &str) -> Result<(SitemapDocument, usize), ParseError> {
    let mut reader = NsReader::from_str(xml);

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    let mut depth = 0usize;
    let mut pending: Option<PendingEntry> = None;
    // Text accumulator for the child element currently being read
    let mut capture: Option<(Field, String)> = None;

    loop {
        let (ns, event) = match reader.read_resolved_event() {
            Ok(resolved) => resolved,
            Err(e) => return Err(xml_error(&reader, e)),
        };

        match event {
            Event::Start(e) => {
                depth += 1;
                if !in_sitemap_ns(&ns) {
                    continue;
                }
                match depth {
                    2 if e.local_name().as_ref() == b"url" => {
                        pending = Some(PendingEntry::default());
                    }
                    3 => {
                        if let Some(p) = &pending
                            && let Some(field) = child_field(e.local_name().as_ref())
                            && p.field(field).is_none()
                        {
                            capture = Some((field, String::new()));
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                // Self-closing element: same as start+end with no text
                if !in_sitemap_ns(&ns) {
                    continue;
                }
                if depth + 1 == 2 && e.local_name().as_ref() == b"url" {
                    // A url with no children is missing both loc and lastmod
                    skipped += 1;
                } else if depth + 1 == 3
                    && let Some(p) = &mut pending
                    && let Some(field) = child_field(e.local_name().as_ref())
                    && p.field(field).is_none()
                {
                    p.set(field, String::new());
                }
            }
            Event::Text(e) => {
                if let Some((_, buf)) = &mut capture {
                    let text = e.decode().map_err(|e| xml_error(&reader, e.into()))?;
                    buf.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some((_, buf)) = &mut capture {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|e| xml_error(&reader, e.into()))?;
                    buf.push_str(&text);
                }
            }
            Event::GeneralRef(e) => {
                // Entity references arrive as separate events
                if let Some((_, buf)) = &mut capture {
                    let resolved = e
                        .resolve_char_ref()
                        .map_err(|e| xml_error(&reader, e.into()))?;
                    match resolved {
                        Some(ch) => buf.push(ch),
                        None => {
                            if let Some(ch) = predefined_entity(e.as_ref()) {
                                buf.push(ch);
                            }
                        }
                    }
                }
            }
            Event::End(_) => {
                match depth {
                    3 => {
                        if let (Some(p), Some((field, buf))) = (&mut pending, capture.take()) {
                            p.set(field, buf.trim().to_string());
                        }
                    }
                    2 => {
                        if let Some(p) = pending.take() {
                            match p.finish() {
                                Some(entry) => entries.push(entry),
                                None => skipped += 1,
                            }
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((SitemapDocument { entries }, skipped))
}

fn in_sitemap_ns(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(n)) if *n == SITEMAP_NS)
}

fn child_field(local_name: &[u8]) -> Option<Field> {
    match local_name {
        b"loc" => Some(Field::Loc),
        b"lastmod" => Some(Field::Lastmod),
        _ => None,
    }
}

/// The five predefined XML entities.
fn predefined_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"apos" => Some('\''),
        b"quot" => Some('"'),
        _ => None,
    }
}

fn xml_error(reader: &NsReader<&[u8]>, source: quick_xml::Error) -> ParseError {
    ParseError::Xml {
        position: reader.error_position(),
        source,
    }
}
