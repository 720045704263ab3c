//! Alternate feed link discovery.
//!
//! Finds the feed URLs a page advertises, using two independent scans:
//!
//! - **Structured**: the document is parsed ([`parse_document`]) and its
//!   `<link rel="alternate">` relations with a feed MIME type are collected.
//! - **Raw text**: the markup is pattern-scanned for the same kind of tag,
//!   which also catches links the parser never reaches.
//!
//! [`find_alternate_links`] runs both and merges them, keeping discovery
//! order and dropping duplicates. Nothing here returns an error to the
//! caller: a document without feed links just yields an empty list.
//!
//! # Example
//!
//! ```
//! use feedmeta::discovery::find_alternate_links;
//!
//! let html = br#"<link rel="alternate" type="application/rss+xml" href="/rss">"#;
//! let links = find_alternate_links(html, Some("https://example.com/"));
//! assert_eq!(links, vec!["https://example.com/rss"]);
//! ```

mod document;
mod raw;

use std::collections::HashSet;

use thiserror::Error;

use crate::config::ExtractorConfig;
use crate::util::decode_document;

pub use document::{parse_document, DocumentKind, DocumentLink, ParsedDocument};

/// MIME types that identify a machine-readable feed.
pub const FEED_TYPES: [&str; 4] = [
    "application/rss+xml",
    "application/atom+xml",
    "application/rdf+xml",
    "application/feed+json",
];

/// Reasons a document could not be parsed structurally.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The document has no content
    #[error("document is empty")]
    Empty,
    /// The document looks like a feed but the feed parser rejected it
    #[error("feed could not be parsed: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),
}

/// Finds alternate feed links, optionally accepting extra MIME types.
///
/// The free functions in this module use `AlternateLinkFinder::default()`.
#[derive(Debug, Clone, Default)]
pub struct AlternateLinkFinder {
    extra_types: Vec<String>,
}

impl AlternateLinkFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also accept these MIME types as feed types.
    pub fn with_extra_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra_types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::with_extra_types(config.extra_feed_types.iter().cloned())
    }

    /// Whether a `type` attribute names a feed. Parameters such as
    /// `; charset=utf-8` are ignored and comparison is case-insensitive.
    pub fn is_feed_type(&self, mime_type: &str) -> bool {
        let essence = mime_type.split(';').next().unwrap_or("").trim();
        FEED_TYPES.iter().any(|t| t.eq_ignore_ascii_case(essence))
            || self.extra_types.iter().any(|t| t.trim().eq_ignore_ascii_case(essence))
    }

    /// Structured scan: feed hrefs among the document's alternate links, in
    /// document order.
    pub fn search_alternate_links(&self, document: &ParsedDocument) -> Vec<String> {
        document
            .links
            .iter()
            .filter(|link| link.has_rel("alternate"))
            .filter(|link| link.mime_type.as_deref().is_some_and(|t| self.is_feed_type(t)))
            .map(|link| link.href.clone())
            .collect()
    }

    /// Raw-text scan: feed hrefs found by pattern matching the document
    /// bytes, resolved against `base_url`, in order of appearance.
    pub fn search_links_url(&self, bytes: &[u8], base_url: Option<&str>) -> Vec<String> {
        let text = decode_document(bytes);
        raw::scan_link_tags(&text, base_url, |t| self.is_feed_type(t))
    }

    /// Runs the structured scan, then the raw-text scan, and merges the
    /// results: first occurrence wins, order is preserved.
    ///
    /// If the document cannot be parsed, only the raw-text scan is used.
    pub fn find_alternate_links(&self, bytes: &[u8], base_url: Option<&str>) -> Vec<String> {
        let text = decode_document(bytes);

        let document = match document::parse_text(&text, base_url) {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::debug!(error = %e, "Structured parse failed, using raw scan only");
                None
            }
        };
        self.merge_scans(document.as_ref(), &text, base_url)
    }

    /// Like [`find_alternate_links`](Self::find_alternate_links), for callers
    /// that already hold the parsed form of `bytes` (`None` if parsing failed).
    pub fn find_alternate_links_in(
        &self,
        document: Option<&ParsedDocument>,
        bytes: &[u8],
        base_url: Option<&str>,
    ) -> Vec<String> {
        let text = decode_document(bytes);
        self.merge_scans(document, &text, base_url)
    }

    fn merge_scans(
        &self,
        document: Option<&ParsedDocument>,
        text: &str,
        base_url: Option<&str>,
    ) -> Vec<String> {
        let structured = document
            .map(|d| self.search_alternate_links(d))
            .unwrap_or_default();
        let raw = raw::scan_link_tags(text, base_url, |t| self.is_feed_type(t));

        tracing::debug!(
            structured = structured.len(),
            raw = raw.len(),
            "Alternate link scans finished"
        );
        merge_unique([structured, raw])
    }
}

/// Structured scan with the default feed types.
pub fn search_alternate_links(document: &ParsedDocument) -> Vec<String> {
    AlternateLinkFinder::default().search_alternate_links(document)
}

/// Raw-text scan with the default feed types.
pub fn search_links_url(bytes: &[u8], base_url: Option<&str>) -> Vec<String> {
    AlternateLinkFinder::default().search_links_url(bytes, base_url)
}

/// Both scans, merged, with the default feed types.
pub fn find_alternate_links(bytes: &[u8], base_url: Option<&str>) -> Vec<String> {
    AlternateLinkFinder::default().find_alternate_links(bytes, base_url)
}

/// Concatenates scan results, keeping only the first occurrence of each URL.
fn merge_unique<I>(scans: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for url in scans.into_iter().flatten() {
        if seen.insert(url.clone()) {
            merged.push(url);
        }
    }
    merged
}
