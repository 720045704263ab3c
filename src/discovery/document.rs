use scraper::{ElementRef, Html};

use super::DiscoveryError;
use crate::util::{decode_document, resolve_url, strip_control_chars};

/// How much of the document head is inspected to tell feeds from HTML.
const SNIFF_LEN: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// An RSS, Atom or RDF feed.
    Feed,
    /// Anything else, parsed leniently as HTML.
    Html,
}

/// A `<link>` relation found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    /// Raw `rel` attribute (may hold several space separated tokens)
    pub rel: Option<String>,
    /// Value of the `type` attribute
    pub mime_type: Option<String>,
    /// Target URL, resolved against the base URL when one was given
    pub href: String,
    pub title: Option<String>,
}

impl DocumentLink {
    /// Whether `rel` contains the given token (ASCII case-insensitive).
    pub fn has_rel(&self, token: &str) -> bool {
        self.rel
            .as_deref()
            .is_some_and(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
    }
}

/// Structured form of a fetched document: its kind, title and link relations
/// in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub kind: DocumentKind,
    pub title: Option<String>,
    pub links: Vec<DocumentLink>,
}

/// Parses raw document bytes into a [`ParsedDocument`].
///
/// Bytes are decoded leniently first. Documents whose root element is
/// `<rss>`, `<feed>` or `<rdf:RDF>` go through `feed-rs`; everything else is
/// parsed as HTML, which always succeeds.
///
/// # Errors
///
/// - [`DiscoveryError::Empty`] if the document has no content
/// - [`DiscoveryError::Feed`] if it looks like a feed but cannot be parsed
pub fn parse_document(
    bytes: &[u8],
    base_url: Option<&str>,
) -> Result<ParsedDocument, DiscoveryError> {
    let text = decode_document(bytes);
    parse_text(&text, base_url)
}

pub(super) fn parse_text(
    text: &str,
    base_url: Option<&str>,
) -> Result<ParsedDocument, DiscoveryError> {
    let trimmed = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return Err(DiscoveryError::Empty);
    }

    if looks_like_feed(trimmed) {
        parse_feed_links(trimmed, base_url)
    } else {
        Ok(parse_html_links(trimmed, base_url))
    }
}

/// Decides from the document head whether the root element is a feed.
fn looks_like_feed(text: &str) -> bool {
    let head: String = text.chars().take(SNIFF_LEN).collect::<String>().to_ascii_lowercase();

    let feed_at = ["<rss", "<feed", "<rdf:rdf"]
        .iter()
        .filter_map(|marker| head.find(marker))
        .min();
    let html_at = ["<html", "<!doctype html"]
        .iter()
        .filter_map(|marker| head.find(marker))
        .min();

    match (feed_at, html_at) {
        (Some(feed), Some(html)) => feed < html,
        (Some(_), None) => true,
        _ => false,
    }
}

fn parse_feed_links(text: &str, base_url: Option<&str>) -> Result<ParsedDocument, DiscoveryError> {
    let feed = feed_rs::parser::parse(text.as_bytes())?;

    let title = feed
        .title
        .map(|t| strip_control_chars(t.content.trim()).into_owned());
    let links = feed
        .links
        .into_iter()
        .filter(|link| !link.href.trim().is_empty())
        .map(|link| DocumentLink {
            href: resolve_url(&link.href, base_url),
            rel: link.rel,
            mime_type: link.media_type,
            title: link.title,
        })
        .collect();

    Ok(ParsedDocument {
        kind: DocumentKind::Feed,
        title,
        links,
    })
}

fn parse_html_links(text: &str, base_url: Option<&str>) -> ParsedDocument {
    let document = Html::parse_document(text);
    let mut title = None;
    let mut links = Vec::new();

    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        let value = element.value();
        match value.name() {
            "link" => {
                let Some(href) = value.attr("href").filter(|h| !h.trim().is_empty()) else {
                    continue;
                };
                links.push(DocumentLink {
                    rel: value.attr("rel").map(str::to_owned),
                    mime_type: value.attr("type").map(str::to_owned),
                    href: resolve_url(href, base_url),
                    title: value.attr("title").map(str::to_owned),
                });
            }
            "title" if title.is_none() => {
                let text: String = element.text().collect();
                title = Some(strip_control_chars(text.trim()).into_owned());
            }
            _ => {}
        }
    }

    ParsedDocument {
        kind: DocumentKind::Html,
        title,
        links,
    }
}
