//! Integration tests for alternate feed link discovery over saved pages.
//!
//! Fixtures live in `tests/fixtures/` and are read as raw bytes, the way a
//! fetcher would hand them over.

use feedmeta::discovery::{
    find_alternate_links, parse_document, search_alternate_links, search_links_url,
    AlternateLinkFinder, DocumentKind,
};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> Vec<u8> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("missing fixture {}: {e}", path.display()))
}

const SMP_LINKS: [&str; 4] = [
    "http://www.smp.no/?service=rss",
    "http://www.smp.no/?service=rss&t=0",
    "http://www.smp.no/nyheter/?service=rss",
    "http://www.smp.no/kultur/?service=rss",
];

// ============================================================================
// Structured scan
// ============================================================================

#[test]
fn test_search_alternate_links_bbc() {
    let document = parse_document(&fixture("bbc_homepage.html"), None).unwrap();
    assert_eq!(document.kind, DocumentKind::Html);
    assert_eq!(document.title.as_deref(), Some("BBC - Homepage"));
    assert_eq!(
        search_alternate_links(&document),
        vec!["http://newsrss.bbc.co.uk/rss/newsonline_world_edition/front_page/rss.xml"]
    );
}

#[test]
fn test_search_alternate_links_newsweek() {
    let document = parse_document(&fixture("newsweek_homepage.html"), None).unwrap();
    assert_eq!(
        search_alternate_links(&document),
        vec!["http://feeds.newsweek.com/newsweek/TopNews"]
    );
}

#[test]
fn test_search_alternate_links_no_feeds() {
    let document = parse_document(&fixture("no_feeds.html"), None).unwrap();
    assert!(search_alternate_links(&document).is_empty());
}

// ============================================================================
// Both scans agree
// ============================================================================

#[test]
fn test_search_alternate_links_double_function() {
    let html = fixture("smp.no.html");

    let document = parse_document(&html, None).unwrap();
    assert_eq!(search_alternate_links(&document), SMP_LINKS.to_vec());

    let links = search_links_url(&html, Some("http://www.smp.no/"));
    assert_eq!(links, SMP_LINKS.to_vec());
}

#[test]
fn test_merged_scans_do_not_duplicate() {
    let html = fixture("smp.no.html");
    assert_eq!(
        find_alternate_links(&html, Some("http://www.smp.no/")),
        SMP_LINKS.to_vec()
    );
}

#[test]
fn test_relative_links_resolve_identically_in_both_scans() {
    let html = br#"<html><head>
        <link rel="alternate" type="application/rss+xml" href="?service=rss">
        <link rel="alternate" type="application/rss+xml" href="?service=rss&amp;t=0">
        <link rel="alternate" type="application/rss+xml" href="/nyheter/?service=rss">
        <link rel="alternate" type="application/rss+xml" href="kultur/?service=rss">
    </head><body></body></html>"#;
    let base = Some("http://www.smp.no/");

    let document = parse_document(html, base).unwrap();
    assert_eq!(search_alternate_links(&document), SMP_LINKS.to_vec());
    assert_eq!(search_links_url(html, base), SMP_LINKS.to_vec());
    assert_eq!(find_alternate_links(html, base), SMP_LINKS.to_vec());
}

// ============================================================================
// Merge behaviour
// ============================================================================

#[test]
fn test_same_url_from_both_scans_appears_once() {
    let html = fixture("bbc_homepage.html");
    let links = find_alternate_links(&html, Some("http://www.bbc.co.uk/"));
    assert_eq!(
        links,
        vec!["http://newsrss.bbc.co.uk/rss/newsonline_world_edition/front_page/rss.xml"]
    );
}

#[test]
fn test_raw_only_links_are_appended_after_structured() {
    let html = br#"<html><head>
        <link rel="alternate" type="application/atom+xml" href="/atom.xml">
        <script>
          document.write('<link rel="alternate" type="application/rss+xml" href="/late.rss">');
        </script>
    </head><body></body></html>"#;
    let base = Some("https://blog.example.org/");

    let document = parse_document(html, base).unwrap();
    assert_eq!(
        search_alternate_links(&document),
        vec!["https://blog.example.org/atom.xml"]
    );
    assert_eq!(
        find_alternate_links(html, base),
        vec!["https://blog.example.org/atom.xml", "https://blog.example.org/late.rss"]
    );
}

#[test]
fn test_no_feed_links_is_empty_not_error() {
    let html = fixture("no_feeds.html");
    assert!(find_alternate_links(&html, Some("https://example.com/")).is_empty());
    assert!(search_links_url(&html, Some("https://example.com/")).is_empty());
}

#[test]
fn test_broken_feed_falls_back_to_raw_scan() {
    let broken = br#"<?xml version="1.0"?>
<rss version="2.0"><channel>
<atom:link xmlns:atom="http://www.w3.org/2005/Atom" rel="self" type="application/rss+xml" href="/rss"/>
<link rel="alternate" type="application/atom+xml" href="/atom"/>
<item><title>unterminated"#;
    let links = find_alternate_links(broken, Some("https://example.com/"));
    assert_eq!(links, vec!["https://example.com/atom"]);
}

#[test]
fn test_atom_feed_advertising_rss_alternate() {
    let atom = br#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Blog</title>
  <id>urn:example:blog</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <link href="https://example.com/" rel="alternate" type="text/html"/>
  <link href="https://example.com/feed.atom" rel="self" type="application/atom+xml"/>
  <link href="https://example.com/feed.rss" rel="alternate" type="application/rss+xml"/>
</feed>"#;
    let document = parse_document(atom, None).unwrap();
    assert_eq!(document.kind, DocumentKind::Feed);
    assert_eq!(
        find_alternate_links(atom, None),
        vec!["https://example.com/feed.rss"]
    );
}

#[test]
fn test_finder_is_shareable_across_threads() {
    let finder = std::sync::Arc::new(AlternateLinkFinder::new());
    let html = std::sync::Arc::new(fixture("smp.no.html"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let finder = finder.clone();
            let html = html.clone();
            std::thread::spawn(move || finder.find_alternate_links(&html, Some("http://www.smp.no/")))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), SMP_LINKS.to_vec());
    }
}
