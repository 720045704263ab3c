//! Pattern scan over raw markup for `<link>` tags that advertise feeds.
//!
//! Catches feed links the structured parser never sees: tags inside
//! comments, scripts, or markup too broken to build a tree from.

use crate::util::resolve_url;

/// Scans `html` for `<link>` tags with `rel="alternate"` and a type accepted
/// by `is_feed_type`, returning resolved hrefs in order of appearance.
///
/// Uses plain string scanning (no HTML parser), but reads attributes the way
/// an HTML tokenizer does so both discovery scans agree on each href.
pub(super) fn scan_link_tags(
    html: &str,
    base_url: Option<&str>,
    is_feed_type: impl Fn(&str) -> bool,
) -> Vec<String> {
    // ASCII lowercasing keeps byte offsets aligned with the original text
    let html_lower = html.to_ascii_lowercase();
    let mut found = Vec::new();
    let mut search_from = 0;

    while let Some(link_start) = html_lower[search_from..].find("<link") {
        let abs_start = search_from + link_start;
        let remaining = &html[abs_start..];

        let Some(tag_end) = find_tag_end(remaining) else {
            break;
        };
        search_from = abs_start + tag_end + 1;

        // Skip look-alikes such as <linkset>
        let after_name = remaining[5..].chars().next();
        if !after_name.is_some_and(|c| c.is_ascii_whitespace() || c == '/' || c == '>') {
            continue;
        }

        let attrs = parse_attributes(&remaining[5..tag_end]);
        let is_alternate = attr(&attrs, "rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("alternate"))
        });
        if !is_alternate || !attr(&attrs, "type").is_some_and(|t| is_feed_type(t)) {
            continue;
        }

        if let Some(href) = attr(&attrs, "href").filter(|h| !h.trim().is_empty()) {
            let href = html_escape::decode_html_entities(href);
            tracing::trace!(href = %href, "Raw scan matched feed link");
            found.push(resolve_url(&href, base_url));
        }
    }

    found
}

/// Byte offset of the `>` closing the tag that starts `tag`, ignoring any
/// `>` inside a quoted attribute value.
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote = None;
    let mut last = ' ';

    for (i, c) in tag.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '>' => return Some(i),
            None if (c == '"' || c == '\'') && last == '=' => quote = Some(c),
            None => {}
        }
        if !c.is_ascii_whitespace() {
            last = c;
        }
    }

    None
}

/// Splits the inside of a start tag (after the tag name, before `>`) into
/// lowercased attribute names and raw values, in source order.
///
/// Unquoted values run until whitespace, so a trailing `/` stays part of the
/// value. Attributes without a value get an empty one.
fn parse_attributes(mut rest: &str) -> Vec<(String, &str)> {
    let mut attrs = Vec::new();

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c.is_ascii_whitespace() || c == '=' || c == '/')
            .map_or(rest.len(), |(i, _)| i);
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start_matches(|c: char| c.is_ascii_whitespace());

        let Some(after_eq) = rest.strip_prefix('=') else {
            attrs.push((name, ""));
            continue;
        };
        let after_eq = after_eq.trim_start_matches(|c: char| c.is_ascii_whitespace());

        let value = match after_eq.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &after_eq[1..];
                match inner.find(quote) {
                    Some(end) => {
                        rest = &inner[end + 1..];
                        &inner[..end]
                    }
                    None => {
                        rest = "";
                        inner
                    }
                }
            }
            _ => {
                let end = after_eq
                    .find(|c: char| c.is_ascii_whitespace())
                    .unwrap_or(after_eq.len());
                rest = &after_eq[end..];
                &after_eq[..end]
            }
        };
        attrs.push((name, value));
    }

    attrs
}

/// First value of the named attribute; later duplicates are ignored.
fn attr<'a>(attrs: &[(String, &'a str)], name: &str) -> Option<&'a str> {
    attrs.iter().find(|(n, _)| n == name).map(|&(_, value)| value)
}
