use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDateTime;
use feed_rs::model::{Entry, Link};
use feed_rs::parser;
use serde::Serialize;

use super::{FeedEntry, FieldValue};
use crate::config::ExtractorConfig;
use crate::content::{find_post_content, HtmlWordTruncator};
use crate::dates::date_to_datetime;
use crate::guid::get_entry_guid;
use crate::util::strip_control_chars;

/// Canonical metadata for one entry, ready to be stored by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEntry {
    pub guid: String,
    pub title: String,
    pub link: Option<String>,
    pub date: NaiveDateTime,
    pub content: String,
}

/// Parses an RSS/Atom document into field mappings, one per entry.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = parser::parse(bytes)?;
    let entries: Vec<FeedEntry> = feed.entries.into_iter().map(entry_fields).collect();
    tracing::debug!(entries = entries.len(), "Parsed feed document");
    Ok(entries)
}

/// Runs an entry through guid, date and content normalization.
pub fn normalize_entry(entry: &FeedEntry, config: &ExtractorConfig) -> NormalizedEntry {
    let title = entry
        .text("title")
        .map(|t| strip_control_chars(&t).trim().to_string())
        .unwrap_or_else(|| "Untitled".to_string());
    let link = entry
        .text("link")
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());

    NormalizedEntry {
        guid: get_entry_guid(entry),
        title,
        link,
        date: date_to_datetime(&config.date_field, entry),
        content: find_post_content(entry, &HtmlWordTruncator, config.post_word_limit),
    }
}

fn entry_fields(entry: Entry) -> FeedEntry {
    let mut fields = FeedEntry::new();

    if !entry.id.trim().is_empty() {
        fields.insert("id", entry.id.as_str());
    }
    if let Some(title) = entry.title {
        fields.insert("title", title.content);
    }
    if let Some(link) = primary_link(&entry.links) {
        fields.insert("link", link);
    }
    if !entry.links.is_empty() {
        let links: Vec<FieldValue> = entry.links.iter().map(link_fields).collect();
        fields.insert("links", links);
    }
    if let Some(summary) = entry.summary {
        fields.insert("summary", summary.content.as_str());
        fields.insert("description", summary.content);
    }
    if let Some(body) = entry.content.as_ref().and_then(|c| c.body.clone()) {
        let mut block = BTreeMap::new();
        block.insert("value".to_string(), FieldValue::Text(body));
        if let Some(content) = &entry.content {
            block.insert(
                "type".to_string(),
                FieldValue::Text(content.content_type.to_string()),
            );
        }
        fields.insert("content", vec![FieldValue::Map(block)]);
    }
    if let Some(author) = entry.authors.first() {
        fields.insert("author", author.name.as_str());
    }
    if let Some(published) = entry.published {
        fields.insert("published_parsed", published);
    }
    if let Some(updated) = entry.updated {
        fields.insert("updated_parsed", updated);
    }

    fields
}

/// The entry's permalink: the first alternate (or rel-less) link, else the
/// first non-empty link.
fn primary_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .filter(|l| !l.href.trim().is_empty())
        .find(|l| {
            l.rel
                .as_deref()
                .map_or(true, |rel| rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| links.iter().find(|l| !l.href.trim().is_empty()))
        .map(|l| l.href.trim().to_string())
}

fn link_fields(link: &Link) -> FieldValue {
    let mut map = BTreeMap::new();
    map.insert("href".to_string(), FieldValue::Text(link.href.clone()));
    if let Some(rel) = &link.rel {
        map.insert("rel".to_string(), FieldValue::Text(rel.clone()));
    }
    if let Some(media_type) = &link.media_type {
        map.insert("type".to_string(), FieldValue::Text(media_type.clone()));
    }
    FieldValue::Map(map)
}
