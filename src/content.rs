//! Post body selection and word-limited HTML truncation.
//!
//! Truncation goes through the [`ContentTruncator`] trait so callers (and
//! tests) can swap in their own strategy. A failing truncator degrades the
//! post content to an empty string instead of aborting the entry.

use thiserror::Error;

use crate::feed::{FeedEntry, FieldValue};

/// Default number of words kept in a post body.
pub const DEFAULT_POST_WORD_LIMIT: usize = 4000;

/// Appended after the last kept word when content was cut.
const ELLIPSIS: &str = " ...";

/// Elements that never take a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("truncated content is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("truncation failed: {0}")]
    Truncate(String),
}

/// Shortens post content to a number of words.
pub trait ContentTruncator: Send + Sync {
    fn truncate(&self, content: &str, max_words: usize) -> Result<String, ContentError>;
}

/// Word truncation that keeps markup intact.
///
/// Tags do not count as words. Tags still open at the cut point are closed
/// in reverse order after the ellipsis.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlWordTruncator;

impl ContentTruncator for HtmlWordTruncator {
    fn truncate(&self, content: &str, max_words: usize) -> Result<String, ContentError> {
        Ok(truncate_html_words(content, max_words))
    }
}

/// Finds the body of a post and truncates it to `max_words`.
///
/// The body is the first of `content[0].value`, `description` and
/// `summary` that holds text. Returns an empty string if the truncator
/// fails.
pub fn find_post_content(
    entry: &FeedEntry,
    truncator: &dyn ContentTruncator,
    max_words: usize,
) -> String {
    let content = first_content_value(entry)
        .or_else(|| entry.text("description").map(|s| s.into_owned()))
        .or_else(|| entry.text("summary").map(|s| s.into_owned()))
        .unwrap_or_default();

    match truncator.truncate(&content, max_words) {
        Ok(truncated) => truncated,
        Err(e) => {
            tracing::debug!(error = %e, "Post content truncation failed, dropping content");
            String::new()
        }
    }
}

fn first_content_value(entry: &FeedEntry) -> Option<String> {
    entry
        .get("content")
        .and_then(FieldValue::as_list)
        .and_then(|items| items.first())
        .and_then(FieldValue::as_map)
        .and_then(|block| block.get("value"))
        .and_then(FieldValue::as_text)
        .map(|s| s.into_owned())
}

/// Truncates HTML to `max_words` words of text.
///
/// A word is a run of characters that is neither whitespace nor markup.
/// Content with at most `max_words` words is returned unchanged.
pub fn truncate_html_words(html: &str, max_words: usize) -> String {
    if max_words == 0 {
        return String::new();
    }

    let mut open_tags: Vec<String> = Vec::new();
    let mut words = 0;
    let mut in_word = false;
    let mut cut_at = None;
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];

        if rest.starts_with('<') {
            let Some(close) = rest.find('>') else {
                break;
            };
            track_tag(&rest[1..close], &mut open_tags);
            in_word = false;
            pos += close + 1;
            continue;
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
            if words > max_words {
                cut_at = Some(pos);
                break;
            }
        }
        pos += c.len_utf8();
    }

    let Some(cut_at) = cut_at else {
        return html.to_string();
    };

    let mut out = html[..cut_at].trim_end().to_string();
    out.push_str(ELLIPSIS);
    for tag in open_tags.iter().rev() {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
    out
}

/// Updates the open-tag stack with the tag body between `<` and `>`.
fn track_tag(tag: &str, open_tags: &mut Vec<String>) {
    let tag = tag.trim();
    if tag.starts_with('!') || tag.starts_with('?') {
        return;
    }

    let (closing, body) = match tag.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, tag),
    };
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() || VOID_ELEMENTS.contains(&name.as_str()) {
        return;
    }

    if closing {
        if let Some(idx) = open_tags.iter().rposition(|open| *open == name) {
            open_tags.truncate(idx);
        }
    } else if !tag.ends_with('/') {
        open_tags.push(name);
    }
}
