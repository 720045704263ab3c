//! Stable identifiers for feed entries.
use sha2::{Digest, Sha256};

use crate::feed::FeedEntry;

/// Fields that carry a feed-provided identifier, in order of preference.
const ID_FIELDS: [&str; 2] = ["guid", "id"];

/// Generates a deterministic guid from an entry's title and link.
///
/// The hashed canonical form is `title|link`: the two strings joined by a
/// single `|`, so `("ab", "c")` and `("a", "bc")` get different guids.
///
/// Missing fields count as empty strings and undecodable bytes are replaced
/// with U+FFFD before hashing, so this always returns a 64-character
/// lowercase hex SHA-256 digest.
pub fn generate_guid(entry: &FeedEntry) -> String {
    let title = entry.text("title").unwrap_or_default();
    let link = entry.text("link").unwrap_or_default();

    let input = format!("{}|{}", title, link);
    let hash = Sha256::digest(input.as_bytes());
    format!("{:x}", hash)
}

/// Returns the entry's own identifier, or a generated one.
///
/// The feed-provided `guid` (or `id`) wins when it is a non-blank scalar;
/// otherwise the identifier is derived with [`generate_guid`].
pub fn get_entry_guid(entry: &FeedEntry) -> String {
    ID_FIELDS
        .iter()
        .filter_map(|field| entry.text(field))
        .map(|id| id.trim().to_string())
        .find(|id| !id.is_empty())
        .unwrap_or_else(|| generate_guid(entry))
}
