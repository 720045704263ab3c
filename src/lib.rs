//! Canonical metadata extraction for syndication feeds.
//!
//! Three stateless units, each total over malformed input:
//!
//! - [`dates`] - normalizes entry dates, falling back to "now"
//! - [`guid`] - derives deterministic identifiers from title and link
//! - [`discovery`] - finds alternate feed links in HTML pages and feeds
//!
//! plus [`content`] (post body selection and truncation), [`feed`] (entry
//! mappings built from RSS/Atom) and [`config`] (explicit extractor options).
//!
//! Nothing here performs I/O. Callers fetch documents, hand in the bytes,
//! and decide what to persist.

pub mod config;
pub mod content;
pub mod dates;
pub mod discovery;
pub mod feed;
pub mod guid;
pub mod util;

pub use config::{ConfigError, ExtractorConfig};
pub use content::{find_post_content, ContentError, ContentTruncator, HtmlWordTruncator};
pub use dates::{date_to_datetime, entries_by_date, DateField};
pub use discovery::{
    find_alternate_links, parse_document, search_alternate_links, search_links_url,
    AlternateLinkFinder, DiscoveryError, ParsedDocument,
};
pub use feed::{normalize_entry, parse_feed, FeedEntry, FieldValue, NormalizedEntry};
pub use guid::{generate_guid, get_entry_guid};
