//! Feed entries as loosely typed field mappings.
//!
//! - [`entry`] - the [`FeedEntry`] mapping and its [`FieldValue`] sum type
//! - [`parser`] - building entries from RSS/Atom via `feed-rs`, and running
//!   them through the normalization pipeline
//!
//! # Example
//!
//! ```
//! use feedmeta::config::ExtractorConfig;
//! use feedmeta::feed::{normalize_entry, FeedEntry};
//!
//! let entry = FeedEntry::new()
//!     .with("title", "Hello")
//!     .with("link", "https://example.com/hello")
//!     .with("updated_parsed", vec![2009_i64, 3, 14, 15, 9, 26, 5, 73, 0]);
//! let normalized = normalize_entry(&entry, &ExtractorConfig::default());
//! assert_eq!(normalized.date.to_string(), "2009-03-14 15:09:26");
//! assert_eq!(normalized.guid.len(), 64);
//! ```

pub mod entry;
pub mod parser;

pub use entry::{FeedEntry, FieldValue};
pub use parser::{normalize_entry, parse_feed, NormalizedEntry};
