//! Utility functions shared by discovery and entry normalization.
//!
//! - **Text processing**: total byte decoding and control character cleanup
//! - **URL resolution**: resolving hrefs against a document base URL
//!
//! # Examples
//!
//! ```
//! use feedmeta::util::{decode_document, resolve_url};
//!
//! let text = decode_document(b"<link href=\"/rss\">");
//! assert!(text.contains("/rss"));
//!
//! let url = resolve_url("/rss", Some("http://www.example.com/news/"));
//! assert_eq!(url, "http://www.example.com/rss");
//! ```

mod text;
mod url_resolver;

pub use text::{decode_document, strip_control_chars};
pub use url_resolver::resolve_url;
