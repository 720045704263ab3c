use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decodes raw document bytes into text without ever failing.
///
/// Order: byte order mark, valid UTF-8, then charset detection with
/// `chardetng`. Sequences the chosen encoding cannot map are replaced with
/// U+FFFD.
pub fn decode_document(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::debug!(
            encoding = encoding.name(),
            "Document contained unmappable bytes, replaced"
        );
    }
    text
}

/// Removes C0 control characters (except tab, newline and carriage return),
/// DEL, and ANSI escape sequences from feed-provided text.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_unwanted = |c: char| {
        (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')) || c == '\u{7f}'
    };
    if !s.chars().any(is_unwanted) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI sequence: ESC [ params... final byte in @..~
            if chars.peek() == Some(&'[') {
                chars.next();
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        break;
                    }
                }
            }
            continue;
        }
        if !is_unwanted(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
