// ABOUTME: Turns raw input bytes into text before parsing, honoring an explicit charset when given.
// ABOUTME: Falls back to BOM sniffing, UTF-8 validation, a <meta charset> hint, then chardetng detection.

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;

const TARGET: &str = "gutenclean::pipeline";

// How far into the input a <meta charset> declaration is looked for.
const META_SNIFF_LEN: usize = 1024;

static META_CHARSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_.:-]+)"#).unwrap()
});

/// Decode `bytes` to a string.
///
/// `charset` may be a bare label (`"windows-1252"`) or a Content-Type value
/// (`"text/html; charset=latin1"`). Unknown labels are ignored.
pub fn decode_input(bytes: &[u8], charset: Option<&str>) -> String {
    if let Some(encoding) = charset.and_then(encoding_for_label) {
        log::debug!(target: TARGET, "decoding input as {} (explicit)", encoding.name());
        let (decoded, _, _) = encoding.decode(bytes);
        return decoded.into_owned();
    }

    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        log::debug!(target: TARGET, "decoding input as {} (byte order mark)", encoding.name());
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let encoding = sniff_meta_charset(bytes).unwrap_or_else(|| {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(None, true)
    });
    log::debug!(target: TARGET, "decoding input as {} (detected)", encoding.name());
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    let label = extract_charset(label).unwrap_or_else(|| label.trim().to_string());
    Encoding::for_label(label.as_bytes())
}

/// Extract the charset parameter from a Content-Type style value.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    lower.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|charset| charset.trim_matches('"').trim_matches('\'').to_string())
    })
}

/// A `<meta charset>` declaration near the start of the input. UTF-16 declarations are
/// ignored since bytes that reached this point are not UTF-16 text.
fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LEN)];
    let label = META_CHARSET_RE.captures(head)?.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label)?;
    if encoding == UTF_8 || encoding.output_encoding() != encoding {
        return None;
    }
    Some(encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_utf8_passes_through() {
        assert_eq!(decode_input("<p>café</p>".as_bytes(), None), "<p>café</p>");
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<p>x</p>");
        assert_eq!(decode_input(&bytes, None), "<p>x</p>");
    }

    #[test]
    fn test_explicit_charset() {
        let bytes = b"<p>caf\xe9</p>";
        assert_eq!(decode_input(bytes, Some("windows-1252")), "<p>café</p>");
        assert_eq!(
            decode_input(bytes, Some("text/html; charset=\"ISO-8859-1\"")),
            "<p>café</p>"
        );
    }

    #[test]
    fn test_meta_charset_hint() {
        let bytes = b"<meta charset=\"windows-1252\"><p>na\xefve</p>";
        assert_eq!(
            decode_input(bytes, None),
            "<meta charset=\"windows-1252\"><p>naïve</p>"
        );
    }

    #[test]
    fn test_detects_legacy_encoding() {
        let bytes = b"<p>Le caf\xe9 est tr\xe8s bon, d\xe9j\xe0 servi \xe0 la fen\xeatre.</p>";
        let text = decode_input(bytes, None);
        assert!(text.contains("café"), "got {:?}", text);
        assert!(!text.contains('\u{fffd}'));
    }

    #[test]
    fn test_unknown_label_is_ignored() {
        assert_eq!(decode_input(b"<p>x</p>", Some("no-such-charset")), "<p>x</p>");
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=UTF-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }
}
