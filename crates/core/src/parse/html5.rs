// ABOUTME: WHATWG-compliant parsing through scraper/html5ever, copied into the arena Document.
// ABOUTME: Full documents keep their html/head/body; fragments are parsed in a body context.

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use super::{ParserKind, MAX_NESTING_DEPTH};
use crate::dom::{Document, Element, Node};
use crate::error::ParseError;

// Markup that only makes sense at document level.
static DOCUMENT_MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(!doctype|html|head|body)[\s>/]").unwrap());

/// True when `html` should be parsed as a whole document rather than a body fragment.
pub fn looks_like_document(html: &str) -> bool {
    DOCUMENT_MARKUP_RE.is_match(html)
}

/// Parse with html5ever and copy the result into a [`Document`].
///
/// Fragments come out of scraper wrapped in a synthetic `<html>` context element; only
/// its children are copied, so the resulting document has no wrapper to strip.
pub fn parse(html: &str) -> Result<Document, ParseError> {
    let parsed = if looks_like_document(html) {
        Html::parse_document(html)
    } else {
        Html::parse_fragment(html)
    };
    let source = if parsed.tree.root().value().is_document() {
        parsed.tree.root()
    } else {
        *parsed.root_element()
    };
    convert(source)
}

fn convert(source: NodeRef<'_, scraper::Node>) -> Result<Document, ParseError> {
    let mut doc = Document::new();
    let mut pending = vec![(source, doc.root_id(), 0usize)];

    while let Some((src, dst, depth)) = pending.pop() {
        for child in src.children() {
            let node = match child.value() {
                scraper::Node::Element(el) => Node::Element(Element::new(
                    el.name(),
                    el.attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                )),
                scraper::Node::Text(text) => Node::Text((**text).to_string()),
                scraper::Node::Comment(comment) => Node::Comment((**comment).to_string()),
                scraper::Node::Doctype(doctype) => Node::Doctype(doctype.name().to_string()),
                _ => continue,
            };
            let is_element = matches!(node, Node::Element(_));
            let Some(id) = doc.append(dst, node) else {
                continue;
            };
            if is_element && child.has_children() {
                if depth + 1 > MAX_NESTING_DEPTH {
                    return Err(ParseError::too_deep(ParserKind::Html5ever, MAX_NESTING_DEPTH));
                }
                pending.push((child, id, depth + 1));
            }
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::serialize_fragment;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_looks_like_document() {
        assert!(looks_like_document("<!DOCTYPE html><p>x</p>"));
        assert!(looks_like_document("<HTML lang=\"en\"><p>x</p></HTML>"));
        assert!(looks_like_document("<body>\n<p>x</p></body>"));
        assert!(!looks_like_document("<p>x</p>"));
        assert!(!looks_like_document("<p>see the <header> tag</p>"));
        assert!(!looks_like_document("<bodyguard>x</bodyguard>"));
    }

    #[test]
    fn test_fragment_keeps_leading_comments_in_order() {
        let doc = parse("<!-- wp:paragraph --><p>Hi</p><!-- /wp:paragraph -->").unwrap();
        assert_eq!(doc.body(), None);
        assert_eq!(
            serialize_fragment(&doc, true),
            "<!-- wp:paragraph --><p>Hi</p><!-- /wp:paragraph -->"
        );
    }

    #[test]
    fn test_paragraph_cannot_wrap_a_div() {
        let doc = parse("<p><div>Block content</div></p>").unwrap();
        assert_eq!(
            serialize_fragment(&doc, true),
            "<p></p><div>Block content</div><p></p>"
        );
    }

    #[test]
    fn test_document_has_body() {
        let doc = parse("<!DOCTYPE html><html><head><title>t</title></head><body><p>x</p></body></html>")
            .unwrap();
        assert!(doc.body().is_some());
        assert_eq!(serialize_fragment(&doc, true), "<p>x</p>");
    }

    #[test]
    fn test_rejects_excessive_depth() {
        let html = "<div>".repeat(MAX_NESTING_DEPTH + 5) + "x";
        let err = parse(&html).unwrap_err();
        assert!(err.is_too_deep());
        assert_eq!(err.parser, ParserKind::Html5ever);
    }
}
