// ABOUTME: Turns a Document back into HTML text: fragment extraction, pretty-printing, marker compaction.
// ABOUTME: Escapes text and attribute values, writes comments verbatim, never closes void elements.

//! HTML output.
//!
//! [`serialize_fragment`] is the canonical writer. [`prettify`] and [`compact_markers`] are
//! optional passes over its output; both take and return text.

use std::fmt::Write as _;

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::predicates::is_block_level;
use crate::dom::{Document, Element, Node};
use crate::parse::lenient::{self, drops_leading_newline, is_raw_text_element, is_void_element};

const INDENT: &str = "  ";

// Elements that are laid out one child per line even without block-level children.
const STRUCTURAL_TAGS: &[&str] = &[
    "html", "head", "body", "thead", "tbody", "tr", "td", "th", "caption", "colgroup",
    "select",
];

static MARKER_SPACING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*(/?)\s*(wp:[\s\S]*?)\s*-->").unwrap());

/// Serialize the document. With `strip_wrapper` set and a `body` present, only the body's
/// children are written.
pub fn serialize_fragment(doc: &Document, strip_wrapper: bool) -> String {
    let from = match doc.body() {
        Some(body) if strip_wrapper => body,
        _ => doc.root_id(),
    };
    let mut out = String::new();
    if let Some(node) = doc.get(from) {
        for child in node.children() {
            write_node(child, &mut out);
        }
    }
    out
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Document => {
            for child in node.children() {
                write_node(child, out);
            }
        }
        Node::Doctype(name) => {
            let _ = write!(out, "<!DOCTYPE {}>", name);
        }
        Node::Comment(payload) => {
            let _ = write!(out, "<!--{}-->", payload);
        }
        Node::Text(text) => {
            let raw = node
                .parent()
                .and_then(|p| p.value().as_element())
                .is_some_and(|el| is_raw_text_element(&el.name));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        Node::Element(el) => {
            write_start_tag(el, out);
            if is_void_element(&el.name) {
                return;
            }
            // The parser drops one newline after these start tags.
            let leading_newline = node
                .first_child()
                .is_some_and(|c| matches!(c.value(), Node::Text(t) if t.starts_with('\n')));
            if leading_newline && drops_leading_newline(&el.name) {
                out.push('\n');
            }
            for child in node.children() {
                write_node(child, out);
            }
            let _ = write!(out, "</{}>", el.name);
        }
    }
}

fn write_start_tag(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (name, value) in &el.attrs {
        let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
    }
    out.push('>');
}

pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Re-indent `html` with two spaces per level. Elements holding block-level children are
/// expanded one child per line; everything else stays on a single line. Returns the input
/// unchanged when it cannot be re-parsed.
pub fn prettify(html: &str) -> String {
    let doc = match lenient::parse(html) {
        Ok(doc) => doc,
        Err(err) => {
            log::debug!(target: "gutenclean::pipeline", "skipping pretty-print: {}", err);
            return html.to_string();
        }
    };
    let mut out = String::new();
    for child in doc.root().children() {
        write_pretty(child, 0, &mut out);
    }
    out.truncate(out.trim_end().len());
    out
}

fn expands(node: NodeRef<'_, Node>, el: &Element) -> bool {
    if is_void_element(&el.name) || is_raw_text_element(&el.name) {
        return false;
    }
    let structural = |name: &str| STRUCTURAL_TAGS.contains(&name);
    structural(&el.name)
        || node.children().any(|c| {
            c.value()
                .as_element()
                .is_some_and(|child| is_block_level(&child.name) || structural(&child.name))
        })
}

fn write_pretty(node: NodeRef<'_, Node>, depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace());
            if !trimmed.is_empty() {
                let _ = writeln!(out, "{}{}", indent, escape_text(trimmed));
            }
        }
        Node::Element(el) if expands(node, el) => {
            out.push_str(&indent);
            write_start_tag(el, out);
            out.push('\n');
            for child in node.children() {
                write_pretty(child, depth + 1, out);
            }
            let _ = writeln!(out, "{}</{}>", indent, el.name);
        }
        _ => {
            out.push_str(&indent);
            write_node(node, out);
            out.push('\n');
        }
    }
}

/// Remove the padding inside block marker comments: `<!-- wp:x -->` becomes `<!--wp:x-->`
/// and `<!-- / wp:x -->` becomes `<!--/wp:x-->`.
pub fn compact_markers(html: &str) -> String {
    MARKER_SPACING_RE
        .replace_all(html, "<!--${1}${2}-->")
        .into_owned()
}
