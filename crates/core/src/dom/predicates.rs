// ABOUTME: Classification predicates used by the paragraph normalizer and the marker sweep.
// ABOUTME: Blank-text tests, tag sets, and the comment-only / empty / block-wrapping checks.

use ego_tree::{NodeId, NodeRef};

use super::node::Node;
use super::tree::Document;

const NBSP: char = '\u{a0}';
const NBSP_ENTITY: &str = "&nbsp;";

/// Tags a paragraph must not wrap.
pub const BLOCK_LEVEL_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "canvas",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "noscript",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tfoot",
    "ul",
    "video",
    "iframe",
    "picture",
];

/// Elements that carry content even without any text inside them.
pub const MEANINGFUL_TAGS: &[&str] = &[
    "img", "picture", "video", "audio", "source", "iframe", "embed", "object", "svg", "canvas",
    "math", "input", "select", "textarea", "button", "hr",
];

/// Class prefix Gutenberg puts on block wrapper elements.
pub const BLOCK_CONTAINER_PREFIX: &str = "wp-block-";

pub fn is_block_level(name: &str) -> bool {
    BLOCK_LEVEL_TAGS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(name))
}

pub fn is_meaningful(name: &str) -> bool {
    MEANINGFUL_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Always-visible tags for the paired-region sweep: meaningful tags plus tables.
pub fn is_always_visible(name: &str) -> bool {
    is_meaningful(name) || name.eq_ignore_ascii_case("table")
}

/// Whitespace-only after treating both a decoded non-breaking space and the literal
/// `&nbsp;` entity text as ordinary spaces.
pub fn is_blank_text(s: &str) -> bool {
    s.replace(NBSP_ENTITY, " ")
        .chars()
        .all(|c| c.is_whitespace() || c == NBSP)
}

fn is_br(node: &Node) -> bool {
    node.is_element_named("br")
}

fn is_blank(node: &Node) -> bool {
    node.as_text().is_some_and(is_blank_text)
}

fn children_of<'a>(doc: &'a Document, id: NodeId) -> impl Iterator<Item = &'a Node> + 'a {
    doc.get(id)
        .into_iter()
        .flat_map(|n| n.children())
        .map(|c| c.value())
}

/// Only blank text, `br` and block markers, with at least one marker present.
pub fn is_comment_only(doc: &Document, id: NodeId) -> bool {
    let mut saw_marker = false;
    for child in children_of(doc, id) {
        if child.is_marker() {
            saw_marker = true;
        } else if !(is_blank(child) || is_br(child)) {
            return false;
        }
    }
    saw_marker
}

/// Only blank text and `br`. Any comment, marker or not, counts as content.
pub fn is_truly_empty(doc: &Document, id: NodeId) -> bool {
    children_of(doc, id).all(|child| is_blank(child) || is_br(child))
}

/// Only block-level elements (at least one), optionally padded with blank text, `br`
/// and block markers.
pub fn wraps_blocks_only(doc: &Document, id: NodeId) -> bool {
    let mut saw_block = false;
    for child in children_of(doc, id) {
        match child {
            Node::Text(t) if is_blank_text(t) => {}
            Node::Comment(_) if child.is_marker() => {}
            Node::Element(el) if el.name == "br" => {}
            Node::Element(el) if is_block_level(&el.name) => saw_block = true,
            _ => return false,
        }
    }
    saw_block
}

/// Deep emptiness: no non-blank text, no meaningful element and no non-marker comment
/// anywhere below `id`. Catches paragraphs holding only empty inline wrappers.
pub fn is_effectively_empty(doc: &Document, id: NodeId) -> bool {
    let Some(node) = doc.get(id) else {
        return false;
    };
    node.descendants().skip(1).all(|d| match d.value() {
        Node::Text(t) => is_blank_text(t),
        Node::Element(el) => !is_meaningful(&el.name),
        Node::Comment(_) => d.value().is_marker(),
        Node::Doctype(_) | Node::Document => true,
    })
}

/// Visually empty for the paired-region sweep: no non-blank text and no always-visible
/// element, at this node or below. Comments are invisible.
pub fn is_visually_empty(node: NodeRef<'_, Node>) -> bool {
    node.descendants().all(|d| match d.value() {
        Node::Text(t) => is_blank_text(t),
        Node::Element(el) => !is_always_visible(&el.name),
        _ => true,
    })
}

/// Carries a `wp-block-*` class.
pub fn is_block_container(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|el| el.classes().any(|c| c.starts_with(BLOCK_CONTAINER_PREFIX)))
}

/// A block container left with nothing but blank text and `br` children.
pub fn is_empty_block_container(doc: &Document, id: NodeId) -> bool {
    let Some(node) = doc.get(id) else {
        return false;
    };
    if !is_block_container(node.value()) {
        return false;
    }
    let has_element_children = node
        .children()
        .any(|c| matches!(c.value(), Node::Element(el) if el.name != "br"));
    !has_element_children && is_blank_text(&doc.text(id))
}
