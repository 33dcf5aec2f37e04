// ABOUTME: Node payloads stored in the document arena: elements, text, comments, doctype.
// ABOUTME: Includes the Gutenberg block marker classification for comment nodes.

/// Payload of a single tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The tree root. Never detached, never serialized itself.
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    /// Comment payload, exclusive of the `<!--` / `-->` delimiters.
    Comment(String),
}

/// Which side of a block region a marker comment sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Open,
    Close,
}

impl Node {
    pub fn element(name: &str) -> Self {
        Node::Element(Element::new(name, Vec::new()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn comment(payload: impl Into<String>) -> Self {
        Node::Comment(payload.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&str> {
        match self {
            Node::Comment(c) => Some(c),
            _ => None,
        }
    }

    /// True for an element whose tag name matches `name` (ASCII case-insensitive).
    pub fn is_element_named(&self, name: &str) -> bool {
        self.as_element()
            .is_some_and(|el| el.name.eq_ignore_ascii_case(name))
    }

    /// Marker classification for comments; `None` for every other node.
    pub fn marker_kind(&self) -> Option<MarkerKind> {
        self.as_comment().and_then(marker_kind)
    }

    pub fn is_marker(&self) -> bool {
        self.marker_kind().is_some()
    }
}

/// Classify a comment payload. Whitespace anywhere in the payload is ignored, so
/// `  wp:paragraph ` and ` / wp:paragraph` both qualify.
pub fn marker_kind(payload: &str) -> Option<MarkerKind> {
    let mut compact = payload.chars().filter(|c| !c.is_whitespace());
    match compact.next()? {
        '/' => compact
            .take(3)
            .eq("wp:".chars())
            .then_some(MarkerKind::Close),
        'w' => compact.take(2).eq("p:".chars()).then_some(MarkerKind::Open),
        _ => None,
    }
}

/// An element with a lower-cased tag name and its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(name: &str, attrs: Vec<(String, String)>) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attrs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }
}
