// ABOUTME: Tag-soup parser: html5ever's tokenizer feeding a stack-based builder that keeps authored nesting.
// ABOUTME: Rejects truncated markup and excessive depth instead of guessing.

//! Lenient parser.
//!
//! Tokens come from html5ever's tokenizer, so character references, raw text and RCDATA
//! elements, and bogus comments are handled exactly as a browser would. Tree construction
//! is our own and applies no content-model rules: `<p><p>x</p></p>` yields a paragraph
//! inside a paragraph, exactly as a word processor emitted it. An end tag closes the
//! nearest open element with that name and everything opened after it; an end tag with no
//! matching open element is dropped. Elements still open at end of input are closed
//! implicitly.
//!
//! Input that ends inside a tag, comment, or doctype is rejected as malformed.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::{Rawtext, Rcdata, ScriptData};
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token as HtmlToken, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};

use super::{ParserKind, MAX_NESTING_DEPTH};
use crate::dom::{Document, Element, Node};
use crate::error::ParseError;

// Prefix of the tokenizer's error for input ending mid-token.
const EOF_ERROR: &str = "Saw EOF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Comment(String),
    Doctype(String),
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag(String),
}

pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose text is parsed and written verbatim. `noscript` is included because
/// html5ever parses with scripting enabled.
pub fn is_raw_text_element(name: &str) -> bool {
    matches!(
        name,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" | "plaintext"
    )
}

/// Elements whose first newline is dropped by the parser.
pub fn drops_leading_newline(name: &str) -> bool {
    matches!(name, "pre" | "textarea" | "listing")
}

fn malformed(detail: String) -> ParseError {
    ParseError::malformed(ParserKind::Lenient, detail)
}

/// Parse `html` into a [`Document`] without any HTML5 tree-construction fixups.
pub fn parse(html: &str) -> Result<Document, ParseError> {
    build(tokenize(html)?)
}

#[derive(Default)]
struct Collector {
    tokens: RefCell<Vec<Token>>,
    truncated: RefCell<Option<String>>,
}

impl TokenSink for Collector {
    type Handle = ();

    fn process_token(&self, token: HtmlToken, line: u64) -> TokenSinkResult<()> {
        let mut tokens = self.tokens.borrow_mut();
        match token {
            HtmlToken::CharacterTokens(text) => push_text(&mut tokens, &text),
            HtmlToken::CommentToken(text) => tokens.push(Token::Comment(text.to_string())),
            HtmlToken::DoctypeToken(doctype) => tokens.push(Token::Doctype(
                doctype.name.map(|n| n.to_string()).unwrap_or_default(),
            )),
            HtmlToken::TagToken(tag) => return push_tag(&mut tokens, tag),
            HtmlToken::ParseError(msg) if msg.starts_with(EOF_ERROR) => {
                let mut truncated = self.truncated.borrow_mut();
                if truncated.is_none() {
                    *truncated = Some(format!("{} at line {}", msg, line));
                }
            }
            HtmlToken::ParseError(_) | HtmlToken::NullCharacterToken | HtmlToken::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}

fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Text(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(Token::Text(text.to_string()));
    }
}

/// Record `tag` and tell the tokenizer which state its contents are in.
fn push_tag(tokens: &mut Vec<Token>, tag: Tag) -> TokenSinkResult<()> {
    let name = tag.name.to_string();
    if tag.kind == TagKind::EndTag {
        tokens.push(Token::EndTag(name));
        return TokenSinkResult::Continue;
    }

    let next = match &*name {
        "script" => TokenSinkResult::RawData(ScriptData),
        "title" | "textarea" => TokenSinkResult::RawData(Rcdata),
        "plaintext" => TokenSinkResult::Plaintext,
        raw if is_raw_text_element(raw) => TokenSinkResult::RawData(Rawtext),
        _ => TokenSinkResult::Continue,
    };
    // A self-closing flag on an element with a text body is ignored, as browsers do.
    let self_closing = is_void_element(&name)
        || (tag.self_closing && matches!(next, TokenSinkResult::Continue));
    let attrs = tag
        .attrs
        .into_iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect();
    tokens.push(Token::StartTag {
        name,
        attrs,
        self_closing,
    });
    next
}

/// Split `input` into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let tokenizer = Tokenizer::new(Collector::default(), TokenizerOpts::default());
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(input));
    let _ = tokenizer.feed(&queue);
    tokenizer.end();

    let Collector { tokens, truncated } = tokenizer.sink;
    if let Some(detail) = truncated.into_inner() {
        return Err(malformed(format!("truncated markup: {}", detail)));
    }
    Ok(tokens.into_inner())
}

/// Build a tree from tokens with a stack of open elements.
pub fn build(tokens: Vec<Token>) -> Result<Document, ParseError> {
    let mut doc = Document::new();
    let root = doc.root_id();
    let mut open: Vec<(String, ego_tree::NodeId)> = Vec::new();
    let mut skip_newline = false;

    for token in tokens {
        let parent = open.last().map_or(root, |(_, id)| *id);
        let strip = std::mem::take(&mut skip_newline);
        match token {
            Token::Text(text) => {
                let text = match text.strip_prefix('\n') {
                    Some(rest) if strip => rest.to_string(),
                    _ => text,
                };
                if !text.is_empty() {
                    doc.append(parent, Node::Text(text));
                }
            }
            Token::Comment(payload) => {
                doc.append(parent, Node::Comment(payload));
            }
            Token::Doctype(name) => {
                doc.append(parent, Node::Doctype(name));
            }
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                let Some(id) = doc.append(parent, Node::Element(Element::new(&name, attrs)))
                else {
                    continue;
                };
                if !self_closing {
                    if open.len() >= MAX_NESTING_DEPTH {
                        return Err(ParseError::too_deep(ParserKind::Lenient, MAX_NESTING_DEPTH));
                    }
                    skip_newline = drops_leading_newline(&name);
                    open.push((name, id));
                }
            }
            Token::EndTag(name) => {
                if let Some(pos) = open.iter().rposition(|(open_name, _)| *open_name == name) {
                    open.truncate(pos);
                }
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

    fn round_trip(html: &str) -> String {
        serialize_fragment(&parse(html).unwrap(), true)
    }

    #[test]
    fn test_keeps_nested_paragraphs() {
        assert_eq!(round_trip("<p><p>Test</p></p>"), "<p><p>Test</p></p>");
        assert_eq!(
            round_trip("<p><div>Block content</div></p>"),
            "<p><div>Block content</div></p>"
        );
    }

    #[test]
    fn test_tokenize_tags_comments_and_text() {
        let tokens = tokenize(r#"<!-- wp:paragraph --><P Class="a">x &amp; y<br/></p>"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Comment(" wp:paragraph ".to_string()),
                Token::StartTag {
                    name: "p".to_string(),
                    attrs: vec![("class".to_string(), "a".to_string())],
                    self_closing: false,
                },
                Token::Text("x & y".to_string()),
                Token::StartTag {
                    name: "br".to_string(),
                    attrs: vec![],
                    self_closing: true,
                },
                Token::EndTag("p".to_string()),
            ]
        );
    }

    #[test]
    fn test_attributes() {
        let tokens = tokenize(r#"<img src='a.png' alt=plain data-x hidden>"#).unwrap();
        let Token::StartTag {
            attrs, self_closing, ..
        } = &tokens[0]
        else {
            panic!("expected start tag, got {:?}", tokens);
        };
        assert!(*self_closing, "void elements never open");
        assert_eq!(
            attrs,
            &vec![
                ("src".to_string(), "a.png".to_string()),
                ("alt".to_string(), "plain".to_string()),
                ("data-x".to_string(), String::new()),
                ("hidden".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_named_references_decode_fully() {
        assert_eq!(
            tokenize("caf&eacute; &trade; &euro;5 &bull; &hellip;").unwrap(),
            vec![Token::Text("café ™ €5 • …".to_string())]
        );
        assert_eq!(
            round_trip("<p>caf&eacute; &trade; &euro;5 &bull; x</p>"),
            "<p>café ™ €5 • x</p>"
        );
        assert_eq!(round_trip("<p>AT&T &bogus;</p>"), "<p>AT&amp;T &amp;bogus;</p>");
    }

    #[test]
    fn test_stray_end_tags_and_unclosed_elements() {
        assert_eq!(round_trip("</div><p>a<b>bold</p>c"), "<p>a<b>bold</b></p>c");
        assert_eq!(round_trip("<div><span>open"), "<div><span>open</span></div>");
    }

    #[test]
    fn test_stray_less_than_is_text() {
        assert_eq!(round_trip("<p>a < b</p>"), "<p>a &lt; b</p>");
    }

    #[test]
    fn test_raw_text_elements() {
        let tokens = tokenize("<script>if (a < b) { x = '</p>'; }</SCRIPT><p>x</p>").unwrap();
        assert_eq!(tokens[1], Token::Text("if (a < b) { x = '</p>'; }".to_string()));
        assert_eq!(tokens[2], Token::EndTag("script".to_string()));
        assert_eq!(
            tokens[3],
            Token::StartTag {
                name: "p".to_string(),
                attrs: vec![],
                self_closing: false,
            }
        );
    }

    #[test]
    fn test_noscript_body_is_raw_text() {
        let html = r#"<p>x</p><noscript><img src="a.png"></noscript>"#;
        let doc = parse(html).unwrap();
        assert!(doc.elements_named("img").is_empty());
        assert_eq!(round_trip(html), html);
    }

    #[test]
    fn test_pre_drops_one_leading_newline() {
        let doc = parse("<pre>\n\ncode</pre>").unwrap();
        let pre = doc.elements_named("pre")[0];
        let text = doc.children(pre)[0];
        assert_eq!(doc.node(text), Some(&Node::Text("\ncode".to_string())));
    }

    #[test]
    fn test_doctype_and_bogus_comments() {
        let tokens = tokenize("<!DOCTYPE html><?xml version=\"1.0\"?><![CDATA[x]]>").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Doctype("html".to_string()),
                Token::Comment("?xml version=\"1.0\"?".to_string()),
                Token::Comment("[CDATA[x]]".to_string()),
            ]
        );
    }

    #[test]
    fn test_declaration_with_multibyte_text() {
        assert_eq!(
            tokenize("<p>x</p><!abcdefé>").unwrap()[3],
            Token::Comment("abcdefé".to_string())
        );
        assert_eq!(
            tokenize("<!doctypé>x").unwrap(),
            vec![
                Token::Comment("doctypé".to_string()),
                Token::Text("x".to_string())
            ]
        );
    }

    #[test]
    fn test_rejects_truncated_markup() {
        for html in [
            "<p>text <!-- open",
            "<p>text <span class=\"x",
            "<p>text <span",
            "<p>text </span",
            "<!DOCTYPE html",
        ] {
            let err = parse(html).unwrap_err();
            assert!(err.is_malformed(), "expected malformed for {:?}: {}", html, err);
            assert_eq!(err.parser, ParserKind::Lenient);
        }
    }

    #[test]
    fn test_rejects_excessive_depth() {
        let html = "<span>".repeat(MAX_NESTING_DEPTH + 1);
        assert!(parse(&html).unwrap_err().is_too_deep());

        let html = "<span>".repeat(MAX_NESTING_DEPTH);
        assert!(parse(&html).is_ok());
    }

    #[test]
    fn test_utf8_text_survives() {
        assert_eq!(round_trip("<p>café ✓ 😀</p>"), "<p>café ✓ 😀</p>");
    }
}
