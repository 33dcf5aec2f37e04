// ABOUTME: Parser selection: html5ever (via scraper) first, the lenient tag-soup parser as fallback.
// ABOUTME: Both backends produce the same arena Document; failures are collected per attempt.

//! HTML parsing backends and the fallback policy between them.
//!
//! Two backends build a [`Document`]:
//!
//! - [`ParserKind::Html5ever`] runs the WHATWG tree construction algorithm through
//!   `scraper`. It never rejects markup, but it restructures illegal nesting the way a
//!   browser would (`<p><div>` becomes `<p></p><div>`).
//! - [`ParserKind::Lenient`] feeds html5ever's tokenizer into a stack-based builder that
//!   keeps the nesting the author wrote, so nested and block-wrapping paragraphs survive
//!   into the tree for the normalizer to fix. It rejects truncated markup.
//!
//! Both reject trees nested deeper than [`MAX_NESTING_DEPTH`].

pub mod html5;
pub mod lenient;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::dom::Document;
use crate::error::{NormalizeError, ParseError};

/// Deepest element nesting either backend accepts.
pub const MAX_NESTING_DEPTH: usize = 512;

/// A concrete parser backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Html5ever,
    Lenient,
}

impl ParserKind {
    /// Most standards-compliant first.
    pub const PREFERENCE: [ParserKind; 2] = [ParserKind::Html5ever, ParserKind::Lenient];

    pub fn name(&self) -> &'static str {
        match self {
            ParserKind::Html5ever => "html5ever",
            ParserKind::Lenient => "lenient",
        }
    }

    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        match self {
            ParserKind::Html5ever => html5::parse(html),
            ParserKind::Lenient => lenient::parse(html),
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which parser the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserChoice {
    /// Best available, in [`ParserKind::PREFERENCE`] order.
    #[default]
    Auto,
    /// Try this one first, then the rest in preference order.
    Named(ParserKind),
}

impl ParserChoice {
    /// The order parsers are attempted in.
    pub fn candidates(&self) -> Vec<ParserKind> {
        match self {
            ParserChoice::Auto => ParserKind::PREFERENCE.to_vec(),
            ParserChoice::Named(first) => std::iter::once(*first)
                .chain(ParserKind::PREFERENCE.into_iter().filter(|k| k != first))
                .collect(),
        }
    }
}

impl fmt::Display for ParserChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserChoice::Auto => write!(f, "auto"),
            ParserChoice::Named(kind) => write!(f, "{}", kind),
        }
    }
}

impl FromStr for ParserChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "best" => Ok(ParserChoice::Auto),
            "html5ever" | "html5" => Ok(ParserChoice::Named(ParserKind::Html5ever)),
            "lenient" | "minimal" => Ok(ParserChoice::Named(ParserKind::Lenient)),
            other => Err(format!(
                "unknown parser '{}' (expected auto, html5ever or lenient)",
                other
            )),
        }
    }
}

/// A successful parse plus every rejection that preceded it.
#[derive(Debug)]
pub struct Parsed {
    pub document: Document,
    pub parser: ParserKind,
    pub rejected: Vec<ParseError>,
}

/// Parse `html` with the first candidate that accepts it.
pub fn parse_with_fallback(html: &str, choice: ParserChoice) -> Result<Parsed, NormalizeError> {
    let mut rejected = Vec::new();
    for kind in choice.candidates() {
        match kind.parse(html) {
            Ok(document) => {
                log::debug!(target: "gutenclean::parse", "parsed with {}", kind);
                return Ok(Parsed {
                    document,
                    parser: kind,
                    rejected,
                });
            }
            Err(err) => {
                log::warn!(target: "gutenclean::parse", "{}", err);
                rejected.push(err);
            }
        }
    }
    Err(NormalizeError::new(rejected))
}
