// ABOUTME: Error types for the cleaner: ErrorCode, per-parser ParseError, and NormalizeError.
// ABOUTME: Also defines the non-fatal Warning values attached to a successful run.

use std::fmt;

use serde::Serialize;

use crate::parse::ParserKind;

/// Error codes representing why a parser rejected its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Malformed,
    TooDeep,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Malformed => "malformed markup",
            ErrorCode::TooDeep => "nesting too deep",
        };
        write!(f, "{}", s)
    }
}

/// One parser refusing one input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ParseError {
    pub code: ErrorCode,
    pub parser: ParserKind,
    pub detail: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.parser, self.code)?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl ParseError {
    /// Create a Malformed error.
    pub fn malformed(parser: ParserKind, detail: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Malformed,
            parser,
            detail: detail.into(),
        }
    }

    /// Create a TooDeep error for a tree exceeding `limit` levels.
    pub fn too_deep(parser: ParserKind, limit: usize) -> Self {
        Self {
            code: ErrorCode::TooDeep,
            parser,
            detail: format!("more than {} levels of nesting", limit),
        }
    }

    /// Returns true if this is a Malformed error.
    pub fn is_malformed(&self) -> bool {
        self.code == ErrorCode::Malformed
    }

    /// Returns true if this is a TooDeep error.
    pub fn is_too_deep(&self) -> bool {
        self.code == ErrorCode::TooDeep
    }
}

/// Every parser in the fallback chain rejected the input. The pipeline reports this
/// instead of emitting partial output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no parser accepted the input ({})", join_attempts(.attempts))]
pub struct NormalizeError {
    pub attempts: Vec<ParseError>,
}

impl NormalizeError {
    pub fn new(attempts: Vec<ParseError>) -> Self {
        Self { attempts }
    }

    /// The error from the last parser tried, the most permissive one.
    pub fn last(&self) -> Option<&ParseError> {
        self.attempts.last()
    }
}

fn join_attempts(attempts: &[ParseError]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Conditions worth reporting that do not stop the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Input was empty or whitespace only.
    EmptyInput,
    /// Input had fewer meaningful characters than any useful markup needs.
    TrivialInput { len: usize },
    /// The preferred parser rejected the input and another one was used.
    ParserFallback { from: ParserKind, to: ParserKind },
    /// The paragraph normalizer was still changing the tree when it ran out of passes.
    IterationCapReached { cap: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::EmptyInput => write!(f, "input is empty"),
            Warning::TrivialInput { len } => {
                write!(f, "input is trivially short ({} characters)", len)
            }
            Warning::ParserFallback { from, to } => {
                write!(f, "{} rejected the input, fell back to {}", from, to)
            }
            Warning::IterationCapReached { cap } => {
                write!(f, "paragraph normalization stopped at the {}-pass cap", cap)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::malformed(ParserKind::Lenient, "unterminated comment at byte 4");
        assert_eq!(
            err.to_string(),
            "lenient: malformed markup: unterminated comment at byte 4"
        );
        assert!(err.is_malformed());
        assert!(!err.is_too_deep());
    }

    #[test]
    fn test_normalize_error_lists_attempts() {
        let err = NormalizeError::new(vec![
            ParseError::too_deep(ParserKind::Html5ever, 512),
            ParseError::too_deep(ParserKind::Lenient, 512),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("no parser accepted the input ("));
        assert!(msg.contains("html5ever: nesting too deep"));
        assert!(msg.contains("lenient: nesting too deep"));
        assert_eq!(err.last().map(|e| e.parser), Some(ParserKind::Lenient));
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Warning::TrivialInput { len: 2 }).unwrap();
        assert_eq!(json, r#"{"kind":"trivial_input","len":2}"#);
    }
}
