// ABOUTME: Normalized struct holding the cleaned HTML, stats, parser used, and warnings of one run.
// ABOUTME: A failed run carries the original text and the NormalizeError instead of partial output.

use serde::Serialize;

use crate::error::{NormalizeError, Warning};
use crate::parse::ParserKind;
use crate::stats::Stats;

/// The result of normalizing one input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Normalized {
    /// Cleaned HTML, or the original input verbatim when `error` is set.
    pub html: String,
    pub stats: Stats,
    /// The parser that accepted the input; `None` on failure.
    pub parser: Option<ParserKind>,
    pub warnings: Vec<Warning>,
    #[serde(skip)]
    pub error: Option<NormalizeError>,
}

impl Normalized {
    pub(crate) fn failed(original: &str, error: NormalizeError, warnings: Vec<Warning>) -> Self {
        Self {
            html: original.to_string(),
            stats: Stats::default(),
            parser: None,
            warnings,
            error: Some(error),
        }
    }

    /// Returns true if a parser accepted the input.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns true if the run changed the tree at all.
    pub fn changed(&self) -> bool {
        self.stats.total_changes() > 0
    }

    /// Convert into a `Result`, dropping stats and warnings on failure.
    pub fn into_result(self) -> Result<String, NormalizeError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.html),
        }
    }
}
