// ABOUTME: Configuration for the cleaning pipeline: Options, MarkerPolicy, and OptionsBuilder.
// ABOUTME: OptionsBuilder provides a fluent API for constructing Options with custom settings.

use std::fmt;
use std::str::FromStr;

use crate::parse::{ParserChoice, ParserKind};

/// Default cap on paragraph normalization passes.
pub const MAX_ITERATIONS: usize = 50;

/// How the sweep treats block markers once `strip_block_markers` is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerPolicy {
    /// Remove every block marker in the document.
    #[default]
    StripAll,
    /// Remove only open/close marker pairs that bracket nothing visible.
    EmptyRegions,
}

impl fmt::Display for MarkerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarkerPolicy::StripAll => "all",
            MarkerPolicy::EmptyRegions => "empty-regions",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MarkerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "strip-all" => Ok(MarkerPolicy::StripAll),
            "empty-regions" | "regions" => Ok(MarkerPolicy::EmptyRegions),
            other => Err(format!(
                "unknown marker policy '{}' (expected all or empty-regions)",
                other
            )),
        }
    }
}

/// Configuration options for one normalization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Remove paragraphs with no content.
    pub remove_empty: bool,
    /// Unwrap paragraphs whose only content is block-level elements.
    pub unwrap_block_wrapped_paragraphs: bool,
    /// Emit only the children of `body` when the parse produced one.
    pub strip_document_wrapper: bool,
    pub pretty_print: bool,
    /// Let the sweep remove markers according to `marker_policy`.
    pub strip_block_markers: bool,
    pub marker_policy: MarkerPolicy,
    /// Move markers lodged inside paragraphs out to follow them.
    pub extract_markers: bool,
    /// Treat paragraphs holding only empty inline wrappers as empty.
    pub deep_empty_check: bool,
    /// Rewrite `<!-- wp:x -->` as `<!--wp:x-->` in the output text.
    pub compact_markers: bool,
    pub parser: ParserChoice,
    pub max_iterations: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            remove_empty: true,
            unwrap_block_wrapped_paragraphs: true,
            strip_document_wrapper: true,
            pretty_print: false,
            strip_block_markers: true,
            marker_policy: MarkerPolicy::StripAll,
            extract_markers: false,
            deep_empty_check: false,
            compact_markers: false,
            parser: ParserChoice::Auto,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }
}

/// Builder for constructing Options with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    opts: Options,
}

impl OptionsBuilder {
    /// Create a new OptionsBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    pub fn remove_empty(mut self, enabled: bool) -> Self {
        self.opts.remove_empty = enabled;
        self
    }

    pub fn unwrap_block_wrapped_paragraphs(mut self, enabled: bool) -> Self {
        self.opts.unwrap_block_wrapped_paragraphs = enabled;
        self
    }

    pub fn strip_document_wrapper(mut self, enabled: bool) -> Self {
        self.opts.strip_document_wrapper = enabled;
        self
    }

    pub fn pretty_print(mut self, enabled: bool) -> Self {
        self.opts.pretty_print = enabled;
        self
    }

    pub fn strip_block_markers(mut self, enabled: bool) -> Self {
        self.opts.strip_block_markers = enabled;
        self
    }

    /// Select the marker policy. Has no effect unless markers are being stripped.
    pub fn marker_policy(mut self, policy: MarkerPolicy) -> Self {
        self.opts.marker_policy = policy;
        self
    }

    pub fn extract_markers(mut self, enabled: bool) -> Self {
        self.opts.extract_markers = enabled;
        self
    }

    pub fn deep_empty_check(mut self, enabled: bool) -> Self {
        self.opts.deep_empty_check = enabled;
        self
    }

    pub fn compact_markers(mut self, enabled: bool) -> Self {
        self.opts.compact_markers = enabled;
        self
    }

    pub fn parser(mut self, choice: ParserChoice) -> Self {
        self.opts.parser = choice;
        self
    }

    /// Shorthand for `parser(ParserChoice::Named(kind))`.
    pub fn prefer_parser(self, kind: ParserKind) -> Self {
        self.parser(ParserChoice::Named(kind))
    }

    /// Set the fixed-point pass cap. Values below 1 are raised to 1.
    pub fn max_iterations(mut self, cap: usize) -> Self {
        self.opts.max_iterations = cap.max(1);
        self
    }

    pub fn build(self) -> Options {
        self.opts
    }
}
