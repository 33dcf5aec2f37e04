// ABOUTME: Main library entry point for the gutenclean HTML normalizer.
// ABOUTME: Re-exports the public API: normalize, Options, OptionsBuilder, Normalized, Stats, and the error types.

//! gutenclean - normalizes word-processor and Gutenberg block editor HTML so it can be
//! re-imported into a block-based CMS.
//!
//! The pipeline parses the input, rewrites `<p>` elements to a fixed point (nested,
//! empty, marker-only and block-wrapping paragraphs), sweeps block marker comments and
//! empty `wp-block-*` containers, and serializes the result.
//!
//! # Example
//!
//! ```
//! use gutenclean_core::{normalize, Options};
//!
//! let result = normalize("<p></p><p>Content</p>", &Options::default());
//! assert!(result.is_ok());
//! assert_eq!(result.html, "<p>Content</p>");
//! assert_eq!(result.stats.p_empty_removed, Some(1));
//! ```

pub mod dom;
pub mod error;
pub mod input;
pub mod normalize;
pub mod options;
pub mod parse;
pub mod pipeline;
pub mod result;
pub mod serialize;
pub mod stats;

pub use crate::error::{ErrorCode, NormalizeError, ParseError, Warning};
pub use crate::input::decode_input;
pub use crate::options::{MarkerPolicy, Options, OptionsBuilder, MAX_ITERATIONS};
pub use crate::parse::{ParserChoice, ParserKind, MAX_NESTING_DEPTH};
pub use crate::pipeline::{normalize, normalize_batch, normalize_bytes, MIN_MEANINGFUL_LEN};
pub use crate::result::Normalized;
pub use crate::serialize::{compact_markers, prettify, serialize_fragment};
pub use crate::stats::Stats;
