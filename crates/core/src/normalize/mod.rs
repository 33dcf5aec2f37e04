// ABOUTME: Tree rewrite stages: the paragraph normalizer followed by the marker and container sweep.
// ABOUTME: Both stages mutate a Document in place and report counters.

pub mod paragraphs;
pub mod sweep;

pub use self::paragraphs::{normalize_paragraphs, ParagraphStats};
pub use self::sweep::{sweep, SweepStats};
