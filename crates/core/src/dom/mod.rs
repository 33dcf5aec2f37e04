// ABOUTME: Document model for the cleaner: arena tree, node payloads, and content predicates.
// ABOUTME: Everything above the parsers works on this model rather than on a parser's own tree.

//! Mutable document model.
//!
//! A [`Document`] is an arena of [`Node`]s addressed by stable `NodeId`s. Passes take a
//! snapshot of ids, then mutate; an id whose node was removed by an earlier step is simply
//! detached, and every structural operation on it reports `false` instead of failing.

pub mod node;
pub mod predicates;
pub mod tree;

pub use ego_tree::NodeId;

pub use self::node::{marker_kind, Element, MarkerKind, Node};
pub use self::tree::Document;
