// ABOUTME: Fixed-point rewrite of <p> elements: comment-only and empty removal, unwrapping.
// ABOUTME: Each pass snapshots attached paragraphs in pre-order, then applies the first matching rule.

use std::collections::HashSet;
use std::ops::AddAssign;

use crate::dom::predicates::{
    is_comment_only, is_effectively_empty, is_truly_empty, wraps_blocks_only,
};
use crate::dom::{Document, NodeId};
use crate::options::Options;

const TARGET: &str = "gutenclean::paragraphs";

/// Counters for one normalizer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParagraphStats {
    pub comment_only_removed: usize,
    pub empty_removed: usize,
    pub unwrapped_blockwrap: usize,
    pub nested_unwrapped: usize,
    pub markers_extracted: usize,
    /// Passes run, including the final one that found nothing to do.
    pub iterations: usize,
    /// The last permitted pass still changed the tree.
    pub cap_reached: bool,
}

impl ParagraphStats {
    /// Rewrites performed, not counting passes.
    pub fn changes(&self) -> usize {
        self.comment_only_removed
            + self.empty_removed
            + self.unwrapped_blockwrap
            + self.nested_unwrapped
            + self.markers_extracted
    }
}

impl AddAssign for ParagraphStats {
    fn add_assign(&mut self, other: Self) {
        self.comment_only_removed += other.comment_only_removed;
        self.empty_removed += other.empty_removed;
        self.unwrapped_blockwrap += other.unwrapped_blockwrap;
        self.nested_unwrapped += other.nested_unwrapped;
        self.markers_extracted += other.markers_extracted;
        self.iterations += other.iterations;
        self.cap_reached |= other.cap_reached;
    }
}

/// Rewrite paragraphs until nothing changes or `options.max_iterations` passes have run.
pub fn normalize_paragraphs(doc: &mut Document, options: &Options) -> ParagraphStats {
    let cap = options.max_iterations.max(1);
    let mut stats = ParagraphStats::default();

    for pass in 1..=cap {
        let before = stats.changes();
        run_pass(doc, options, &mut stats);
        stats.iterations = pass;
        let changed = stats.changes() - before;
        log::debug!(target: TARGET, "pass {}: {} change(s)", pass, changed);
        if changed == 0 {
            return stats;
        }
    }

    stats.cap_reached = true;
    log::warn!(target: TARGET, "still changing after {} passes, stopping", cap);
    stats
}

fn run_pass(doc: &mut Document, options: &Options, stats: &mut ParagraphStats) {
    let emptied = if options.extract_markers {
        extract_markers(doc, stats)
    } else {
        HashSet::new()
    };

    for p in doc.elements_named("p") {
        if !doc.is_attached(p) {
            continue;
        }

        if is_comment_only(doc, p) || (emptied.contains(&p) && is_truly_empty(doc, p)) {
            log::trace!(target: TARGET, "removing comment-only paragraph {:?}", p);
            doc.remove(p);
            stats.comment_only_removed += 1;
            continue;
        }

        if options.remove_empty
            && (is_truly_empty(doc, p) || (options.deep_empty_check && is_effectively_empty(doc, p)))
        {
            log::trace!(target: TARGET, "removing empty paragraph {:?}", p);
            doc.remove(p);
            stats.empty_removed += 1;
            continue;
        }

        if options.unwrap_block_wrapped_paragraphs && wraps_blocks_only(doc, p) {
            log::trace!(target: TARGET, "unwrapping block-wrapping paragraph {:?}", p);
            doc.unwrap(p);
            stats.unwrapped_blockwrap += 1;
            continue;
        }

        stats.nested_unwrapped += unwrap_nested(doc, p);
    }
}

/// Move every marker that is a direct child of a paragraph to just after that paragraph.
/// Returns the paragraphs that held markers.
fn extract_markers(doc: &mut Document, stats: &mut ParagraphStats) -> HashSet<NodeId> {
    let mut touched = HashSet::new();
    for p in doc.elements_named("p") {
        let markers: Vec<NodeId> = doc
            .children(p)
            .into_iter()
            .filter(|id| doc.node(*id).is_some_and(|n| n.is_marker()))
            .collect();
        if markers.is_empty() {
            continue;
        }

        let mut anchor = p;
        for marker in markers {
            if doc.move_after(marker, anchor) {
                anchor = marker;
                stats.markers_extracted += 1;
            }
        }
        log::trace!(target: TARGET, "extracted markers out of paragraph {:?}", p);
        touched.insert(p);
    }
    touched
}

fn unwrap_nested(doc: &mut Document, p: NodeId) -> usize {
    let nested: Vec<NodeId> = match doc.get(p) {
        Some(node) => node
            .descendants()
            .skip(1)
            .filter(|d| d.value().is_element_named("p"))
            .map(|d| d.id())
            .collect(),
        None => return 0,
    };

    let mut unwrapped = 0;
    for inner in nested {
        if doc.unwrap(inner) {
            log::trace!(target: TARGET, "unwrapped paragraph {:?} nested in {:?}", inner, p);
            unwrapped += 1;
        }
    }
    unwrapped
}
