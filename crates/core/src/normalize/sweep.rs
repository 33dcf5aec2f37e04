// ABOUTME: Post-normalization sweep: block marker removal by policy and empty wp-block container removal.
// ABOUTME: Runs once over the tree the paragraph normalizer left behind.

use std::ops::AddAssign;

use crate::dom::predicates::{is_empty_block_container, is_visually_empty};
use crate::dom::{Document, MarkerKind, NodeId};
use crate::options::{MarkerPolicy, Options};

const TARGET: &str = "gutenclean::sweep";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub comments_stripped: usize,
    pub regions_removed: usize,
    pub empty_blocks_removed: usize,
}

impl AddAssign for SweepStats {
    fn add_assign(&mut self, other: Self) {
        self.comments_stripped += other.comments_stripped;
        self.regions_removed += other.regions_removed;
        self.empty_blocks_removed += other.empty_blocks_removed;
    }
}

pub fn sweep(doc: &mut Document, options: &Options) -> SweepStats {
    let mut stats = SweepStats::default();
    if options.strip_block_markers {
        match options.marker_policy {
            MarkerPolicy::StripAll => stats.comments_stripped = strip_all_markers(doc),
            MarkerPolicy::EmptyRegions => stats.regions_removed = strip_empty_regions(doc),
        }
    }
    stats.empty_blocks_removed = remove_empty_containers(doc);
    log::debug!(
        target: TARGET,
        "markers stripped: {}, regions removed: {}, empty containers removed: {}",
        stats.comments_stripped,
        stats.regions_removed,
        stats.empty_blocks_removed
    );
    stats
}

/// Remove every block marker in the document. Other comments stay.
pub fn strip_all_markers(doc: &mut Document) -> usize {
    let markers: Vec<NodeId> = doc
        .nodes()
        .into_iter()
        .filter(|id| doc.node(*id).is_some_and(|n| n.is_marker()))
        .collect();
    markers.into_iter().filter(|id| doc.remove(*id)).count()
}

/// Remove open/close marker pairs among the content root's children when everything
/// between them is visually empty. Returns the number of regions removed.
pub fn strip_empty_regions(doc: &mut Document) -> usize {
    let siblings = doc.children(doc.content_root());
    let kind_at = |doc: &Document, i: usize| doc.node(siblings[i]).and_then(|n| n.marker_kind());

    let mut removed = 0;
    let mut i = 0;
    while i < siblings.len() {
        if kind_at(doc, i) != Some(MarkerKind::Open) {
            i += 1;
            continue;
        }
        let close = (i + 1..siblings.len()).find(|&j| kind_at(doc, j) == Some(MarkerKind::Close));
        let Some(close) = close else {
            i += 1;
            continue;
        };
        let empty = siblings[i + 1..close]
            .iter()
            .all(|id| doc.get(*id).is_some_and(is_visually_empty));
        if !empty {
            i += 1;
            continue;
        }

        log::trace!(target: TARGET, "removing empty marker region {}..={}", i, close);
        for id in &siblings[i..=close] {
            doc.remove(*id);
        }
        removed += 1;
        i = close + 1;
    }
    removed
}

/// Remove `wp-block-*` containers left without content. Descendants are visited before
/// their ancestors so that nested empty containers all go in one sweep.
pub fn remove_empty_containers(doc: &mut Document) -> usize {
    let mut removed = 0;
    for id in doc.elements().into_iter().rev() {
        if doc.is_attached(id) && is_empty_block_container(doc, id) && doc.remove(id) {
            log::trace!(target: TARGET, "removed empty block container {:?}", id);
            removed += 1;
        }
    }
    removed
}
