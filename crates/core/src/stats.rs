// ABOUTME: Change counters reported by one pipeline run, keyed by the stable stats vocabulary.
// ABOUTME: Counters for disabled rules are absent rather than zero.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::normalize::{ParagraphStats, SweepStats};
use crate::options::{MarkerPolicy, Options};

/// What a run changed. `None` means the producing rule was disabled by the options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub p_wp_comment_only_removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_empty_removed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_unwrapped_blockwrap: Option<usize>,
    pub p_nested_unwrapped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wp_markers_extracted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wp_comments_stripped: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wp_regions_removed: Option<usize>,
    pub empty_wp_blocks_removed: usize,
    pub iterations: usize,
}

impl Stats {
    /// Combine stage counters, keeping only the keys the options enabled.
    pub fn collect(options: &Options, paragraphs: &ParagraphStats, sweep: &SweepStats) -> Self {
        let enabled = |on: bool, value: usize| on.then_some(value);
        let strip = options.strip_block_markers;
        Self {
            p_wp_comment_only_removed: paragraphs.comment_only_removed,
            p_empty_removed: enabled(options.remove_empty, paragraphs.empty_removed),
            p_unwrapped_blockwrap: enabled(
                options.unwrap_block_wrapped_paragraphs,
                paragraphs.unwrapped_blockwrap,
            ),
            p_nested_unwrapped: paragraphs.nested_unwrapped,
            wp_markers_extracted: enabled(options.extract_markers, paragraphs.markers_extracted),
            wp_comments_stripped: enabled(
                strip && options.marker_policy == MarkerPolicy::StripAll,
                sweep.comments_stripped,
            ),
            wp_regions_removed: enabled(
                strip && options.marker_policy == MarkerPolicy::EmptyRegions,
                sweep.regions_removed,
            ),
            empty_wp_blocks_removed: sweep.empty_blocks_removed,
            iterations: paragraphs.iterations,
        }
    }

    /// Sum of every change counter. `iterations` is not a change.
    pub fn total_changes(&self) -> usize {
        self.p_wp_comment_only_removed
            + self.p_empty_removed.unwrap_or(0)
            + self.p_unwrapped_blockwrap.unwrap_or(0)
            + self.p_nested_unwrapped
            + self.wp_markers_extracted.unwrap_or(0)
            + self.wp_comments_stripped.unwrap_or(0)
            + self.wp_regions_removed.unwrap_or(0)
            + self.empty_wp_blocks_removed
    }

    /// The present keys and their values.
    pub fn to_map(&self) -> BTreeMap<&'static str, usize> {
        let entries = [
            ("p_wp_comment_only_removed", Some(self.p_wp_comment_only_removed)),
            ("p_empty_removed", self.p_empty_removed),
            ("p_unwrapped_blockwrap", self.p_unwrapped_blockwrap),
            ("p_nested_unwrapped", Some(self.p_nested_unwrapped)),
            ("wp_markers_extracted", self.wp_markers_extracted),
            ("wp_comments_stripped", self.wp_comments_stripped),
            ("wp_regions_removed", self.wp_regions_removed),
            ("empty_wp_blocks_removed", Some(self.empty_wp_blocks_removed)),
            ("iterations", Some(self.iterations)),
        ];
        entries
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_paragraphs() -> ParagraphStats {
        ParagraphStats {
            comment_only_removed: 1,
            empty_removed: 2,
            unwrapped_blockwrap: 3,
            nested_unwrapped: 4,
            markers_extracted: 5,
            iterations: 2,
            cap_reached: false,
        }
    }

    #[test]
    fn test_default_options_keys() {
        let sweep = SweepStats {
            comments_stripped: 6,
            regions_removed: 0,
            empty_blocks_removed: 7,
        };
        let stats = Stats::collect(&Options::default(), &sample_paragraphs(), &sweep);
        let keys: Vec<&str> = stats.to_map().keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "empty_wp_blocks_removed",
                "iterations",
                "p_empty_removed",
                "p_nested_unwrapped",
                "p_unwrapped_blockwrap",
                "p_wp_comment_only_removed",
                "wp_comments_stripped",
            ]
        );
        assert_eq!(stats.total_changes(), 1 + 2 + 3 + 4 + 6 + 7);
    }

    #[test]
    fn test_disabled_rules_are_absent() {
        let opts = Options::builder()
            .remove_empty(false)
            .unwrap_block_wrapped_paragraphs(false)
            .strip_block_markers(false)
            .build();
        let stats = Stats::collect(&opts, &sample_paragraphs(), &SweepStats::default());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "p_wp_comment_only_removed": 1,
                "p_nested_unwrapped": 4,
                "empty_wp_blocks_removed": 0,
                "iterations": 2,
            })
        );
    }

    #[test]
    fn test_region_policy_reports_regions() {
        let opts = Options::builder()
            .marker_policy(MarkerPolicy::EmptyRegions)
            .extract_markers(true)
            .build();
        let sweep = SweepStats {
            regions_removed: 3,
            ..SweepStats::default()
        };
        let map = Stats::collect(&opts, &sample_paragraphs(), &sweep).to_map();
        assert_eq!(map.get("wp_regions_removed"), Some(&3));
        assert_eq!(map.get("wp_markers_extracted"), Some(&5));
        assert_eq!(map.get("wp_comments_stripped"), None);
    }
}
