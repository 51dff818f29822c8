/// Configuration for the snapshot history.
use serde::{Deserialize, Serialize};

/// Maximum number of snapshots kept per timeline.
/// Oldest snapshots are evicted when this limit is exceeded.
const DEFAULT_MAX_DEPTH: usize = 200;

/// Smallest effective depth for a bounded timeline.
const MIN_DEPTH: usize = 2;

/// What `set` does when the incoming snapshot equals the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Identical consecutive snapshots are not recorded.
    #[default]
    SkipUnchanged,
    /// Every `set` creates a new entry, even when nothing changed.
    RecordAll,
}

/// Configuration for a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Policy for redundant `set` calls.
    pub dedup: DedupPolicy,
    /// Max snapshots kept (current included). 0 = unbounded.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dedup: DedupPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HistoryConfig {
    /// Unbounded history that records every `set`.
    pub fn record_all() -> Self {
        Self {
            dedup: DedupPolicy::RecordAll,
            max_depth: 0,
        }
    }

    /// Returns the snapshot limit, or `None` when unbounded.
    ///
    /// Never below 2: the current snapshot plus one undo step, so a
    /// recorded `set` always leaves something to undo.
    pub fn depth_limit(&self) -> Option<usize> {
        match self.max_depth {
            0 => None,
            n => Some(n.max(MIN_DEPTH)),
        }
    }
}
