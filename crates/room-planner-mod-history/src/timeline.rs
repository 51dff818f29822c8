/// Immutable snapshot timeline with a cursor.
///
/// Every transition returns a new `Timeline` and leaves the receiver
/// untouched. Snapshots are shared between timelines through `Arc`, so
/// cloning a timeline never copies the snapshots themselves.
use std::fmt;
use std::sync::Arc;

use crate::config::{DedupPolicy, HistoryConfig};

/// Linear undo/redo history over immutable snapshots of `T`.
///
/// Always holds at least one snapshot. The snapshot at the cursor is the
/// current state. Recording after an undo discards every snapshot ahead
/// of the cursor.
pub struct Timeline<T> {
    /// Chronological snapshots, oldest first. Never empty.
    snapshots: Vec<Arc<T>>,
    /// Index of the current snapshot, always `< snapshots.len()`.
    cursor: usize,
    config: HistoryConfig,
}

impl<T> Clone for Timeline<T> {
    fn clone(&self) -> Self {
        Self {
            snapshots: self.snapshots.clone(),
            cursor: self.cursor,
            config: self.config,
        }
    }
}

impl<T: PartialEq> PartialEq for Timeline<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cursor == other.cursor
            && self.config == other.config
            && self.snapshots == other.snapshots
    }
}

impl<T: Eq> Eq for Timeline<T> {}

impl<T: fmt::Debug> fmt::Debug for Timeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("len", &self.snapshots.len())
            .field("cursor", &self.cursor)
            .field("current", self.current())
            .field("config", &self.config)
            .finish()
    }
}

impl<T> Timeline<T> {
    /// Creates a timeline holding only `initial`, using the default config.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    /// Creates a timeline holding only `initial`.
    pub fn with_config(initial: T, config: HistoryConfig) -> Self {
        Self {
            snapshots: vec![Arc::new(initial)],
            cursor: 0,
            config,
        }
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Returns a shared handle to the current snapshot.
    pub fn current_shared(&self) -> Arc<T> {
        Arc::clone(&self.snapshots[self.cursor])
    }

    /// Moves the cursor one step back. No-op at the first snapshot.
    #[must_use]
    pub fn undo(&self) -> Self {
        let mut next = self.clone();
        if next.cursor > 0 {
            next.cursor -= 1;
        }
        next
    }

    /// Moves the cursor one step forward. No-op at the last snapshot.
    #[must_use]
    pub fn redo(&self) -> Self {
        let mut next = self.clone();
        if next.cursor + 1 < next.snapshots.len() {
            next.cursor += 1;
        }
        next
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of snapshots on the timeline, including the current one.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// A timeline is never empty; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of `undo` steps available.
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Number of `redo` steps available.
    pub fn redo_depth(&self) -> usize {
        self.snapshots.len() - 1 - self.cursor
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Iterates over all snapshots, oldest first, including redo entries.
    pub fn snapshots(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.snapshots.iter().map(|s| s.as_ref())
    }

    /// Appends `next` after the cursor, cutting off any redo branch.
    fn push(&self, next: T) -> Self {
        let mut snapshots = Vec::with_capacity(self.cursor + 2);
        snapshots.extend(self.snapshots[..=self.cursor].iter().cloned());
        snapshots.push(Arc::new(next));

        if let Some(limit) = self.config.depth_limit() {
            if snapshots.len() > limit {
                let excess = snapshots.len() - limit;
                snapshots.drain(..excess);
            }
        }

        Self {
            cursor: snapshots.len() - 1,
            snapshots,
            config: self.config,
        }
    }
}

impl<T: PartialEq> Timeline<T> {
    /// Records `next` as the new current snapshot.
    ///
    /// Snapshots after the cursor are discarded. Under
    /// [`DedupPolicy::SkipUnchanged`] a `next` equal to the current
    /// snapshot returns the timeline unchanged.
    #[must_use]
    pub fn set(&self, next: T) -> Self {
        if self.config.dedup == DedupPolicy::SkipUnchanged && *self.current() == next {
            return self.clone();
        }
        self.push(next)
    }

    /// Builds the next snapshot from the current one and records it.
    #[must_use]
    pub fn update<F>(&self, f: F) -> Self
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(self.current());
        self.set(next)
    }
}
