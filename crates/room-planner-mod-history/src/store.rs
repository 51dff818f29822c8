/// Session-level owner of a snapshot timeline.
///
/// `HistoryStore` holds the latest `Timeline` for one editing session and
/// swaps it on every transition. It also tracks whether the current state
/// has been handed to a sink since it last changed.
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::autosave::SnapshotSink;
use crate::config::HistoryConfig;
use crate::timeline::Timeline;

/// Manages undo/redo history for a single editing session.
pub struct HistoryStore<T> {
    timeline: Timeline<T>,
    /// Incremented on every transition that changed the timeline.
    revision: u64,
    /// Whether the current snapshot changed since the last checkpoint.
    dirty: bool,
}

impl<T> std::fmt::Debug for HistoryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("len", &self.timeline.len())
            .field("cursor", &self.timeline.cursor())
            .field("revision", &self.revision)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<T> HistoryStore<T> {
    /// Creates a store with default config.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    pub fn with_config(initial: T, config: HistoryConfig) -> Self {
        Self {
            timeline: Timeline::with_config(initial, config),
            revision: 0,
            dirty: false,
        }
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> &T {
        self.timeline.current()
    }

    /// Returns the held timeline.
    pub fn timeline(&self) -> &Timeline<T> {
        &self.timeline
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn can_undo(&self) -> bool {
        self.timeline.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.timeline.can_redo()
    }

    /// Steps back one snapshot. Returns `false` if already at the start.
    pub fn undo(&mut self) -> bool {
        if !self.timeline.can_undo() {
            tracing::trace!("Undo ignored: at oldest snapshot");
            return false;
        }
        self.timeline = self.timeline.undo();
        self.mark_changed("undo");
        true
    }

    /// Steps forward one snapshot. Returns `false` if already at the tail.
    pub fn redo(&mut self) -> bool {
        if !self.timeline.can_redo() {
            tracing::trace!("Redo ignored: at newest snapshot");
            return false;
        }
        self.timeline = self.timeline.redo();
        self.mark_changed("redo");
        true
    }

    /// Discards all history and starts over from `initial`.
    ///
    /// The config is kept. The store is marked dirty since the current
    /// snapshot was replaced.
    pub fn reset(&mut self, initial: T) {
        self.timeline = Timeline::with_config(initial, *self.timeline.config());
        self.mark_changed("reset");
    }

    /// Hands the current snapshot to `sink` if it changed since the last
    /// checkpoint.
    ///
    /// Returns whether a save happened. On error the store stays dirty.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails to save.
    pub fn checkpoint<S>(&mut self, sink: &mut S) -> Result<bool>
    where
        S: SnapshotSink<T> + ?Sized,
    {
        if !self.dirty {
            return Ok(false);
        }
        sink.save(self.timeline.current())
            .with_context(|| format!("Failed to checkpoint revision {}", self.revision))?;
        self.dirty = false;
        tracing::debug!(revision = self.revision, "History checkpoint saved");
        Ok(true)
    }

    fn mark_changed(&mut self, action: &str) {
        self.revision += 1;
        self.dirty = true;
        tracing::debug!(
            action,
            revision = self.revision,
            cursor = self.timeline.cursor(),
            len = self.timeline.len(),
            "History transition"
        );
    }
}

impl<T: PartialEq> HistoryStore<T> {
    /// Records `next` as the current snapshot.
    ///
    /// Returns `false` when the dedup policy skipped it.
    pub fn set(&mut self, next: T) -> bool {
        let timeline = self.timeline.set(next);
        // A recorded snapshot always gets a fresh allocation.
        if Arc::ptr_eq(&timeline.current_shared(), &self.timeline.current_shared()) {
            tracing::trace!("Set ignored: snapshot unchanged");
            return false;
        }
        self.timeline = timeline;
        self.mark_changed("set");
        true
    }

    /// Builds the next snapshot from the current one and records it.
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(self.timeline.current());
        self.set(next)
    }
}
