/// Periodic checkpointing of the current snapshot.
///
/// The history never persists anything itself. The consumer supplies a
/// [`SnapshotSink`] and drives [`Autosave::tick`] from its own timer.
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::store::HistoryStore;

/// Receives the current snapshot whenever a checkpoint is taken.
pub trait SnapshotSink<T: ?Sized> {
    /// Persists `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be stored.
    fn save(&mut self, snapshot: &T) -> Result<()>;
}

impl<T, F> SnapshotSink<T> for F
where
    T: ?Sized,
    F: FnMut(&T) -> Result<()>,
{
    fn save(&mut self, snapshot: &T) -> Result<()> {
        self(snapshot)
    }
}

/// Interval-based checkpoint scheduler.
#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    enabled: bool,
    last_save: Instant,
}

impl Autosave {
    /// Creates a scheduler whose first checkpoint is due `interval` after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            enabled: true,
            last_save: now,
        }
    }

    /// Creates a scheduler that never fires.
    pub fn disabled(now: Instant) -> Self {
        Self {
            interval: Duration::MAX,
            enabled: false,
            last_save: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the interval has elapsed since the last checkpoint attempt.
    pub fn is_due(&self, now: Instant) -> bool {
        self.enabled && now.saturating_duration_since(self.last_save) >= self.interval
    }

    /// Checkpoints `store` into `sink` if the interval has elapsed.
    ///
    /// Returns whether a snapshot was saved. A clean store resets the
    /// interval without calling the sink. A failed save keeps the previous
    /// timestamp so the next tick retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails to save.
    pub fn tick<T, S>(
        &mut self,
        now: Instant,
        store: &mut HistoryStore<T>,
        sink: &mut S,
    ) -> Result<bool>
    where
        S: SnapshotSink<T> + ?Sized,
    {
        if !self.is_due(now) {
            return Ok(false);
        }
        let saved = store.checkpoint(sink)?;
        self.last_save = now;
        Ok(saved)
    }
}
