/// Linear undo/redo history over immutable snapshots.
///
/// Provides a value-in/value-out `Timeline` whose transitions never mutate
/// their input, a `HistoryStore` that owns the timeline for one editing
/// session, and an `Autosave` scheduler that hands the current snapshot to
/// a consumer-supplied sink.
pub mod autosave;
pub mod config;
pub mod store;
pub mod timeline;

pub use autosave::{Autosave, SnapshotSink};
pub use config::{DedupPolicy, HistoryConfig};
pub use store::HistoryStore;
pub use timeline::Timeline;
