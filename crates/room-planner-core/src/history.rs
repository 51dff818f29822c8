// Re-exports from room-planner-mod-history, specialized for room layouts.
pub use room_planner_mod_history::{
    Autosave, DedupPolicy, HistoryConfig, HistoryStore, SnapshotSink, Timeline,
};

use crate::layout::RoomLayout;

/// Timeline of room layouts as recorded by the editor.
pub type LayoutTimeline = Timeline<RoomLayout>;
