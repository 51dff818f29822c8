// Integration tests for editing sessions.
//
// These drive a `RoomEditor` through scripted sessions and checkpoint the
// result to disk, the way the planner binary does.

use std::time::{Duration, Instant};

use room_planner_core::history::{Autosave, DedupPolicy, HistoryConfig};
use room_planner_core::{parse_script, JsonLayoutFile, RoomEditor, RoomLayout};

const SCRIPT: &str = r#"[
    {"op": "add_floor", "name": "Upstairs", "width": 4.0, "depth": 3.5},
    {"op": "place", "floor": 0, "catalog_id": "sofa-3s", "position": [1.0, 0.0, 1.5]},
    {"op": "place", "floor": 0, "catalog_id": "coffee-table"},
    {"op": "place", "floor": 1, "catalog_id": "bed-queen", "rotation_deg": -90.0},
    {"op": "move", "floor": 0, "item": 1, "position": [1.0, 0.0, 2.5]},
    {"op": "undo"},
    {"op": "undo"},
    {"op": "place", "floor": 1, "catalog_id": "wardrobe"},
    {"op": "redo"}
]"#;

fn run(script: &str, editor: &mut RoomEditor) {
    for command in parse_script(script).unwrap() {
        command.apply(editor).unwrap();
    }
}

#[test]
fn test_scripted_session_cuts_redo_branch() {
    let mut editor = RoomEditor::default();
    run(SCRIPT, &mut editor);

    let layout = editor.layout();
    assert_eq!(layout.floors.len(), 2);
    // The bed placement and the table move were undone, then replaced.
    let upstairs: Vec<_> = layout.floors[1]
        .furniture
        .iter()
        .map(|f| f.catalog_id.as_str())
        .collect();
    assert_eq!(upstairs, vec!["wardrobe"]);
    assert_eq!(layout.floors[0].furniture[1].position, [0.0, 0.0, 0.0]);
    assert!(!editor.can_redo());
    assert_eq!(editor.timeline().undo_depth(), 4);
}

#[test]
fn test_undo_everything_returns_to_default_room() {
    let initial = RoomLayout::default_room();
    let mut editor = RoomEditor::new(initial.clone(), HistoryConfig::default());
    run(SCRIPT, &mut editor);

    while editor.undo() {}
    assert_eq!(editor.layout(), &initial);
    assert!(!editor.can_undo());
}

#[test]
fn test_bounded_history_drops_oldest_edits() {
    let config = HistoryConfig {
        dedup: DedupPolicy::SkipUnchanged,
        max_depth: 3,
    };
    let mut editor = RoomEditor::new(RoomLayout::default_room(), config);
    run(SCRIPT, &mut editor);

    let mut steps = 0;
    while editor.undo() {
        steps += 1;
    }
    // Only the snapshot before the wardrobe placement survives the cut.
    assert_eq!(steps, 1);
    assert_eq!(editor.layout().floors.len(), 2);
}

#[test]
fn test_checkpoint_writes_current_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = JsonLayoutFile::new(dir.path().join("room.json"));

    let mut editor = RoomEditor::default();
    assert!(!editor.checkpoint(&mut sink).unwrap());
    run(SCRIPT, &mut editor);
    assert!(editor.checkpoint(&mut sink).unwrap());

    let restored = sink.load().unwrap();
    assert_eq!(&restored, editor.layout());

    let mut reopened = RoomEditor::default();
    reopened.load(restored);
    assert_eq!(reopened.layout(), editor.layout());
    assert!(!reopened.can_undo());
}

#[test]
fn test_autosave_tick_persists_after_interval() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("autosave.json");
    let mut sink = JsonLayoutFile::new(&path);

    let start = Instant::now();
    let mut autosave = Autosave::new(Duration::from_secs(30), start);
    let mut editor = RoomEditor::default();
    run(SCRIPT, &mut editor);

    assert!(!editor
        .autosave_tick(&mut autosave, start + Duration::from_secs(10), &mut sink)
        .unwrap());
    assert!(!path.exists());

    assert!(editor
        .autosave_tick(&mut autosave, start + Duration::from_secs(31), &mut sink)
        .unwrap());
    assert_eq!(&sink.load().unwrap(), editor.layout());
    assert!(!editor.history().is_dirty());
}
