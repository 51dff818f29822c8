/// Serializable edit commands for scripted editing sessions.
///
/// Floors and items are addressed by position rather than id so that a
/// script gives the same result on every run, even though ids are random.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::RoomEditor;

/// One step of an editing script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    AddFloor {
        name: String,
        width: f32,
        depth: f32,
    },
    RenameFloor {
        floor: usize,
        name: String,
    },
    ResizeFloor {
        floor: usize,
        width: f32,
        depth: f32,
    },
    RemoveFloor {
        floor: usize,
    },
    Place {
        floor: usize,
        catalog_id: String,
        #[serde(default)]
        position: [f32; 3],
        #[serde(default)]
        rotation_deg: f32,
    },
    Move {
        floor: usize,
        item: usize,
        position: [f32; 3],
    },
    Rotate {
        floor: usize,
        item: usize,
        rotation_deg: f32,
    },
    Remove {
        floor: usize,
        item: usize,
    },
    Undo,
    Redo,
}

impl EditCommand {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddFloor { .. } => "add_floor",
            Self::RenameFloor { .. } => "rename_floor",
            Self::ResizeFloor { .. } => "resize_floor",
            Self::RemoveFloor { .. } => "remove_floor",
            Self::Place { .. } => "place",
            Self::Move { .. } => "move",
            Self::Rotate { .. } => "rotate",
            Self::Remove { .. } => "remove",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    /// Applies this command to `editor`.
    ///
    /// `Undo` and `Redo` at a history boundary are no-ops, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of range or the edit is rejected.
    pub fn apply(&self, editor: &mut RoomEditor) -> Result<()> {
        match self {
            Self::AddFloor { name, width, depth } => {
                editor.add_floor(name, *width, *depth)?;
            }
            Self::RenameFloor { floor, name } => {
                let id = floor_id(editor, *floor)?;
                editor.rename_floor(id, name)?;
            }
            Self::ResizeFloor {
                floor,
                width,
                depth,
            } => {
                let id = floor_id(editor, *floor)?;
                editor.resize_floor(id, *width, *depth)?;
            }
            Self::RemoveFloor { floor } => {
                let id = floor_id(editor, *floor)?;
                editor.remove_floor(id)?;
            }
            Self::Place {
                floor,
                catalog_id,
                position,
                rotation_deg,
            } => {
                let id = floor_id(editor, *floor)?;
                editor.place_furniture(id, catalog_id, *position, *rotation_deg)?;
            }
            Self::Move {
                floor,
                item,
                position,
            } => {
                let id = item_id(editor, *floor, *item)?;
                editor.move_furniture(id, *position)?;
            }
            Self::Rotate {
                floor,
                item,
                rotation_deg,
            } => {
                let id = item_id(editor, *floor, *item)?;
                editor.rotate_furniture(id, *rotation_deg)?;
            }
            Self::Remove { floor, item } => {
                let id = item_id(editor, *floor, *item)?;
                editor.remove_furniture(id)?;
            }
            Self::Undo => {
                editor.undo();
            }
            Self::Redo => {
                editor.redo();
            }
        }
        Ok(())
    }
}

/// Parses a JSON array of commands.
///
/// # Errors
///
/// Returns an error if the input is not a valid command list.
pub fn parse_script(json: &str) -> Result<Vec<EditCommand>> {
    serde_json::from_str(json).context("Failed to parse edit script")
}

fn floor_id(editor: &RoomEditor, index: usize) -> Result<Uuid> {
    let floors = &editor.layout().floors;
    floors.get(index).map(|f| f.id).ok_or_else(|| {
        anyhow!(
            "Floor index {index} out of range ({} floors)",
            floors.len()
        )
    })
}

fn item_id(editor: &RoomEditor, floor: usize, index: usize) -> Result<Uuid> {
    let floors = &editor.layout().floors;
    let f = floors.get(floor).ok_or_else(|| {
        anyhow!(
            "Floor index {floor} out of range ({} floors)",
            floors.len()
        )
    })?;
    f.furniture.get(index).map(|item| item.id).ok_or_else(|| {
        anyhow!(
            "Item index {index} out of range on floor {floor} ({} items)",
            f.furniture.len()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let json = r#"[
            {"op": "add_floor", "name": "Loft", "width": 3.0, "depth": 2.5},
            {"op": "place", "floor": 1, "catalog_id": "bed-queen"},
            {"op": "undo"},
            {"op": "redo"}
        ]"#;
        let script = parse_script(json).unwrap();
        assert_eq!(script.len(), 4);
        assert_eq!(
            script[1],
            EditCommand::Place {
                floor: 1,
                catalog_id: "bed-queen".to_string(),
                position: [0.0; 3],
                rotation_deg: 0.0,
            }
        );
        assert_eq!(script[2], EditCommand::Undo);
    }

    #[test]
    fn test_parse_unknown_op_fails() {
        let err = parse_script(r#"[{"op": "teleport"}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse edit script"));
    }

    #[test]
    fn test_apply_by_index() {
        let mut editor = RoomEditor::default();
        EditCommand::Place {
            floor: 0,
            catalog_id: "armchair".to_string(),
            position: [1.0, 0.0, 1.0],
            rotation_deg: 0.0,
        }
        .apply(&mut editor)
        .unwrap();
        EditCommand::Move {
            floor: 0,
            item: 0,
            position: [2.0, 0.0, 3.0],
        }
        .apply(&mut editor)
        .unwrap();

        let item = &editor.layout().floors[0].furniture[0];
        assert_eq!(item.position, [2.0, 0.0, 3.0]);
        assert_eq!(editor.timeline().undo_depth(), 2);
    }

    #[test]
    fn test_apply_out_of_range_index() {
        let mut editor = RoomEditor::default();
        let err = EditCommand::Remove { floor: 0, item: 3 }
            .apply(&mut editor)
            .unwrap_err();
        assert!(err.to_string().contains("Item index 3 out of range"));

        let err = EditCommand::RemoveFloor { floor: 5 }
            .apply(&mut editor)
            .unwrap_err();
        assert!(err.to_string().contains("Floor index 5 out of range"));
    }

    #[test]
    fn test_undo_at_start_is_not_an_error() {
        let mut editor = RoomEditor::default();
        assert!(EditCommand::Undo.apply(&mut editor).is_ok());
        assert!(EditCommand::Redo.apply(&mut editor).is_ok());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(EditCommand::Undo.name(), "undo");
        assert_eq!(EditCommand::RemoveFloor { floor: 0 }.name(), "remove_floor");
    }
}
