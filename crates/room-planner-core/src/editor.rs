//! A `RoomEditor` ties a `RoomLayout` to its undo/redo history.
//!
//! Each edit clones the current layout, applies the change to the clone,
//! and commits the result as a new snapshot, so every edit is exactly one
//! undo step. Edits that fail validation leave the history untouched.

use std::time::Instant;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use crate::history::{Autosave, HistoryConfig, HistoryStore, LayoutTimeline, SnapshotSink};
use crate::layout::{normalize_degrees, Floor, FurnitureItem, RoomLayout};

/// Editing session over a single room layout.
#[derive(Debug)]
pub struct RoomEditor {
    history: HistoryStore<RoomLayout>,
}

impl Default for RoomEditor {
    fn default() -> Self {
        Self::new(RoomLayout::default_room(), HistoryConfig::default())
    }
}

impl RoomEditor {
    /// Starts a session from `initial`.
    pub fn new(initial: RoomLayout, config: HistoryConfig) -> Self {
        Self {
            history: HistoryStore::with_config(initial, config),
        }
    }

    /// Returns the current layout.
    pub fn layout(&self) -> &RoomLayout {
        self.history.current()
    }

    pub fn history(&self) -> &HistoryStore<RoomLayout> {
        &self.history
    }

    /// Returns the recorded layout timeline.
    pub fn timeline(&self) -> &LayoutTimeline {
        self.history.timeline()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Reverts the last edit. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    /// Re-applies the last undone edit. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// Replaces the layout and discards all history.
    pub fn load(&mut self, layout: RoomLayout) {
        tracing::info!(floors = layout.floors.len(), "Loading room layout");
        self.history.reset(layout);
    }

    /// Adds a floor at the end of the floor list.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is not a positive finite number.
    pub fn add_floor(&mut self, name: &str, width: f32, depth: f32) -> Result<Uuid> {
        validate_dimensions(width, depth)?;
        self.commit("add_floor", |layout| {
            let floor = Floor::new(name, width, depth);
            let id = floor.id;
            layout.floors.push(floor);
            Ok(id)
        })
    }

    /// # Errors
    ///
    /// Returns an error if no floor has the given id.
    pub fn rename_floor(&mut self, floor_id: Uuid, name: &str) -> Result<()> {
        self.commit("rename_floor", |layout| {
            floor_mut(layout, floor_id)?.name = name.to_string();
            Ok(())
        })
    }

    /// Changes a floor's dimensions. Furniture positions are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the floor does not exist or the dimensions are invalid.
    pub fn resize_floor(&mut self, floor_id: Uuid, width: f32, depth: f32) -> Result<()> {
        validate_dimensions(width, depth)?;
        self.commit("resize_floor", |layout| {
            let floor = floor_mut(layout, floor_id)?;
            floor.width = width;
            floor.depth = depth;
            Ok(())
        })
    }

    /// Removes a floor together with its furniture.
    ///
    /// # Errors
    ///
    /// Returns an error if no floor has the given id.
    pub fn remove_floor(&mut self, floor_id: Uuid) -> Result<()> {
        self.commit("remove_floor", |layout| {
            let before = layout.floors.len();
            layout.floors.retain(|f| f.id != floor_id);
            if layout.floors.len() == before {
                bail!("Unknown floor: {floor_id}");
            }
            Ok(())
        })
    }

    /// Places a catalog item on a floor and returns the new item's id.
    ///
    /// # Errors
    ///
    /// Returns an error if no floor has the given id or the position or
    /// rotation is not finite.
    pub fn place_furniture(
        &mut self,
        floor_id: Uuid,
        catalog_id: &str,
        position: [f32; 3],
        rotation_deg: f32,
    ) -> Result<Uuid> {
        validate_position(position)?;
        validate_rotation(rotation_deg)?;
        self.commit("place_furniture", |layout| {
            let item = FurnitureItem {
                id: Uuid::new_v4(),
                catalog_id: catalog_id.to_string(),
                position,
                rotation_deg: normalize_degrees(rotation_deg),
            };
            let id = item.id;
            floor_mut(layout, floor_id)?.furniture.push(item);
            Ok(id)
        })
    }

    /// # Errors
    ///
    /// Returns an error if no item has the given id or the position is not finite.
    pub fn move_furniture(&mut self, item_id: Uuid, position: [f32; 3]) -> Result<()> {
        validate_position(position)?;
        self.commit("move_furniture", |layout| {
            item_mut(layout, item_id)?.position = position;
            Ok(())
        })
    }

    /// Sets an item's rotation, normalized into `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns an error if no item has the given id or the angle is not finite.
    pub fn rotate_furniture(&mut self, item_id: Uuid, rotation_deg: f32) -> Result<()> {
        validate_rotation(rotation_deg)?;
        self.commit("rotate_furniture", |layout| {
            item_mut(layout, item_id)?.rotation_deg = normalize_degrees(rotation_deg);
            Ok(())
        })
    }

    /// # Errors
    ///
    /// Returns an error if no item has the given id.
    pub fn remove_furniture(&mut self, item_id: Uuid) -> Result<()> {
        self.commit("remove_furniture", |layout| {
            for floor in &mut layout.floors {
                if let Some(idx) = floor.furniture.iter().position(|f| f.id == item_id) {
                    floor.furniture.remove(idx);
                    return Ok(());
                }
            }
            bail!("Unknown furniture item: {item_id}")
        })
    }

    /// Hands the current layout to `sink` if it changed since the last save.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn checkpoint<S>(&mut self, sink: &mut S) -> Result<bool>
    where
        S: SnapshotSink<RoomLayout> + ?Sized,
    {
        self.history.checkpoint(sink)
    }

    /// Runs one autosave tick against this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn autosave_tick<S>(
        &mut self,
        autosave: &mut Autosave,
        now: Instant,
        sink: &mut S,
    ) -> Result<bool>
    where
        S: SnapshotSink<RoomLayout> + ?Sized,
    {
        autosave.tick(now, &mut self.history, sink)
    }

    /// Applies `edit` to a copy of the current layout and records the copy.
    fn commit<R, F>(&mut self, action: &str, edit: F) -> Result<R>
    where
        F: FnOnce(&mut RoomLayout) -> Result<R>,
    {
        let mut next = self.history.current().clone();
        let out = edit(&mut next).with_context(|| format!("Edit '{action}' rejected"))?;
        if !self.history.set(next) {
            tracing::debug!(action, "Edit produced no change");
        }
        Ok(out)
    }
}

fn floor_mut(layout: &mut RoomLayout, floor_id: Uuid) -> Result<&mut Floor> {
    match layout.floor_mut(floor_id) {
        Some(floor) => Ok(floor),
        None => bail!("Unknown floor: {floor_id}"),
    }
}

fn item_mut(layout: &mut RoomLayout, item_id: Uuid) -> Result<&mut FurnitureItem> {
    match layout.item_mut(item_id) {
        Some(item) => Ok(item),
        None => bail!("Unknown furniture item: {item_id}"),
    }
}

fn validate_dimensions(width: f32, depth: f32) -> Result<()> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(width) || !valid(depth) {
        bail!("Floor dimensions must be positive, got {width} x {depth}");
    }
    Ok(())
}

fn validate_position(position: [f32; 3]) -> Result<()> {
    if !position.iter().all(|v| v.is_finite()) {
        bail!("Furniture position must be finite, got {position:?}");
    }
    Ok(())
}

fn validate_rotation(rotation_deg: f32) -> Result<()> {
    if !rotation_deg.is_finite() {
        bail!("Furniture rotation must be finite, got {rotation_deg}");
    }
    Ok(())
}
