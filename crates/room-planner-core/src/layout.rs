/// Room layout model: floors and the furniture placed on them.
///
/// A `RoomLayout` is the snapshot type recorded by the editor history.
/// It is plain data; edits are performed on a clone and committed whole.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default floor width in meters.
const DEFAULT_FLOOR_WIDTH: f32 = 5.0;

/// Default floor depth in meters.
const DEFAULT_FLOOR_DEPTH: f32 = 4.0;

/// A catalog item placed on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: Uuid,
    /// Catalog product identifier.
    pub catalog_id: String,
    /// Position in meters relative to the floor origin (x, y, z).
    pub position: [f32; 3],
    /// Rotation around the vertical axis, in `[0, 360)`.
    pub rotation_deg: f32,
}

/// One floor of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: Uuid,
    pub name: String,
    /// Extent along x, in meters.
    pub width: f32,
    /// Extent along z, in meters.
    pub depth: f32,
    pub furniture: Vec<FurnitureItem>,
}

impl Floor {
    /// Creates an empty floor with a fresh id.
    pub fn new(name: impl Into<String>, width: f32, depth: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width,
            depth,
            furniture: Vec::new(),
        }
    }

    /// Floor area in square meters.
    pub fn area(&self) -> f32 {
        self.width * self.depth
    }

    pub fn find_item(&self, id: Uuid) -> Option<&FurnitureItem> {
        self.furniture.iter().find(|f| f.id == id)
    }
}

/// The full editable state of a room: an ordered list of floors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomLayout {
    pub floors: Vec<Floor>,
}

impl RoomLayout {
    /// A layout with no floors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The starting layout for a new room: a single empty ground floor.
    pub fn default_room() -> Self {
        Self {
            floors: vec![Floor::new(
                "Ground floor",
                DEFAULT_FLOOR_WIDTH,
                DEFAULT_FLOOR_DEPTH,
            )],
        }
    }

    pub fn floor(&self, id: Uuid) -> Option<&Floor> {
        self.floors.iter().find(|f| f.id == id)
    }

    pub(crate) fn floor_mut(&mut self, id: Uuid) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|f| f.id == id)
    }

    /// Total number of furniture items across all floors.
    pub fn item_count(&self) -> usize {
        self.floors.iter().map(|f| f.furniture.len()).sum()
    }

    /// Locates an item by id, returning the owning floor's index too.
    pub fn find_item(&self, id: Uuid) -> Option<(usize, &FurnitureItem)> {
        self.floors
            .iter()
            .enumerate()
            .find_map(|(i, floor)| floor.find_item(id).map(|item| (i, item)))
    }

    pub(crate) fn item_mut(&mut self, id: Uuid) -> Option<&mut FurnitureItem> {
        self.floors
            .iter_mut()
            .flat_map(|f| f.furniture.iter_mut())
            .find(|item| item.id == id)
    }
}

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
