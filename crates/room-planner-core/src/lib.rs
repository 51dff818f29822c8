pub mod command;
pub mod editor;
pub mod history;
pub mod layout;
pub mod persist;

pub use command::{parse_script, EditCommand};
pub use editor::RoomEditor;
pub use layout::{Floor, FurnitureItem, RoomLayout};
pub use persist::JsonLayoutFile;
