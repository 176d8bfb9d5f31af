pub mod character;
pub mod direction;
pub mod position;
pub mod save;
pub mod tile;

pub use character::{CharLocation, Character, Roster, Status};
pub use direction::Facing;
pub use position::Coordinate;
pub use save::SaveGame;
pub use tile::{
    ElevatorDescriptor, ShaftGroup, StairKind, TeleportDescriptor, Tile, TileFeatures,
    TileProperties, WallKind,
};
