//! Toroidal grid coordinate

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::constants::MAP_SIZE;
use crate::types::direction::Facing;

/// Position on a maze level. Both components are always normalized into
/// [0, MAP_SIZE); stepping off one edge re-enters at the opposite edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    /// Builds a coordinate, wrapping both components into range.
    pub fn new(x: i32, y: i32) -> Self {
        Coordinate {
            x: x.rem_euclid(MAP_SIZE),
            y: y.rem_euclid(MAP_SIZE),
        }
    }

    /// One step in the given direction, with wraparound on both axes.
    pub fn step(self, facing: Facing) -> Coordinate {
        let (dx, dy) = facing.offset();
        Coordinate::new(self.x + dx, self.y + dy)
    }

    /// Linear cell index, used for explored-set bookkeeping.
    pub fn index(self) -> usize {
        (self.x + self.y * MAP_SIZE) as usize
    }
}
