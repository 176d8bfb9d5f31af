//! Cardinal facing and its fixed rotation tables

use bincode::{Decode, Encode};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the four cardinal directions. There are no diagonal states;
/// every rotation maps a cardinal onto another cardinal.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub enum Facing {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
}

impl Facing {
    /// Facing after a quarter turn to the left (NORTH -> WEST).
    pub fn left(self) -> Facing {
        match self {
            Facing::North => Facing::West,
            Facing::West => Facing::South,
            Facing::South => Facing::East,
            Facing::East => Facing::North,
        }
    }

    /// Facing after a quarter turn to the right (NORTH -> EAST).
    pub fn right(self) -> Facing {
        match self {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
        }
    }

    /// Facing after an about-face (NORTH -> SOUTH).
    pub fn reverse(self) -> Facing {
        match self {
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
        }
    }

    /// Grid offset of a single step in this direction. North decreases y.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::South => (0, 1),
            Facing::East => (1, 0),
            Facing::West => (-1, 0),
        }
    }

    /// Uniform 4-way draw, used by spinner tiles.
    pub fn random<R: Rng>(rng: &mut R) -> Facing {
        match rng.gen_range(0..4) {
            0 => Facing::North,
            1 => Facing::South,
            2 => Facing::East,
            _ => Facing::West,
        }
    }

    pub const ALL: [Facing; 4] = [Facing::North, Facing::South, Facing::East, Facing::West];
}
