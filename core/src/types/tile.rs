//! Level tile data - walls, feature flags and transition descriptors
//!
//! Tiles are owned by the level provider; this crate only defines the
//! record layout and the read-only query surface the engine consumes.

use bitflags::bitflags;

use crate::constants::{DEPTH_TOWN, SHAFT_AD_BOTTOM};
use crate::types::direction::Facing;
use crate::types::position::Coordinate;

/// One side of a tile. Doors are visible and walkable; walls are neither
/// passable nor secretly open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WallKind {
    #[default]
    Open,
    Wall,
    Door,
}

impl WallKind {
    pub fn walkable(self) -> bool {
        !matches!(self, WallKind::Wall)
    }

    pub fn visible(self) -> bool {
        !matches!(self, WallKind::Open)
    }
}

bitflags! {
    /// Per-tile feature flags. A feature attaches a special rule to the
    /// cell, evaluated after the party arrives on it.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct TileFeatures: u16 {
        /// Open pit; each member rolls to avoid falling damage.
        const PIT = 1 << 0;
        /// Trapdoor chute dropping the party to another floor.
        const CHUTE = 1 << 1;
        /// Spinner; randomizes the party's facing.
        const SPINNER = 1 << 2;
        /// Departure cell of a teleporter.
        const TELEPORT_FROM = 1 << 3;
        const STAIRS_UP = 1 << 4;
        const STAIRS_DOWN = 1 << 5;
        const LADDER_UP = 1 << 6;
        const LADDER_DOWN = 1 << 7;
        /// Cell belongs to an elevator shaft.
        const ELEVATOR = 1 << 8;
        /// A readable notice is posted here.
        const NOTICE = 1 << 9;
    }
}

bitflags! {
    /// Per-tile property flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct TileProperties: u8 {
        /// Entering this tile extinguishes the party's light.
        const DARKNESS = 1 << 0;
        /// Solid rock; the cell cannot be occupied.
        const ROCK = 1 << 1;
        /// Spellcasting is suppressed here.
        const ANTIMAGIC = 1 << 2;
    }
}

/// Which kind of vertical passage a tile carries, for the confirm-stairs
/// dialog message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StairKind {
    StairsUp,
    StairsDown,
    LadderUp,
    LadderDown,
}

/// Destination of a teleporter, chute or stairs. A destination depth of
/// `DEPTH_TOWN` is the reserved sentinel for "exit to town".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportDescriptor {
    pub depth: i32,
    pub target: Coordinate,
}

impl TeleportDescriptor {
    pub fn is_town_exit(&self) -> bool {
        self.depth == DEPTH_TOWN
    }
}

/// One of the two disjoint elevator networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaftGroup {
    /// Serves floors -1..-4.
    GroupAD,
    /// Serves floors -4..-9.
    GroupAF,
}

impl ShaftGroup {
    /// Floors this shaft's buttons expose, shallowest first.
    pub fn floors(self) -> Vec<i32> {
        use crate::constants::{SHAFT_AD_TOP, SHAFT_AF_BOTTOM, SHAFT_AF_TOP};
        match self {
            ShaftGroup::GroupAD => (SHAFT_AD_BOTTOM..=SHAFT_AD_TOP).rev().collect(),
            ShaftGroup::GroupAF => (SHAFT_AF_BOTTOM..=SHAFT_AF_TOP).rev().collect(),
        }
    }
}

/// Shaft membership record for an elevator tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorDescriptor {
    /// Destination one floor up, if the car can go up from here.
    pub up_to: Option<i32>,
    /// Destination one floor down, if the car can go down from here.
    pub down_to: Option<i32>,
    pub top_depth: i32,
    pub bottom_depth: i32,
}

impl ElevatorDescriptor {
    /// The two shaft groups are disjoint; the bottom depth disambiguates.
    pub fn shaft_group(&self) -> ShaftGroup {
        if self.bottom_depth >= SHAFT_AD_BOTTOM {
            ShaftGroup::GroupAD
        } else {
            ShaftGroup::GroupAF
        }
    }

    /// Floors served by this shaft, shallowest first.
    pub fn floors(&self) -> impl Iterator<Item = i32> {
        let (top, bottom) = (self.top_depth, self.bottom_depth);
        (bottom..=top).rev()
    }
}

/// Snapshot of one maze cell as handed out by the level provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile {
    /// Walls indexed by `Facing as usize` (N, S, E, W).
    pub walls: [WallKind; 4],
    pub features: TileFeatures,
    pub properties: TileProperties,
    pub teleport: Option<TeleportDescriptor>,
    pub stairs: Option<TeleportDescriptor>,
    pub elevator: Option<ElevatorDescriptor>,
}

impl Tile {
    pub fn wall(&self, dir: Facing) -> WallKind {
        self.walls[dir as usize]
    }

    /// Whether the party can cross this tile's wall in the given direction.
    pub fn walkable(&self, dir: Facing) -> bool {
        self.walls[dir as usize].walkable()
    }

    pub fn has(&self, feature: TileFeatures) -> bool {
        self.features.intersects(feature)
    }

    pub fn is(&self, property: TileProperties) -> bool {
        self.properties.intersects(property)
    }

    /// The vertical-passage subtype, if any. Stairs win over ladders when
    /// the loader sets both, which it never should.
    pub fn stair_kind(&self) -> Option<StairKind> {
        if self.has(TileFeatures::STAIRS_UP) {
            Some(StairKind::StairsUp)
        } else if self.has(TileFeatures::STAIRS_DOWN) {
            Some(StairKind::StairsDown)
        } else if self.has(TileFeatures::LADDER_UP) {
            Some(StairKind::LadderUp)
        } else if self.has(TileFeatures::LADDER_DOWN) {
            Some(StairKind::LadderDown)
        } else {
            None
        }
    }
}
