//! Constants module - map geometry, depth bounds and dialog timings

// =============================================================================
// Map Geometry
// =============================================================================

/// Maze levels are square and toroidal; coordinates wrap into [0, MAP_SIZE).
pub const MAP_SIZE: i32 = 20;

/// Cell the party arrives at when entering the maze, and the only cell from
/// which the stairs lead back up to town.
pub const TOWN_ORIGIN_X: i32 = 0;
pub const TOWN_ORIGIN_Y: i32 = 0;

/// Marching-order slots in the active party.
pub const MAX_PARTY: usize = 6;

// =============================================================================
// Depth
// =============================================================================

/// Surface reference depth; teleport destinations with this depth mean
/// "exit to town".
pub const DEPTH_TOWN: i32 = 0;

/// Shallowest maze floor (directly below town).
pub const DEPTH_FIRST: i32 = -1;

/// Deepest maze floor.
pub const DEPTH_LAST: i32 = -9;

// =============================================================================
// Elevator shafts
// =============================================================================

/// Shaft group A-D serves floors -1 through -4.
pub const SHAFT_AD_TOP: i32 = -1;
pub const SHAFT_AD_BOTTOM: i32 = -4;

/// Shaft group A-F serves floors -4 through -9.
pub const SHAFT_AF_TOP: i32 = -4;
pub const SHAFT_AF_BOTTOM: i32 = -9;

// =============================================================================
// Chance rolls
// =============================================================================

/// Pit avoidance chance per member is (agility - depth) * PIT_AVOID_MULT,
/// compared against a d100 roll.
pub const PIT_AVOID_MULT: i32 = 4;

/// Upper bound (exclusive) of the percentile die.
pub const D100: i32 = 100;

// =============================================================================
// Timed dialog durations (microseconds)
// =============================================================================

pub const OUCH_DURATION: i64 = 1_500_000;
pub const PIT_DURATION: i64 = 2_000_000;
pub const CHUTE_DURATION: i64 = 2_000_000;
pub const ELEVATOR_WAIT_DURATION: i64 = 2_500_000;

/// How long the direction indicator overlay stays visible after a move/turn.
pub const DIRECTION_INDICATOR_DURATION: i64 = 2_000_000;
