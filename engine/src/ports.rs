//! External collaborator seams - level geometry, randomness, persistence
//!
//! The engine core touches the outside world only through these traits so
//! it can be driven in tests without a window, a dice cup or a disk.

use core::constants::D100;
use core::types::{Coordinate, Facing, SaveGame, Tile};

use rand::Rng;

use crate::modes::InputEvent;

/// Read-only view onto level geometry. Tiles are handed out by value;
/// the engine never mutates level data.
pub trait LevelProvider {
    fn tile(&self, depth: i32, at: Coordinate) -> Tile;
}

/// Uniform draws for the two rolls this engine makes.
pub trait RandomSource {
    /// Percentile roll in [0, 100).
    fn d100(&mut self) -> i32;
    /// Uniform 4-way cardinal draw for spinner tiles.
    fn cardinal(&mut self) -> Facing;
}

/// Production random source backed by the thread-local generator.
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn d100(&mut self) -> i32 {
        rand::thread_rng().gen_range(0..D100)
    }

    fn cardinal(&mut self) -> Facing {
        Facing::random(&mut rand::thread_rng())
    }
}

/// Input poll seam for the owning loop. At most one confirmed event is
/// delivered per frame.
pub trait InputPort {
    fn poll(&mut self) -> Option<InputEvent>;
}

/// Synchronous snapshot sink. Fire-and-forget: the engine neither sees
/// nor retries a failed write.
pub trait Persistence {
    fn save_game(&mut self, save: &SaveGame);
}

/// Persistence sink that drops every snapshot.
#[derive(Debug, Default)]
pub struct NullPersistence;

impl Persistence for NullPersistence {
    fn save_game(&mut self, _save: &SaveGame) {}
}
