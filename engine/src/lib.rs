//! Turn-based maze navigation and event engine
//!
//! Owns the party's position, facing and depth on a toroidal dungeon
//! level, resolves movement against per-tile wall data, triggers tile
//! features (pits, chutes, spinners, elevators, teleporters, stairs) and
//! arbitrates the mutually exclusive modal overlays. The renderer, level
//! loader, persistence and dice all sit behind the traits in [`ports`].

pub mod features;
pub mod modes;
pub mod movement;
pub mod party;
pub mod ports;
pub mod session;
pub mod timers;

pub use modes::{InputEvent, MazeEngine, ModalState};
pub use ports::{InputPort, LevelProvider, NullPersistence, Persistence, RandomSource, ThreadRandom};
pub use session::{ExitCode, MazeSession, RefreshFlags};
pub use timers::{timel, TimedEvent};
