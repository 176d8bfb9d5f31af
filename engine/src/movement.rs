//! Movement and turn resolvers
//!
//! Walkability is always judged from the current tile's wall record in
//! the direction being crossed; a blocked step is a normal outcome, not
//! an error, and leaves all state untouched.

use core::types::{Facing, TileProperties};

use crate::ports::LevelProvider;
use crate::session::{MazeSession, RefreshFlags};
use crate::timers::{EventScheduler, TimedEvent};

/// One step along the current facing. Returns false when the facing wall
/// is not walkable; the caller raises the "ouch" dialog.
pub fn move_forward(
    session: &mut MazeSession,
    level: &dyn LevelProvider,
    sched: &mut EventScheduler,
    now: i64,
) -> bool {
    let dir = session.facing;
    try_step(session, level, sched, now, dir)
}

/// One step opposite the current facing, without turning.
pub fn move_backward(
    session: &mut MazeSession,
    level: &dyn LevelProvider,
    sched: &mut EventScheduler,
    now: i64,
) -> bool {
    let dir = session.facing.reverse();
    try_step(session, level, sched, now, dir)
}

fn try_step(
    session: &mut MazeSession,
    level: &dyn LevelProvider,
    sched: &mut EventScheduler,
    now: i64,
    dir: Facing,
) -> bool {
    let here = level.tile(session.depth, session.position);
    if !here.walkable(dir) {
        return false;
    }

    session.position = session.position.step(dir);
    session.last_move = Some(dir);
    sched.arm(TimedEvent::DirectionIndicator, now);
    arrival_checks(session, level);
    true
}

/// Bookkeeping shared by every way of landing on a tile: entry, stepping,
/// teleporting, falling. Marks the tile explored, kills the light in
/// darkness, and runs the passive stairs/elevator detection.
pub fn arrival_checks(session: &mut MazeSession, level: &dyn LevelProvider) {
    let tile = level.tile(session.depth, session.position);

    session.explored.mark(session.depth, session.position);

    if tile.is(TileProperties::DARKNESS) {
        session.lit = false;
    }

    session.armed_stairs = tile.stair_kind();
    session.armed_elevator = tile.elevator.map(|e| e.shaft_group());

    session.refresh |= RefreshFlags::RENDER | RefreshFlags::AUTOMAP | RefreshFlags::COMPASS;
}

pub fn turn_left(session: &mut MazeSession, sched: &mut EventScheduler, now: i64) {
    session.facing = session.facing.left();
    record_turn(session, sched, now);
}

pub fn turn_right(session: &mut MazeSession, sched: &mut EventScheduler, now: i64) {
    session.facing = session.facing.right();
    record_turn(session, sched, now);
}

pub fn turn_around(session: &mut MazeSession, sched: &mut EventScheduler, now: i64) {
    session.facing = session.facing.reverse();
    record_turn(session, sched, now);
}

fn record_turn(session: &mut MazeSession, sched: &mut EventScheduler, now: i64) {
    session.last_move = Some(session.facing);
    sched.arm(TimedEvent::DirectionIndicator, now);
    session.refresh |= RefreshFlags::RENDER | RefreshFlags::COMPASS;
}
