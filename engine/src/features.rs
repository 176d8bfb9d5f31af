//! Tile feature resolver - pits, chutes, spinners, teleporters, stairs
//!
//! Runs after every successful move and on explicit stairs/elevator
//! confirmation. Depth never changes here except through a confirmed
//! transition or a chute/teleport trigger.

use core::constants::{DEPTH_FIRST, PIT_AVOID_MULT, TOWN_ORIGIN_X, TOWN_ORIGIN_Y};
use core::types::{Coordinate, Roster, TileFeatures};

use log::{debug, error, info};

use crate::movement::arrival_checks;
use crate::ports::{LevelProvider, RandomSource};
use crate::session::{MazeSession, PauseCause, RefreshFlags};
use crate::timers::{EventScheduler, TimedEvent};

/// One party member's pit roll. Damage amounts are the combat system's
/// business; the engine only records who fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitOutcome {
    pub member: u32,
    pub chance: i32,
    pub roll: i32,
    pub avoided: bool,
}

/// Avoidance chance against a d100 roll. Depth counts by floor number,
/// so floor -5 subtracts 5.
pub fn pit_chance(agility: i32, depth: i32) -> i32 {
    (agility - depth.abs()) * PIT_AVOID_MULT
}

/// Evaluates the features of the tile the party just arrived on.
pub fn resolve_tile(
    session: &mut MazeSession,
    level: &dyn LevelProvider,
    roster: &Roster,
    rng: &mut dyn RandomSource,
    sched: &mut EventScheduler,
    now: i64,
) -> Vec<PitOutcome> {
    let tile = level.tile(session.depth, session.position);
    let mut outcomes = Vec::new();

    if tile.has(TileFeatures::SPINNER) {
        session.facing = rng.cardinal();
        session.refresh |= RefreshFlags::RENDER | RefreshFlags::COMPASS;
        debug!("spinner at {:?}, now facing {:?}", session.position, session.facing);
    }

    if tile.has(TileFeatures::PIT) {
        sched.arm(TimedEvent::Pit, now);
        for &member in &session.party {
            let Some(character) = roster.get(member) else {
                error!("party id {} missing from roster", member);
                continue;
            };
            let chance = pit_chance(character.agility, session.depth);
            let roll = rng.d100();
            let avoided = roll < chance;
            if !avoided {
                info!("{} fell into the pit (roll {roll} vs {chance})", character.name);
            }
            outcomes.push(PitOutcome {
                member,
                chance,
                roll,
                avoided,
            });
        }
    }

    if tile.has(TileFeatures::CHUTE) {
        match tile.teleport {
            // The pending transition and the pause are only set once the
            // dialog gate is actually armed; a rejected arm (another
            // dialog already showing) leaves the session untouched.
            Some(dest) => {
                if sched.arm(TimedEvent::Chute, now) {
                    session.pending_chute = Some(dest);
                    session.pause = Some(PauseCause::Chute);
                }
            }
            // The loader guarantees chutes carry a destination.
            None => error!("chute at {:?} has no destination", session.position),
        }
    } else if tile.has(TileFeatures::TELEPORT_FROM) {
        resolve_teleport(session, level);
    }

    outcomes
}

fn resolve_teleport(session: &mut MazeSession, level: &dyn LevelProvider) {
    let tile = level.tile(session.depth, session.position);
    let Some(dest) = tile.teleport else {
        error!("teleporter at {:?} has no destination", session.position);
        return;
    };

    if dest.is_town_exit() {
        // Return-to-town path; the turn finishes first.
        session.town_exit = true;
    } else if dest.depth == session.depth {
        session.position = dest.target;
        arrival_checks(session, level);
    } else {
        // Cross-level teleport has no defined semantics; refuse rather
        // than corrupt depth/position.
        error!(
            "unsupported cross-level teleport {} -> {} at {:?}",
            session.depth, dest.depth, session.position
        );
    }
}

/// Explicit stairs confirmation. Returns true when the party left for
/// town; otherwise performs the depth/position jump and re-runs passive
/// detection on the destination tile.
pub fn take_stairs(session: &mut MazeSession, level: &dyn LevelProvider) -> bool {
    let tile = level.tile(session.depth, session.position);
    let Some(dest) = tile.stairs else {
        error!("confirmed stairs at {:?} with no descriptor", session.position);
        session.armed_stairs = None;
        return false;
    };

    let at_town_origin = session.depth == DEPTH_FIRST
        && session.position == Coordinate::new(TOWN_ORIGIN_X, TOWN_ORIGIN_Y);
    if at_town_origin {
        session.town_exit = true;
        return true;
    }

    session.depth = dest.depth;
    session.position = dest.target;
    arrival_checks(session, level);
    session.refresh |= RefreshFlags::STATUS_BAR;
    false
}

/// Terminal effect of an elapsed chute timer.
pub fn complete_chute(session: &mut MazeSession, level: &dyn LevelProvider) {
    let Some(dest) = session.pending_chute.take() else {
        return;
    };
    session.pause = None;
    session.depth = dest.depth;
    session.position = dest.target;
    arrival_checks(session, level);
    session.refresh |= RefreshFlags::STATUS_BAR;
}

/// Terminal effect of an elapsed elevator wait.
pub fn complete_elevator(session: &mut MazeSession, level: &dyn LevelProvider) {
    let Some(floor) = session.pending_elevator.take() else {
        return;
    };
    session.pause = None;
    session.depth = floor;
    arrival_checks(session, level);
    session.refresh |= RefreshFlags::STATUS_BAR;
}

/// Backs out of a pending chute/elevator transition without applying any
/// part of the depth change.
pub fn cancel_pending_transition(session: &mut MazeSession) {
    session.pending_chute = None;
    session.pending_elevator = None;
    session.pause = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::constants::CHUTE_DURATION;
    use core::types::{Facing, TeleportDescriptor, Tile};
    use std::collections::HashMap;

    #[derive(Default)]
    struct TestLevel {
        tiles: HashMap<(i32, i32, i32), Tile>,
    }

    impl TestLevel {
        fn put(&mut self, depth: i32, x: i32, y: i32, tile: Tile) {
            self.tiles.insert((depth, x, y), tile);
        }
    }

    impl LevelProvider for TestLevel {
        fn tile(&self, depth: i32, at: Coordinate) -> Tile {
            self.tiles
                .get(&(depth, at.x, at.y))
                .copied()
                .unwrap_or_default()
        }
    }

    /// Random source replaying queued draws.
    struct ScriptedRandom {
        d100: Vec<i32>,
        cardinals: Vec<Facing>,
    }

    impl RandomSource for ScriptedRandom {
        fn d100(&mut self) -> i32 {
            self.d100.remove(0)
        }

        fn cardinal(&mut self) -> Facing {
            self.cardinals.remove(0)
        }
    }

    fn party_of_one(agility: i32) -> (Roster, Vec<u32>) {
        let mut roster = Roster::new();
        let id = roster.add("Halbard", agility);
        (roster, vec![id])
    }

    #[test]
    fn test_pit_chance_formula() {
        assert_eq!(pit_chance(10, -5), 20);
        assert_eq!(pit_chance(18, -1), 68);
    }

    #[test]
    fn test_pit_roll_outcomes() {
        let mut level = TestLevel::default();
        let mut pit = Tile::default();
        pit.features = TileFeatures::PIT;
        level.put(-5, 2, 2, pit);

        let (roster, party) = party_of_one(10);
        let mut rng = ScriptedRandom {
            d100: vec![15],
            cardinals: vec![],
        };
        let mut sched = EventScheduler::new();

        let mut session = MazeSession::new(Coordinate::new(2, 2), Facing::North, -5, party.clone());
        let outcomes = resolve_tile(&mut session, &level, &roster, &mut rng, &mut sched, 0);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].chance, 20);
        assert!(outcomes[0].avoided);
        assert_eq!(sched.visible_dialog(), Some(TimedEvent::Pit));

        // A roll of 85 against the same chance is a fall.
        let mut rng = ScriptedRandom {
            d100: vec![85],
            cardinals: vec![],
        };
        let mut sched = EventScheduler::new();
        let mut session = MazeSession::new(Coordinate::new(2, 2), Facing::North, -5, party);
        let outcomes = resolve_tile(&mut session, &level, &roster, &mut rng, &mut sched, 0);
        assert!(!outcomes[0].avoided);
        // Position is untouched by a pit.
        assert_eq!(session.position, Coordinate::new(2, 2));
    }

    #[test]
    fn test_spinner_redraws_facing() {
        let mut level = TestLevel::default();
        let mut spinner = Tile::default();
        spinner.features = TileFeatures::SPINNER;
        level.put(-1, 4, 4, spinner);

        let (roster, party) = party_of_one(10);
        let mut rng = ScriptedRandom {
            d100: vec![],
            cardinals: vec![Facing::South],
        };
        let mut sched = EventScheduler::new();
        let mut session = MazeSession::new(Coordinate::new(4, 4), Facing::North, -1, party);

        resolve_tile(&mut session, &level, &roster, &mut rng, &mut sched, 0);
        assert_eq!(session.facing, Facing::South);
        assert_eq!(sched.visible_dialog(), None);
    }

    #[test]
    fn test_chute_arms_pause_and_defers_jump() {
        let mut level = TestLevel::default();
        let mut chute = Tile::default();
        chute.features = TileFeatures::CHUTE;
        chute.teleport = Some(TeleportDescriptor {
            depth: -2,
            target: Coordinate::new(9, 9),
        });
        level.put(-1, 4, 4, chute);

        let (roster, party) = party_of_one(10);
        let mut rng = ScriptedRandom {
            d100: vec![],
            cardinals: vec![],
        };
        let mut sched = EventScheduler::new();
        let mut session = MazeSession::new(Coordinate::new(4, 4), Facing::North, -1, party);

        resolve_tile(&mut session, &level, &roster, &mut rng, &mut sched, 100);
        assert!(session.is_paused());
        assert_eq!(session.depth, -1, "jump must wait for the timer");
        assert_eq!(sched.visible_dialog(), Some(TimedEvent::Chute));

        complete_chute(&mut session, &level);
        assert_eq!(session.depth, -2);
        assert_eq!(session.position, Coordinate::new(9, 9));
        assert!(!session.is_paused());
        assert!(session.explored.contains(-2, Coordinate::new(9, 9)));
    }

    #[test]
    fn test_pit_and_chute_on_one_tile_keeps_session_consistent() {
        let mut level = TestLevel::default();
        let mut trap = Tile::default();
        trap.features = TileFeatures::PIT | TileFeatures::CHUTE;
        trap.teleport = Some(TeleportDescriptor {
            depth: -2,
            target: Coordinate::new(9, 9),
        });
        level.put(-1, 4, 4, trap);

        let (roster, party) = party_of_one(10);
        let mut rng = ScriptedRandom {
            d100: vec![85],
            cardinals: vec![],
        };
        let mut sched = EventScheduler::new();
        let mut session = MazeSession::new(Coordinate::new(4, 4), Facing::North, -1, party);

        let outcomes = resolve_tile(&mut session, &level, &roster, &mut rng, &mut sched, 0);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(sched.visible_dialog(), Some(TimedEvent::Pit));

        // The chute dialog lost the race, so no half-armed transition may
        // survive: nothing pending, nothing paused.
        assert_eq!(session.pending_chute, None);
        assert!(!session.is_paused());

        // Only the pit runs out; the session keeps navigating at -1.
        let elapsed = sched.update(CHUTE_DURATION * 10);
        assert_eq!(elapsed, vec![TimedEvent::Pit]);
        assert_eq!(session.depth, -1);
    }

    #[test]
    fn test_cancelled_chute_applies_nothing() {
        let mut session = MazeSession::new(Coordinate::new(4, 4), Facing::North, -1, vec![]);
        session.pending_chute = Some(TeleportDescriptor {
            depth: -2,
            target: Coordinate::new(9, 9),
        });
        session.pause = Some(PauseCause::Chute);

        cancel_pending_transition(&mut session);
        assert_eq!(session.depth, -1);
        assert_eq!(session.position, Coordinate::new(4, 4));
        assert!(!session.is_paused());
        assert_eq!(session.pending_chute, None);
    }

    #[test]
    fn test_town_teleport_sets_exit_flag_only() {
        let mut level = TestLevel::default();
        let mut porter = Tile::default();
        porter.features = TileFeatures::TELEPORT_FROM;
        porter.teleport = Some(TeleportDescriptor {
            depth: 0,
            target: Coordinate::default(),
        });
        level.put(-3, 7, 7, porter);

        let (roster, party) = party_of_one(10);
        let mut rng = ScriptedRandom {
            d100: vec![],
            cardinals: vec![],
        };
        let mut sched = EventScheduler::new();
        let mut session = MazeSession::new(Coordinate::new(7, 7), Facing::North, -3, party);

        resolve_tile(&mut session, &level, &roster, &mut rng, &mut sched, 0);
        assert!(session.town_exit);
        assert_eq!(session.depth, -3);
        assert_eq!(session.position, Coordinate::new(7, 7));
    }

    #[test]
    fn test_same_level_teleport_repositions_and_rechecks() {
        let mut level = TestLevel::default();
        let mut porter = Tile::default();
        porter.features = TileFeatures::TELEPORT_FROM;
        porter.teleport = Some(TeleportDescriptor {
            depth: -3,
            target: Coordinate::new(1, 1),
        });
        level.put(-3, 7, 7, porter);

        let mut landing = Tile::default();
        landing.features = TileFeatures::STAIRS_DOWN;
        level.put(-3, 1, 1, landing);

        let (roster, party) = party_of_one(10);
        let mut rng = ScriptedRandom {
            d100: vec![],
            cardinals: vec![],
        };
        let mut sched = EventScheduler::new();
        let mut session = MazeSession::new(Coordinate::new(7, 7), Facing::North, -3, party);

        resolve_tile(&mut session, &level, &roster, &mut rng, &mut sched, 0);
        assert_eq!(session.position, Coordinate::new(1, 1));
        assert!(session.explored.contains(-3, Coordinate::new(1, 1)));
        assert_eq!(
            session.armed_stairs,
            Some(core::types::StairKind::StairsDown)
        );
    }

    #[test]
    fn test_cross_level_teleport_is_refused() {
        let mut level = TestLevel::default();
        let mut porter = Tile::default();
        porter.features = TileFeatures::TELEPORT_FROM;
        porter.teleport = Some(TeleportDescriptor {
            depth: -6,
            target: Coordinate::new(1, 1),
        });
        level.put(-3, 7, 7, porter);

        let (roster, party) = party_of_one(10);
        let mut rng = ScriptedRandom {
            d100: vec![],
            cardinals: vec![],
        };
        let mut sched = EventScheduler::new();
        let mut session = MazeSession::new(Coordinate::new(7, 7), Facing::North, -3, party);

        resolve_tile(&mut session, &level, &roster, &mut rng, &mut sched, 0);
        assert_eq!(session.depth, -3);
        assert_eq!(session.position, Coordinate::new(7, 7));
        assert!(!session.town_exit);
    }

    #[test]
    fn test_take_stairs_jumps_and_rearms() {
        let mut level = TestLevel::default();
        let mut down = Tile::default();
        down.features = TileFeatures::STAIRS_DOWN;
        down.stairs = Some(TeleportDescriptor {
            depth: -2,
            target: Coordinate::new(3, 3),
        });
        level.put(-1, 8, 8, down);

        let mut up = Tile::default();
        up.features = TileFeatures::STAIRS_UP;
        up.stairs = Some(TeleportDescriptor {
            depth: -1,
            target: Coordinate::new(8, 8),
        });
        level.put(-2, 3, 3, up);

        let mut session = MazeSession::new(Coordinate::new(8, 8), Facing::North, -1, vec![]);
        assert!(!take_stairs(&mut session, &level));
        assert_eq!(session.depth, -2);
        assert_eq!(session.position, Coordinate::new(3, 3));
        // Landing tile has stairs too, so the confirmation is re-armed.
        assert_eq!(session.armed_stairs, Some(core::types::StairKind::StairsUp));
    }

    #[test]
    fn test_town_origin_stairs_flag_exit() {
        let mut level = TestLevel::default();
        let mut up = Tile::default();
        up.features = TileFeatures::STAIRS_UP;
        up.stairs = Some(TeleportDescriptor {
            depth: 0,
            target: Coordinate::default(),
        });
        level.put(-1, TOWN_ORIGIN_X, TOWN_ORIGIN_Y, up);

        let mut session = MazeSession::new(
            Coordinate::new(TOWN_ORIGIN_X, TOWN_ORIGIN_Y),
            Facing::North,
            -1,
            vec![],
        );
        assert!(take_stairs(&mut session, &level));
        assert!(session.town_exit);
        assert_eq!(session.depth, -1);
    }
}
