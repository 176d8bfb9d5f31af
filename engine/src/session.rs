//! Maze session context - the single owned state container
//!
//! One `MazeSession` exists per maze entry and is passed by mutable
//! reference into every resolver and mode handler. There is no global
//! state; destroying the session ends the run.

use std::collections::{BTreeMap, BTreeSet};

use bitflags::bitflags;

use core::types::{Coordinate, Facing, SaveGame, ShaftGroup, StairKind, TeleportDescriptor};

bitflags! {
    /// Dirty bits polled by the external renderer once per frame. The
    /// engine only ever sets them; the renderer clears what it redraws.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct RefreshFlags: u8 {
        const RENDER = 1 << 0;
        const AUTOMAP = 1 << 1;
        const COMPASS = 1 << 2;
        const BUFF_BAR = 1 << 3;
        const SEARCH_INDICATOR = 1 << 4;
        const STATUS_BAR = 1 << 5;
        const ICONS = 1 << 6;
    }
}

/// How the maze session ends, as seen by the owning application loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Return to town/castle.
    ExitModule,
    /// Terminate the whole application.
    ExitAll,
}

/// Why navigation input is currently gated. Set together with the
/// pending chute/elevator transition; cleared when the timer elapses or
/// the transition is backed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseCause {
    Chute,
    Elevator,
}

/// Set of tiles the party has seen, per depth. Monotone: tiles are
/// marked, never unmarked.
#[derive(Debug, Default, Clone)]
pub struct ExploredSet {
    levels: BTreeMap<i32, BTreeSet<u32>>,
}

impl ExploredSet {
    pub fn mark(&mut self, depth: i32, at: Coordinate) {
        self.levels.entry(depth).or_default().insert(at.index() as u32);
    }

    pub fn contains(&self, depth: i32, at: Coordinate) -> bool {
        self.levels
            .get(&depth)
            .is_some_and(|cells| cells.contains(&(at.index() as u32)))
    }

    pub fn count(&self) -> usize {
        self.levels.values().map(|cells| cells.len()).sum()
    }

    /// Stable snapshot for the save game.
    pub fn snapshot(&self) -> Vec<(i32, Vec<u32>)> {
        self.levels
            .iter()
            .map(|(depth, cells)| (*depth, cells.iter().copied().collect()))
            .collect()
    }
}

/// All mutable engine state for one maze run.
#[derive(Debug)]
pub struct MazeSession {
    pub position: Coordinate,
    pub facing: Facing,
    /// Negative while in the maze; -1 is directly below town.
    pub depth: i32,
    /// Ambient light. Forced off by darkness tiles, never restored here.
    pub lit: bool,
    pub explored: ExploredSet,
    pub refresh: RefreshFlags,
    /// Direction of the last move/turn, for the indicator overlay.
    pub last_move: Option<Facing>,
    /// Roster ids of the active party, in marching order.
    pub party: Vec<u32>,
    /// Stairs/ladder confirmation armed by passive detection.
    pub armed_stairs: Option<StairKind>,
    /// Elevator shaft group armed by passive detection.
    pub armed_elevator: Option<ShaftGroup>,
    /// Chute destination awaiting the timer elapse.
    pub pending_chute: Option<TeleportDescriptor>,
    /// Destination floor chosen in elevator selection, awaiting the wait.
    pub pending_elevator: Option<i32>,
    pub pause: Option<PauseCause>,
    /// Armed by depth-0 teleports and town-origin stairs; the turn ends
    /// with the return-to-town sequence.
    pub town_exit: bool,
    pub exit_request: Option<ExitCode>,
}

impl MazeSession {
    pub fn new(position: Coordinate, facing: Facing, depth: i32, party: Vec<u32>) -> Self {
        MazeSession {
            position,
            facing,
            depth,
            lit: false,
            explored: ExploredSet::default(),
            refresh: RefreshFlags::all(),
            last_move: None,
            party,
            armed_stairs: None,
            armed_elevator: None,
            pending_chute: None,
            pending_elevator: None,
            pause: None,
            town_exit: false,
            exit_request: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    pub fn request_exit(&mut self, code: ExitCode) {
        // ExitAll wins over a pending ExitModule.
        if self.exit_request != Some(ExitCode::ExitAll) {
            self.exit_request = Some(code);
        }
    }

    /// Marks every shared overlay dirty; called whenever a mode is left.
    pub fn touch_all_overlays(&mut self) {
        self.refresh = RefreshFlags::all();
    }

    pub fn snapshot(&self) -> SaveGame {
        SaveGame {
            position: self.position,
            facing: self.facing,
            depth: self.depth,
            lit: self.lit,
            explored: self.explored.snapshot(),
            party: self.party.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explored_set_is_monotone() {
        let mut set = ExploredSet::default();
        let a = Coordinate::new(1, 2);
        let b = Coordinate::new(0, 0);

        set.mark(-1, a);
        assert!(set.contains(-1, a));
        assert!(!set.contains(-2, a));
        assert_eq!(set.count(), 1);

        // Re-marking never shrinks the set.
        set.mark(-1, a);
        set.mark(-1, b);
        set.mark(-3, b);
        assert_eq!(set.count(), 3);
        assert!(set.contains(-1, a));
    }

    #[test]
    fn test_exit_all_wins() {
        let mut session = MazeSession::new(Coordinate::default(), Facing::North, -1, vec![0]);
        session.request_exit(ExitCode::ExitAll);
        session.request_exit(ExitCode::ExitModule);
        assert_eq!(session.exit_request, Some(ExitCode::ExitAll));
    }

    #[test]
    fn test_snapshot_carries_session_state() {
        let mut session = MazeSession::new(Coordinate::new(4, 4), Facing::West, -2, vec![1, 3]);
        session.lit = true;
        session.explored.mark(-2, Coordinate::new(4, 4));

        let save = session.snapshot();
        assert_eq!(save.position, Coordinate::new(4, 4));
        assert_eq!(save.depth, -2);
        assert!(save.lit);
        assert_eq!(save.party, vec![1, 3]);
        assert_eq!(save.explored, vec![(-2, vec![Coordinate::new(4, 4).index() as u32])]);
    }
}
