//! Modal state controller
//!
//! Exactly one modal state is active at any time. Input is routed to the
//! active mode's handler; navigation input drives the fixed per-turn
//! pipeline: movement/turn, then tile feature resolution, then party
//! status, then refresh-flag aggregation. Timed dialogs and the
//! chute/elevator pause gate are advanced by `update`, once per frame.

pub mod camp;
pub mod confirm;
pub mod elevator;
pub mod menus;

use core::constants::MAX_PARTY;
use core::types::{CharLocation, Coordinate, Facing, Roster, StairKind};

use log::{debug, info};

use crate::features::{self, PitOutcome};
use crate::movement;
use crate::party;
use crate::ports::{InputPort, LevelProvider, Persistence, RandomSource};
use crate::session::{ExitCode, MazeSession, PauseCause, RefreshFlags};
use crate::timers::{timel, EventScheduler, TimedEvent};

use camp::{CampMenu, CampResult};
use confirm::ConfirmResult;
use elevator::{ElevatorMenu, ElevatorResult};
use menus::{
    ActionMenu, ActionResult, BrowseResult, BrowseState, GetCharactersMenu, GetCharactersResult,
    SearchResult, SearchState,
};

/// The closed input vocabulary. The owning loop translates raw device
/// events into these; the engine never sees keycodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    TurnAround,
    Up,
    Down,
    Confirm,
    Cancel,
    OpenCamp,
    OpenSearch,
    OpenAction,
    OpenMap,
    BrowseCharacter,
    AnyKey,
}

impl InputEvent {
    fn is_directional(self) -> bool {
        matches!(
            self,
            InputEvent::Forward
                | InputEvent::Backward
                | InputEvent::TurnLeft
                | InputEvent::TurnRight
                | InputEvent::TurnAround
        )
    }
}

/// The mode an exit confirmation interrupted, restored on "no".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitResume {
    Navigating,
    Camped(CampMenu),
}

/// The single active input-handling context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Navigating,
    Camped(CampMenu),
    Searching(SearchState),
    ActionMenu(ActionMenu),
    GettingCharacters(GetCharactersMenu),
    ElevatorSelect(ElevatorMenu),
    ViewingMap,
    BrowsingCharacter(BrowseState),
    ConfirmingExit(ExitResume),
    ConfirmingStairs(StairKind),
    ShowingTimedEvent(TimedEvent),
}

/// The engine proper: owns the session, the roster, the scheduler and the
/// active mode, and talks to the outside world through the port traits.
pub struct MazeEngine<L: LevelProvider, R: RandomSource, P: Persistence> {
    level: L,
    rng: R,
    persistence: P,
    roster: Roster,
    session: MazeSession,
    sched: EventScheduler,
    mode: ModalState,
    last_pits: Vec<PitOutcome>,
}

impl<L: LevelProvider, R: RandomSource, P: Persistence> MazeEngine<L, R, P> {
    /// Starts a maze session. The entry tile is marked explored and the
    /// passive stairs/elevator detection runs before any input.
    pub fn enter(
        level: L,
        rng: R,
        persistence: P,
        mut roster: Roster,
        party: Vec<u32>,
        position: Coordinate,
        facing: Facing,
        depth: i32,
    ) -> Self {
        for &id in &party {
            if let Some(character) = roster.get_mut(id) {
                character.location = CharLocation::Party;
            }
        }

        let mut session = MazeSession::new(position, facing, depth, party);
        movement::arrival_checks(&mut session, &level);
        let mode = Self::mode_after_arrival(&session);

        let mut engine = MazeEngine {
            level,
            rng,
            persistence,
            roster,
            session,
            sched: EventScheduler::new(),
            mode,
            last_pits: Vec::new(),
        };
        engine.flush();
        info!(
            "maze session started at depth {} {:?}",
            engine.session.depth, engine.session.position
        );
        engine
    }

    pub fn mode(&self) -> &ModalState {
        &self.mode
    }

    pub fn session(&self) -> &MazeSession {
        &self.session
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Pit rolls from the most recent feature resolution, for the damage
    /// step the combat system applies.
    pub fn last_pit_outcomes(&self) -> &[PitOutcome] {
        &self.last_pits
    }

    /// Hands the dirty bits to the renderer and clears them.
    pub fn take_refresh(&mut self) -> RefreshFlags {
        let flags = self.session.refresh;
        self.session.refresh = RefreshFlags::empty();
        flags
    }

    /// Drives the engine until the session ends. One poll and at most one
    /// turn per frame.
    pub fn run(&mut self, input: &mut dyn InputPort) -> ExitCode {
        loop {
            let now = timel();
            if let Some(event) = input.poll() {
                if let Some(code) = self.handle_input(event, now) {
                    return code;
                }
            }
            if let Some(code) = self.update(now) {
                return code;
            }
            std::thread::sleep(std::time::Duration::from_millis(16));
        }
    }

    /// Routes one input event to the active mode. Returns the exit code
    /// when the event ended the session.
    pub fn handle_input(&mut self, event: InputEvent, now: i64) -> Option<ExitCode> {
        let mode = std::mem::replace(&mut self.mode, ModalState::Navigating);
        match mode {
            ModalState::Navigating => self.navigate(event, now),

            ModalState::Camped(mut menu) => {
                match camp::handle(&mut menu, event) {
                    CampResult::Stay => self.mode = ModalState::Camped(menu),
                    CampResult::Leave => self.leave_mode(),
                    CampResult::Quit => {
                        // The only mode the exit confirmation may interrupt.
                        self.mode = ModalState::ConfirmingExit(ExitResume::Camped(menu));
                    }
                }
                None
            }

            ModalState::Searching(state) => {
                match menus::handle_search(&state, event) {
                    SearchResult::Stay => self.mode = ModalState::Searching(state),
                    SearchResult::PickUp => {
                        self.mode =
                            ModalState::GettingCharacters(GetCharactersMenu::new(state.found));
                    }
                    SearchResult::Leave => self.leave_mode(),
                }
                None
            }

            ModalState::ActionMenu(mut menu) => {
                match menus::handle_action(&mut menu, event) {
                    ActionResult::Stay => self.mode = ModalState::ActionMenu(menu),
                    ActionResult::Leave => self.leave_mode(),
                }
                None
            }

            ModalState::GettingCharacters(mut menu) => {
                match menus::handle_get_characters(&mut menu, event) {
                    GetCharactersResult::Stay => self.mode = ModalState::GettingCharacters(menu),
                    GetCharactersResult::Take(id) => {
                        self.take_character(id);
                        // Refreshing the candidate list on every pickup
                        // keeps re-entry idempotent.
                        let remaining = self.roster.ids_at(CharLocation::Maze(self.session.depth));
                        self.mode =
                            ModalState::GettingCharacters(GetCharactersMenu::new(remaining));
                    }
                    GetCharactersResult::Leave => self.leave_mode(),
                }
                None
            }

            ModalState::ElevatorSelect(mut menu) => {
                match elevator::handle(&mut menu, event) {
                    ElevatorResult::Stay => self.mode = ModalState::ElevatorSelect(menu),
                    ElevatorResult::Select(floor) => {
                        if floor == self.session.depth {
                            // Current floor: ignored, selection stays open.
                            self.mode = ModalState::ElevatorSelect(menu);
                        } else if self.sched.arm(TimedEvent::ElevatorWait, now) {
                            self.session.pending_elevator = Some(floor);
                            self.session.pause = Some(PauseCause::Elevator);
                            self.mode = ModalState::ShowingTimedEvent(TimedEvent::ElevatorWait);
                        } else {
                            // The wait gate could not arm; nothing may be
                            // left half-pending.
                            self.mode = ModalState::ElevatorSelect(menu);
                        }
                    }
                    ElevatorResult::Leave => self.leave_mode(),
                }
                None
            }

            ModalState::ViewingMap => {
                match event {
                    InputEvent::Cancel
                    | InputEvent::Confirm
                    | InputEvent::OpenMap
                    | InputEvent::AnyKey => self.leave_mode(),
                    _ => self.mode = ModalState::ViewingMap,
                }
                None
            }

            ModalState::BrowsingCharacter(mut state) => {
                match menus::handle_browse(&mut state, self.session.party.len(), event) {
                    BrowseResult::Stay => self.mode = ModalState::BrowsingCharacter(state),
                    BrowseResult::Leave => self.leave_mode(),
                }
                None
            }

            ModalState::ConfirmingExit(resume) => match confirm::handle(event) {
                ConfirmResult::Stay => {
                    self.mode = ModalState::ConfirmingExit(resume);
                    None
                }
                ConfirmResult::Yes => Some(ExitCode::ExitAll),
                ConfirmResult::No => {
                    match resume {
                        ExitResume::Navigating => self.leave_mode(),
                        ExitResume::Camped(menu) => self.mode = ModalState::Camped(menu),
                    }
                    None
                }
            },

            ModalState::ConfirmingStairs(kind) => match confirm::handle(event) {
                ConfirmResult::Stay => {
                    self.mode = ModalState::ConfirmingStairs(kind);
                    None
                }
                ConfirmResult::Yes => {
                    features::take_stairs(&mut self.session, &self.level);
                    if !self.session.town_exit {
                        self.mode = Self::mode_after_arrival(&self.session);
                        self.session.touch_all_overlays();
                    }
                    self.flush();
                    self.finish_turn()
                }
                ConfirmResult::No => {
                    // Dismissed; re-entering the tile re-triggers it.
                    self.session.armed_stairs = None;
                    self.leave_mode();
                    None
                }
            },

            ModalState::ShowingTimedEvent(showing) => {
                self.timed_event_input(showing, event);
                None
            }
        }
    }

    /// Advances the timed gates; applies deferred chute/elevator effects
    /// and dialog teardown for whatever elapsed this frame.
    pub fn update(&mut self, now: i64) -> Option<ExitCode> {
        for elapsed in self.sched.update(now) {
            match elapsed {
                TimedEvent::Ouch | TimedEvent::Pit => {
                    if self.mode == ModalState::ShowingTimedEvent(elapsed) {
                        self.mode = Self::mode_after_arrival(&self.session);
                        self.session.touch_all_overlays();
                    }
                }
                TimedEvent::Chute => {
                    features::complete_chute(&mut self.session, &self.level);
                    self.flush();
                    if self.mode == ModalState::ShowingTimedEvent(TimedEvent::Chute) {
                        self.mode = Self::mode_after_arrival(&self.session);
                        self.session.touch_all_overlays();
                    }
                }
                TimedEvent::ElevatorWait => {
                    features::complete_elevator(&mut self.session, &self.level);
                    self.flush();
                    if self.mode == ModalState::ShowingTimedEvent(TimedEvent::ElevatorWait) {
                        self.mode = Self::mode_after_arrival(&self.session);
                        self.session.touch_all_overlays();
                    }
                }
                TimedEvent::DirectionIndicator => {
                    self.session.refresh |= RefreshFlags::COMPASS;
                }
            }
        }
        self.finish_turn()
    }

    fn navigate(&mut self, event: InputEvent, now: i64) -> Option<ExitCode> {
        self.mode = ModalState::Navigating;

        // Wipe check runs once per turn, before the input is acted on.
        if event.is_directional() && party::check_for_wipe(&self.roster, &self.session.party) {
            party::apply_wipe(&mut self.session, &mut self.roster);
            self.flush();
            return self.finish_turn();
        }

        match event {
            InputEvent::Forward | InputEvent::Backward => {
                let moved = if event == InputEvent::Forward {
                    movement::move_forward(&mut self.session, &self.level, &mut self.sched, now)
                } else {
                    movement::move_backward(&mut self.session, &self.level, &mut self.sched, now)
                };

                if !moved {
                    if self.sched.arm(TimedEvent::Ouch, now) {
                        self.mode = ModalState::ShowingTimedEvent(TimedEvent::Ouch);
                    }
                    return None;
                }

                self.last_pits = features::resolve_tile(
                    &mut self.session,
                    &self.level,
                    &self.roster,
                    &mut self.rng,
                    &mut self.sched,
                    now,
                );

                if let Some(dialog) = self.sched.visible_dialog() {
                    self.mode = ModalState::ShowingTimedEvent(dialog);
                } else {
                    self.mode = Self::mode_after_arrival(&self.session);
                }
                self.flush();
                self.finish_turn()
            }

            InputEvent::TurnLeft => {
                movement::turn_left(&mut self.session, &mut self.sched, now);
                self.flush();
                None
            }
            InputEvent::TurnRight => {
                movement::turn_right(&mut self.session, &mut self.sched, now);
                self.flush();
                None
            }
            InputEvent::TurnAround => {
                movement::turn_around(&mut self.session, &mut self.sched, now);
                self.flush();
                None
            }

            InputEvent::OpenCamp => {
                self.session.refresh |= RefreshFlags::ICONS | RefreshFlags::STATUS_BAR;
                self.mode = ModalState::Camped(CampMenu::new());
                None
            }
            InputEvent::OpenSearch => {
                self.session.refresh |= RefreshFlags::SEARCH_INDICATOR;
                self.mode = ModalState::Searching(SearchState::new(
                    &self.session,
                    &self.level,
                    &self.roster,
                ));
                None
            }
            InputEvent::OpenAction => {
                self.mode = ModalState::ActionMenu(ActionMenu::new());
                None
            }
            InputEvent::OpenMap => {
                self.session.refresh |= RefreshFlags::AUTOMAP;
                self.mode = ModalState::ViewingMap;
                None
            }
            InputEvent::BrowseCharacter => {
                self.mode = ModalState::BrowsingCharacter(BrowseState::new());
                None
            }
            InputEvent::Cancel => {
                self.mode = ModalState::ConfirmingExit(ExitResume::Navigating);
                None
            }
            _ => None,
        }
    }

    fn timed_event_input(&mut self, showing: TimedEvent, event: InputEvent) {
        match showing {
            // Paused for a transition: only dismissal is accepted, and
            // backing out applies no part of the depth change.
            TimedEvent::Chute | TimedEvent::ElevatorWait => match event {
                InputEvent::AnyKey | InputEvent::Cancel => {
                    features::cancel_pending_transition(&mut self.session);
                    self.sched.dismiss(showing);
                    self.mode = Self::mode_after_arrival(&self.session);
                    self.session.touch_all_overlays();
                }
                _ => self.mode = ModalState::ShowingTimedEvent(showing),
            },
            // Informational dialogs; any key closes them. The direction
            // indicator is a passive overlay and never becomes the modal
            // dialog, so only the dialog kinds reach here.
            _ => {
                self.sched.dismiss(showing);
                self.mode = Self::mode_after_arrival(&self.session);
                self.session.touch_all_overlays();
            }
        }
    }

    /// Mode dictated by the tile the party is standing on: elevator
    /// selection first, then stairs confirmation, else free navigation.
    fn mode_after_arrival(session: &MazeSession) -> ModalState {
        if let Some(group) = session.armed_elevator {
            ModalState::ElevatorSelect(ElevatorMenu::new(group, session.depth))
        } else if let Some(kind) = session.armed_stairs {
            ModalState::ConfirmingStairs(kind)
        } else {
            ModalState::Navigating
        }
    }

    /// Leaves any menu mode back to navigation, repainting every shared
    /// overlay the menu may have dirtied.
    fn leave_mode(&mut self) {
        self.session.touch_all_overlays();
        self.mode = ModalState::Navigating;
    }

    fn take_character(&mut self, id: u32) {
        if self.session.party.len() >= MAX_PARTY {
            debug!("party full; leaving character {id} behind");
            return;
        }
        if let Some(character) = self.roster.get_mut(id) {
            character.location = CharLocation::Party;
            self.session.party.push(id);
            self.flush();
        }
    }

    /// End-of-turn bookkeeping: the return-to-town sequence armed by
    /// town teleports/stairs, then any pending exit.
    fn finish_turn(&mut self) -> Option<ExitCode> {
        if self.session.town_exit {
            self.session.town_exit = false;
            party::return_to_town(&mut self.roster, &self.session.party);
            self.session.request_exit(ExitCode::ExitModule);
            self.flush();
            info!("party returned to town");
        }
        if let Some(code) = self.session.exit_request {
            return Some(code);
        }
        None
    }

    fn flush(&mut self) {
        let snapshot = self.session.snapshot();
        self.persistence.save_game(&snapshot);
    }
}
