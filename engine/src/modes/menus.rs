//! Search, action, character pickup and browsing handlers

use core::types::{CharLocation, Roster, TileFeatures};

use log::debug;

use crate::modes::InputEvent;
use crate::ports::LevelProvider;
use crate::session::MazeSession;

// ---------------------------------------------------------------------------
// Searching
// ---------------------------------------------------------------------------

/// What a search of the current tile turned up. Built fresh on every mode
/// entry, so re-entering is an idempotent refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// A posted notice was found on this tile.
    pub notice: bool,
    /// Roster ids of characters abandoned on this floor.
    pub found: Vec<u32>,
}

impl SearchState {
    pub fn new(session: &MazeSession, level: &dyn LevelProvider, roster: &Roster) -> Self {
        let tile = level.tile(session.depth, session.position);
        SearchState {
            notice: tile.has(TileFeatures::NOTICE),
            found: roster.ids_at(CharLocation::Maze(session.depth)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    Stay,
    /// Characters were found; the controller opens the pickup menu.
    PickUp,
    Leave,
}

pub fn handle_search(state: &SearchState, event: InputEvent) -> SearchResult {
    match event {
        InputEvent::Confirm if !state.found.is_empty() => SearchResult::PickUp,
        InputEvent::Confirm | InputEvent::Cancel => SearchResult::Leave,
        _ => SearchResult::Stay,
    }
}

// ---------------------------------------------------------------------------
// Action menu
// ---------------------------------------------------------------------------

const ACTIONS: &[&str] = &["Use item", "Cast spell", "Equip", "Leave"];
const ACTION_LEAVE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMenu {
    pub selection: usize,
}

impl ActionMenu {
    pub fn new() -> Self {
        ActionMenu { selection: 0 }
    }

    pub fn entries(&self) -> &'static [&'static str] {
        ACTIONS
    }
}

impl Default for ActionMenu {
    fn default() -> Self {
        ActionMenu::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Stay,
    Leave,
}

pub fn handle_action(menu: &mut ActionMenu, event: InputEvent) -> ActionResult {
    match event {
        InputEvent::Up => {
            menu.selection = (menu.selection + ACTIONS.len() - 1) % ACTIONS.len();
            ActionResult::Stay
        }
        InputEvent::Down => {
            menu.selection = (menu.selection + 1) % ACTIONS.len();
            ActionResult::Stay
        }
        InputEvent::Confirm => {
            if menu.selection == ACTION_LEAVE {
                ActionResult::Leave
            } else {
                // Items and spells belong to the excluded subsystems.
                debug!("action {:?} delegated", ACTIONS[menu.selection]);
                ActionResult::Stay
            }
        }
        InputEvent::Cancel => ActionResult::Leave,
        _ => ActionResult::Stay,
    }
}

// ---------------------------------------------------------------------------
// Getting characters
// ---------------------------------------------------------------------------

/// Pickup menu for characters stranded on this floor by an earlier wipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCharactersMenu {
    pub candidates: Vec<u32>,
    pub selection: usize,
}

impl GetCharactersMenu {
    pub fn new(candidates: Vec<u32>) -> Self {
        GetCharactersMenu {
            candidates,
            selection: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetCharactersResult {
    Stay,
    Take(u32),
    Leave,
}

pub fn handle_get_characters(
    menu: &mut GetCharactersMenu,
    event: InputEvent,
) -> GetCharactersResult {
    if menu.candidates.is_empty() {
        return match event {
            InputEvent::Confirm | InputEvent::Cancel => GetCharactersResult::Leave,
            _ => GetCharactersResult::Stay,
        };
    }
    match event {
        InputEvent::Up => {
            menu.selection = (menu.selection + menu.candidates.len() - 1) % menu.candidates.len();
            GetCharactersResult::Stay
        }
        InputEvent::Down => {
            menu.selection = (menu.selection + 1) % menu.candidates.len();
            GetCharactersResult::Stay
        }
        InputEvent::Confirm => GetCharactersResult::Take(menu.candidates[menu.selection]),
        InputEvent::Cancel => GetCharactersResult::Leave,
        _ => GetCharactersResult::Stay,
    }
}

// ---------------------------------------------------------------------------
// Character browsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseState {
    /// Index into the party's marching order.
    pub index: usize,
}

impl BrowseState {
    pub fn new() -> Self {
        BrowseState { index: 0 }
    }
}

impl Default for BrowseState {
    fn default() -> Self {
        BrowseState::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseResult {
    Stay,
    Leave,
}

pub fn handle_browse(state: &mut BrowseState, party_len: usize, event: InputEvent) -> BrowseResult {
    if party_len == 0 {
        return BrowseResult::Leave;
    }
    match event {
        InputEvent::Up => {
            state.index = (state.index + party_len - 1) % party_len;
            BrowseResult::Stay
        }
        InputEvent::Down => {
            state.index = (state.index + 1) % party_len;
            BrowseResult::Stay
        }
        InputEvent::Confirm | InputEvent::Cancel => BrowseResult::Leave,
        _ => BrowseResult::Stay,
    }
}
