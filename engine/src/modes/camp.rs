//! Camp menu handler

use log::debug;

use crate::modes::InputEvent;

const ENTRIES: &[&str] = &["Rest", "Reorder", "Leave camp", "Quit game"];

const REST: usize = 0;
const REORDER: usize = 1;
const LEAVE: usize = 2;
const QUIT: usize = 3;

/// Selection state of the camp menu. Rebuilt on every entry so no stale
/// highlight survives from a previous visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampMenu {
    pub selection: usize,
}

impl CampMenu {
    pub fn new() -> Self {
        CampMenu { selection: 0 }
    }

    pub fn entries(&self) -> &'static [&'static str] {
        ENTRIES
    }
}

impl Default for CampMenu {
    fn default() -> Self {
        CampMenu::new()
    }
}

/// Closed result set; the controller matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampResult {
    Stay,
    Leave,
    /// Quit selected; the controller opens the exit confirmation.
    Quit,
}

pub fn handle(menu: &mut CampMenu, event: InputEvent) -> CampResult {
    match event {
        InputEvent::Up => {
            menu.selection = (menu.selection + ENTRIES.len() - 1) % ENTRIES.len();
            CampResult::Stay
        }
        InputEvent::Down => {
            menu.selection = (menu.selection + 1) % ENTRIES.len();
            CampResult::Stay
        }
        InputEvent::Confirm => match menu.selection {
            REST | REORDER => {
                // Rest ticks and marching-order edits live in the
                // character subsystem.
                debug!("camp entry {:?} delegated", ENTRIES[menu.selection]);
                CampResult::Stay
            }
            LEAVE => CampResult::Leave,
            QUIT => CampResult::Quit,
            _ => CampResult::Stay,
        },
        InputEvent::Cancel => CampResult::Leave,
        _ => CampResult::Stay,
    }
}
