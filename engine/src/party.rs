//! Party status resolver - wipe detection and return-to-town cleanup

use core::types::{CharLocation, Roster, Status};

use log::{info, warn};

use crate::session::{ExitCode, MazeSession};

/// True iff no member of the active party retains an operable status.
/// Checked once per turn, before navigation input is processed.
pub fn check_for_wipe(roster: &Roster, party: &[u32]) -> bool {
    !party
        .iter()
        .any(|&id| roster.get(id).is_some_and(|c| c.status.is_operable()))
}

/// Ends the run after a wipe: everyone is left where they fell, the
/// active party is cleared and the session exits. The graveyard/epitaph
/// flow is the owning application's job once the exit code comes back.
pub fn apply_wipe(session: &mut MazeSession, roster: &mut Roster) {
    warn!("party wiped at depth {} {:?}", session.depth, session.position);
    for &id in &session.party {
        if let Some(character) = roster.get_mut(id) {
            character.location = CharLocation::Maze(session.depth);
        }
    }
    session.party.clear();
    session.request_exit(ExitCode::ExitModule);
}

/// Post-return-to-town status cleanup: fear and silence wear off, poison
/// clears for everyone, and members who need restoration are moved to the
/// temple.
pub fn return_to_town(roster: &mut Roster, party: &[u32]) {
    for &id in party {
        let Some(character) = roster.get_mut(id) else {
            continue;
        };
        character.poison = 0;
        match character.status {
            Status::Afraid | Status::Silenced => character.status = Status::Ok,
            _ => {}
        }
        if character.status.needs_temple() {
            info!("{} carried to the temple", character.name);
            character.location = CharLocation::Temple;
        } else {
            character.location = CharLocation::Town;
        }
    }
}
