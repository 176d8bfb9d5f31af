//! Yes/no confirmation dialogs (exit and stairs)

use crate::modes::InputEvent;

/// Closed result of a confirmation dialog. Closing the dialog counts as
/// "no"; a confirmation never has a third outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    Stay,
    Yes,
    No,
}

pub fn handle(event: InputEvent) -> ConfirmResult {
    match event {
        InputEvent::Confirm => ConfirmResult::Yes,
        InputEvent::Cancel => ConfirmResult::No,
        _ => ConfirmResult::Stay,
    }
}
