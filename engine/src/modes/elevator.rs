//! Elevator floor selection handler

use core::types::ShaftGroup;

use crate::modes::InputEvent;

/// Floor buttons for the shaft the party is standing in. The selection
/// starts on the current floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevatorMenu {
    pub group: ShaftGroup,
    pub floors: Vec<i32>,
    pub selection: usize,
}

impl ElevatorMenu {
    pub fn new(group: ShaftGroup, current_depth: i32) -> Self {
        let floors = group.floors();
        let selection = floors
            .iter()
            .position(|&f| f == current_depth)
            .unwrap_or(0);
        ElevatorMenu {
            group,
            floors,
            selection,
        }
    }

    pub fn selected_floor(&self) -> i32 {
        self.floors[self.selection]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevatorResult {
    Stay,
    /// Ride to the given floor. The controller ignores the current floor.
    Select(i32),
    Leave,
}

pub fn handle(menu: &mut ElevatorMenu, event: InputEvent) -> ElevatorResult {
    match event {
        InputEvent::Up => {
            if menu.selection > 0 {
                menu.selection -= 1;
            }
            ElevatorResult::Stay
        }
        InputEvent::Down => {
            if menu.selection + 1 < menu.floors.len() {
                menu.selection += 1;
            }
            ElevatorResult::Stay
        }
        InputEvent::Confirm => ElevatorResult::Select(menu.selected_floor()),
        InputEvent::Cancel => ElevatorResult::Leave,
        _ => ElevatorResult::Stay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_ad_exposes_shallow_floors() {
        let menu = ElevatorMenu::new(ShaftGroup::GroupAD, -2);
        assert_eq!(menu.floors, vec![-1, -2, -3, -4]);
        assert_eq!(menu.selected_floor(), -2);
    }

    #[test]
    fn test_group_af_exposes_deep_floors() {
        let menu = ElevatorMenu::new(ShaftGroup::GroupAF, -9);
        assert_eq!(menu.floors, vec![-4, -5, -6, -7, -8, -9]);
        assert_eq!(menu.selected_floor(), -9);
    }

    #[test]
    fn test_selection_clamps_at_ends() {
        let mut menu = ElevatorMenu::new(ShaftGroup::GroupAD, -1);
        handle(&mut menu, InputEvent::Up);
        assert_eq!(menu.selected_floor(), -1);
        for _ in 0..10 {
            handle(&mut menu, InputEvent::Down);
        }
        assert_eq!(menu.selected_floor(), -4);
    }

    #[test]
    fn test_confirm_and_cancel() {
        let mut menu = ElevatorMenu::new(ShaftGroup::GroupAF, -4);
        handle(&mut menu, InputEvent::Down);
        assert_eq!(
            handle(&mut menu, InputEvent::Confirm),
            ElevatorResult::Select(-5)
        );
        assert_eq!(handle(&mut menu, InputEvent::Cancel), ElevatorResult::Leave);
    }
}
