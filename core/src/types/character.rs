//! Party member records and the id-indexed roster

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Condition of a party member. Only `Ok`, `Afraid` and `Silenced` leave a
/// member operable; a party with no operable member is wiped.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum Status {
    Ok = 0,
    Afraid = 1,
    Silenced = 2,
    Asleep = 3,
    Held = 4,
    Stoned = 5,
    Dead = 6,
    Ashes = 7,
    Lost = 8,
}

impl Status {
    /// Whether the member can still act on behalf of the party.
    pub fn is_operable(self) -> bool {
        matches!(self, Status::Ok | Status::Afraid | Status::Silenced)
    }

    /// Statuses that send a member to the temple on return to town.
    pub fn needs_temple(self) -> bool {
        matches!(
            self,
            Status::Dead | Status::Ashes | Status::Lost | Status::Stoned | Status::Held
        )
    }
}

/// Where a character currently resides. All cross-references into the
/// roster are by id; location is plain data, never a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum CharLocation {
    Town,
    Party,
    /// Abandoned in the maze at the given depth after a wipe.
    Maze(i32),
    /// Held at the temple awaiting restoration.
    Temple,
}

/// One adventurer record. Attribute and inventory details live in the
/// excluded character subsystem; this carries only what the maze engine
/// reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub agility: i32,
    /// Accumulated poison strength; cleared on return to town.
    pub poison: i32,
    pub status: Status,
    pub location: CharLocation,
}

impl Character {
    pub fn new(id: u32, name: &str, agility: i32) -> Self {
        Character {
            id,
            name: name.to_string(),
            agility,
            poison: 0,
            status: Status::Ok,
            location: CharLocation::Town,
        }
    }
}

/// Arena-style character store. Ids are stable slot indices; characters
/// are never removed, only relocated, so an id handed out once stays
/// valid for the life of the roster.
#[derive(Debug, Default, Clone)]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    /// Adds a character and returns its id.
    pub fn add(&mut self, name: &str, agility: i32) -> u32 {
        let id = self.characters.len() as u32;
        self.characters.push(Character::new(id, name, agility));
        id
    }

    pub fn get(&self, id: u32) -> Option<&Character> {
        self.characters.get(id as usize)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Character> {
        self.characters.get_mut(id as usize)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    /// Ids of characters currently located at the given place.
    pub fn ids_at(&self, location: CharLocation) -> Vec<u32> {
        self.characters
            .iter()
            .filter(|c| c.location == location)
            .map(|c| c.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_operability() {
        assert!(Status::Ok.is_operable());
        assert!(Status::Afraid.is_operable());
        assert!(Status::Silenced.is_operable());
        assert!(!Status::Asleep.is_operable());
        assert!(!Status::Dead.is_operable());
        assert!(!Status::Stoned.is_operable());
    }

    #[test]
    fn test_status_temple_transfer_set() {
        for s in [
            Status::Dead,
            Status::Ashes,
            Status::Lost,
            Status::Stoned,
            Status::Held,
        ] {
            assert!(s.needs_temple());
        }
        assert!(!Status::Ok.needs_temple());
        assert!(!Status::Afraid.needs_temple());
        assert!(!Status::Asleep.needs_temple());
    }

    #[test]
    fn test_roster_ids_are_stable() {
        let mut roster = Roster::new();
        let a = roster.add("Halbard", 12);
        let b = roster.add("Mendel", 9);
        assert_eq!(a, 0);
        assert_eq!(b, 1);

        roster.get_mut(a).unwrap().status = Status::Dead;
        assert_eq!(roster.get(a).unwrap().name, "Halbard");
        assert_eq!(roster.get(b).unwrap().status, Status::Ok);
        assert!(roster.get(99).is_none());
    }

    #[test]
    fn test_roster_ids_at_location() {
        let mut roster = Roster::new();
        let a = roster.add("Halbard", 12);
        let b = roster.add("Mendel", 9);
        let c = roster.add("Tuck", 14);

        roster.get_mut(a).unwrap().location = CharLocation::Party;
        roster.get_mut(c).unwrap().location = CharLocation::Party;

        assert_eq!(roster.ids_at(CharLocation::Party), vec![a, c]);
        assert_eq!(roster.ids_at(CharLocation::Town), vec![b]);
        assert!(roster.ids_at(CharLocation::Temple).is_empty());
    }
}
