//! Save-game snapshot handed to the persistence collaborator
//!
//! The engine flushes one of these after every state-changing action; how
//! and where it lands on disk is the persistence layer's business.

use anyhow::Context;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::types::direction::Facing;
use crate::types::position::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct SaveGame {
    pub position: Coordinate,
    pub facing: Facing,
    pub depth: i32,
    pub lit: bool,
    /// Linear cell indices of explored tiles, keyed by depth.
    pub explored: Vec<(i32, Vec<u32>)>,
    /// Roster ids of the active party, in marching order.
    pub party: Vec<u32>,
}

impl SaveGame {
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .context("failed to encode save game")
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let (save, _) = bincode::decode_from_slice(bytes, bincode::config::standard())
            .context("failed to decode save game")?;
        Ok(save)
    }
}
