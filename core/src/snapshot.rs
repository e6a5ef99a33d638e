//! Render snapshot: everything the host needs to draw one frame.
//!
//! Taken after every mutation. Serializes to JSON for the IPC host.

use crate::{
    item::Item,
    state::{GameState, Location},
    types::{Cash, Day},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub day:                Day,
    pub cash:               Cash,
    pub reputation:         i64,
    pub level:              u32,
    pub experience:         u64,
    pub experience_to_next: u64,
    pub location:           Location,
    pub location_label:     String,
    pub market:             Vec<Item>,
    pub inventory:          Vec<Item>,
    /// Sum of inventory asks.
    pub book_value:         Cash,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = state.player();
        Self {
            day:                state.day(),
            cash:               player.cash,
            reputation:         player.reputation,
            level:              player.level,
            experience:         player.experience,
            experience_to_next: player.experience_to_next,
            location:           state.location(),
            location_label:     state.location().label().to_string(),
            market:             state.market().listings().to_vec(),
            inventory:          state.inventory().items().to_vec(),
            book_value:         state.inventory().book_value(),
        }
    }
}
