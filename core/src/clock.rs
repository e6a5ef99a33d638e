//! Economy clock: owns the day counter and the end-of-day books.
//!
//! Closing a day is the one path allowed to push cash below zero:
//! holding costs are charged whether or not the player can afford them.

use crate::{
    config::ClockConfig,
    rng::RandomSource,
    state::PlayerState,
    types::{Cash, Day},
};
use serde::{Deserialize, Serialize};

/// What happened when a day closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    pub day:               Day,
    pub holding_cost:      Cash,
    pub reputation_delta:  i64,
}

#[derive(Debug, Clone)]
pub struct EconomyClock {
    config:  ClockConfig,
    day:     Day,
}

impl EconomyClock {
    pub fn new(config: ClockConfig) -> Self {
        Self { config, day: 1 }
    }

    pub fn day(&self) -> Day {
        self.day
    }

    /// Jump to a restored day (load only).
    pub fn restore(&mut self, day: Day) {
        self.day = day.max(1);
    }

    /// Advance one day. Returns the new day number.
    pub fn advance(&mut self) -> Day {
        self.day += 1;
        self.day
    }

    /// Advance the day, charge holding costs and apply reputation drift.
    /// Market regeneration is left to the caller.
    pub fn close_day(
        &mut self,
        player: &mut PlayerState,
        items_held: usize,
        rng: &mut dyn RandomSource,
    ) -> DayReport {
        let day = self.advance();

        let holding_cost = (items_held as Cash).saturating_mul(self.config.holding_cost_per_item);
        player.cash = player.cash.saturating_sub(holding_cost);

        let before = player.reputation;
        if rng.chance(self.config.rep_gain_chance) {
            player.reputation = player.reputation.saturating_add(1);
        }
        // Reputation never drops below zero from drift.
        if rng.chance(self.config.rep_loss_chance) && player.reputation > 0 {
            player.reputation -= 1;
        }

        DayReport {
            day,
            holding_cost,
            reputation_delta: player.reputation - before,
        }
    }
}
