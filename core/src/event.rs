//! Events: what each engine operation did.
//!
//! Every successful operation returns one `GameEvent`. The engine
//! journals them (JSON payload) through the save backend so a session
//! can be audited after the fact.

use crate::{
    item::ItemId,
    state::Location,
    trade::PurchaseChannel,
    types::{Cash, Day, RunId},
};
use serde::{Deserialize, Serialize};

/// Variants are appended only, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Market ─────────────────────────────────────
    MarketGenerated {
        day: Day,
        listings: usize,
    },
    MarketRefreshed {
        day: Day,
        drifted: usize,
        churned: usize,
        added: usize,
        listings: usize,
    },
    LocationChanged {
        day: Day,
        location: Location,
        listings: usize,
    },

    // ── Clock ──────────────────────────────────────
    DayAdvanced {
        day: Day,
        holding_cost: Cash,
        reputation_delta: i64,
        cash: Cash,
        listings: usize,
    },

    // ── Trades ─────────────────────────────────────
    ItemPurchased {
        day: Day,
        item_id: ItemId,
        name: String,
        channel: PurchaseChannel,
        price: Cash,
        resale_ask: Cash,
    },
    ItemSold {
        day: Day,
        item_id: ItemId,
        name: String,
        proceeds: Cash,
        profit: Cash,
        level: u32,
    },
    InventoryLiquidated {
        day: Day,
        items: usize,
        proceeds: Cash,
        level: u32,
    },
    Promoted {
        day: Day,
        cost: Cash,
        reputation: i64,
    },
    WatchBrokenDown {
        day: Day,
        watch_id: ItemId,
        watch_name: String,
        part_ids: Vec<ItemId>,
        part_ask: Cash,
    },

    // ── Persistence ────────────────────────────────
    GameSaved {
        day: Day,
        items: usize,
        persisted: bool,
    },
    GameLoaded {
        day: Day,
        items: usize,
        skipped: usize,
    },
    LoadFailed {
        reason: String,
    },
}

impl GameEvent {
    /// Stable name, used for the event_type column of the journal.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::MarketGenerated { .. }     => "market_generated",
            Self::MarketRefreshed { .. }     => "market_refreshed",
            Self::LocationChanged { .. }     => "location_changed",
            Self::DayAdvanced { .. }         => "day_advanced",
            Self::ItemPurchased { .. }       => "item_purchased",
            Self::ItemSold { .. }            => "item_sold",
            Self::InventoryLiquidated { .. } => "inventory_liquidated",
            Self::Promoted { .. }            => "promoted",
            Self::WatchBrokenDown { .. }     => "watch_broken_down",
            Self::GameSaved { .. }           => "game_saved",
            Self::GameLoaded { .. }          => "game_loaded",
            Self::LoadFailed { .. }          => "load_failed",
        }
    }
}

/// The journal entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub day:        Day,
    pub event_type: String,
    pub payload:    String, // JSON-serialized GameEvent
}
