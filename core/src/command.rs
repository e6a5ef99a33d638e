use crate::state::Location;
use serde::{Deserialize, Serialize};

/// All host-issued intents. One command maps to one engine call.
/// Variants are appended only, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Market and clock ──────────────────────────
    GenerateMarket,
    RefreshMarket,
    AdvanceDay,
    SetLocation { location: Location },

    // ── Trades ────────────────────────────────────
    Buy { index: usize },
    Haggle { index: usize },
    AuctionBid { index: usize },
    BuyDrop { index: usize },
    SellOne { index: usize },
    QuickSellAll,
    Promote,
    BreakToParts,

    // ── Persistence ───────────────────────────────
    Save,
    Load,
}

impl PlayerCommand {
    /// Whether a successful run of this command changes persistent or
    /// market state (and so triggers an autosave).
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Save | Self::Load)
    }
}
