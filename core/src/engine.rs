//! The game engine: command dispatch, autosave and the event journal.
//!
//! EXECUTION ORDER for one command (fixed):
//!   1. Dispatch to the matching `GameState` operation.
//!   2. On success of a mutating command, encode and write the save.
//!   3. Journal the resulting event through the backend.
//!
//! RULES:
//!   - A rejected command changes nothing and is neither saved nor journalled.
//!   - Autosave and journal failures are logged, never surfaced as rejections.
//!   - All randomness flows through the state's injected source.

use crate::{
    command::PlayerCommand,
    error::SimResult,
    event::{EventLogEntry, GameEvent},
    snapshot::GameSnapshot,
    state::GameState,
    store::SaveBackend,
    trade::TradeResult,
    types::RunId,
};

pub struct GameEngine {
    pub run_id: RunId,
    state:      GameState,
    backend:    Option<Box<dyn SaveBackend>>,
}

impl GameEngine {
    pub fn new(run_id: RunId, state: GameState, backend: Option<Box<dyn SaveBackend>>) -> Self {
        Self {
            run_id,
            state,
            backend,
        }
    }

    /// Load the saved game once at startup, if there is one.
    /// A missing or unreadable save keeps the fresh game.
    pub fn boot(&mut self) -> Option<GameEvent> {
        let text = match self.backend.as_mut()?.read_save() {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::info!("no save found, starting a new game");
                return None;
            }
            Err(e) => {
                log::warn!("could not read save at startup: {e}");
                return None;
            }
        };
        match self.state.load(&text) {
            Ok(event) => {
                self.journal(&event);
                Some(event)
            }
            Err(e) => {
                log::warn!("ignoring unreadable save: {e}");
                None
            }
        }
    }

    /// Run one host command.
    pub fn execute(&mut self, command: PlayerCommand) -> TradeResult {
        log::debug!("executing {command:?}");
        let mutating = command.is_mutating();
        let event = match command {
            PlayerCommand::GenerateMarket          => self.state.generate_market(),
            PlayerCommand::RefreshMarket           => self.state.refresh_market(),
            PlayerCommand::AdvanceDay              => self.state.advance_day(),
            PlayerCommand::SetLocation { location } => self.state.set_location(location),
            PlayerCommand::Buy { index }           => self.state.buy(index)?,
            PlayerCommand::Haggle { index }        => self.state.haggle(index)?,
            PlayerCommand::AuctionBid { index }    => self.state.auction_bid(index)?,
            PlayerCommand::BuyDrop { index }       => self.state.buy_drop(index)?,
            PlayerCommand::SellOne { index }       => self.state.sell_one(index)?,
            PlayerCommand::QuickSellAll            => self.state.quick_sell_all()?,
            PlayerCommand::Promote                 => self.state.promote()?,
            PlayerCommand::BreakToParts            => self.state.break_to_parts()?,
            PlayerCommand::Save                    => self.save(),
            PlayerCommand::Load                    => self.load(),
        };

        if mutating {
            self.autosave();
        }
        self.journal(&event);
        Ok(event)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tests and tooling. Bypasses autosave.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    // ── Persistence ───────────────────────────────────────────────

    fn save(&mut self) -> GameEvent {
        let persisted = match self.write_save() {
            Ok(written) => written,
            Err(e) => {
                log::warn!("save failed: {e}");
                false
            }
        };
        GameEvent::GameSaved {
            day: self.state.day(),
            items: self.state.inventory().len(),
            persisted,
        }
    }

    fn load(&mut self) -> GameEvent {
        let Some(backend) = self.backend.as_mut() else {
            return GameEvent::LoadFailed {
                reason: "no save backend configured".to_string(),
            };
        };
        let text = match backend.read_save() {
            Ok(Some(text)) => text,
            Ok(None) => {
                return GameEvent::LoadFailed {
                    reason: "no save found".to_string(),
                }
            }
            Err(e) => return GameEvent::LoadFailed { reason: e.to_string() },
        };
        match self.state.load(&text) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("load failed, keeping current game: {e}");
                GameEvent::LoadFailed { reason: e.to_string() }
            }
        }
    }

    /// `Ok(false)` when there is nowhere to write.
    fn write_save(&mut self) -> SimResult<bool> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(false);
        };
        backend.write_save(&self.state.save())?;
        Ok(true)
    }

    fn autosave(&mut self) {
        if let Err(e) = self.write_save() {
            log::warn!("autosave failed on day {}: {e}", self.state.day());
        }
    }

    fn journal(&mut self, event: &GameEvent) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let payload = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("could not serialize {} event: {e}", event.type_name());
                return;
            }
        };
        let entry = EventLogEntry {
            id:         None,
            run_id:     self.run_id.clone(),
            day:        self.state.day(),
            event_type: event.type_name().to_string(),
            payload,
        };
        if let Err(e) = backend.record_event(&entry) {
            log::warn!("could not journal {}: {e}", entry.event_type);
        }
    }
}
