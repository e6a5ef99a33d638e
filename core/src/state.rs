//! Game state. Owns the market, the inventory, the clock and the
//! player's scalars. The host calls one operation per input event and
//! then reads `snapshot()` to draw.
//!
//! Transactions (buy, sell, haggle, ...) are in trade.rs.

use crate::{
    clock::EconomyClock,
    codec::{SaveCodec, SaveData, SavedItem},
    config::{EconomyConfig, PlayerConfig},
    error::SimResult,
    event::GameEvent,
    factory::ItemFactory,
    inventory::Inventory,
    market::Market,
    rng::RandomSource,
    snapshot::GameSnapshot,
    types::{Cash, Day},
};
use serde::{Deserialize, Serialize};

// ── Player ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub cash:               Cash,
    pub reputation:         i64,
    pub level:              u32,
    pub experience:         u64,
    pub experience_to_next: u64,
}

impl PlayerState {
    pub fn new(cash: Cash, reputation: i64) -> Self {
        Self::from_config(&PlayerConfig {
            starting_cash: cash,
            starting_reputation: reputation,
            ..PlayerConfig::default()
        })
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            cash:               config.starting_cash,
            reputation:         config.starting_reputation,
            level:              1,
            experience:         0,
            experience_to_next: config.initial_xp_to_next.max(1),
        }
    }

    pub fn can_afford(&self, price: Cash) -> bool {
        self.cash >= price
    }

    /// Add experience, levelling up as many times as it covers.
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u64, growth: f64) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.experience_to_next {
            self.experience -= self.experience_to_next;
            self.level += 1;
            gained += 1;
            let next = (self.experience_to_next as f64 * growth).floor() as u64;
            self.experience_to_next = next.max(self.experience_to_next + 1);
        }
        gained
    }
}

// ── Location ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    #[default]
    DiamondDistrict,
    HattonGarden,
    Mayfair,
    LeMarais,
    FleaMarket,
    OnlineForums,
}

impl Location {
    pub const ALL: [Location; 6] = [
        Self::DiamondDistrict,
        Self::HattonGarden,
        Self::Mayfair,
        Self::LeMarais,
        Self::FleaMarket,
        Self::OnlineForums,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::DiamondDistrict => "NYC • Diamond District",
            Self::HattonGarden    => "London • Hatton Garden",
            Self::Mayfair         => "London • Mayfair",
            Self::LeMarais        => "Paris • Le Marais",
            Self::FleaMarket      => "Flea / Antique",
            Self::OnlineForums    => "Online • Forums/Telegram",
        }
    }

    pub fn blurb(&self) -> &'static str {
        match self {
            Self::DiamondDistrict => "Rolex-heavy dealer networks",
            Self::HattonGarden    => "Sinn bias, vintage supply",
            Self::Mayfair         => "Patek & Rolex dress",
            Self::LeMarais        => "Dress & Cartier",
            Self::FleaMarket      => "Random gems & parts",
            Self::OnlineForums    => "Risky but hot deals",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.label() == label)
    }

    /// Position on the travel map (0-based).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

// ── GameState ──────────────────────────────────────────────────────

pub struct GameState {
    pub(crate) config:    EconomyConfig,
    pub(crate) rng:       Box<dyn RandomSource>,
    pub(crate) factory:   ItemFactory,
    pub(crate) market:    Market,
    pub(crate) inventory: Inventory,
    pub(crate) clock:     EconomyClock,
    pub(crate) player:    PlayerState,
    pub(crate) location:  Location,
}

impl GameState {
    /// A fresh game with an empty market. Most callers want `start()`.
    pub fn new(config: EconomyConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            factory:   ItemFactory::new(&config),
            market:    Market::new(config.market.clone()),
            inventory: Inventory::new(),
            clock:     EconomyClock::new(config.clock.clone()),
            player:    PlayerState::from_config(&config.player),
            location:  Location::default(),
            config,
            rng,
        }
    }

    /// A fresh game with day one's market already listed.
    pub fn start(config: EconomyConfig, rng: Box<dyn RandomSource>) -> Self {
        let mut state = Self::new(config, rng);
        state.generate_market();
        state
    }

    // ── Read access ───────────────────────────────────────────────

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn factory(&self) -> &ItemFactory {
        &self.factory
    }

    pub fn day(&self) -> Day {
        self.clock.day()
    }

    pub fn cash(&self) -> Cash {
        self.player.cash
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    // ── Test / tooling hooks ──────────────────────────────────────

    pub fn market_mut(&mut self) -> &mut Market {
        &mut self.market
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    // ── Market and clock ──────────────────────────────────────────

    pub fn generate_market(&mut self) -> GameEvent {
        let listings = self.market.generate(None, &self.factory, self.rng.as_mut());
        GameEvent::MarketGenerated {
            day: self.day(),
            listings,
        }
    }

    pub fn refresh_market(&mut self) -> GameEvent {
        let report = self.market.refresh(&self.factory, self.rng.as_mut());
        GameEvent::MarketRefreshed {
            day:      self.day(),
            drifted:  report.drifted,
            churned:  report.churned,
            added:    report.added,
            listings: self.market.len(),
        }
    }

    /// Close the day: holding costs, reputation drift, new listings.
    pub fn advance_day(&mut self) -> GameEvent {
        let report = self
            .clock
            .close_day(&mut self.player, self.inventory.len(), self.rng.as_mut());
        self.market.generate(None, &self.factory, self.rng.as_mut());
        log::info!(
            "day {} opened: holding cost ${}, reputation {:+}, cash ${}",
            report.day,
            report.holding_cost,
            report.reputation_delta,
            self.player.cash
        );
        GameEvent::DayAdvanced {
            day:              report.day,
            holding_cost:     report.holding_cost,
            reputation_delta: report.reputation_delta,
            cash:             self.player.cash,
            listings:         self.market.len(),
        }
    }

    /// Travel. Always relists the market, even for the current location.
    pub fn set_location(&mut self, location: Location) -> GameEvent {
        self.location = location;
        let listings = self.market.generate(None, &self.factory, self.rng.as_mut());
        log::debug!("travelled to {}", location.label());
        GameEvent::LocationChanged {
            day: self.day(),
            location,
            listings,
        }
    }

    // ── Persistence ───────────────────────────────────────────────

    pub fn save_data(&self) -> SaveData {
        SaveData {
            day:        self.day(),
            cash:       self.player.cash,
            reputation: self.player.reputation,
            items:      self.inventory.items().iter().map(SavedItem::from).collect(),
        }
    }

    /// Encode the persistent subset of the state.
    pub fn save(&self) -> String {
        SaveCodec::encode(&self.save_data())
    }

    /// Replace day, cash, reputation and inventory from `text` and
    /// relist the market. On error nothing is changed.
    pub fn load(&mut self, text: &str) -> SimResult<GameEvent> {
        let decoded = SaveCodec::decode(text)?;
        let data = decoded.data;

        let items = data
            .items
            .iter()
            .map(|saved| self.factory.restore(saved, self.rng.as_mut()))
            .collect();
        self.inventory.replace_all(items);
        self.clock.restore(data.day);
        self.player.cash = data.cash;
        self.player.reputation = data.reputation;
        self.market.generate(None, &self.factory, self.rng.as_mut());

        log::info!(
            "loaded day {} with {} items ({} lines skipped)",
            data.day,
            self.inventory.len(),
            decoded.skipped_lines.len()
        );
        Ok(GameEvent::GameLoaded {
            day:     data.day,
            items:   self.inventory.len(),
            skipped: decoded.skipped_lines.len(),
        })
    }
}
