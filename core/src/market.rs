//! The listing board: items currently for sale.
//!
//! REFRESH ORDER (fixed, tests depend on it):
//!   1. Price drift on every listing
//!   2. Risk-flag and condition re-rolls
//!   3. Off-screen sales (independent removal per listing)
//!   4. Replenishment
//!
//! The market never touches cash; transactions live in trade.rs.

use crate::{
    config::MarketConfig,
    factory::ItemFactory,
    item::{Item, ItemKind},
    rng::RandomSource,
    types::floor_cash,
};

/// Summary of one `refresh()` pass, for logging and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshReport {
    pub drifted: usize,
    pub churned: usize,
    pub added:   usize,
}

#[derive(Debug, Clone)]
pub struct Market {
    config:   MarketConfig,
    listings: Vec<Item>,
}

impl Market {
    pub fn new(config: MarketConfig) -> Self {
        Self {
            config,
            listings: Vec::new(),
        }
    }

    /// Replace every listing with `count` fresh items. With `None` the
    /// count is drawn from the configured listing range.
    pub fn generate(
        &mut self,
        count: Option<usize>,
        factory: &ItemFactory,
        rng: &mut dyn RandomSource,
    ) -> usize {
        let count = count.unwrap_or_else(|| {
            rng.range_inclusive(self.config.min_listings as i64, self.config.max_listings as i64)
                as usize
        });
        self.listings.clear();
        self.listings
            .extend((0..count).map(|_| factory.generate_listing(rng)));
        log::debug!("market generated: {count} listings");
        count
    }

    pub fn refresh(&mut self, factory: &ItemFactory, rng: &mut dyn RandomSource) -> RefreshReport {
        let cfg = &self.config;
        let floor = factory.price_floor();

        for item in &mut self.listings {
            let band = match item.kind {
                ItemKind::Watch => cfg.watch_drift_band,
                ItemKind::Part  => cfg.part_drift_band,
            };
            let drift = 1.0 + rng.uniform(-band / 2.0, band / 2.0);
            item.ask_price = floor_cash(item.ask_price as f64 * drift).max(floor);
        }
        let drifted = self.listings.len();

        for item in &mut self.listings {
            if rng.chance(cfg.risk_flip_chance) {
                item.risk_note = if item.risk_note.is_empty() {
                    cfg.risk_flip_note.clone()
                } else {
                    String::new()
                };
            }
            if rng.chance(cfg.condition_reroll_chance) {
                item.condition = factory.roll_condition(item.kind, rng);
            }
        }

        let before = self.listings.len();
        self.listings.retain(|_| !rng.chance(cfg.churn_chance));
        let churned = before - self.listings.len();

        let added = rng.range_inclusive(cfg.replenish_min as i64, cfg.replenish_max as i64) as usize;
        self.listings
            .extend((0..added).map(|_| factory.generate_listing(rng)));

        let report = RefreshReport { drifted, churned, added };
        log::debug!("market refreshed: {report:?}, {} listings", self.listings.len());
        report
    }

    /// Take the listing at `index` off the board. `None` if out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<Item> {
        (index < self.listings.len()).then(|| self.listings.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.listings.get(index)
    }

    pub fn listings(&self) -> &[Item] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Test hook: put a specific item on the board.
    pub fn push_listing(&mut self, item: Item) {
        self.listings.push(item);
    }
}
