//! Transactions between the player, the market and the inventory.
//!
//! RULES:
//!   - Every operation is all-or-nothing. A rejection leaves market,
//!     inventory and cash exactly as they were.
//!   - Every purchase path checks affordability before touching cash.
//!   - Amounts round down to whole dollars and never go under the
//!     price floor.
//!
//! Rejections are plain values, not failures: the host typically logs
//! them and carries on.

use crate::{
    config::RatioBand,
    event::GameEvent,
    state::GameState,
    types::{floor_cash, Cash},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TradeRejection {
    #[error("cannot afford ${price} with ${cash} on hand")]
    InsufficientCash { price: Cash, cash: Cash },

    #[error("no listing at position {index} (market has {len})")]
    NoSuchListing { index: usize, len: usize },

    #[error("no inventory item at position {index} (inventory has {len})")]
    NoSuchItem { index: usize, len: usize },

    #[error("inventory is empty")]
    EmptyInventory,

    #[error("no watch in inventory to break down")]
    NoWatchToBreak,
}

pub type TradeResult = Result<GameEvent, TradeRejection>;

/// How a listing was bought. Decides the price paid and which resale
/// markup the item is relisted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseChannel {
    /// Detail view "Buy": pay the ask.
    Posted,
    /// Detail view "Haggle": pay a discounted ask.
    Haggle,
    /// Auction house: pay a deeper discount.
    Auction,
    /// Telegram / parts feeds: pay the ask, negotiated markup.
    Drop,
}

impl GameState {
    pub fn buy(&mut self, index: usize) -> TradeResult {
        self.purchase(index, PurchaseChannel::Posted)
    }

    pub fn haggle(&mut self, index: usize) -> TradeResult {
        self.purchase(index, PurchaseChannel::Haggle)
    }

    pub fn auction_bid(&mut self, index: usize) -> TradeResult {
        self.purchase(index, PurchaseChannel::Auction)
    }

    pub fn buy_drop(&mut self, index: usize) -> TradeResult {
        self.purchase(index, PurchaseChannel::Drop)
    }

    /// The discounted price is rolled before the affordability check, so
    /// a rejected haggle or auction bid still consumes random draws.
    fn purchase(&mut self, index: usize, channel: PurchaseChannel) -> TradeResult {
        let len = self.market.len();
        let ask = self
            .market
            .get(index)
            .map(|item| item.ask_price)
            .ok_or(TradeRejection::NoSuchListing { index, len })?;

        let discount = match channel {
            PurchaseChannel::Posted | PurchaseChannel::Drop => None,
            PurchaseChannel::Haggle => Some(self.config.trade.haggle_discount),
            PurchaseChannel::Auction => Some(self.config.trade.auction_discount),
        };
        let price = match discount {
            Some(band) => self.scaled(ask, band),
            None => ask,
        };
        if !self.player.can_afford(price) {
            log::debug!("{channel:?} purchase of listing {index} rejected: ${price} > ${}", self.player.cash);
            return Err(TradeRejection::InsufficientCash {
                price,
                cash: self.player.cash,
            });
        }

        let markup = match channel {
            PurchaseChannel::Posted => self.config.trade.posted_markup,
            _ => self.config.trade.negotiated_markup,
        };
        let resale_ask = self.scaled(price, markup);

        let Some(mut item) = self.market.remove_at(index) else {
            return Err(TradeRejection::NoSuchListing { index, len });
        };
        self.player.cash = self.player.cash.saturating_sub(price);
        item.acquisition_cost = price;
        item.ask_price = resale_ask;

        let event = GameEvent::ItemPurchased {
            day: self.day(),
            item_id: item.id.clone(),
            name: item.name.clone(),
            channel,
            price,
            resale_ask,
        };
        log::debug!("bought {} for ${price} via {channel:?}, relist at ${resale_ask}", item.name);
        self.inventory.push(item);
        Ok(event)
    }

    /// Sell one item at its current ask. The item is gone for good.
    pub fn sell_one(&mut self, index: usize) -> TradeResult {
        let len = self.inventory.len();
        let item = self
            .inventory
            .remove_at(index)
            .ok_or(TradeRejection::NoSuchItem { index, len })?;

        self.player.cash = self.player.cash.saturating_add(item.ask_price);
        self.award_sale_experience(1);
        log::debug!("sold {} for ${}", item.name, item.ask_price);

        Ok(GameEvent::ItemSold {
            day: self.day(),
            profit: item.ask_price.saturating_sub(item.acquisition_cost),
            proceeds: item.ask_price,
            item_id: item.id,
            name: item.name,
            level: self.player.level,
        })
    }

    /// Dump the whole inventory at a liquidation discount.
    pub fn quick_sell_all(&mut self) -> TradeResult {
        if self.inventory.is_empty() {
            return Err(TradeRejection::EmptyInventory);
        }
        let rate = self.config.trade.quick_sell_rate;
        let sold = self.inventory.take_all();
        let proceeds: Cash = sold
            .iter()
            .map(|item| floor_cash(item.ask_price as f64 * rate))
            .fold(0, Cash::saturating_add);

        self.player.cash = self.player.cash.saturating_add(proceeds);
        self.award_sale_experience(sold.len());
        log::debug!("quick-sold {} items for ${proceeds}", sold.len());

        Ok(GameEvent::InventoryLiquidated {
            day: self.day(),
            items: sold.len(),
            proceeds,
            level: self.player.level,
        })
    }

    /// Marketing spend: costs scale with stock, capped; +1 reputation.
    pub fn promote(&mut self) -> TradeResult {
        if self.inventory.is_empty() {
            return Err(TradeRejection::EmptyInventory);
        }
        let trade = &self.config.trade;
        let cost = (self.inventory.len() as Cash * trade.promote_cost_per_item)
            .min(trade.promote_cost_cap);
        if !self.player.can_afford(cost) {
            return Err(TradeRejection::InsufficientCash {
                price: cost,
                cash: self.player.cash,
            });
        }

        self.player.cash = self.player.cash.saturating_sub(cost);
        self.player.reputation = self.player.reputation.saturating_add(1);
        Ok(GameEvent::Promoted {
            day: self.day(),
            cost,
            reputation: self.player.reputation,
        })
    }

    /// Replace the first watch in the inventory with its five parts,
    /// at the watch's position.
    pub fn break_to_parts(&mut self) -> TradeResult {
        let index = self
            .inventory
            .first_watch_index()
            .ok_or(TradeRejection::NoWatchToBreak)?;
        let Some(watch) = self.inventory.remove_at(index) else {
            return Err(TradeRejection::NoWatchToBreak);
        };

        let trade = &self.config.trade;
        let part_ask = floor_cash(watch.ask_price as f64 * trade.break_part_rate)
            .max(self.config.price_floor);
        let parts: Vec<_> = trade
            .break_parts
            .iter()
            .map(|component| {
                self.factory.derive_part(
                    &watch,
                    component,
                    trade.break_part_condition,
                    part_ask,
                    self.rng.as_mut(),
                )
            })
            .collect();
        let part_ids = parts.iter().map(|p| p.id.clone()).collect();
        self.inventory.splice_in(index, parts);
        log::debug!("broke {} into parts at ${part_ask} each", watch.name);

        Ok(GameEvent::WatchBrokenDown {
            day: self.day(),
            watch_id: watch.id,
            watch_name: watch.name,
            part_ids,
            part_ask,
        })
    }

    /// `floor(amount * U(band))`, never under the price floor.
    fn scaled(&mut self, amount: Cash, band: RatioBand) -> Cash {
        floor_cash(amount as f64 * self.rng.uniform(band.min, band.max)).max(self.config.price_floor)
    }

    fn award_sale_experience(&mut self, items: usize) {
        let per_sale = self.config.player.xp_per_sale;
        let growth = self.config.player.xp_growth;
        let gained = self.player.gain_experience(per_sale * items as u64, growth);
        if gained > 0 {
            log::info!("reached level {}", self.player.level);
        }
    }
}
