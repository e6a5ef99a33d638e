use crate::{item::Condition, types::Cash};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resale markup applied after buying at the posted ask.
pub const POSTED_RESALE_MARKUP: RatioBand = RatioBand { min: 1.1, max: 1.6 };

/// Resale markup applied after a negotiated purchase (haggle, auction,
/// feed drops). Kept apart from the posted markup on purpose.
pub const NEGOTIATED_RESALE_MARKUP: RatioBand = RatioBand { min: 1.2, max: 1.7 };

/// Inclusive integer price range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceBand {
    pub min: Cash,
    pub max: Cash,
}

impl PriceBand {
    pub const fn new(min: Cash, max: Cash) -> Self {
        Self { min, max }
    }
}

/// Half-open multiplier range [min, max).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatioBand {
    pub min: f64,
    pub max: f64,
}

impl RatioBand {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

// ── Catalog ────────────────────────────────────────────────────────

/// One row of the brand lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandEntry {
    pub name: String,
    /// Falls back to `CatalogConfig::default_watch_price` when absent.
    #[serde(default)]
    pub watch_price: Option<PriceBand>,
    #[serde(default)]
    pub part_price: Option<PriceBand>,
    #[serde(default)]
    pub references: Vec<String>,
    /// Whether parts of this brand are tagged with a reference too.
    #[serde(default)]
    pub part_references: bool,
    /// Brand-wide display name for watches, e.g. "Omega Speedmaster Pro".
    #[serde(default)]
    pub display_name: Option<String>,
    /// Per-reference display names.
    #[serde(default)]
    pub reference_names: BTreeMap<String, String>,
}

impl BrandEntry {
    fn plain(name: &str) -> Self {
        Self {
            name: name.into(),
            watch_price: None,
            part_price: None,
            references: Vec::new(),
            part_references: false,
            display_name: None,
            reference_names: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub prestige_brand:          String,
    pub prestige_watch_chance:   f64,
    pub prestige_part_chance:    f64,
    pub brands:                  Vec<BrandEntry>,
    pub default_watch_price:     PriceBand,
    pub default_part_price:      PriceBand,
    pub watch_grades:            Vec<Condition>,
    pub part_grades:             Vec<Condition>,
    pub components:              Vec<String>,
    /// The component that carries a movement caliber in its name.
    pub movement_component:      String,
    pub movement_calibers:       Vec<String>,
    /// Share of market listings that are parts rather than watches.
    pub part_listing_chance:     f64,
    pub parts_swap_chance:       f64,
    pub parts_swap_surcharge:    PriceBand,
    pub parts_swap_note:         String,
    pub aftermarket_dial_chance: f64,
    pub aftermarket_dial_note:   String,
    pub part_aftermarket_chance: f64,
    pub part_aftermarket_note:   String,
    pub wholesale_ratio:         RatioBand,
    pub watch_cost_floor:        Cash,
    pub part_cost_floor:         Cash,
}

impl CatalogConfig {
    pub fn brand(&self, name: &str) -> Option<&BrandEntry> {
        self.brands.iter().find(|b| b.name == name)
    }

    /// Every brand except the prestige one, in catalog order.
    pub fn other_brands(&self) -> Vec<&BrandEntry> {
        self.brands
            .iter()
            .filter(|b| b.name != self.prestige_brand)
            .collect()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let rolex_refs: Vec<String> = vec!["16610".into(), "14060M".into(), "16710".into()];

        let mut brands: Vec<BrandEntry> = [
            "Rolex", "Omega", "Tudor", "Sinn", "IWC", "Patek Philippe",
            "Christopher Ward", "Damasko", "Doxa", "Seiko", "Longines",
            "Oris", "Breitling", "TAG Heuer", "Cartier", "Hamilton",
        ]
        .iter()
        .map(|name| BrandEntry::plain(name))
        .collect();

        for entry in &mut brands {
            match entry.name.as_str() {
                "Rolex" => {
                    entry.watch_price = Some(PriceBand::new(3_500, 16_000));
                    entry.part_price = Some(PriceBand::new(180, 3_500));
                    entry.references = rolex_refs.clone();
                    entry.part_references = true;
                }
                "Omega" => {
                    entry.watch_price = Some(PriceBand::new(1_500, 4_500));
                    entry.display_name = Some("Omega Speedmaster Pro".into());
                }
                "Tudor" => {
                    entry.watch_price = Some(PriceBand::new(1_200, 4_000));
                }
                "Sinn" => {
                    entry.references = vec!["U1".into(), "104".into(), "356".into()];
                    entry.reference_names.insert("U1".into(), "Sinn U1".into());
                }
                _ => {}
            }
        }

        Self {
            prestige_brand:          "Rolex".into(),
            prestige_watch_chance:   0.35,
            prestige_part_chance:    0.45,
            brands,
            default_watch_price:     PriceBand::new(200, 3_000),
            default_part_price:      PriceBand::new(30, 700),
            watch_grades: vec![
                Condition::VeryGood,
                Condition::Good,
                Condition::Fair,
                Condition::Serviced,
                Condition::Unserviced,
            ],
            part_grades: vec![
                Condition::Nos,
                Condition::VeryGood,
                Condition::Fair,
                Condition::ForParts,
            ],
            components: [
                "dial", "hands", "bezel", "insert", "bracelet",
                "crown", "crystal", "movement", "date wheel",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            movement_component:      "movement".into(),
            movement_calibers: ["3135", "ETA 2824-2", "SW200-1", "6R35"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            part_listing_chance:     0.40,
            parts_swap_chance:       0.15,
            parts_swap_surcharge:    PriceBand::new(200, 1_200),
            parts_swap_note:         "Vintage Rolex parts swap".into(),
            aftermarket_dial_chance: 0.10,
            aftermarket_dial_note:   "Aftermarket dial risk".into(),
            part_aftermarket_chance: 0.25,
            part_aftermarket_note:   "Aftermarket risk".into(),
            wholesale_ratio:         RatioBand::new(0.55, 0.80),
            watch_cost_floor:        50,
            part_cost_floor:         20,
        }
    }
}

// ── Market ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketConfig {
    pub min_listings:            usize,
    pub max_listings:            usize,
    /// Full width of the multiplicative drift band; the roll is
    /// centred on 1.0 (`1 ± band/2`).
    pub watch_drift_band:        f64,
    pub part_drift_band:         f64,
    pub risk_flip_chance:        f64,
    pub risk_flip_note:          String,
    pub condition_reroll_chance: f64,
    /// Chance that a listing sells to someone else on refresh.
    pub churn_chance:            f64,
    pub replenish_min:           usize,
    pub replenish_max:           usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            min_listings:            7,
            max_listings:            11,
            watch_drift_band:        0.08,
            part_drift_band:         0.12,
            risk_flip_chance:        0.07,
            risk_flip_note:          "Provenance unclear".into(),
            condition_reroll_chance: 0.06,
            churn_chance:            0.10,
            replenish_min:           1,
            replenish_max:           3,
        }
    }
}

// ── Trade ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TradeConfig {
    pub haggle_discount:       RatioBand,
    pub auction_discount:      RatioBand,
    pub posted_markup:         RatioBand,
    pub negotiated_markup:     RatioBand,
    pub quick_sell_rate:       f64,
    pub promote_cost_per_item: Cash,
    pub promote_cost_cap:      Cash,
    pub break_parts:           Vec<String>,
    pub break_part_rate:       f64,
    pub break_part_condition:  Condition,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            haggle_discount:       RatioBand::new(0.78, 0.95),
            auction_discount:      RatioBand::new(0.60, 0.85),
            posted_markup:         POSTED_RESALE_MARKUP,
            negotiated_markup:     NEGOTIATED_RESALE_MARKUP,
            quick_sell_rate:       0.9,
            promote_cost_per_item: 6,
            promote_cost_cap:      500,
            break_parts: ["dial", "hands", "bezel/insert", "bracelet", "crown"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            break_part_rate:       0.18,
            break_part_condition:  Condition::Fair,
        }
    }
}

// ── Clock ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    pub holding_cost_per_item: Cash,
    pub rep_gain_chance:       f64,
    pub rep_loss_chance:       f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            holding_cost_per_item: 7,
            rep_gain_chance:       0.30,
            rep_loss_chance:       0.10,
        }
    }
}

// ── Player ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub starting_cash:       Cash,
    pub starting_reputation: i64,
    pub xp_per_sale:         u64,
    pub initial_xp_to_next:  u64,
    pub xp_growth:           f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_cash:       25_000,
            starting_reputation: 0,
            xp_per_sale:         10,
            initial_xp_to_next:  100,
            xp_growth:           1.5,
        }
    }
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomyConfig {
    /// Lower bound for every computed price.
    pub price_floor: Cash,
    pub catalog:     CatalogConfig,
    pub market:      MarketConfig,
    pub trade:       TradeConfig,
    pub clock:       ClockConfig,
    pub player:      PlayerConfig,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            price_floor: 20,
            catalog:     CatalogConfig::default(),
            market:      MarketConfig::default(),
            trade:       TradeConfig::default(),
            clock:       ClockConfig::default(),
            player:      PlayerConfig::default(),
        }
    }
}

impl EconomyConfig {
    /// Load from a JSON file. Missing keys fall back to the defaults.
    /// In tests, use `EconomyConfig::default()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EconomyConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let cat = &self.catalog;
        anyhow::ensure!(self.price_floor > 0, "price_floor must be positive");
        anyhow::ensure!(
            cat.brand(&cat.prestige_brand).is_some(),
            "prestige brand {} missing from catalog",
            cat.prestige_brand
        );
        anyhow::ensure!(!cat.other_brands().is_empty(), "catalog needs a non-prestige brand");
        anyhow::ensure!(!cat.watch_grades.is_empty(), "watch_grades is empty");
        anyhow::ensure!(!cat.part_grades.is_empty(), "part_grades is empty");
        anyhow::ensure!(!cat.components.is_empty(), "components is empty");
        anyhow::ensure!(!cat.movement_calibers.is_empty(), "movement_calibers is empty");

        let mut bands = vec![
            ("default_watch_price", cat.default_watch_price),
            ("default_part_price", cat.default_part_price),
            ("parts_swap_surcharge", cat.parts_swap_surcharge),
        ];
        for b in &cat.brands {
            bands.extend(b.watch_price.map(|p| ("watch_price", p)));
            bands.extend(b.part_price.map(|p| ("part_price", p)));
        }
        for (label, band) in bands {
            anyhow::ensure!(band.min <= band.max, "{label}: min > max");
        }

        let m = &self.market;
        anyhow::ensure!(m.min_listings <= m.max_listings, "market listing range inverted");
        anyhow::ensure!(m.replenish_min <= m.replenish_max, "replenish range inverted");

        let chances = [
            cat.prestige_watch_chance,
            cat.prestige_part_chance,
            cat.part_listing_chance,
            cat.parts_swap_chance,
            cat.aftermarket_dial_chance,
            cat.part_aftermarket_chance,
            m.risk_flip_chance,
            m.condition_reroll_chance,
            m.churn_chance,
            self.clock.rep_gain_chance,
            self.clock.rep_loss_chance,
        ];
        anyhow::ensure!(
            chances.iter().all(|p| (0.0..=1.0).contains(p)),
            "probabilities must lie in [0, 1]"
        );
        anyhow::ensure!(
            self.trade.break_parts.len() == 5,
            "break_parts must name exactly five components"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        EconomyConfig::default().validate().unwrap();
    }

    #[test]
    fn markups_stay_distinct() {
        let trade = TradeConfig::default();
        assert_ne!(trade.posted_markup, trade.negotiated_markup);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EconomyConfig =
            serde_json::from_str(r#"{ "price_floor": 25, "clock": { "holding_cost_per_item": 9 } }"#)
                .unwrap();
        assert_eq!(cfg.price_floor, 25);
        assert_eq!(cfg.clock.holding_cost_per_item, 9);
        assert_eq!(cfg.clock.rep_gain_chance, 0.30);
        assert_eq!(cfg.catalog.prestige_brand, "Rolex");
    }
}
