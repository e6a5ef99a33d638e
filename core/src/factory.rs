//! Procedural item generation.
//!
//! `ItemFactory` is the only place items are created: market listings,
//! parts from a broken-down watch, and items restored from a save all
//! come through here. Every roll goes through the injected
//! `RandomSource`; the factory itself holds no mutable state.

use crate::{
    codec::SavedItem,
    config::{BrandEntry, CatalogConfig, EconomyConfig},
    item::{Condition, Item, ItemId, ItemKind},
    rng::{pick, RandomSource},
    types::{floor_cash, Cash},
};

#[derive(Debug, Clone)]
pub struct ItemFactory {
    catalog:     CatalogConfig,
    price_floor: Cash,
}

impl ItemFactory {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            catalog:     config.catalog.clone(),
            price_floor: config.price_floor,
        }
    }

    pub fn price_floor(&self) -> Cash {
        self.price_floor
    }

    /// One market listing: a part or a watch.
    pub fn generate_listing(&self, rng: &mut dyn RandomSource) -> Item {
        if rng.chance(self.catalog.part_listing_chance) {
            self.generate_part(rng)
        } else {
            self.generate_watch(rng)
        }
    }

    pub fn generate_watch(&self, rng: &mut dyn RandomSource) -> Item {
        let cat = &self.catalog;
        let brand = self.pick_brand(cat.prestige_watch_chance, rng);
        let reference = if brand.references.is_empty() {
            String::new()
        } else {
            pick(rng, &brand.references).clone()
        };
        let condition = *pick(rng, &cat.watch_grades);

        let band = brand.watch_price.unwrap_or(cat.default_watch_price);
        let mut ask = rng.range_inclusive(band.min, band.max);

        // Swapped-in prestige parts only make sense on other brands.
        let parts_swap = brand.name != cat.prestige_brand && rng.chance(cat.parts_swap_chance);
        let risk_note = if rng.chance(cat.aftermarket_dial_chance) {
            cat.aftermarket_dial_note.clone()
        } else if parts_swap {
            cat.parts_swap_note.clone()
        } else {
            String::new()
        };
        if parts_swap {
            ask += rng.range_inclusive(cat.parts_swap_surcharge.min, cat.parts_swap_surcharge.max);
        }
        let ask_price = ask.max(self.price_floor);
        let wholesale_cost = self.wholesale_cost(ask_price, cat.watch_cost_floor, rng);

        Item {
            id: ItemId::mint(rng),
            kind: ItemKind::Watch,
            name: watch_name(brand, &reference),
            brand: brand.name.clone(),
            reference,
            condition,
            ask_price,
            acquisition_cost: 0,
            wholesale_cost,
            risk_note,
        }
    }

    pub fn generate_part(&self, rng: &mut dyn RandomSource) -> Item {
        let cat = &self.catalog;
        let brand = self.pick_brand(cat.prestige_part_chance, rng);
        let component = pick(rng, &cat.components).clone();
        let reference = if brand.part_references && !brand.references.is_empty() {
            pick(rng, &brand.references).clone()
        } else {
            String::new()
        };
        let condition = *pick(rng, &cat.part_grades);
        let caliber = if component == cat.movement_component {
            Some(pick(rng, &cat.movement_calibers).as_str())
        } else {
            None
        };

        let band = brand.part_price.unwrap_or(cat.default_part_price);
        let ask_price = rng.range_inclusive(band.min, band.max).max(self.price_floor);
        let wholesale_cost = self.wholesale_cost(ask_price, cat.part_cost_floor, rng);

        let risk_note = if brand.name == cat.prestige_brand && rng.chance(cat.part_aftermarket_chance) {
            cat.part_aftermarket_note.clone()
        } else {
            String::new()
        };

        let mut name = part_name(&brand.name, &reference, &component);
        if let Some(caliber) = caliber {
            name.push_str(&format!(" ({caliber})"));
        }

        Item {
            id: ItemId::mint(rng),
            kind: ItemKind::Part,
            brand: brand.name.clone(),
            reference,
            name,
            condition,
            ask_price,
            acquisition_cost: 0,
            wholesale_cost,
            risk_note,
        }
    }

    /// A part salvaged from `source`. Owned from birth, so no wholesale
    /// basis and no acquisition cost.
    pub fn derive_part(
        &self,
        source: &Item,
        component: &str,
        condition: Condition,
        ask_price: Cash,
        rng: &mut dyn RandomSource,
    ) -> Item {
        Item {
            id: ItemId::mint(rng),
            kind: ItemKind::Part,
            brand: source.brand.clone(),
            reference: source.reference.clone(),
            name: part_name(&source.brand, &source.reference, component),
            condition,
            ask_price: ask_price.max(self.price_floor),
            acquisition_cost: 0,
            wholesale_cost: 0,
            risk_note: String::new(),
        }
    }

    /// Rebuild an inventory item from its persisted fields. Gets a fresh
    /// id and no risk note.
    pub fn restore(&self, saved: &SavedItem, rng: &mut dyn RandomSource) -> Item {
        Item {
            id: ItemId::mint(rng),
            kind: saved.kind,
            brand: saved.brand.clone(),
            reference: saved.reference.clone(),
            name: saved.name.clone(),
            condition: saved.condition,
            ask_price: saved.ask_price.max(self.price_floor),
            acquisition_cost: saved.acquisition_cost,
            wholesale_cost: 0,
            risk_note: String::new(),
        }
    }

    /// Re-roll a condition from the grade set for `kind`.
    pub fn roll_condition(&self, kind: ItemKind, rng: &mut dyn RandomSource) -> Condition {
        match kind {
            ItemKind::Watch => *pick(rng, &self.catalog.watch_grades),
            ItemKind::Part  => *pick(rng, &self.catalog.part_grades),
        }
    }

    fn pick_brand(&self, prestige_chance: f64, rng: &mut dyn RandomSource) -> &BrandEntry {
        let cat = &self.catalog;
        if rng.chance(prestige_chance) {
            if let Some(prestige) = cat.brand(&cat.prestige_brand) {
                return prestige;
            }
        }
        let others = cat.other_brands();
        *pick(rng, &others)
    }

    fn wholesale_cost(&self, ask: Cash, cost_floor: Cash, rng: &mut dyn RandomSource) -> Cash {
        let ratio = self.catalog.wholesale_ratio;
        floor_cash(ask as f64 * rng.uniform(ratio.min, ratio.max)).max(cost_floor)
    }
}

fn watch_name(brand: &BrandEntry, reference: &str) -> String {
    if let Some(name) = brand.reference_names.get(reference) {
        return name.clone();
    }
    if let Some(name) = &brand.display_name {
        return name.clone();
    }
    if reference.is_empty() {
        format!("{} auto", brand.name)
    } else {
        format!("{} {}", brand.name, reference)
    }
}

fn part_name(brand: &str, reference: &str, component: &str) -> String {
    if reference.is_empty() {
        format!("{brand} {component}")
    } else {
        format!("{brand} {reference} {component}")
    }
}
