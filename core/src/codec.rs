//! Save codec: persistent state to/from a flat text form.
//!
//! Format (newline-delimited, comma-separated, no version field):
//!
//! ```text
//! day,cash,reputation
//! I,kind,brand,reference,condition,ask,acquisition_cost,name
//! I,...
//! ```
//!
//! Only the player scalars and the inventory are persisted. Item ids,
//! risk notes and market listings are regenerated on load. The name is
//! the last field and is taken verbatim; no other field may contain a
//! comma (the catalog never produces one).

use crate::{
    error::{SimError, SimResult},
    item::{Condition, Item, ItemKind},
    types::{Cash, Day},
};

/// First field of every inventory line.
pub const ITEM_MARKER: &str = "I";

const ITEM_FIELDS: usize = 8;

/// Largest magnitude accepted for any persisted amount (cash, prices,
/// reputation, day). Keeps later arithmetic far from i64 overflow.
pub const MAX_AMOUNT: Cash = 1_000_000_000_000;

/// The persisted subset of an `Item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedItem {
    pub kind:             ItemKind,
    pub brand:            String,
    pub reference:        String,
    pub condition:        Condition,
    pub ask_price:        Cash,
    pub acquisition_cost: Cash,
    pub name:             String,
}

impl From<&Item> for SavedItem {
    fn from(item: &Item) -> Self {
        Self {
            kind:             item.kind,
            brand:            item.brand.clone(),
            reference:        item.reference.clone(),
            condition:        item.condition,
            ask_price:        item.ask_price,
            acquisition_cost: item.acquisition_cost,
            name:             item.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveData {
    pub day:        Day,
    pub cash:       Cash,
    pub reputation: i64,
    pub items:      Vec<SavedItem>,
}

/// Result of a decode: the data plus the 1-based numbers of item
/// lines that were malformed and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSave {
    pub data:          SaveData,
    pub skipped_lines: Vec<usize>,
}

pub struct SaveCodec;

impl SaveCodec {
    pub fn encode(data: &SaveData) -> String {
        let mut out = format!("{},{},{}\n", data.day, data.cash, data.reputation);
        for item in &data.items {
            out.push_str(&format!(
                "{ITEM_MARKER},{},{},{},{},{},{},{}\n",
                item.kind.label(),
                item.brand,
                item.reference,
                item.condition.label(),
                item.ask_price,
                item.acquisition_cost,
                item.name,
            ));
        }
        out
    }

    /// Decode a save. A missing or unreadable header is an error and the
    /// caller should keep its current state; a bad item line is skipped.
    pub fn decode(text: &str) -> SimResult<DecodedSave> {
        let mut lines = text.lines().enumerate();

        let header = lines
            .by_ref()
            .map(|(_, line)| line)
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| SimError::corrupt("empty save"))?;
        let (day, cash, reputation) = Self::parse_header(header)?;

        let mut items = Vec::new();
        let mut skipped_lines = Vec::new();
        for (index, line) in lines {
            if line.split(',').next() != Some(ITEM_MARKER) {
                continue;
            }
            match Self::parse_item(line) {
                Ok(item) => items.push(item),
                Err(reason) => {
                    log::warn!("save line {} skipped: {reason}", index + 1);
                    skipped_lines.push(index + 1);
                }
            }
        }

        Ok(DecodedSave {
            data: SaveData { day, cash, reputation, items },
            skipped_lines,
        })
    }

    fn parse_header(line: &str) -> SimResult<(Day, Cash, i64)> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [day, cash, reputation] = fields.as_slice() else {
            return Err(SimError::corrupt(format!(
                "header needs 3 fields, found {}",
                fields.len()
            )));
        };
        let day: Day = day
            .parse()
            .map_err(|_| SimError::corrupt(format!("bad day {day:?}")))?;
        if day == 0 || day > MAX_AMOUNT as Day {
            return Err(SimError::corrupt(format!("day {day} out of range")));
        }
        let cash: Cash = cash
            .parse()
            .map_err(|_| SimError::corrupt(format!("bad cash {cash:?}")))?;
        let reputation: i64 = reputation
            .parse()
            .map_err(|_| SimError::corrupt(format!("bad reputation {reputation:?}")))?;
        if cash.unsigned_abs() > MAX_AMOUNT as u64 || reputation.unsigned_abs() > MAX_AMOUNT as u64 {
            return Err(SimError::corrupt("header amount out of range"));
        }
        Ok((day, cash, reputation))
    }

    fn parse_item(line: &str) -> Result<SavedItem, String> {
        let fields: Vec<&str> = line.splitn(ITEM_FIELDS, ',').collect();
        let [_, kind, brand, reference, condition, ask, cost, name] = fields.as_slice() else {
            return Err(format!("expected {ITEM_FIELDS} fields, found {}", fields.len()));
        };
        let kind = ItemKind::from_label(kind).ok_or_else(|| format!("unknown kind {kind:?}"))?;
        let condition = Condition::from_label(condition)
            .ok_or_else(|| format!("unknown condition {condition:?}"))?;
        let ask_price: Cash = ask
            .trim()
            .parse()
            .map_err(|_| format!("bad ask {ask:?}"))?;
        let acquisition_cost: Cash = cost
            .trim()
            .parse()
            .map_err(|_| format!("bad cost {cost:?}"))?;
        if ask_price < 0 || acquisition_cost < 0 {
            return Err("negative amount".into());
        }
        if ask_price > MAX_AMOUNT || acquisition_cost > MAX_AMOUNT {
            return Err(format!("amount above {MAX_AMOUNT}"));
        }
        Ok(SavedItem {
            kind,
            brand: brand.to_string(),
            reference: reference.to_string(),
            condition,
            ask_price,
            acquisition_cost,
            name: name.to_string(),
        })
    }
}
