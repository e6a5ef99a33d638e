//! Tradeable items: watches and parts.

use crate::{rng::RandomSource, types::Cash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, never-reused item identifier.
///
/// Minted from the injected random source (UUID layout) so that a
/// seeded run reproduces the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn mint(rng: &mut dyn RandomSource) -> Self {
        let uuid = uuid::Builder::from_random_bytes(rng.next_bytes_16()).into_uuid();
        Self(uuid.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Watch,
    Part,
}

impl ItemKind {
    /// Label used in save files.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Watch => "watch",
            Self::Part  => "part",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "watch" => Some(Self::Watch),
            "part"  => Some(Self::Part),
            _       => None,
        }
    }
}

/// Condition grades. Watches and parts draw from different subsets
/// (see `CatalogConfig::watch_grades` / `part_grades`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Nos,
    VeryGood,
    Good,
    Fair,
    Serviced,
    Unserviced,
    ForParts,
}

impl Condition {
    pub const ALL: [Condition; 7] = [
        Self::Nos,
        Self::VeryGood,
        Self::Good,
        Self::Fair,
        Self::Serviced,
        Self::Unserviced,
        Self::ForParts,
    ];

    /// Display label, also the save-file encoding.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nos        => "NOS",
            Self::VeryGood   => "VG",
            Self::Good       => "Good",
            Self::Fair       => "Fair",
            Self::Serviced   => "Serviced",
            Self::Unserviced => "Unserviced",
            Self::ForParts   => "For parts",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id:               ItemId,
    pub kind:             ItemKind,
    pub brand:            String,
    /// Empty when the brand has no reference pool.
    pub reference:        String,
    pub name:             String,
    pub condition:        Condition,
    pub ask_price:        Cash,
    /// What the player paid. Zero until bought; written once.
    pub acquisition_cost: Cash,
    /// Implied cost basis at generation time. Never charged.
    pub wholesale_cost:   Cash,
    /// Empty means no flag.
    pub risk_note:        String,
}

impl Item {
    pub fn is_watch(&self) -> bool {
        self.kind == ItemKind::Watch
    }

    pub fn has_risk(&self) -> bool {
        !self.risk_note.is_empty()
    }
}
