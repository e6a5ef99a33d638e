//! Shared primitive types used across the entire simulation.

/// An in-game day. Day 1 is the first day of a fresh game.
pub type Day = u64;

/// Currency amounts, in whole dollars. Signed: holding costs may
/// push the bankroll below zero.
pub type Cash = i64;

/// The canonical run identifier (one per host session).
pub type RunId = String;

/// Round a non-negative amount down to whole dollars.
pub fn floor_cash(value: f64) -> Cash {
    value.max(0.0).floor() as Cash
}
