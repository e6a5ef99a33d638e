//! Watch desk economy core: market generation, trading, the daily
//! clock and save persistence for a watch and parts dealing game.
//!
//! The host (desk-runner or a UI) owns a `GameEngine`, feeds it one
//! `PlayerCommand` per input event and draws from `snapshot()`.

pub mod clock;
pub mod codec;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod factory;
pub mod inventory;
pub mod item;
pub mod market;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod trade;
pub mod types;
