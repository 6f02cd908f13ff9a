#![deny(warnings)]

//! Deterministic procedural economy for Tradelane.
//!
//! This crate computes the price of a good at a star system on a given day
//! and tracks how player trading perturbs those prices:
//! - Seeded sequence generator for reproducible daily fluctuation
//! - Technology level from distance to the economic center
//! - Static production and infrastructure multipliers
//! - Event multipliers and the player-driven market ledger
//! - The price composer that multiplies all of them together

pub mod events;
pub mod market;
pub mod modifiers;
pub mod pricing;
pub mod rng;
pub mod tech;

pub use events::{combined_event_modifier, event_modifier, events_at};
pub use market::MarketLedger;
pub use modifiers::{production_modifier, station_modifier};
pub use pricing::{
    calculate_price, compose_price, market_prices, price_breakdown, Modifiers, PriceBreakdown,
    PriceModel,
};
pub use rng::SequenceGenerator;
pub use tech::{calculate_tech_level, tech_modifier};

use sim_core::ParseGoodError;
use thiserror::Error;

/// Errors produced when loading engine state.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Ledger key is not of the form `<system>:<good>`.
    #[error("malformed ledger key: {0}")]
    MalformedLedgerKey(String),
    /// Ledger key names a good that does not exist.
    #[error(transparent)]
    UnknownGood(#[from] ParseGoodError),
    /// Stored imbalance exceeds `MARKET_CAPACITY`.
    #[error("imbalance {value} at {key} exceeds market capacity")]
    ImbalanceOutOfRange { key: String, value: i32 },
}
