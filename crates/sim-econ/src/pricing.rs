//! Price composition: every modifier multiplied against a good's base price.
//!
//! Prices are derived, never stored. For fixed inputs (good, system, day,
//! events, ledger contents) the result is identical across calls and runs.

use crate::events::combined_event_modifier;
use crate::market::MarketLedger;
use crate::modifiers::{production_modifier, station_modifier};
use crate::rng::SequenceGenerator;
use crate::tech::{calculate_tech_level, tech_modifier};
use serde::Serialize;
use sim_core::{
    validate_params, ActiveEvent, Day, EconParams, Good, SystemDescriptor, SystemId,
    ValidationError,
};
use std::f64::consts::TAU;
use tracing::trace;

/// Fractional part of the golden ratio; spreads phase offsets evenly.
const PHASE_SPREAD: f64 = 0.618_033_988_749_894_9;

/// Individual multipliers that make up one price.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Modifiers {
    pub production: f64,
    pub station: f64,
    pub daily: f64,
    pub tech: f64,
    pub temporal: f64,
    pub event: f64,
    pub local: f64,
}

impl Modifiers {
    /// All multipliers at 1.0.
    pub const NEUTRAL: Modifiers = Modifiers {
        production: 1.0,
        station: 1.0,
        daily: 1.0,
        tech: 1.0,
        temporal: 1.0,
        event: 1.0,
        local: 1.0,
    };
}

/// A computed price together with the inputs that produced it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub good: Good,
    pub system: SystemId,
    pub day: Day,
    pub base_price: u32,
    pub tech_level: f64,
    pub modifiers: Modifiers,
    pub price: u32,
}

/// `round(base * production * station * daily * tech * temporal * event * local)`, at least 1.
pub fn compose_price(base_price: u32, m: &Modifiers) -> u32 {
    let raw = f64::from(base_price)
        * m.production
        * m.station
        * m.daily
        * m.tech
        * m.temporal
        * m.event
        * m.local;
    // NaN falls through max() to 1.0
    raw.round().max(1.0) as u32
}

/// Seed string for the daily draw of `good` at `system` on `day`.
///
/// The day leads so that consecutive days hash far apart.
pub fn daily_seed(system: SystemId, good: Good, day: Day) -> String {
    format!("{day}-{system}-{good}")
}

/// Fixed phase of a system's temporal wave, in radians within [0, 2π).
pub fn phase_offset(system: SystemId) -> f64 {
    (f64::from(system.0) * PHASE_SPREAD).fract() * TAU
}

/// Daily fluctuation in `[1 - band, 1 + band)`.
pub fn daily_modifier(system: SystemId, good: Good, day: Day, band: f64) -> f64 {
    let mut rng = SequenceGenerator::new(&daily_seed(system, good, day));
    rng.next_float(1.0 - band, 1.0 + band)
}

/// `1 + amplitude * sin(2π * day / period + phase_offset(system))`.
pub fn temporal_modifier(system: SystemId, day: Day, amplitude: f64, period_days: u32) -> f64 {
    let angle = TAU * f64::from(day) / f64::from(period_days) + phase_offset(system);
    1.0 + amplitude * angle.sin()
}

/// Price composer bound to a set of tunable bands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceModel {
    params: EconParams,
}

impl PriceModel {
    /// Rejects bands that would produce NaN or non-positive modifiers, such as
    /// a zero-day temporal period.
    pub fn new(params: EconParams) -> Result<Self, ValidationError> {
        validate_params(&params)?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &EconParams {
        &self.params
    }

    /// Every modifier for one query, without composing them.
    pub fn modifiers(
        &self,
        good: Good,
        system: &SystemDescriptor,
        day: Day,
        events: &[ActiveEvent],
        ledger: Option<&MarketLedger>,
    ) -> (f64, Modifiers) {
        let p = &self.params;
        let tech_level = calculate_tech_level(system);
        let modifiers = Modifiers {
            production: production_modifier(good, &system.stellar_class),
            station: station_modifier(system.station_count),
            daily: daily_modifier(system.id, good, day, p.daily_fluctuation),
            tech: tech_modifier(good, tech_level, p.tech_intensity),
            temporal: temporal_modifier(
                system.id,
                day,
                p.temporal_amplitude,
                p.temporal_period_days,
            ),
            event: combined_event_modifier(events, system.id, good, day),
            local: ledger.map_or(1.0, |l| l.local_modifier_with(system.id, good, p.local_impact)),
        };
        (tech_level, modifiers)
    }

    pub fn price_breakdown(
        &self,
        good: Good,
        system: &SystemDescriptor,
        day: Day,
        events: &[ActiveEvent],
        ledger: Option<&MarketLedger>,
    ) -> PriceBreakdown {
        let (tech_level, modifiers) = self.modifiers(good, system, day, events, ledger);
        let base_price = good.base_price();
        let price = compose_price(base_price, &modifiers);
        trace!(%good, system = %system.id, day, ?modifiers, price, "composed price");
        PriceBreakdown {
            good,
            system: system.id,
            day,
            base_price,
            tech_level,
            modifiers,
            price,
        }
    }

    pub fn calculate_price(
        &self,
        good: Good,
        system: &SystemDescriptor,
        day: Day,
        events: &[ActiveEvent],
        ledger: Option<&MarketLedger>,
    ) -> u32 {
        self.price_breakdown(good, system, day, events, ledger).price
    }

    /// Prices of every good at one system, in `Good::ALL` order.
    pub fn market_prices(
        &self,
        system: &SystemDescriptor,
        day: Day,
        events: &[ActiveEvent],
        ledger: Option<&MarketLedger>,
    ) -> Vec<(Good, u32)> {
        Good::ALL
            .into_iter()
            .map(|g| (g, self.calculate_price(g, system, day, events, ledger)))
            .collect()
    }
}

/// Price of `good` at `system` on `day` under the published constants.
pub fn calculate_price(
    good: Good,
    system: &SystemDescriptor,
    day: Day,
    events: &[ActiveEvent],
    ledger: Option<&MarketLedger>,
) -> u32 {
    PriceModel::default().calculate_price(good, system, day, events, ledger)
}

/// Full breakdown under the published constants.
pub fn price_breakdown(
    good: Good,
    system: &SystemDescriptor,
    day: Day,
    events: &[ActiveEvent],
    ledger: Option<&MarketLedger>,
) -> PriceBreakdown {
    PriceModel::default().price_breakdown(good, system, day, events, ledger)
}

/// Market board under the published constants.
pub fn market_prices(
    system: &SystemDescriptor,
    day: Day,
    events: &[ActiveEvent],
    ledger: Option<&MarketLedger>,
) -> Vec<(Good, u32)> {
    PriceModel::default().market_prices(system, day, events, ledger)
}
