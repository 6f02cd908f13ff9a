#![deny(warnings)]

//! Core domain models and invariants for the Tradelane economy.
//!
//! This crate defines the serializable types the pricing engine reads
//! (goods, star systems, world events), the published economic constants,
//! and validation helpers used by hosts before handing data to the engine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Distance (light years) at which technology bottoms out.
pub const MAX_COORD_DISTANCE: f64 = 21.0;
/// Technology level at the economic center.
pub const MAX_TECH_LEVEL: f64 = 10.0;
/// Technology level at or beyond `MAX_COORD_DISTANCE`.
pub const MIN_TECH_LEVEL: f64 = 1.0;
/// Largest magnitude a market imbalance may reach.
pub const MARKET_CAPACITY: i32 = 1000;
/// Fraction of an imbalance that survives one simulated day.
pub const DAILY_RECOVERY_FACTOR: f64 = 0.90;
/// Period of the per-system price wave, in days.
pub const TEMPORAL_WAVE_PERIOD: u32 = 30;

/// Native map units per light year.
pub const UNITS_PER_LIGHT_YEAR: f64 = 10.0;
/// Scale of the technology-bias modifier per tech level away from the midpoint.
pub const TECH_MODIFIER_INTENSITY: f64 = 0.08;
/// Peak deviation of the temporal wave from 1.0.
pub const TEMPORAL_AMPLITUDE: f64 = 0.10;
/// Half-width of the daily fluctuation band around 1.0.
pub const DAILY_FLUCTUATION: f64 = 0.15;
/// Price swing at a full-capacity imbalance.
pub const LOCAL_MARKET_IMPACT: f64 = 0.5;
/// Ledger entries whose magnitude falls below this are dropped.
pub const MARKET_PRUNE_THRESHOLD: i32 = 1;

/// Simulated days elapsed since the start of a game.
pub type Day = u32;

/// Midpoint of the technology scale; goods are unbiased here.
pub fn tech_midpoint() -> f64 {
    (MAX_TECH_LEVEL + MIN_TECH_LEVEL) / 2.0
}

/// Tradable commodity kinds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Good {
    Grain,
    Ore,
    Fuel,
    Parts,
    Medicine,
    Electronics,
}

impl Good {
    /// Every good, in board order.
    pub const ALL: [Good; 6] = [
        Good::Grain,
        Good::Ore,
        Good::Fuel,
        Good::Parts,
        Good::Medicine,
        Good::Electronics,
    ];

    /// Stable lowercase key used in seeds, ledger keys and files.
    pub fn key(self) -> &'static str {
        match self {
            Good::Grain => "grain",
            Good::Ore => "ore",
            Good::Fuel => "fuel",
            Good::Parts => "parts",
            Good::Medicine => "medicine",
            Good::Electronics => "electronics",
        }
    }

    /// Base price in credits before any modifier.
    pub fn base_price(self) -> u32 {
        match self {
            Good::Grain => 10,
            Good::Ore => 15,
            Good::Fuel => 25,
            Good::Parts => 45,
            Good::Medicine => 60,
            Good::Electronics => 90,
        }
    }

    /// Technology bias in [-1, 1]. Positive goods cost more at advanced systems.
    pub fn tech_bias(self) -> f64 {
        match self {
            Good::Grain => -0.6,
            Good::Ore => -0.4,
            Good::Fuel => -0.1,
            Good::Parts => 0.3,
            Good::Medicine => 0.2,
            Good::Electronics => 0.7,
        }
    }
}

impl fmt::Display for Good {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unknown good name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown good: {0}")]
pub struct ParseGoodError(pub String);

impl FromStr for Good {
    type Err = ParseGoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Good::ALL
            .into_iter()
            .find(|g| g.key() == lower)
            .ok_or_else(|| ParseGoodError(s.to_string()))
    }
}

/// Unique identifier for a star system.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SystemId(pub u32);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static description of a star system, owned by the world catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemDescriptor {
    /// Catalog identifier.
    pub id: SystemId,
    /// Display name.
    pub name: String,
    /// Position in native map units, economic center at the origin.
    pub position: [f64; 3],
    /// Spectral classification, e.g. "G2V". Only the first letter matters.
    pub stellar_class: String,
    /// Number of stations in the system.
    pub station_count: u32,
}

impl SystemDescriptor {
    /// Euclidean distance from the origin in map units.
    pub fn distance_from_center(&self) -> f64 {
        let [x, y, z] = self.position;
        (x * x + y * y + z * z).sqrt()
    }

    /// Uppercased first letter of the stellar class, if any.
    pub fn spectral_letter(&self) -> Option<char> {
        self.stellar_class
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
    }
}

/// Kinds of scripted world occurrences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Strike,
    Festival,
    Blockade,
    MiningBoom,
    Epidemic,
    Shortage,
}

/// A time-boxed world event that scales prices of some goods at one system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    pub id: String,
    pub kind: EventKind,
    pub system_id: SystemId,
    /// First day the event applies.
    pub start_day: Day,
    /// Last day the event applies (inclusive).
    pub end_day: Day,
    /// Multipliers per affected good.
    #[serde(default)]
    pub modifiers: BTreeMap<Good, f64>,
}

impl ActiveEvent {
    /// Whether the event applies to `system` on `day`.
    pub fn applies_to(&self, system: SystemId, day: Day) -> bool {
        self.system_id == system && (self.start_day..=self.end_day).contains(&day)
    }
}

/// Tunable bands of the price composer.
///
/// `Default` yields the published constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconParams {
    /// Half-width of the daily band; draws fall in `[1 - x, 1 + x)`.
    pub daily_fluctuation: f64,
    /// Amplitude of the temporal wave.
    pub temporal_amplitude: f64,
    /// Wave period in days (> 0).
    pub temporal_period_days: u32,
    /// Technology-bias intensity per tech level.
    pub tech_intensity: f64,
    /// Price swing at a full-capacity imbalance.
    pub local_impact: f64,
}

impl Default for EconParams {
    fn default() -> Self {
        Self {
            daily_fluctuation: DAILY_FLUCTUATION,
            temporal_amplitude: TEMPORAL_AMPLITUDE,
            temporal_period_days: TEMPORAL_WAVE_PERIOD,
            tech_intensity: TECH_MODIFIER_INTENSITY,
            local_impact: LOCAL_MARKET_IMPACT,
        }
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Numeric field must be finite.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
    /// Parameter would allow a non-positive modifier.
    #[error("parameter {name} = {value} is out of range")]
    ParamOutOfRange { name: &'static str, value: f64 },
    /// System name must not be blank.
    #[error("system {0} has an empty name")]
    EmptyName(SystemId),
    /// Duplicate system identifier in a catalog.
    #[error("duplicate system id: {0}")]
    DuplicateSystem(SystemId),
    /// Event day range is inverted.
    #[error("event {id} ends (day {end}) before it starts (day {start})")]
    InvertedEventRange { id: String, start: Day, end: Day },
    /// Event multipliers must be finite and positive.
    #[error("event {id} has invalid multiplier {value} for {good}")]
    InvalidEventModifier { id: String, good: Good, value: f64 },
    /// Event refers to a system that is not in the catalog.
    #[error("event {id} targets unknown system {system}")]
    UnknownSystem { id: String, system: SystemId },
}

/// Validate composer parameters so every modifier stays positive.
pub fn validate_params(p: &EconParams) -> Result<(), ValidationError> {
    let bands = [
        ("daily_fluctuation", p.daily_fluctuation),
        ("temporal_amplitude", p.temporal_amplitude),
        ("local_impact", p.local_impact),
    ];
    for (name, value) in bands {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite(name));
        }
        if !(0.0..1.0).contains(&value) {
            return Err(ValidationError::ParamOutOfRange { name, value });
        }
    }
    if !p.tech_intensity.is_finite() {
        return Err(ValidationError::NonFinite("tech_intensity"));
    }
    // |bias| <= 1 and |tech - midpoint| <= half the scale
    let half_scale = (MAX_TECH_LEVEL - MIN_TECH_LEVEL) / 2.0;
    if p.tech_intensity < 0.0 || p.tech_intensity * half_scale >= 1.0 {
        return Err(ValidationError::ParamOutOfRange {
            name: "tech_intensity",
            value: p.tech_intensity,
        });
    }
    if p.temporal_period_days == 0 {
        return Err(ValidationError::ParamOutOfRange {
            name: "temporal_period_days",
            value: 0.0,
        });
    }
    Ok(())
}

/// Validate a single system descriptor.
pub fn validate_system(s: &SystemDescriptor) -> Result<(), ValidationError> {
    if s.name.trim().is_empty() {
        return Err(ValidationError::EmptyName(s.id));
    }
    if !s.position.iter().all(|c| c.is_finite()) {
        return Err(ValidationError::NonFinite("position"));
    }
    Ok(())
}

/// Validate an event's day range and multipliers.
pub fn validate_event(e: &ActiveEvent) -> Result<(), ValidationError> {
    if e.end_day < e.start_day {
        return Err(ValidationError::InvertedEventRange {
            id: e.id.clone(),
            start: e.start_day,
            end: e.end_day,
        });
    }
    for (&good, &value) in &e.modifiers {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::InvalidEventModifier {
                id: e.id.clone(),
                good,
                value,
            });
        }
    }
    Ok(())
}

/// Validate systems and events together, including cross-references.
pub fn validate_world(
    systems: &[SystemDescriptor],
    events: &[ActiveEvent],
) -> Result<(), ValidationError> {
    let mut ids: BTreeSet<SystemId> = BTreeSet::new();
    for s in systems {
        validate_system(s)?;
        if !ids.insert(s.id) {
            return Err(ValidationError::DuplicateSystem(s.id));
        }
    }
    for e in events {
        validate_event(e)?;
        if !ids.contains(&e.system_id) {
            return Err(ValidationError::UnknownSystem {
                id: e.id.clone(),
                system: e.system_id,
            });
        }
    }
    Ok(())
}
