//! Technology level from distance to the economic center.

use sim_core::{
    tech_midpoint, Good, SystemDescriptor, MAX_COORD_DISTANCE, MAX_TECH_LEVEL, MIN_TECH_LEVEL,
    UNITS_PER_LIGHT_YEAR,
};

/// Development score in [MIN_TECH_LEVEL, MAX_TECH_LEVEL].
///
/// Linear in light-year distance from the origin, clamped at
/// `MAX_COORD_DISTANCE`; never increases with distance.
pub fn calculate_tech_level(system: &SystemDescriptor) -> f64 {
    tech_level_at(system.distance_from_center() / UNITS_PER_LIGHT_YEAR)
}

/// Technology level for a distance already expressed in light years.
///
/// Strictly between the bounds for distances inside (0, MAX_COORD_DISTANCE)
/// only down to f64 resolution: distances within about 1e-15 ly of either
/// end round to the bound itself (`tech_level_at(1e-15) == MAX_TECH_LEVEL`).
pub fn tech_level_at(distance_ly: f64) -> f64 {
    let clamped = distance_ly.clamp(0.0, MAX_COORD_DISTANCE);
    MAX_TECH_LEVEL - (MAX_TECH_LEVEL - MIN_TECH_LEVEL) * clamped / MAX_COORD_DISTANCE
}

/// `1 + bias * (tech - midpoint) * intensity`; exactly 1.0 at the midpoint.
pub fn tech_modifier(good: Good, tech_level: f64, intensity: f64) -> f64 {
    1.0 + good.tech_bias() * (tech_level - tech_midpoint()) * intensity
}
