//! Static production and infrastructure multipliers.

use sim_core::Good;

/// Multiplier for a good at a system of the given stellar class.
///
/// Below 1.0 where the class over-produces the good, above 1.0 where it is
/// scarce. Blank or unrecognized classes are neutral.
pub fn production_modifier(good: Good, stellar_class: &str) -> f64 {
    let Some(letter) = stellar_class.chars().next() else {
        return 1.0;
    };
    // Hot massive stars: rich in ore and fuel, hostile to agriculture.
    // Cool dwarfs: stable habitable zones, poor mineral yields.
    match (letter.to_ascii_uppercase(), good) {
        ('O', Good::Ore) => 0.75,
        ('O', Good::Fuel) => 0.8,
        ('O', Good::Grain) => 1.35,
        ('O', Good::Medicine) => 1.2,
        ('B', Good::Ore) => 0.8,
        ('B', Good::Fuel) => 0.85,
        ('B', Good::Grain) => 1.25,
        ('A', Good::Fuel) => 0.85,
        ('A', Good::Electronics) => 0.9,
        ('A', Good::Grain) => 1.15,
        ('F', Good::Parts) => 0.85,
        ('F', Good::Electronics) => 0.85,
        ('F', Good::Ore) => 1.1,
        ('G', Good::Grain) => 0.8,
        ('G', Good::Medicine) => 0.85,
        ('G', Good::Ore) => 1.1,
        ('K', Good::Grain) => 0.85,
        ('K', Good::Parts) => 0.9,
        ('K', Good::Fuel) => 1.1,
        ('M', Good::Ore) => 1.15,
        ('M', Good::Fuel) => 1.2,
        ('M', Good::Electronics) => 1.25,
        ('M', Good::Grain) => 0.9,
        _ => 1.0,
    }
}

/// Multiplier from the number of stations in a system.
///
/// Never increases with station count; elevated for sparse infrastructure
/// and reaches 1.0 at five or more stations.
pub fn station_modifier(station_count: u32) -> f64 {
    match station_count {
        0 => 1.25,
        1 => 1.15,
        2 => 1.08,
        3 | 4 => 1.03,
        _ => 1.0,
    }
}
