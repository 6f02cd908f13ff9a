//! Seeded sequence generator behind every pseudo-random draw in the engine.

const MULTIPLIER: i64 = 9301;
const INCREMENT: i64 = 49297;
const MODULUS: i64 = 233_280;

/// Reproducible sequence of numbers in [0, 1) derived from a string seed.
///
/// The seed is folded with a 31-based polynomial hash over its UTF-16 code
/// units (wrapping at 32 bits) and then stepped with a small linear
/// congruential generator. Instances share no state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceGenerator {
    state: i64,
}

impl SequenceGenerator {
    pub fn new(seed: &str) -> Self {
        Self {
            state: i64::from(hash_seed(seed)),
        }
    }

    /// Next draw in [0, 1).
    pub fn next(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT).rem_euclid(MODULUS);
        self.state as f64 / MODULUS as f64
    }

    /// Integer in [min, max] inclusive. Bounds are swapped if inverted.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi - lo + 1) as f64;
        lo + (self.next() * span).floor() as i64
    }

    /// Float in [min, max).
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }
}

/// `hash = hash * 31 + unit`, wrapped to a signed 32-bit integer.
pub fn hash_seed(seed: &str) -> i32 {
    seed.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
