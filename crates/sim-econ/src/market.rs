//! Market Condition Ledger: player-driven supply and demand per system and good.

use crate::EconError;
use serde::{Deserialize, Serialize};
use sim_core::{
    Good, SystemId, DAILY_RECOVERY_FACTOR, LOCAL_MARKET_IMPACT, MARKET_CAPACITY,
    MARKET_PRUNE_THRESHOLD,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Net units sold (positive) or bought (negative) per (system, good).
///
/// Entries are created on first trade, shrink once per simulated day via
/// [`MarketLedger::decay_market`], and vanish once they fall below
/// `MARKET_PRUNE_THRESHOLD`. Magnitudes never exceed `MARKET_CAPACITY`.
///
/// Serializes as a flat map `"<system>:<good>" -> imbalance`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, i32>",
    try_from = "BTreeMap<String, i32>"
)]
pub struct MarketLedger {
    entries: BTreeMap<(SystemId, Good), i32>,
}

impl MarketLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signed quantity to the imbalance, clamped to ±`MARKET_CAPACITY`.
    pub fn record_trade(&mut self, system: SystemId, good: Good, signed_delta: i32) {
        let current = self.imbalance(system, good);
        let next = current
            .saturating_add(signed_delta)
            .clamp(-MARKET_CAPACITY, MARKET_CAPACITY);
        if next == 0 {
            self.entries.remove(&(system, good));
        } else {
            self.entries.insert((system, good), next);
        }
        debug!(%system, %good, signed_delta, imbalance = next, "recorded trade");
    }

    /// Stored imbalance, 0 when absent.
    pub fn imbalance(&self, system: SystemId, good: Good) -> i32 {
        self.entries.get(&(system, good)).copied().unwrap_or(0)
    }

    /// Price multiplier from the stored imbalance at the published impact.
    pub fn local_modifier(&self, system: SystemId, good: Good) -> f64 {
        self.local_modifier_with(system, good, LOCAL_MARKET_IMPACT)
    }

    /// `1 - impact * imbalance / MARKET_CAPACITY`.
    ///
    /// Surplus lowers the price, deficit raises it. Stays in
    /// `[1 - impact, 1 + impact]`, so positive for any `impact < 1`.
    pub fn local_modifier_with(&self, system: SystemId, good: Good, impact: f64) -> f64 {
        let ratio = f64::from(self.imbalance(system, good)) / f64::from(MARKET_CAPACITY);
        1.0 - impact * ratio.clamp(-1.0, 1.0)
    }

    /// Apply one day of recovery to every entry, or only to `system`'s.
    ///
    /// Each imbalance is multiplied by `DAILY_RECOVERY_FACTOR` and truncated
    /// toward zero; entries below the prune threshold are removed. Calling it
    /// twice for the same day decays twice.
    pub fn decay_market(&mut self, system: Option<SystemId>) {
        let before = self.entries.len();
        self.entries.retain(|&(sys, _), value| {
            if system.is_some_and(|s| s != sys) {
                return true;
            }
            *value = (f64::from(*value) * DAILY_RECOVERY_FACTOR).trunc() as i32;
            value.abs() >= MARKET_PRUNE_THRESHOLD
        });
        debug!(
            scope = ?system,
            pruned = before - self.entries.len(),
            remaining = self.entries.len(),
            "decayed market conditions"
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by system, then good.
    pub fn iter(&self) -> impl Iterator<Item = (SystemId, Good, i32)> + '_ {
        self.entries.iter().map(|(&(s, g), &v)| (s, g, v))
    }
}

fn ledger_key(system: SystemId, good: Good) -> String {
    format!("{system}:{good}")
}

fn parse_ledger_key(key: &str) -> Result<(SystemId, Good), EconError> {
    let (sys, good) = key
        .split_once(':')
        .ok_or_else(|| EconError::MalformedLedgerKey(key.to_string()))?;
    let sys: u32 = sys
        .trim()
        .parse()
        .map_err(|_| EconError::MalformedLedgerKey(key.to_string()))?;
    Ok((SystemId(sys), good.parse()?))
}

impl From<MarketLedger> for BTreeMap<String, i32> {
    fn from(ledger: MarketLedger) -> Self {
        ledger
            .entries
            .into_iter()
            .map(|((s, g), v)| (ledger_key(s, g), v))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, i32>> for MarketLedger {
    type Error = EconError;

    fn try_from(map: BTreeMap<String, i32>) -> Result<Self, Self::Error> {
        let mut entries = BTreeMap::new();
        for (key, value) in map {
            if value.abs() > MARKET_CAPACITY {
                return Err(EconError::ImbalanceOutOfRange { key, value });
            }
            let parsed = parse_ledger_key(&key)?;
            if value != 0 {
                entries.insert(parsed, value);
            }
        }
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SOL: SystemId = SystemId(0);
    const VEGA: SystemId = SystemId(7);

    #[test]
    fn absent_entry_is_neutral() {
        let ledger = MarketLedger::new();
        assert_eq!(ledger.imbalance(SOL, Good::Ore), 0);
        assert_eq!(ledger.local_modifier(SOL, Good::Ore), 1.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn surplus_cheapens_deficit_raises() {
        let mut ledger = MarketLedger::new();
        ledger.record_trade(SOL, Good::Grain, 200);
        ledger.record_trade(VEGA, Good::Grain, -200);
        assert!((ledger.local_modifier(SOL, Good::Grain) - 0.9).abs() < 1e-12);
        assert!((ledger.local_modifier(VEGA, Good::Grain) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn clamps_at_capacity() {
        let mut ledger = MarketLedger::new();
        ledger.record_trade(SOL, Good::Fuel, -900);
        ledger.record_trade(SOL, Good::Fuel, -900);
        assert_eq!(ledger.imbalance(SOL, Good::Fuel), -MARKET_CAPACITY);
        ledger.record_trade(SOL, Good::Fuel, i32::MAX);
        assert_eq!(ledger.imbalance(SOL, Good::Fuel), MARKET_CAPACITY);
        assert_eq!(ledger.local_modifier(SOL, Good::Fuel), 0.5);
    }

    #[test]
    fn decay_truncates_and_prunes() {
        let mut ledger = MarketLedger::new();
        ledger.record_trade(SOL, Good::Ore, 100);
        ledger.record_trade(SOL, Good::Parts, -1);
        ledger.decay_market(None);
        assert_eq!(ledger.imbalance(SOL, Good::Ore), 90);
        assert_eq!(ledger.len(), 1);
        ledger.record_trade(SOL, Good::Ore, -95);
        ledger.decay_market(None);
        // -5 * 0.9 = -4.5 -> -4
        assert_eq!(ledger.imbalance(SOL, Good::Ore), -4);
    }

    #[test]
    fn scoped_decay_leaves_other_systems_alone() {
        let mut ledger = MarketLedger::new();
        ledger.record_trade(SOL, Good::Medicine, 50);
        ledger.record_trade(VEGA, Good::Medicine, 50);
        ledger.decay_market(Some(VEGA));
        assert_eq!(ledger.imbalance(SOL, Good::Medicine), 50);
        assert_eq!(ledger.imbalance(VEGA, Good::Medicine), 45);
    }

    #[test]
    fn double_decay_in_one_day_decays_twice() {
        let mut ledger = MarketLedger::new();
        ledger.record_trade(SOL, Good::Ore, 100);
        ledger.decay_market(None);
        ledger.decay_market(None);
        assert_eq!(ledger.imbalance(SOL, Good::Ore), 81);
    }

    #[test]
    fn serializes_as_plain_mapping() {
        let mut ledger = MarketLedger::new();
        ledger.record_trade(VEGA, Good::Electronics, -30);
        ledger.record_trade(SOL, Good::Grain, 12);
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"0:grain":12,"7:electronics":-30}"#);
        let back: MarketLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn rejects_corrupt_entries() {
        assert!(serde_json::from_str::<MarketLedger>(r#"{"1:grain":5000}"#).is_err());
        assert!(serde_json::from_str::<MarketLedger>(r#"{"1-grain":5}"#).is_err());
        assert!(serde_json::from_str::<MarketLedger>(r#"{"x:grain":5}"#).is_err());
        assert!(serde_json::from_str::<MarketLedger>(r#"{"1:spice":5}"#).is_err());
        let map = BTreeMap::from([("3:ore".to_string(), 0)]);
        assert!(MarketLedger::try_from(map).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn buy_then_sell_restores_imbalance(
            prior in -MARKET_CAPACITY..=MARKET_CAPACITY,
            q in 0i32..=MARKET_CAPACITY,
        ) {
            let mut ledger = MarketLedger::new();
            ledger.record_trade(SOL, Good::Ore, prior);
            // stay within capacity so the clamp does not absorb part of the trade
            prop_assume!(prior - q >= -MARKET_CAPACITY);
            ledger.record_trade(SOL, Good::Ore, -q);
            ledger.record_trade(SOL, Good::Ore, q);
            prop_assert_eq!(ledger.imbalance(SOL, Good::Ore), prior);
        }

        #[test]
        fn never_exceeds_capacity(trades in proptest::collection::vec(-5000i32..5000, 1..40)) {
            let mut ledger = MarketLedger::new();
            for t in trades {
                ledger.record_trade(VEGA, Good::Parts, t);
                prop_assert!(ledger.imbalance(VEGA, Good::Parts).abs() <= MARKET_CAPACITY);
                let m = ledger.local_modifier(VEGA, Good::Parts);
                prop_assert!(m > 0.0);
            }
        }

        #[test]
        fn decay_converges_to_empty(start in -MARKET_CAPACITY..=MARKET_CAPACITY) {
            let mut ledger = MarketLedger::new();
            ledger.record_trade(SOL, Good::Grain, start);
            let mut last = ledger.imbalance(SOL, Good::Grain).abs();
            for _ in 0..200 {
                ledger.decay_market(None);
                let now = ledger.imbalance(SOL, Good::Grain).abs();
                prop_assert!(now <= last);
                last = now;
            }
            prop_assert!(ledger.is_empty());
        }

        #[test]
        fn modifier_decreases_with_imbalance(a in -MARKET_CAPACITY..MARKET_CAPACITY) {
            let mut lo = MarketLedger::new();
            lo.record_trade(SOL, Good::Ore, a);
            let mut hi = MarketLedger::new();
            hi.record_trade(SOL, Good::Ore, a + 1);
            prop_assert!(hi.local_modifier(SOL, Good::Ore) < lo.local_modifier(SOL, Good::Ore));
        }
    }
}
