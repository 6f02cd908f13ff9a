//! Host-side driver: owns the clock, events and ledger, quotes and executes trades.

use crate::catalog::SystemCatalog;
use crate::scenario::{Scenario, ScenarioError, ScriptedTrade};
use persistence::LedgerSnapshot;
use serde::Serialize;
use sim_core::{ActiveEvent, Day, Good, SystemDescriptor, SystemId};
use sim_econ::{events_at, MarketLedger, PriceBreakdown, PriceModel};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("unknown system {0}")]
    UnknownSystem(SystemId),
}

/// Result of an executed buy or sell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TradeReceipt {
    pub day: Day,
    pub system: SystemId,
    pub good: Good,
    /// Signed as recorded in the ledger: negative for buys.
    pub quantity: i32,
    /// Price quoted before the trade moved the market.
    pub unit_price: u32,
    pub total: u64,
}

/// Single-threaded economy session.
///
/// Trades are recorded right after they execute and `advance_day` decays the
/// ledger exactly once per elapsed day.
#[derive(Clone, Debug)]
pub struct MarketSession {
    model: PriceModel,
    catalog: SystemCatalog,
    events: Vec<ActiveEvent>,
    ledger: MarketLedger,
    day: Day,
}

impl MarketSession {
    pub fn new(model: PriceModel, catalog: SystemCatalog, start_day: Day) -> Self {
        Self {
            model,
            catalog,
            events: Vec::new(),
            ledger: MarketLedger::new(),
            day: start_day,
        }
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        let mut session = Self::new(
            PriceModel::new(scenario.params.clone())?,
            scenario.catalog()?,
            scenario.start_day,
        );
        session.set_events(scenario.events.clone());
        Ok(session)
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn ledger(&self) -> &MarketLedger {
        &self.ledger
    }

    pub fn catalog(&self) -> &SystemCatalog {
        &self.catalog
    }

    pub fn events(&self) -> &[ActiveEvent] {
        &self.events
    }

    /// Replace the event list, e.g. after the scheduler refreshes it.
    pub fn set_events(&mut self, events: Vec<ActiveEvent>) {
        self.events = events;
    }

    /// Events in effect at `system` today, in scheduling order.
    pub fn active_events(&self, system: SystemId) -> Vec<&ActiveEvent> {
        events_at(&self.events, system, self.day).collect()
    }

    fn system(&self, id: SystemId) -> Result<&SystemDescriptor, SessionError> {
        self.catalog.get(id).ok_or(SessionError::UnknownSystem(id))
    }

    pub fn quote(&self, system: SystemId, good: Good) -> Result<u32, SessionError> {
        Ok(self.breakdown(system, good)?.price)
    }

    pub fn breakdown(&self, system: SystemId, good: Good) -> Result<PriceBreakdown, SessionError> {
        let sys = self.system(system)?;
        Ok(self
            .model
            .price_breakdown(good, sys, self.day, &self.events, Some(&self.ledger)))
    }

    /// Today's prices for every good at `system`.
    pub fn board(&self, system: SystemId) -> Result<Vec<(Good, u32)>, SessionError> {
        let sys = self.system(system)?;
        Ok(self
            .model
            .market_prices(sys, self.day, &self.events, Some(&self.ledger)))
    }

    pub fn buy(
        &mut self,
        system: SystemId,
        good: Good,
        quantity: u32,
    ) -> Result<TradeReceipt, SessionError> {
        self.execute(system, good, -saturating_i32(quantity))
    }

    pub fn sell(
        &mut self,
        system: SystemId,
        good: Good,
        quantity: u32,
    ) -> Result<TradeReceipt, SessionError> {
        self.execute(system, good, saturating_i32(quantity))
    }

    fn execute(
        &mut self,
        system: SystemId,
        good: Good,
        signed: i32,
    ) -> Result<TradeReceipt, SessionError> {
        let unit_price = self.quote(system, good)?;
        self.ledger.record_trade(system, good, signed);
        let receipt = TradeReceipt {
            day: self.day,
            system,
            good,
            quantity: signed,
            unit_price,
            total: u64::from(unit_price) * u64::from(signed.unsigned_abs()),
        };
        debug!(?receipt, "executed trade");
        Ok(receipt)
    }

    /// Execute scripted trades scheduled for the current day, in order.
    pub fn replay(
        &mut self,
        trades: &[ScriptedTrade],
    ) -> Result<Vec<TradeReceipt>, SessionError> {
        let today = self.day;
        trades
            .iter()
            .filter(|t| t.day == today)
            .map(|t| self.execute(t.system, t.good, t.quantity))
            .collect()
    }

    /// Close out the current day: decay the ledger once, then move to the next day.
    pub fn advance_day(&mut self) {
        self.ledger.decay_market(None);
        self.day = self.day.saturating_add(1);
        debug!(day = self.day, entries = self.ledger.len(), "advanced day");
    }

    pub fn advance_days(&mut self, days: u32) {
        for _ in 0..days {
            self.advance_day();
        }
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(self.day, self.ledger.clone())
    }

    /// Resume from a saved ledger and the day it was taken on.
    pub fn restore(&mut self, snapshot: LedgerSnapshot) {
        info!(day = snapshot.day, entries = snapshot.ledger.len(), "restored ledger");
        self.day = snapshot.day;
        self.ledger = snapshot.ledger;
    }
}

fn saturating_i32(quantity: u32) -> i32 {
    i32::try_from(quantity).unwrap_or(i32::MAX)
}
