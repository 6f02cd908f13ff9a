#![deny(warnings)]

//! Runtime glue around the economy engine: the system catalog, scenario
//! files, and a session that drives the daily tick and executes trades.

pub mod catalog;
pub mod scenario;
pub mod session;

pub use catalog::SystemCatalog;
pub use scenario::{Scenario, ScenarioError, ScriptedTrade};
pub use session::{MarketSession, SessionError, TradeReceipt};
