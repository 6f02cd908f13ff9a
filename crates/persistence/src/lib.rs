#![deny(warnings)]

//! Persistence layer: save and load the market ledger slice.
//!
//! The ledger is the only engine state that survives a restart. It is
//! written as a versioned envelope around a plain `"<system>:<good>" -> i32`
//! mapping, either as JSON text or compact bincode bytes. Loading validates
//! every entry, so a snapshot that loads is safe to price against.

use serde::{Deserialize, Serialize};
use sim_core::Day;
use sim_econ::MarketLedger;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("unsupported snapshot version {found} (expected {})", SNAPSHOT_VERSION)]
    UnsupportedVersion { found: u32 },
}

/// Versioned save slice holding the ledger and the day it was taken on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub day: Day,
    pub ledger: MarketLedger,
}

impl LedgerSnapshot {
    pub fn new(day: Day, ledger: MarketLedger) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            day,
            ledger,
        }
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        let snap: Self = serde_json::from_str(text)?;
        snap.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
        let snap: Self = bincode::deserialize(bytes)?;
        snap.check_version()
    }

    /// Write as JSON, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), day = self.day, entries = self.ledger.len(), "saved ledger");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let snap = Self::from_json(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), day = snap.day, entries = snap.ledger.len(), "loaded ledger");
        Ok(snap)
    }

    fn check_version(self) -> Result<Self, PersistenceError> {
        if self.version != SNAPSHOT_VERSION {
            warn!(found = self.version, "rejecting ledger snapshot");
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version,
            });
        }
        Ok(self)
    }
}

/// Default location for local ledger saves.
pub fn default_save_path() -> &'static str {
    "./saves/ledger.json"
}
