//! Ledger and store location configuration.

use serde::{Deserialize, Serialize};

/// Where the execution ledger is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Path to the ledger JSON file.
    #[serde(default = "default_ledger_path")]
    pub path: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: default_ledger_path(),
        }
    }
}

/// Where the historical trade store is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the store JSON file. Created on first commit.
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_ledger_path() -> String {
    "./data/ledger.json".to_string()
}

fn default_store_path() -> String {
    "./data/historical_trades.json".to_string()
}
