//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application and domain layers:
//!
//! - `persistence/`: ledger readers and historical trade stores (in-memory, JSON file)
//! - `config/`: dependency wiring from loaded configuration

pub mod config;
pub mod persistence;
