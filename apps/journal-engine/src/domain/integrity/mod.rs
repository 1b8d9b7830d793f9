//! Integrity Bounded Context
//!
//! Detects drift between the ledger and the trade history.
//!
//! # Key Concepts
//!
//! - **Errors**: inconsistent metrics, duplicate keys, broken constraints
//!   and unresolvable execution references invalidate the history
//! - **Warnings**: open holdings are reported but never invalidate it

pub mod services;
pub mod value_objects;

pub use services::{DEFAULT_EPSILON, ExecutionIndex, IntegrityChecker, Resolution, find_duplicates};
pub use value_objects::{
    DuplicateGroup, IntegrityIssue, IntegrityReport, IntegrityStats, IssueKind, OrphanedPosition,
    Severity,
};
