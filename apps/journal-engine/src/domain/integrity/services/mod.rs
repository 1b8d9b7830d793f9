//! Integrity domain services.

mod checker;

pub use checker::{
    DEFAULT_EPSILON, ExecutionIndex, IntegrityChecker, Resolution, find_duplicates,
};
