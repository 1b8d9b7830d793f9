//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for reaching the ledger
//! - **Use Cases**: Identification, sync, integrity and statistics operations
//! - **DTOs**: Data transfer objects for API boundaries

pub mod dto;
pub mod errors;
pub mod ports;
pub mod use_cases;

pub use dto::*;
pub use errors::JournalError;
pub use ports::*;
pub use use_cases::*;
