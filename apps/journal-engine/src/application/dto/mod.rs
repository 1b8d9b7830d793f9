//! Data Transfer Objects (DTOs)
//!
//! Serializable inputs and outputs of the engine's operations.
//! All of them use camelCase field names on the wire.

mod episode_dto;
mod integrity_dto;
mod statistics_dto;
mod sync_dto;

pub use episode_dto::{CalculateMetricsRequestDto, EpisodeDto};
pub use integrity_dto::{
    IntegrityReportDto, RepairActionDto, RepairActionKind, RepairOptions, RepairReportDto,
};
pub use statistics_dto::StatisticsDto;
pub use sync_dto::{InitializeReportDto, SyncErrorDto, SyncMode, SyncReportDto};
