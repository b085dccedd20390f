//! Общие типы для всех UseCase синхронизации

pub mod sync_report;
pub mod usecase_metadata;

pub use sync_report::{SyncReport, TargetOutcome, TargetReport, TargetStatus};
pub use usecase_metadata::UseCaseMetadata;
