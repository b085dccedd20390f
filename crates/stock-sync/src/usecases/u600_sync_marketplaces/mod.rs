pub mod executor;
pub mod reconciliation;

pub use executor::{sync_target, SyncOrchestrator, TargetRunner, TargetSync};
