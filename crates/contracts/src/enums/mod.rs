pub mod sync_target;

pub use sync_target::{MarketplaceKind, SyncTarget};
