pub mod payload;

pub use payload::{OzonPrice, OzonStock};

use crate::usecases::common::UseCaseMetadata;

pub struct SyncOzon;

impl UseCaseMetadata for SyncOzon {
    fn usecase_index() -> &'static str {
        "u601"
    }

    fn usecase_name() -> &'static str {
        "sync_ozon"
    }

    fn display_name() -> &'static str {
        "Выгрузка остатков и цен в OZON"
    }
}
