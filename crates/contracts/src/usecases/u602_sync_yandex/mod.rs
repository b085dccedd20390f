pub mod payload;

pub use payload::{YandexOfferPrice, YandexPriceValue, YandexSkuStock, YandexStockItem};

use crate::usecases::common::UseCaseMetadata;

pub struct SyncYandex;

impl UseCaseMetadata for SyncYandex {
    fn usecase_index() -> &'static str {
        "u602"
    }

    fn usecase_name() -> &'static str {
        "sync_yandex"
    }

    fn display_name() -> &'static str {
        "Выгрузка остатков и цен в Яндекс Маркет"
    }
}
