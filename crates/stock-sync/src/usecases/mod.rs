pub mod u600_sync_marketplaces;
pub mod u601_sync_ozon;
pub mod u602_sync_yandex;
