use async_trait::async_trait;
use contracts::enums::SyncTarget;
use serde_json::Value;

use crate::shared::config::MarketplaceConfig;
use crate::shared::error::SyncError;
use crate::usecases::u600_sync_marketplaces::reconciliation::PayloadShape;

/// Тип записи остатков для клиента маркетплейса
pub type StockOf<C> = <<C as MarketplaceClient>::Shape as PayloadShape>::Stock;

/// Тип записи цены для клиента маркетплейса
pub type PriceOf<C> = <<C as MarketplaceClient>::Shape as PayloadShape>::Price;

/// Максимальное количество товаров в одном запросе
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub stocks: usize,
    pub prices: usize,
}

impl From<&MarketplaceConfig> for BatchLimits {
    fn from(config: &MarketplaceConfig) -> Self {
        Self {
            stocks: config.stocks_batch_size,
            prices: config.prices_batch_size,
        }
    }
}

/// Ответ маркетплейса на выгрузку пакета.
///
/// Ошибки по отдельным товарам приходят в теле успешного ответа и не считаются
/// ошибкой выгрузки.
#[derive(Debug, Clone, PartialEq)]
pub struct PushResponse {
    pub body: Value,
}

impl PushResponse {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Количество ошибок по отдельным товарам.
    ///
    /// Ozon: `result[].errors[]`, Яндекс Маркет: `errors[]` верхнего уровня.
    pub fn item_errors(&self) -> usize {
        let top_level = self
            .body
            .get("errors")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let per_item = self
            .body
            .get("result")
            .and_then(Value::as_array)
            .map_or(0, |items| {
                items
                    .iter()
                    .filter_map(|item| item.get("errors").and_then(Value::as_array))
                    .map(Vec::len)
                    .sum()
            });

        top_level + per_item
    }
}

/// Клиент API маркетплейса для одной цели синхронизации
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    /// Формат записей остатков и цен этого API
    type Shape: PayloadShape + Send + Sync;

    fn target(&self) -> SyncTarget;

    fn shape(&self) -> &Self::Shape;

    fn limits(&self) -> BatchLimits;

    /// Артикулы всех размещенных товаров (проходит все страницы)
    async fn list_offer_ids(&self) -> Result<Vec<String>, SyncError>;

    /// Обновить остатки. Размер пакета не больше `limits().stocks`
    async fn push_stocks(&self, batch: &[StockOf<Self>]) -> Result<PushResponse, SyncError>;

    /// Обновить цены. Размер пакета не больше `limits().prices`
    async fn push_prices(&self, batch: &[PriceOf<Self>]) -> Result<PushResponse, SyncError>;
}
