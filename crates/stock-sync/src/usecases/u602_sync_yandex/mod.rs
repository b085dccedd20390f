pub mod yandex_api_client;

pub use yandex_api_client::YandexApiClient;

use contracts::domain::a001_stock_record::StockRecord;
use contracts::usecases::u602_sync_yandex::{YandexOfferPrice, YandexSkuStock};

use crate::shared::error::SyncError;
use crate::usecases::u600_sync_marketplaces::reconciliation::PayloadShape;

/// Формат записей Yandex Market Partner API для одного склада кампании
#[derive(Debug, Clone, Copy)]
pub struct YandexShape {
    pub warehouse_id: i64,
}

impl PayloadShape for YandexShape {
    type Stock = YandexSkuStock;
    type Price = YandexOfferPrice;

    fn stock(&self, offer_id: &str, count: u32, updated_at: &str) -> YandexSkuStock {
        YandexSkuStock::fit(offer_id, self.warehouse_id, count, updated_at)
    }

    /// Маркет принимает только целую цену
    fn price(
        &self,
        record: &StockRecord,
        normalized_price: String,
    ) -> Result<YandexOfferPrice, SyncError> {
        let value = normalized_price.parse::<u64>().map_err(|_| {
            SyncError::data(format!(
                "Invalid price '{}' for offer {}",
                record.price, record.code
            ))
        })?;
        Ok(YandexOfferPrice::rur(record.code.clone(), value))
    }

    fn stock_count(stock: &YandexSkuStock) -> u32 {
        stock.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u600_sync_marketplaces::reconciliation::{compute_prices, compute_stocks_at};
    use chrono::TimeZone;

    #[test]
    fn test_yandex_payloads_for_reference_scenario() {
        let shape = YandexShape { warehouse_id: 42 };
        let remnants = vec![StockRecord::new("69785", ">10", "5'990.00 руб.")];
        let offer_ids = vec!["69785".to_string(), "99999".to_string()];
        let now = chrono::Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();

        let stocks = compute_stocks_at(&shape, &remnants, &offer_ids, now).unwrap();
        assert_eq!(
            stocks,
            vec![
                YandexSkuStock::fit("69785", 42, 100, "2024-03-01T10:15:00Z"),
                YandexSkuStock::fit("99999", 42, 0, "2024-03-01T10:15:00Z"),
            ]
        );

        let prices = compute_prices(&shape, &remnants, &offer_ids).unwrap();
        assert_eq!(prices, vec![YandexOfferPrice::rur("69785", 5990)]);
    }

    #[test]
    fn test_empty_price_is_data_error() {
        let shape = YandexShape { warehouse_id: 1 };
        let record = StockRecord::new("69785", "1", "договорная");
        assert!(matches!(
            shape.price(&record, String::new()),
            Err(SyncError::DataError(_))
        ));
    }
}
