pub mod ozon_api_client;

pub use ozon_api_client::OzonApiClient;

use contracts::domain::a001_stock_record::StockRecord;
use contracts::usecases::u601_sync_ozon::{OzonPrice, OzonStock};

use crate::shared::error::SyncError;
use crate::usecases::u600_sync_marketplaces::reconciliation::PayloadShape;

/// Формат записей Ozon Seller API
#[derive(Debug, Clone, Copy, Default)]
pub struct OzonShape;

impl PayloadShape for OzonShape {
    type Stock = OzonStock;
    type Price = OzonPrice;

    fn stock(&self, offer_id: &str, count: u32, _updated_at: &str) -> OzonStock {
        OzonStock {
            offer_id: offer_id.to_string(),
            stock: count,
        }
    }

    /// Цена передается строкой как есть, даже пустой
    fn price(&self, record: &StockRecord, normalized_price: String) -> Result<OzonPrice, SyncError> {
        Ok(OzonPrice::new(record.code.clone(), normalized_price))
    }

    fn stock_count(stock: &OzonStock) -> u32 {
        stock.stock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u600_sync_marketplaces::reconciliation::{compute_prices, compute_stocks};

    #[test]
    fn test_ozon_payloads_for_reference_scenario() {
        let remnants = vec![StockRecord::new("69785", ">10", "5'990.00 руб.")];
        let offer_ids = vec!["69785".to_string(), "99999".to_string()];

        let stocks = compute_stocks(&OzonShape, &remnants, &offer_ids).unwrap();
        assert_eq!(
            stocks,
            vec![
                OzonStock {
                    offer_id: "69785".into(),
                    stock: 100
                },
                OzonStock {
                    offer_id: "99999".into(),
                    stock: 0
                },
            ]
        );

        let prices = compute_prices(&OzonShape, &remnants, &offer_ids).unwrap();
        assert_eq!(prices, vec![OzonPrice::new("69785", "5990")]);
    }
}
