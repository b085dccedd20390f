use serde::{Deserialize, Serialize};

/// Валюта цен в Ozon Seller API
pub const OZON_CURRENCY_CODE: &str = "RUB";

/// Остаток товара для POST /v1/product/import/stocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OzonStock {
    pub offer_id: String,
    pub stock: u32,
}

/// Цена товара для POST /v1/product/import/prices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OzonPrice {
    /// Автоприменение акций, выгрузка его не меняет
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: String,
    /// Цена до скидки, "0" сбрасывает её
    pub old_price: String,
    pub price: String,
}

impl OzonPrice {
    pub fn new(offer_id: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            auto_action_enabled: "UNKNOWN".to_string(),
            currency_code: OZON_CURRENCY_CODE.to_string(),
            offer_id: offer_id.into(),
            old_price: "0".to_string(),
            price: price.into(),
        }
    }
}
