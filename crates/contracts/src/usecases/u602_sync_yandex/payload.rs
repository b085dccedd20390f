use serde::{Deserialize, Serialize};

/// Валюта цен в Yandex Market Partner API
pub const YANDEX_CURRENCY_ID: &str = "RUR";

/// Тип остатка: доступный к продаже товар
pub const STOCK_TYPE_FIT: &str = "FIT";

/// Остаток по одному SKU для PUT /campaigns/{campaignId}/offers/stocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexSkuStock {
    pub sku: String,
    pub warehouse_id: i64,
    pub items: Vec<YandexStockItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexStockItem {
    pub count: u32,
    #[serde(rename = "type")]
    pub stock_type: String,
    /// UTC с точностью до секунды, формат "2023-01-01T00:00:00Z"
    pub updated_at: String,
}

impl YandexSkuStock {
    pub fn fit(sku: impl Into<String>, warehouse_id: i64, count: u32, updated_at: &str) -> Self {
        Self {
            sku: sku.into(),
            warehouse_id,
            items: vec![YandexStockItem {
                count,
                stock_type: STOCK_TYPE_FIT.to_string(),
                updated_at: updated_at.to_string(),
            }],
        }
    }

    /// Суммарное количество по всем типам остатков
    pub fn count(&self) -> u32 {
        self.items.iter().map(|i| i.count).sum()
    }
}

/// Цена товара для POST /campaigns/{campaignId}/offer-prices/updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexOfferPrice {
    pub id: String,
    pub price: YandexPriceValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YandexPriceValue {
    pub value: u64,
    pub currency_id: String,
}

impl YandexOfferPrice {
    pub fn rur(id: impl Into<String>, value: u64) -> Self {
        Self {
            id: id.into(),
            price: YandexPriceValue {
                value,
                currency_id: YANDEX_CURRENCY_ID.to_string(),
            },
        }
    }
}
