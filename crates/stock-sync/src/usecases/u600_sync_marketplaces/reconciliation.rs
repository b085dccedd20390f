//! Сверка остатков поставщика с товарами, размещенными на маркетплейсе.
//!
//! По таблице остатков и списку артикулов маркетплейса строится полный набор
//! записей остатков и цен. Товары, которых больше нет у поставщика, получают
//! нулевой остаток.

use chrono::{DateTime, Utc};
use contracts::domain::a001_stock_record::{RemnantQuantity, StockRecord};
use std::collections::HashSet;

use crate::shared::error::SyncError;
use crate::shared::price::normalize_price;

/// Остаток, выгружаемый для товаров с количеством ">10"
pub const MORE_THAN_TEN_STOCK: u32 = 100;

/// Формат записей конкретного API маркетплейса
pub trait PayloadShape {
    type Stock: Clone + Send + Sync;
    type Price: Clone + Send + Sync;

    fn stock(&self, offer_id: &str, count: u32, updated_at: &str) -> Self::Stock;

    fn price(&self, record: &StockRecord, normalized_price: String) -> Result<Self::Price, SyncError>;

    fn stock_count(stock: &Self::Stock) -> u32;
}

/// Разбиение артикулов маркетплейса на найденные в остатках и устаревшие
#[derive(Debug)]
pub struct OfferPartition<'a> {
    /// Строки остатков, чей код размещен на маркетплейсе, в порядке таблицы.
    /// Каждый артикул встречается не более одного раза.
    pub matched: Vec<&'a StockRecord>,

    /// Артикулы маркетплейса, отсутствующие в остатках, в исходном порядке
    pub stale: Vec<String>,
}

/// Разбить артикулы за один проход, не изменяя входные данные
pub fn partition_offers<'a>(remnants: &'a [StockRecord], offer_ids: &[String]) -> OfferPartition<'a> {
    let published: HashSet<&str> = offer_ids.iter().map(String::as_str).collect();

    let mut consumed: HashSet<&str> = HashSet::new();
    let mut matched = Vec::new();
    for record in remnants {
        let code = record.code.as_str();
        if published.contains(code) && consumed.insert(code) {
            matched.push(record);
        }
    }

    let mut seen_stale: HashSet<&str> = HashSet::new();
    let stale = offer_ids
        .iter()
        .filter(|id| !consumed.contains(id.as_str()) && seen_stale.insert(id.as_str()))
        .cloned()
        .collect();

    OfferPartition { matched, stale }
}

/// Количество для выгрузки: ">10" -> 100, "1" -> 0 (единственный экземпляр
/// считается зарезервированным), иначе число как есть
pub fn resolve_count(record: &StockRecord) -> Result<u32, SyncError> {
    match record.parsed_quantity() {
        Some(RemnantQuantity::MoreThanTen) => Ok(MORE_THAN_TEN_STOCK),
        Some(RemnantQuantity::ExactlyOne) => Ok(0),
        Some(RemnantQuantity::Exact(count)) => Ok(count),
        None => Err(SyncError::data(format!(
            "quantity '{}' of product {} is not a number",
            record.quantity, record.code
        ))),
    }
}

/// Метка времени обновления: UTC с точностью до секунды, "2024-03-01T10:15:00Z"
pub fn format_updated_at(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Записи остатков на текущий момент
pub fn compute_stocks<S: PayloadShape>(
    shape: &S,
    remnants: &[StockRecord],
    offer_ids: &[String],
) -> Result<Vec<S::Stock>, SyncError> {
    compute_stocks_at(shape, remnants, offer_ids, Utc::now())
}

/// Записи остатков: сначала найденные в таблице (в порядке таблицы), затем
/// обнуленные устаревшие. Все записи получают одну и ту же метку времени.
pub fn compute_stocks_at<S: PayloadShape>(
    shape: &S,
    remnants: &[StockRecord],
    offer_ids: &[String],
    now: DateTime<Utc>,
) -> Result<Vec<S::Stock>, SyncError> {
    let updated_at = format_updated_at(now);
    let partition = partition_offers(remnants, offer_ids);

    let mut stocks = Vec::with_capacity(partition.matched.len() + partition.stale.len());
    for record in &partition.matched {
        let count = resolve_count(record)?;
        stocks.push(shape.stock(&record.code, count, &updated_at));
    }
    for offer_id in &partition.stale {
        stocks.push(shape.stock(offer_id, 0, &updated_at));
    }

    Ok(stocks)
}

/// Записи цен только для найденных в таблице товаров
pub fn compute_prices<S: PayloadShape>(
    shape: &S,
    remnants: &[StockRecord],
    offer_ids: &[String],
) -> Result<Vec<S::Price>, SyncError> {
    partition_offers(remnants, offer_ids)
        .matched
        .into_iter()
        .map(|record| shape.price(record, normalize_price(&record.price)))
        .collect()
}

/// Остатки, разделенные для отчета на ненулевые и все
#[derive(Debug, Clone)]
pub struct StockUpload<T> {
    pub non_empty: Vec<T>,
    pub all: Vec<T>,
}

pub fn split_non_empty<S: PayloadShape>(stocks: Vec<S::Stock>) -> StockUpload<S::Stock> {
    let non_empty = stocks
        .iter()
        .filter(|stock| S::stock_count(stock) != 0)
        .cloned()
        .collect();
    StockUpload {
        non_empty,
        all: stocks,
    }
}
