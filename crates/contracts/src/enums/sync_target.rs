use serde::{Deserialize, Serialize};

/// Маркетплейс, в который выгружаются остатки и цены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketplaceKind {
    /// Ozon Seller API
    Ozon,
    /// Yandex Market Partner API
    YandexMarket,
}

impl MarketplaceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            MarketplaceKind::Ozon => "Ozon",
            MarketplaceKind::YandexMarket => "Яндекс Маркет",
        }
    }
}

/// Цель синхронизации: маркетплейс и, для Яндекс Маркета, модель работы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncTarget {
    Ozon,
    /// Яндекс Маркет, модель FBS (склад продавца, доставка маркетплейсом)
    YandexFbs,
    /// Яндекс Маркет, модель DBS (склад и доставка продавца)
    YandexDbs,
}

impl SyncTarget {
    /// Получить код цели
    pub fn code(&self) -> &'static str {
        match self {
            SyncTarget::Ozon => "ozon",
            SyncTarget::YandexFbs => "yandex-fbs",
            SyncTarget::YandexDbs => "yandex-dbs",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            SyncTarget::Ozon => "Ozon",
            SyncTarget::YandexFbs => "Яндекс Маркет FBS",
            SyncTarget::YandexDbs => "Яндекс Маркет DBS",
        }
    }

    pub fn marketplace(&self) -> MarketplaceKind {
        match self {
            SyncTarget::Ozon => MarketplaceKind::Ozon,
            SyncTarget::YandexFbs | SyncTarget::YandexDbs => MarketplaceKind::YandexMarket,
        }
    }

    /// Все цели в порядке выполнения синхронизации
    pub fn all() -> Vec<SyncTarget> {
        vec![SyncTarget::Ozon, SyncTarget::YandexFbs, SyncTarget::YandexDbs]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ozon" => Some(SyncTarget::Ozon),
            "yandex-fbs" => Some(SyncTarget::YandexFbs),
            "yandex-dbs" => Some(SyncTarget::YandexDbs),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_code() {
        for target in SyncTarget::all() {
            assert_eq!(SyncTarget::from_code(target.code()), Some(target));
        }
        assert_eq!(SyncTarget::from_code("wildberries"), None);
    }

    #[test]
    fn test_yandex_modes_share_marketplace() {
        assert_eq!(
            SyncTarget::YandexFbs.marketplace(),
            SyncTarget::YandexDbs.marketplace()
        );
        assert_eq!(SyncTarget::Ozon.marketplace(), MarketplaceKind::Ozon);
    }
}
