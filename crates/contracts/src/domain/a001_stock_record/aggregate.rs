use serde::{Deserialize, Serialize};

/// Значение количества "больше десяти" в таблице остатков поставщика
pub const QUANTITY_MORE_THAN_TEN: &str = ">10";

/// Значение количества "одна штука" в таблице остатков поставщика
pub const QUANTITY_EXACTLY_ONE: &str = "1";

/// Строка таблицы остатков поставщика (остаток по одному товару)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Код товара поставщика, он же артикул (offer_id) на маркетплейсах
    pub code: String,

    /// Количество в том виде, в каком оно записано в таблице: число, ">10" или "1"
    pub quantity: String,

    /// Цена в свободной форме, например "5'990.00 руб."
    pub price: String,
}

impl StockRecord {
    pub fn new(
        code: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }

    /// Разобрать поле количества
    pub fn parsed_quantity(&self) -> Option<RemnantQuantity> {
        RemnantQuantity::parse(&self.quantity)
    }
}

/// Количество товара в остатках поставщика
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemnantQuantity {
    /// ">10"
    MoreThanTen,
    /// Ровно одна штука
    ExactlyOne,
    /// Точное количество
    Exact(u32),
}

impl RemnantQuantity {
    /// Парсинг из строки. `None`, если строка не является неотрицательным целым числом
    /// или одним из специальных значений.
    ///
    /// Числовая ячейка таблицы может прийти как "4.0", дробная часть ".0" отбрасывается.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = match raw.strip_suffix(".0") {
            Some(int_part) if !int_part.is_empty() && int_part.bytes().all(|b| b.is_ascii_digit()) => {
                int_part
            }
            _ => raw,
        };
        match raw {
            QUANTITY_MORE_THAN_TEN => Some(RemnantQuantity::MoreThanTen),
            QUANTITY_EXACTLY_ONE => Some(RemnantQuantity::ExactlyOne),
            other => other.parse::<u32>().ok().map(RemnantQuantity::Exact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(RemnantQuantity::parse(">10"), Some(RemnantQuantity::MoreThanTen));
        assert_eq!(RemnantQuantity::parse("1"), Some(RemnantQuantity::ExactlyOne));
        assert_eq!(RemnantQuantity::parse(" 4 "), Some(RemnantQuantity::Exact(4)));
        assert_eq!(RemnantQuantity::parse("0"), Some(RemnantQuantity::Exact(0)));
        assert_eq!(RemnantQuantity::parse("много"), None);
        assert_eq!(RemnantQuantity::parse("-2"), None);
        assert_eq!(RemnantQuantity::parse("2.5"), None);
        assert_eq!(RemnantQuantity::parse(""), None);
    }

    #[test]
    fn test_parse_float_quantity_cell() {
        assert_eq!(RemnantQuantity::parse("4.0"), Some(RemnantQuantity::Exact(4)));
        assert_eq!(RemnantQuantity::parse("1.0"), Some(RemnantQuantity::ExactlyOne));
        assert_eq!(RemnantQuantity::parse(".0"), None);
    }
}
