/// Преобразует цену из таблицы поставщика в строку с целым числом.
///
/// Берется часть строки до первой точки, из нее удаляются все символы,
/// кроме цифр. Разделители тысяч (`'`, `,`, пробелы) и валюта считаются шумом.
///
/// # Примеры
/// ```
/// use stock_sync::shared::price::normalize_price;
/// assert_eq!(normalize_price("5'990.00 руб."), "5990");
/// assert_eq!(normalize_price("5990"), "5990");
/// assert_eq!(normalize_price("руб."), "");
/// ```
pub fn normalize_price(price: &str) -> String {
    let integer_part = price.split('.').next().unwrap_or_default();
    integer_part.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_price() {
        assert_eq!(normalize_price("5'990.00 руб."), "5990");
        assert_eq!(normalize_price("5990"), "5990");
        assert_eq!(normalize_price("руб."), "");
        assert_eq!(normalize_price(""), "");
    }

    #[test]
    fn test_thousands_separators_are_noise() {
        assert_eq!(normalize_price("12,490.00 руб."), "12490");
        assert_eq!(normalize_price("1 234 567.89"), "1234567");
        assert_eq!(normalize_price("129'990 руб"), "129990");
    }

    #[test]
    fn test_only_first_period_splits() {
        assert_eq!(normalize_price("1.2.3"), "1");
        assert_eq!(normalize_price(".99"), "");
    }
}
