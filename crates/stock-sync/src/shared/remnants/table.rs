use calamine::{Data, Reader};
use contracts::domain::a001_stock_record::StockRecord;
use std::io::Cursor;

use crate::shared::config::RemnantsConfig;
use crate::shared::error::SyncError;

/// Настройки разбора таблицы остатков
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Ожидаемое количество строк перед строкой заголовков. Заголовок ищется
    /// по названиям колонок, расхождение только попадает в лог
    pub header_row: usize,
    pub delimiter: u8,
    pub code_column: String,
    pub quantity_column: String,
    pub price_column: String,
}

impl From<&RemnantsConfig> for TableLayout {
    fn from(config: &RemnantsConfig) -> Self {
        Self {
            header_row: config.header_row,
            // ASCII проверяется при загрузке конфигурации
            delimiter: config.delimiter as u8,
            code_column: config.code_column.clone(),
            quantity_column: config.quantity_column.clone(),
            price_column: config.price_column.clone(),
        }
    }
}

/// Формат файла таблицы остатков
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Книга Excel/ODS (.xls, .xlsx, .ods)
    Workbook,
    /// Текстовая выгрузка с разделителем
    Delimited,
}

impl TableFormat {
    /// Определить формат по сигнатуре файла
    pub fn detect(data: &[u8]) -> Self {
        const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];
        const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

        if data.starts_with(OLE2_MAGIC) || data.starts_with(ZIP_MAGIC) {
            TableFormat::Workbook
        } else {
            TableFormat::Delimited
        }
    }
}

/// Строки таблицы и номер первой из них в исходном файле
struct TableRows {
    first_row: usize,
    rows: Vec<Vec<String>>,
}

/// Разобрать таблицу остатков поставщика (.xls поставщика или выгрузку CSV).
///
/// Строки без кода товара пропускаются. Код вида "69785.0" (числовая ячейка
/// таблицы) приводится к "69785".
pub fn parse_remnants_table(data: &[u8], layout: &TableLayout) -> Result<Vec<StockRecord>, SyncError> {
    let table = match TableFormat::detect(data) {
        TableFormat::Workbook => read_workbook(data)?,
        TableFormat::Delimited => read_delimited(data, layout.delimiter)?,
    };
    parse_rows(table, layout)
}

/// Первый лист книги
fn read_workbook(data: &[u8]) -> Result<TableRows, SyncError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(data))
        .map_err(|e| SyncError::data(format!("Failed to open remnants workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SyncError::data("Remnants workbook has no sheets"))?
        .map_err(|e| SyncError::data(format!("Failed to read remnants sheet: {}", e)))?;

    // Пустые строки в начале листа в диапазон не входят
    let first_row = range.start().map_or(0, |(row, _)| row as usize);
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(TableRows { first_row, rows })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        // 69785.0 -> "69785"
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn read_delimited(data: &[u8], delimiter: u8) -> Result<TableRows, SyncError> {
    let text = String::from_utf8_lossy(data);
    // Strip UTF-8 BOM if present
    let text = text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let rows = reader
        .records()
        .map(|result| {
            result
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(|e| SyncError::data(format!("Malformed remnants row: {}", e)))
        })
        .collect::<Result<Vec<Vec<String>>, SyncError>>()?;

    Ok(TableRows { first_row: 0, rows })
}

fn parse_rows(table: TableRows, layout: &TableLayout) -> Result<Vec<StockRecord>, SyncError> {
    let mut rows = table.rows.into_iter();

    // Строки до заголовка (шапка отчета) пропускаются
    let mut skipped = table.first_row;
    let headers = loop {
        match rows.next() {
            Some(row) if is_header(&row, layout) => break row,
            Some(_) => skipped += 1,
            None => {
                return Err(SyncError::data(format!(
                    "Header row with columns '{}', '{}', '{}' not found in remnants table",
                    layout.code_column, layout.quantity_column, layout.price_column
                )))
            }
        }
    };
    if skipped != layout.header_row {
        tracing::warn!(
            "Remnants header found after {} rows, expected {}",
            skipped,
            layout.header_row
        );
    }
    tracing::debug!("Remnants table headers: {:?}", headers);

    let column = |name: &str| -> usize {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .unwrap_or_default()
    };
    let code_idx = column(&layout.code_column);
    let quantity_idx = column(&layout.quantity_column);
    let price_idx = column(&layout.price_column);

    let mut remnants = Vec::new();
    for row in rows {
        let field = |idx: usize| row.get(idx).map(|v| v.trim()).unwrap_or_default();

        let code = normalize_code(field(code_idx));
        if code.is_empty() {
            continue;
        }
        remnants.push(StockRecord::new(code, field(quantity_idx), field(price_idx)));
    }

    Ok(remnants)
}

fn is_header(row: &[String], layout: &TableLayout) -> bool {
    [&layout.code_column, &layout.quantity_column, &layout.price_column]
        .iter()
        .all(|name| row.iter().any(|h| h.trim() == name.as_str()))
}

/// "69785.0" -> "69785", остальные значения без изменений
fn normalize_code(raw: &str) -> String {
    match raw.strip_suffix(".0") {
        Some(int_part) if !int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit()) => {
            int_part.to_string()
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(header_row: usize) -> TableLayout {
        TableLayout {
            header_row,
            delimiter: b';',
            code_column: "Код".into(),
            quantity_column: "Количество".into(),
            price_column: "Цена".into(),
        }
    }

    #[test]
    fn test_parse_with_preamble() {
        let data = "\u{FEFF}Остатки на складе\n\
                    ;;\n\
                    Наименование;Код;Количество;Цена\n\
                    CASIO G-SHOCK;69785;>10;5'990.00 руб.\n\
                    CASIO EDIFICE;69786.0;1;12'490.00 руб.\n\
                    Итого;;;\n";
        let remnants = parse_remnants_table(data.as_bytes(), &layout(2)).unwrap();

        assert_eq!(
            remnants,
            vec![
                StockRecord::new("69785", ">10", "5'990.00 руб."),
                StockRecord::new("69786", "1", "12'490.00 руб."),
            ]
        );
    }

    #[test]
    fn test_missing_column() {
        let data = "Код;Количество\n1;2\n";
        let err = parse_remnants_table(data.as_bytes(), &layout(0)).unwrap_err();
        assert!(matches!(err, SyncError::DataError(ref m) if m.contains("Цена")));
    }

    #[test]
    fn test_header_found_regardless_of_preamble_length() {
        let data = "Код;Количество;Цена\n42;3;100\n";
        let remnants = parse_remnants_table(data.as_bytes(), &layout(17)).unwrap();
        assert_eq!(remnants, vec![StockRecord::new("42", "3", "100")]);
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("69785.0"), "69785");
        assert_eq!(normalize_code("69785"), "69785");
        assert_eq!(normalize_code("GW-B5600.0"), "GW-B5600.0");
        assert_eq!(normalize_code(".0"), ".0");
    }

    /// Минимальная книга .xlsx: первая строка с названием отчета,
    /// заголовок в третьей строке, числовые ячейки без стилей
    fn build_xlsx() -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="TDSheet" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;
        let rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;
        let sheet = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>Остатки на складе</t></is></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>Наименование</t></is></c><c r="B3" t="inlineStr"><is><t>Код</t></is></c><c r="C3" t="inlineStr"><is><t>Количество</t></is></c><c r="D3" t="inlineStr"><is><t>Цена</t></is></c></row>
<row r="4"><c r="A4" t="inlineStr"><is><t>CASIO G-SHOCK</t></is></c><c r="B4"><v>69785</v></c><c r="C4" t="inlineStr"><is><t>&gt;10</t></is></c><c r="D4" t="inlineStr"><is><t>5'990.00 руб.</t></is></c></row>
<row r="5"><c r="A5" t="inlineStr"><is><t>CASIO EDIFICE</t></is></c><c r="B5"><v>69786</v></c><c r="C5"><v>4</v></c><c r="D5" t="inlineStr"><is><t>12'490.00 руб.</t></is></c></row>
</sheetData>
</worksheet>"#;

        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            for (name, contents) in [
                ("xl/workbook.xml", workbook),
                ("xl/_rels/workbook.xml.rels", rels),
                ("xl/worksheets/sheet1.xml", sheet),
            ] {
                writer.start_file(name, SimpleFileOptions::default()).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            TableFormat::detect(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1]),
            TableFormat::Workbook
        );
        assert_eq!(TableFormat::detect(b"PK\x03\x04rest"), TableFormat::Workbook);
        assert_eq!(TableFormat::detect("Код;Количество".as_bytes()), TableFormat::Delimited);
    }

    #[test]
    fn test_parse_workbook() {
        let remnants = parse_remnants_table(&build_xlsx(), &layout(2)).unwrap();

        assert_eq!(
            remnants,
            vec![
                StockRecord::new("69785", ">10", "5'990.00 руб."),
                StockRecord::new("69786", "4", "12'490.00 руб."),
            ]
        );
    }

    #[test]
    fn test_broken_workbook_is_data_error() {
        let mut data = vec![0xD0, 0xCF, 0x11, 0xE0];
        data.extend_from_slice(b"not really a workbook");
        assert!(matches!(
            parse_remnants_table(&data, &layout(17)),
            Err(SyncError::DataError(_))
        ));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(69785.0)), "69785");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::String(">10".into())), ">10");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
