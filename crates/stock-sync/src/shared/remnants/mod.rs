pub mod table;

use async_trait::async_trait;
use contracts::domain::a001_stock_record::StockRecord;
use std::io::{Cursor, Read};
use std::path::PathBuf;

use crate::shared::config::{HttpConfig, RemnantsConfig};
use crate::shared::error::SyncError;
use table::{parse_remnants_table, TableLayout};

/// Источник актуальных остатков поставщика
#[async_trait]
pub trait RemnantsSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<StockRecord>, SyncError>;
}

/// Остатки с сайта поставщика: zip-архив с таблицей.
///
/// Архив распаковывается в памяти, на диске ничего не остается.
pub struct VendorArchiveSource {
    client: reqwest::Client,
    url: String,
    archive_entry: Option<String>,
    layout: TableLayout,
}

impl VendorArchiveSource {
    pub fn new(config: &RemnantsConfig, http: &HttpConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(http.timeout_secs))
            .build()
            .map_err(|e| SyncError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            archive_entry: config.archive_entry.clone(),
            layout: TableLayout::from(config),
        })
    }

    async fn download(&self) -> Result<Vec<u8>, SyncError> {
        tracing::info!("Downloading remnants archive: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        tracing::info!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl RemnantsSource for VendorArchiveSource {
    async fn fetch(&self) -> Result<Vec<StockRecord>, SyncError> {
        let archive = self.download().await?;
        let table = extract_entry(&archive, self.archive_entry.as_deref())?;
        parse_remnants_table(&table, &self.layout)
    }
}

/// Достать файл таблицы из zip-архива: по имени или первый файл архива
pub fn extract_entry(archive: &[u8], entry: Option<&str>) -> Result<Vec<u8>, SyncError> {
    let zip_err = |e: zip::result::ZipError| SyncError::data(format!("Invalid remnants archive: {}", e));

    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).map_err(zip_err)?;

    let index = match entry {
        Some(name) => zip
            .index_for_name(name)
            .ok_or_else(|| SyncError::data(format!("File '{}' not found in remnants archive", name)))?,
        None => (0..zip.len())
            .find(|&i| zip.by_index(i).map(|f| !f.is_dir()).unwrap_or(false))
            .ok_or_else(|| SyncError::data("Remnants archive is empty"))?,
    };

    let mut file = zip.by_index(index).map_err(zip_err)?;
    tracing::info!("Extracting {} from remnants archive", file.name());

    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| SyncError::data(format!("Failed to unpack remnants table: {}", e)))?;
    Ok(contents)
}

/// Остатки из локального файла таблицы (для ручного запуска)
pub struct FileRemnantsSource {
    path: PathBuf,
    layout: TableLayout,
}

impl FileRemnantsSource {
    pub fn new(path: PathBuf, config: &RemnantsConfig) -> Self {
        Self {
            path,
            layout: TableLayout::from(config),
        }
    }
}

#[async_trait]
impl RemnantsSource for FileRemnantsSource {
    async fn fetch(&self) -> Result<Vec<StockRecord>, SyncError> {
        tracing::info!("Reading remnants from: {}", self.path.display());
        let data = std::fs::read(&self.path).map_err(|e| {
            SyncError::data(format!("Cannot read {}: {}", self.path.display(), e))
        })?;
        parse_remnants_table(&data, &self.layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_archive(files: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            for (name, contents) in files {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    fn config() -> RemnantsConfig {
        crate::shared::config::Config::embedded_default()
            .unwrap()
            .remnants
    }

    #[test]
    fn test_extract_first_file() {
        let archive = build_archive(&[("ostatki.csv", "a;b")]);
        assert_eq!(extract_entry(&archive, None).unwrap(), b"a;b");
    }

    #[test]
    fn test_extract_named_entry() {
        let archive = build_archive(&[("readme.txt", "x"), ("ostatki.csv", "a;b")]);
        assert_eq!(extract_entry(&archive, Some("ostatki.csv")).unwrap(), b"a;b");
        assert!(extract_entry(&archive, Some("missing.csv")).is_err());
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert!(matches!(
            extract_entry(b"not a zip", None),
            Err(SyncError::DataError(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source() {
        let mut table = "\n".repeat(17);
        table.push_str("Код;Количество;Цена\n69785;>10;5'990.00 руб.\n");

        let path = std::env::temp_dir().join(format!("remnants-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, table).unwrap();

        let source = FileRemnantsSource::new(path.clone(), &config());
        let remnants = source.fetch().await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(remnants, vec![StockRecord::new("69785", ">10", "5'990.00 руб.")]);
    }
}
