use contracts::enums::SyncTarget;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::SyncError;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub http: HttpConfig,
    pub remnants: RemnantsConfig,
    pub ozon: MarketplaceConfig,
    pub yandex: MarketplaceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

/// Источник остатков поставщика
#[derive(Debug, Deserialize, Clone)]
pub struct RemnantsConfig {
    /// Адрес zip-архива с таблицей остатков
    pub url: String,
    /// Имя файла таблицы внутри архива. Если не задано, берется первый файл
    pub archive_entry: Option<String>,
    /// Ожидаемое количество строк перед строкой заголовков (шапка отчета)
    pub header_row: usize,
    /// Разделитель для выгрузки CSV; книги Excel читаются без него
    pub delimiter: char,
    pub code_column: String,
    pub quantity_column: String,
    pub price_column: String,
}

/// Настройки API маркетплейса. Размеры пакетов не должны превышать лимиты API
#[derive(Debug, Deserialize, Clone)]
pub struct MarketplaceConfig {
    pub base_url: String,
    pub list_page_size: u32,
    pub stocks_batch_size: usize,
    pub prices_batch_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Каталог для логов; относительный путь считается от каталога исполняемого файла
    pub dir: String,
    /// Писать ли полный обмен с API в отдельные файлы
    pub request_log: bool,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[http]
timeout_secs = 30

[remnants]
url = "https://timeworld.ru/upload/files/ostatki.zip"
header_row = 17
delimiter = ";"
code_column = "Код"
quantity_column = "Количество"
price_column = "Цена"

[ozon]
base_url = "https://api-seller.ozon.ru"
list_page_size = 1000
stocks_batch_size = 100
prices_batch_size = 1000

[yandex]
base_url = "https://api.partner.market.yandex.ru"
list_page_size = 200
stocks_batch_size = 2000
prices_batch_size = 500

[logging]
dir = "logs"
request_log = true
"#;

impl Config {
    pub fn parse(contents: &str) -> anyhow::Result<Config> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn embedded_default() -> anyhow::Result<Config> {
        Self::parse(DEFAULT_CONFIG)
    }

    fn validate(&self) -> Result<(), SyncError> {
        for (name, mp) in [("ozon", &self.ozon), ("yandex", &self.yandex)] {
            if mp.stocks_batch_size == 0 || mp.prices_batch_size == 0 {
                return Err(SyncError::config(format!(
                    "[{}] batch sizes must be greater than zero",
                    name
                )));
            }
            if mp.list_page_size == 0 {
                return Err(SyncError::config(format!(
                    "[{}] list_page_size must be greater than zero",
                    name
                )));
            }
        }
        if self.http.timeout_secs == 0 {
            return Err(SyncError::config("[http] timeout_secs must be greater than zero"));
        }
        if !self.remnants.delimiter.is_ascii() {
            return Err(SyncError::config("[remnants] delimiter must be an ASCII character"));
        }
        Ok(())
    }

    /// Каталог логов с учетом относительного пути
    pub fn log_dir(&self) -> PathBuf {
        resolve_relative_to_exe(&self.logging.dir)
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Explicit path (must exist)
/// 2. Next to the executable
/// 3. Current directory
/// 4. Falls back to embedded default config
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        tracing::info!("Loading config from: {}", path.display());
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read config {}: {}", path.display(), e))?;
        return Config::parse(&contents);
    }

    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    candidates.push(PathBuf::from("config.toml"));

    for path in &candidates {
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            let contents = std::fs::read_to_string(path)?;
            return Config::parse(&contents);
        }
    }

    tracing::info!("Using default embedded configuration");
    Config::embedded_default()
}

fn resolve_relative_to_exe(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }
    PathBuf::from(path_str)
}

// ============================================================================
// Credentials
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OzonCredentials {
    pub client_id: String,
    pub seller_token: String,
}

/// Кампания (магазин) Яндекс Маркета в одной модели работы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YandexCampaign {
    pub campaign_id: String,
    pub warehouse_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YandexCredentials {
    pub token: String,
    pub fbs: Option<YandexCampaign>,
    pub dbs: Option<YandexCampaign>,
}

/// Учетные данные маркетплейсов из переменных окружения.
///
/// Маркетплейс включается только при полном наборе переменных; частичный
/// набор считается ошибкой конфигурации.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ozon: Option<OzonCredentials>,
    pub yandex: Option<YandexCredentials>,
}

impl Credentials {
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let ozon = match (get("CLIENT_ID"), get("SELLER_TOKEN")) {
            (Some(client_id), Some(seller_token)) => Some(OzonCredentials {
                client_id,
                seller_token,
            }),
            (None, None) => None,
            _ => {
                return Err(SyncError::config(
                    "CLIENT_ID and SELLER_TOKEN must be set together",
                ))
            }
        };

        let campaign = |id_key: &str, warehouse_key: &str| -> Result<Option<YandexCampaign>, SyncError> {
            match (get(id_key), get(warehouse_key)) {
                (Some(campaign_id), Some(warehouse)) => {
                    let warehouse_id = warehouse.parse::<i64>().map_err(|_| {
                        SyncError::config(format!("{} must be an integer, got '{}'", warehouse_key, warehouse))
                    })?;
                    Ok(Some(YandexCampaign {
                        campaign_id,
                        warehouse_id,
                    }))
                }
                (None, None) => Ok(None),
                _ => Err(SyncError::config(format!(
                    "{} and {} must be set together",
                    id_key, warehouse_key
                ))),
            }
        };

        let fbs = campaign("FBS_ID", "WAREHOUSE_FBS_ID")?;
        let dbs = campaign("DBS_ID", "WAREHOUSE_DBS_ID")?;
        let yandex = match (get("MARKET_TOKEN"), fbs.is_some() || dbs.is_some()) {
            (Some(token), true) => Some(YandexCredentials { token, fbs, dbs }),
            (None, false) => None,
            (Some(_), false) => {
                return Err(SyncError::config(
                    "MARKET_TOKEN is set but neither FBS_ID nor DBS_ID campaign is configured",
                ))
            }
            (None, true) => {
                return Err(SyncError::config(
                    "MARKET_TOKEN is required for Yandex Market campaigns",
                ))
            }
        };

        Ok(Self { ozon, yandex })
    }

    /// Цели, для которых заданы учетные данные
    pub fn available_targets(&self) -> Vec<SyncTarget> {
        SyncTarget::all()
            .into_iter()
            .filter(|t| self.is_configured(*t))
            .collect()
    }

    pub fn is_configured(&self, target: SyncTarget) -> bool {
        match target {
            SyncTarget::Ozon => self.ozon.is_some(),
            SyncTarget::YandexFbs => self.yandex.as_ref().is_some_and(|y| y.fbs.is_some()),
            SyncTarget::YandexDbs => self.yandex.as_ref().is_some_and(|y| y.dbs.is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_loads() {
        let config = Config::embedded_default().unwrap();
        assert_eq!(config.ozon.stocks_batch_size, 100);
        assert_eq!(config.ozon.prices_batch_size, 1000);
        assert_eq!(config.yandex.stocks_batch_size, 2000);
        assert_eq!(config.yandex.prices_batch_size, 500);
        assert_eq!(config.remnants.header_row, 17);
        assert_eq!(config.remnants.delimiter, ';');
        assert!(config.remnants.archive_entry.is_none());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let broken = DEFAULT_CONFIG.replace("stocks_batch_size = 100", "stocks_batch_size = 0");
        assert!(Config::parse(&broken).is_err());
    }

    #[test]
    fn test_full_credentials() {
        let creds = Credentials::from_lookup(lookup(&[
            ("CLIENT_ID", "123"),
            ("SELLER_TOKEN", "secret"),
            ("MARKET_TOKEN", "token"),
            ("FBS_ID", "11"),
            ("WAREHOUSE_FBS_ID", "42"),
            ("DBS_ID", "12"),
            ("WAREHOUSE_DBS_ID", "43"),
        ]))
        .unwrap();

        assert_eq!(creds.available_targets(), SyncTarget::all());
        let yandex = creds.yandex.unwrap();
        assert_eq!(
            yandex.fbs,
            Some(YandexCampaign {
                campaign_id: "11".into(),
                warehouse_id: 42
            })
        );
    }

    #[test]
    fn test_only_ozon_configured() {
        let creds = Credentials::from_lookup(lookup(&[
            ("CLIENT_ID", "123"),
            ("SELLER_TOKEN", "secret"),
        ]))
        .unwrap();
        assert_eq!(creds.available_targets(), vec![SyncTarget::Ozon]);
    }

    #[test]
    fn test_partial_credentials_rejected() {
        assert!(Credentials::from_lookup(lookup(&[("CLIENT_ID", "123")])).is_err());
        assert!(Credentials::from_lookup(lookup(&[
            ("MARKET_TOKEN", "token"),
            ("FBS_ID", "11"),
        ]))
        .is_err());
        assert!(Credentials::from_lookup(lookup(&[
            ("FBS_ID", "11"),
            ("WAREHOUSE_FBS_ID", "42"),
        ]))
        .is_err());
    }

    #[test]
    fn test_warehouse_must_be_integer() {
        let err = Credentials::from_lookup(lookup(&[
            ("MARKET_TOKEN", "token"),
            ("DBS_ID", "12"),
            ("WAREHOUSE_DBS_ID", "main"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_blank_values_are_missing() {
        let creds = Credentials::from_lookup(lookup(&[("CLIENT_ID", "  "), ("SELLER_TOKEN", "")]))
            .unwrap();
        assert!(creds.ozon.is_none());
        assert!(creds.available_targets().is_empty());
    }
}
