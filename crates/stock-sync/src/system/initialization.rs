use anyhow::{Context, Result};
use contracts::enums::SyncTarget;
use std::path::{Path, PathBuf};

use crate::shared::config::{Config, Credentials};
use crate::shared::remnants::{FileRemnantsSource, RemnantsSource, VendorArchiveSource};
use crate::shared::request_log::RequestLog;
use crate::usecases::u600_sync_marketplaces::SyncOrchestrator;
use crate::usecases::u601_sync_ozon::OzonApiClient;
use crate::usecases::u602_sync_yandex::YandexApiClient;

/// Параметры запуска синхронизации
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Цели синхронизации; пустой список означает все настроенные цели
    pub targets: Vec<SyncTarget>,
    /// Локальный файл таблицы вместо загрузки с сайта поставщика
    pub remnants_file: Option<PathBuf>,
    pub dry_run: bool,
}

/// Собрать прогон синхронизации из конфигурации и учетных данных
pub fn build_orchestrator(
    config: &Config,
    credentials: &Credentials,
    options: &RunOptions,
) -> Result<SyncOrchestrator> {
    let targets = select_targets(credentials, &options.targets)?;

    let source: Box<dyn RemnantsSource> = match &options.remnants_file {
        Some(path) => Box::new(FileRemnantsSource::new(path.clone(), &config.remnants)),
        None => Box::new(VendorArchiveSource::new(&config.remnants, &config.http)?),
    };

    let log_dir = config.log_dir();
    let request_log = |file_name: &str| {
        if config.logging.request_log {
            RequestLog::new(&log_dir, file_name)
        } else {
            RequestLog::disabled()
        }
    };

    let mut orchestrator = SyncOrchestrator::new(source, options.dry_run);
    for target in targets {
        match target {
            SyncTarget::Ozon => {
                let ozon = credentials
                    .ozon
                    .clone()
                    .context("OZON credentials are not configured")?;
                let client = OzonApiClient::new(
                    &config.ozon,
                    &config.http,
                    ozon,
                    request_log("ozon_api_requests.log"),
                )?;
                orchestrator.add_target(Box::new(client));
            }
            SyncTarget::YandexFbs | SyncTarget::YandexDbs => {
                let yandex = credentials
                    .yandex
                    .as_ref()
                    .context("Yandex Market credentials are not configured")?;
                let campaign = match target {
                    SyncTarget::YandexFbs => yandex.fbs.clone(),
                    _ => yandex.dbs.clone(),
                }
                .with_context(|| format!("{} campaign is not configured", target))?;

                let client = YandexApiClient::new(
                    &config.yandex,
                    &config.http,
                    yandex.token.clone(),
                    campaign,
                    target,
                    request_log("yandex_api_requests.log"),
                )?;
                orchestrator.add_target(Box::new(client));
            }
        }
    }

    Ok(orchestrator)
}

/// Выбрать цели: явно заданные (с проверкой учетных данных) или все настроенные
pub fn select_targets(credentials: &Credentials, requested: &[SyncTarget]) -> Result<Vec<SyncTarget>> {
    if requested.is_empty() {
        let available = credentials.available_targets();
        if available.is_empty() {
            anyhow::bail!(
                "No marketplace credentials configured. Set CLIENT_ID/SELLER_TOKEN or MARKET_TOKEN with FBS_ID/DBS_ID"
            );
        }
        return Ok(available);
    }

    let mut selected = Vec::new();
    for target in requested {
        if !credentials.is_configured(*target) {
            anyhow::bail!("Credentials for target '{}' are not configured", target);
        }
        if !selected.contains(target) {
            selected.push(*target);
        }
    }
    Ok(selected)
}

/// Путь к .env рядом с исполняемым файлом, если он там есть
pub fn env_file_near_exe() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let path = exe_path.parent().map(|dir| dir.join(".env"))?;
    path.exists().then_some(path)
}

/// Загрузить переменные окружения из .env: сначала рядом с exe, затем из текущего каталога
pub fn load_env_files() {
    if let Some(path) = env_file_near_exe() {
        if dotenvy::from_path(&path).is_ok() {
            return;
        }
    }
    let _ = dotenvy::dotenv();
}

/// Существует ли локальный файл таблицы
pub fn check_remnants_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("Remnants file not found: {}", path.display());
    }
    Ok(())
}
