use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::SyncTarget;

/// Итог одного прогона синхронизации по всем целям
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Количество строк в таблице остатков
    pub remnants_total: usize,

    pub dry_run: bool,

    /// Результат по каждой цели в порядке выполнения
    pub targets: Vec<TargetOutcome>,
}

impl SyncReport {
    pub fn new(run_id: String, remnants_total: usize, dry_run: bool) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            completed_at: None,
            remnants_total,
            dry_run,
            targets: Vec::new(),
        }
    }

    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Все цели завершились успешно
    pub fn is_success(&self) -> bool {
        self.targets
            .iter()
            .all(|t| t.status == TargetStatus::Completed)
    }

    pub fn failed_targets(&self) -> Vec<SyncTarget> {
        self.targets
            .iter()
            .filter(|t| t.status == TargetStatus::Failed)
            .map(|t| t.target)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Completed,
    Failed,
}

/// Результат синхронизации одной цели
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub target: SyncTarget,
    pub status: TargetStatus,
    pub report: Option<TargetReport>,
    pub error: Option<String>,
}

impl TargetOutcome {
    pub fn completed(target: SyncTarget, report: TargetReport) -> Self {
        Self {
            target,
            status: TargetStatus::Completed,
            report: Some(report),
            error: None,
        }
    }

    pub fn failed(target: SyncTarget, error: impl Into<String>) -> Self {
        Self {
            target,
            status: TargetStatus::Failed,
            report: None,
            error: Some(error.into()),
        }
    }
}

/// Статистика выгрузки в одну цель
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReport {
    /// Товаров, размещенных на маркетплейсе
    pub offers_published: usize,

    /// Всего записей остатков (включая обнуленные)
    pub stocks_total: usize,

    /// Записей остатков с ненулевым количеством
    pub stocks_non_empty: usize,

    /// Товаров, отсутствующих в таблице поставщика и обнуленных
    pub stale_zeroed: usize,

    pub prices_total: usize,

    /// Отправлено пакетов остатков
    pub stock_batches: usize,

    /// Отправлено пакетов цен
    pub price_batches: usize,

    /// Ошибок по отдельным товарам в ответах маркетплейса
    pub item_errors: usize,
}
