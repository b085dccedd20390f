use async_trait::async_trait;
use contracts::domain::a001_stock_record::StockRecord;
use contracts::enums::{MarketplaceKind, SyncTarget};
use contracts::usecases::u601_sync_ozon::SyncOzon;
use contracts::usecases::u602_sync_yandex::SyncYandex;
use contracts::usecases::common::{SyncReport, TargetOutcome, TargetReport, UseCaseMetadata};
use tracing::Instrument;
use uuid::Uuid;

use super::reconciliation::{compute_prices, compute_stocks, split_non_empty, StockUpload};
use crate::shared::batch::chunks;
use crate::shared::error::SyncError;
use crate::shared::marketplaces::{MarketplaceClient, PriceOf, StockOf};
use crate::shared::remnants::RemnantsSource;

/// Результат синхронизации одной цели: выгруженные записи и статистика
#[derive(Debug, Clone)]
pub struct TargetSync<S, P> {
    pub stocks: StockUpload<S>,
    pub prices: Vec<P>,
    pub report: TargetReport,
}

/// Синхронизировать одну цель: получить артикулы, выгрузить остатки, затем цены.
///
/// Пакеты отправляются последовательно. Первая ошибка прерывает выгрузку,
/// уже отправленные пакеты не откатываются.
pub async fn sync_target<C: MarketplaceClient>(
    client: &C,
    remnants: &[StockRecord],
    dry_run: bool,
) -> Result<TargetSync<StockOf<C>, PriceOf<C>>, SyncError> {
    let target = MarketplaceClient::target(client);
    let limits = client.limits();

    let offer_ids = client.list_offer_ids().await?;
    tracing::info!("{}: {} offers published", target, offer_ids.len());

    let shape = client.shape();
    let stocks = compute_stocks(shape, remnants, &offer_ids)?;

    let mut report = TargetReport {
        offers_published: offer_ids.len(),
        stocks_total: stocks.len(),
        ..TargetReport::default()
    };

    // Остатки выгружаются до расчета цен
    let stock_batches: Vec<&[StockOf<C>]> = chunks(&stocks, limits.stocks)?.collect();
    if dry_run {
        tracing::info!("{}: dry run, skipping {} stock batches", target, stock_batches.len());
    } else {
        for (idx, batch) in stock_batches.iter().enumerate() {
            tracing::info!(
                "{}: pushing stock batch {}/{} ({} items)",
                target,
                idx + 1,
                stock_batches.len(),
                batch.len()
            );
            let response = client.push_stocks(batch).await?;
            report.item_errors += response.item_errors();
            report.stock_batches += 1;
        }
    }

    // Цены считаются от того же списка артикулов, что и остатки
    let prices = compute_prices(shape, remnants, &offer_ids)?;
    report.prices_total = prices.len();

    let price_batches: Vec<&[PriceOf<C>]> = chunks(&prices, limits.prices)?.collect();
    if dry_run {
        tracing::info!("{}: dry run, skipping {} price batches", target, price_batches.len());
    } else {
        for (idx, batch) in price_batches.iter().enumerate() {
            tracing::info!(
                "{}: pushing price batch {}/{} ({} items)",
                target,
                idx + 1,
                price_batches.len(),
                batch.len()
            );
            let response = client.push_prices(batch).await?;
            report.item_errors += response.item_errors();
            report.price_batches += 1;
        }
    }

    let stocks = split_non_empty::<C::Shape>(stocks);
    report.stocks_non_empty = stocks.non_empty.len();
    report.stale_zeroed = report.stocks_total.saturating_sub(report.prices_total);

    if report.item_errors > 0 {
        tracing::warn!(
            "{}: marketplace reported {} item-level errors",
            target,
            report.item_errors
        );
    }
    tracing::info!(
        "{}: stocks={} (non-empty={}, zeroed stale={}), prices={}",
        target,
        report.stocks_total,
        report.stocks_non_empty,
        report.stale_zeroed,
        report.prices_total
    );

    Ok(TargetSync {
        stocks,
        prices,
        report,
    })
}

/// Цель синхронизации со стертым типом клиента
#[async_trait]
pub trait TargetRunner: Send + Sync {
    fn target(&self) -> SyncTarget;

    async fn run(&self, remnants: &[StockRecord], dry_run: bool) -> Result<TargetReport, SyncError>;
}

#[async_trait]
impl<C: MarketplaceClient> TargetRunner for C {
    fn target(&self) -> SyncTarget {
        MarketplaceClient::target(self)
    }

    async fn run(&self, remnants: &[StockRecord], dry_run: bool) -> Result<TargetReport, SyncError> {
        sync_target(self, remnants, dry_run)
            .await
            .map(|sync| sync.report)
    }
}

/// Полное имя UseCase, обслуживающего цель (для логов)
pub fn usecase_for(target: SyncTarget) -> String {
    match target.marketplace() {
        MarketplaceKind::Ozon => SyncOzon::full_name(),
        MarketplaceKind::YandexMarket => SyncYandex::full_name(),
    }
}

/// Отображаемое имя UseCase для цели
pub fn usecase_title(target: SyncTarget) -> &'static str {
    match target.marketplace() {
        MarketplaceKind::Ozon => SyncOzon::display_name(),
        MarketplaceKind::YandexMarket => SyncYandex::display_name(),
    }
}

/// Полный прогон синхронизации: остатки поставщика загружаются один раз,
/// затем цели обрабатываются по очереди и независимо друг от друга
pub struct SyncOrchestrator {
    source: Box<dyn RemnantsSource>,
    targets: Vec<Box<dyn TargetRunner>>,
    dry_run: bool,
}

impl SyncOrchestrator {
    pub fn new(source: Box<dyn RemnantsSource>, dry_run: bool) -> Self {
        Self {
            source,
            targets: Vec::new(),
            dry_run,
        }
    }

    pub fn add_target(&mut self, runner: Box<dyn TargetRunner>) {
        self.targets.push(runner);
    }

    pub fn targets(&self) -> Vec<SyncTarget> {
        self.targets.iter().map(|t| t.target()).collect()
    }

    /// Выполнить прогон. Ошибка загрузки остатков прерывает весь прогон,
    /// ошибка цели фиксируется в отчете и не мешает следующим целям.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("sync", run_id = %run_id);
        self.run_inner(run_id).instrument(span).await
    }

    async fn run_inner(&self, run_id: String) -> Result<SyncReport, SyncError> {
        tracing::info!(
            "Starting sync for targets: {:?} (dry_run={})",
            self.targets(),
            self.dry_run
        );

        let remnants = self.source.fetch().await?;
        tracing::info!("Loaded {} remnants", remnants.len());

        let mut report = SyncReport::new(run_id, remnants.len(), self.dry_run);

        for runner in &self.targets {
            let target = runner.target();
            tracing::info!("Syncing {}: {}", target.display_name(), usecase_title(target));

            let span = tracing::info_span!("target", usecase = %usecase_for(target), target = %target);
            let outcome = match runner.run(&remnants, self.dry_run).instrument(span).await {
                Ok(target_report) => TargetOutcome::completed(target, target_report),
                Err(e) => {
                    tracing::error!("{} sync failed: {}", target, e);
                    TargetOutcome::failed(target, e.user_message())
                }
            };
            report.targets.push(outcome);
        }

        report.complete();
        tracing::info!(
            "Sync finished: {} targets, failed: {:?}",
            report.targets.len(),
            report.failed_targets()
        );

        Ok(report)
    }
}
