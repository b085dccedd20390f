use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use contracts::enums::SyncTarget;
use contracts::usecases::common::{SyncReport, TargetStatus};
use stock_sync::shared::config::{load_config, Credentials};
use stock_sync::system::initialization::{
    build_orchestrator, check_remnants_file, load_env_files, RunOptions,
};

#[derive(Parser)]
#[command(name = "stock-sync")]
#[command(about = "Sync vendor watch stock and prices to Ozon and Yandex Market")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Read remnants from a local table instead of the vendor archive
    #[arg(long, value_name = "PATH")]
    remnants_file: Option<PathBuf>,

    /// Sync only the given target (repeatable): ozon, yandex-fbs, yandex-dbs
    #[arg(long = "target", value_name = "TARGET", value_parser = parse_target)]
    targets: Vec<SyncTarget>,

    /// Compute payloads without pushing anything to the marketplaces
    #[arg(long)]
    dry_run: bool,
}

fn parse_target(value: &str) -> Result<SyncTarget, String> {
    SyncTarget::from_code(value)
        .ok_or_else(|| format!("unknown target '{}', expected ozon, yandex-fbs or yandex-dbs", value))
}

#[tokio::main]
async fn main() -> ExitCode {
    load_env_files();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) => {
            print_report(&report);
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            tracing::error!("Sync aborted: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<SyncReport> {
    let config = load_config(cli.config.as_deref())?;
    stock_sync::system::tracing::initialize(&config.log_dir())?;

    if let Some(path) = &cli.remnants_file {
        check_remnants_file(path)?;
    }

    let credentials = Credentials::from_env()?;
    let options = RunOptions {
        targets: cli.targets,
        remnants_file: cli.remnants_file,
        dry_run: cli.dry_run,
    };

    let orchestrator = build_orchestrator(&config, &credentials, &options)?;
    orchestrator
        .run()
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))
}

fn print_report(report: &SyncReport) {
    println!(
        "Run {}: {} remnants{}",
        report.run_id,
        report.remnants_total,
        if report.dry_run { " (dry run)" } else { "" }
    );
    for outcome in &report.targets {
        match (&outcome.status, &outcome.report) {
            (TargetStatus::Completed, Some(r)) => println!(
                "  {}: OK, offers={}, stocks={} (non-empty={}, zeroed={}), prices={}, item errors={}",
                outcome.target.display_name(),
                r.offers_published,
                r.stocks_total,
                r.stocks_non_empty,
                r.stale_zeroed,
                r.prices_total,
                r.item_errors
            ),
            _ => println!(
                "  {}: {}",
                outcome.target.display_name(),
                outcome.error.as_deref().unwrap_or("failed")
            ),
        }
    }
}
