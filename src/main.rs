//! Syscoflow main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use syscoflow_config::Config;
use syscoflow_core::ComplianceEngine;
use syscoflow_ledger::InMemoryLedger;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "syscoflow")]
#[command(version = "0.1.0")]
#[command(about = "SYSCOHADA ledger compliance and cash-flow derivation engine", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// JSON ledger snapshot path
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Company identifier to audit
    #[arg(long)]
    company: String,

    /// Fiscal year to audit
    #[arg(long)]
    year: i32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if args.config.exists() {
        Config::load(args.config.clone()).context("failed to load configuration")?
    } else {
        Config::default()
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();

    let rt = Runtime::new()?;
    rt.block_on(async {
        let content = std::fs::read_to_string(&args.snapshot)
            .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
        let ledger = InMemoryLedger::from_json(&content).context("failed to decode snapshot")?;

        let calendar = config.engine.fiscal;
        let engine = ComplianceEngine::new(Arc::new(ledger), config.engine);

        let result = engine.audit(&args.company, args.year, &calendar).await;
        log::info!(
            "audit of {} fiscal {}: score {}, {} errors, {} warnings",
            args.company,
            args.year,
            result.report.score,
            result.report.errors,
            result.report.warnings
        );

        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    })
}
