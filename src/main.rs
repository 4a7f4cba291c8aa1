// This is the entry point of the API smoke-test harness.
//
// **Architecture Overview:**
// - `core/` = The harness and content heuristics (no HTTP)
// - `infra/` = HTTP clients for Gemini, Firebase Auth and Google Sheets
// - `suites/` = The check lists that wire the two together
//
// This file's job is to:
// 1. Load configuration
// 2. Build the clients (dependency injection)
// 3. Run the selected suites in order
// 4. Exit non-zero if anything failed

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "suites/suites_layer.rs"]
mod suites;

mod config;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::SmokeConfig;
use crate::core::harness::Harness;
use crate::infra::ai::GeminiClient;
use crate::infra::firebase::FirebaseAuthClient;
use crate::infra::sheets::SheetsClient;
use crate::suites::backend::backend_suite;
use crate::suites::sheets::sheets_suite;
use crate::suites::SuiteName;

#[derive(Parser, Debug)]
#[command(name = "ekatra-smoke")]
#[command(about = "Smoke tests for the Gemini, Firebase Auth and Google Sheets APIs", long_about = None)]
struct Cli {
    /// Suites to run, in order.
    #[arg(value_enum)]
    suites: Vec<SuiteName>,

    /// Print the checks of the selected suites without running them.
    #[arg(long)]
    list: bool,
}

fn build_suites(config: &SmokeConfig, selected: &[SuiteName]) -> anyhow::Result<Vec<Harness>> {
    let mut harnesses = Vec::new();

    for suite in SuiteName::expand(selected) {
        match suite {
            SuiteName::Backend => {
                let gemini = GeminiClient::new(&config.gemini)
                    .context("Failed to create Gemini client")?;
                let firebase = FirebaseAuthClient::new(&config.firebase)
                    .context("Failed to create Firebase Auth client")?;
                harnesses.push(backend_suite(Arc::new(gemini), Arc::new(firebase)));
            }
            SuiteName::Sheets => {
                let sheets = SheetsClient::new(&config.sheets)
                    .context("Failed to create Google Sheets client")?;
                harnesses.push(sheets_suite(Arc::new(sheets)));
            }
            SuiteName::All => unreachable!("expand() never yields All"),
        }
    }

    Ok(harnesses)
}

/// Runs every suite in order and folds their exit codes: 0 only when every
/// suite passed. No suites at all counts as success.
async fn run_suites(harnesses: &[Harness]) -> i32 {
    let mut code = 0;
    for (i, harness) in harnesses.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let report = harness.run().await;
        tracing::info!(
            "{} finished in {}ms",
            report.suite,
            (chrono::Utc::now() - report.started_at).num_milliseconds()
        );
        for failed in report.failures() {
            tracing::debug!("{} failed after {:?}", failed.name, failed.elapsed);
        }
        code = code.max(report.exit_code());
    }
    code
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Logs go to stderr so they don't interleave with the report on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SmokeConfig::from_env();

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        tracing::warn!(
            "Credentials not configured: {}. Checks that need them will fail.",
            missing.join(", ")
        );
    }

    let harnesses = build_suites(&config, &cli.suites)?;

    if cli.list {
        for harness in &harnesses {
            println!("{}", harness.title());
            for name in harness.check_names() {
                println!("  - {}", name);
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let code = run_suites(&harnesses).await;
    Ok(ExitCode::from(code as u8))
}
