//! Contribhist - Contribution History Reporter
//!
//! A CLI tool that fetches an address's on-chain contribution history from a
//! ledger service, enriches it with report metadata, and renders a
//! Markdown/JSON report with summary statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, write failure, etc.)
//!   2 - Empty history with --fail-empty set

mod cli;
mod client;
mod config;
mod history;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::{ContributionSource, LedgerClient, ReportClient};
use config::Config;
use history::{AggregateOptions, LoadOutcome};
use models::{ProfileHistory, ProfileReport, ReportMetadata};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Contribhist v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the workflow
    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .contribhist.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".contribhist.toml");

    if path.exists() {
        eprintln!("⚠️  .contribhist.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .contribhist.toml")?;

    println!("✅ Created .contribhist.toml with default settings.");
    println!("   Edit it to customize service endpoints, timeout, and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete workflow. Returns exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let address = args.address_str().to_string();
    if !cli::looks_like_address(&address) {
        warn!(
            "Address {} does not look like a 0x-prefixed 20-byte hex identifier",
            address
        );
    }

    println!("🔎 Fetching contribution history for {}", address);
    println!("   Ledger:  {}", config.services.ledger_url);
    println!("   Reports: {}", config.services.report_url);
    println!("   Timeout: {}s", config.services.timeout_seconds);

    // One shared HTTP client; the timeout bounds every request, including
    // each concurrent report lookup.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.services.timeout_seconds))
        .build()
        .expect("Failed to create HTTP client");

    let ledger = LedgerClient::new(http.clone(), &config.services.ledger_url);
    let reports = ReportClient::new(http, &config.services.report_url);

    // Handle --dry-run: list contributions and exit
    if args.dry_run {
        return handle_dry_run(&ledger, &address).await;
    }

    // Fetch and join the history
    println!("\n📒 Joining contributions with report metadata...\n");
    let options = AggregateOptions {
        show_progress: !args.quiet,
    };
    let outcome = history::load_history(&ledger, &reports, &address, &options).await;

    let (profile, empty_reason) = match outcome {
        LoadOutcome::Loaded(profile) => (profile, None),
        LoadOutcome::Empty => (
            ProfileHistory::default(),
            Some("no contributions recorded for this address".to_string()),
        ),
        LoadOutcome::Unavailable(e) => {
            warn!("Ledger unavailable, reporting empty history: {}", e);
            (
                ProfileHistory::default(),
                Some(format!("ledger unavailable: {}", e)),
            )
        }
    };

    // Build the report
    println!("📝 Generating report...");

    let duration = start_time.elapsed().as_secs_f64();
    let metadata = ReportMetadata {
        address: address.clone(),
        generated_at: Utc::now(),
        ledger_url: config.services.ledger_url.clone(),
        report_url: config.services.report_url.clone(),
        entry_count: profile.history.len(),
        duration_seconds: duration,
    };

    let profile_report = ProfileReport {
        metadata,
        summary: profile.summary,
        history: profile.history,
    };

    // Generate and save the report
    let output_path = PathBuf::from(&config.general.output);
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&profile_report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&profile_report, &config.report),
    };

    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 History Summary:");
    println!("   Reports funded: {}", profile_report.summary.report_count);
    println!(
        "   Total contributed: {:.2}",
        profile_report.summary.total_amount
    );
    for (category, count) in profile_report.summary.top_categories() {
        println!("   - {}: {}", category, count);
    }
    println!("   Duration: {:.1}s", duration);

    if let Some(ref reason) = empty_reason {
        println!("\n⚠️  Empty result: {}", reason);
    }

    println!("\n✅ Report saved to: {}", output_path.display());

    // Check --fail-empty
    if args.fail_empty && profile_report.summary.report_count == 0 {
        eprintln!("\n⛔ No contribution history found. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Handle --dry-run: list raw contributions, skip report lookups, exit.
async fn handle_dry_run<L: ContributionSource>(ledger: &L, address: &str) -> Result<i32> {
    println!("\n🔍 Dry run: listing contributions (no report lookups)...\n");

    let contributions = ledger
        .contributions_by_address(address)
        .await
        .context("Ledger fetch failed")?;

    if contributions.is_empty() {
        println!("   No contributions found for {}", address);
    } else {
        for contribution in &contributions {
            println!(
                "     💸 {}  {:>10.2}  → report {}",
                contribution.date_created.format("%Y-%m-%d"),
                contribution.amount,
                contribution.report_id
            );
        }
        println!("\n   Total: {} contributions", contributions.len());
    }

    println!("\n✅ Dry run complete. No reports were fetched.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .contribhist.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
