//! Confidence Journal - analyzer for a dated confidence log
//!
//! A CLI tool that loads a JSON journal of confidence entries, applies
//! category/type/power filters, and generates Markdown or JSON reports
//! with aggregate statistics and insights.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (invalid arguments, unreadable or invalid journal, write failure)

mod analysis;
mod cli;
mod config;
mod dashboard;
mod error;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use dashboard::Dashboard;
use loader::{JournalLoader, LoadOptions};
use report::{AnalysisReport, ReportMetadata};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
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

    // Read the config before logging starts so it can set the level
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.log_level(config.general.verbose));

    info!("confidence-journal v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        ConfigSource::File(path) => info!("Loaded config from: {}", path.display()),
        ConfigSource::Defaults => debug!("No config file found, using defaults"),
        ConfigSource::Invalid(e) => warn!("Failed to load config: {:#}", e),
    }

    if let Err(e) = run(args, config) {
        error!("Analysis failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .confidence.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize thresholds and report sections.");
    Ok(())
}

/// Initialize logging at the resolved verbosity level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load, filter, analyze and write the report.
fn run(args: Args, config: Config) -> Result<()> {
    let show_progress = args.show_progress();

    let input = args
        .input
        .clone()
        .context("An input file is required (--input)")?;

    // Step 1: Load and validate the journal
    if show_progress {
        println!("📖 Loading journal: {}", input.display());
    }
    let loader = JournalLoader::new(LoadOptions::from(&config.loader));
    let outcome = loader
        .load_file(&input)
        .with_context(|| format!("Failed to load journal {}", input.display()))?;

    if show_progress && outcome.skipped_entries + outcome.skipped_days > 0 {
        println!(
            "   ⚠️  Skipped {} invalid entries ({} days)",
            outcome.skipped_entries, outcome.skipped_days
        );
    }

    // Step 2: Apply filters
    let mut dashboard = Dashboard::new(outcome.collection);
    dashboard.set_filter(args.entry_filter());

    if let Some(date) = args.day {
        print_day_detail(&mut dashboard, date);
    }

    let views = dashboard.views().clone();
    if show_progress {
        println!(
            "🔎 Filter: {} ({} of {} entries)",
            dashboard.filter(),
            views.overall.total_entries,
            dashboard.source().entry_count()
        );
    }
    if views.collection.is_empty() {
        warn!("No entries match the active filter");
    }

    // Step 3: Optionally export the filtered journal
    if let Some(ref export) = args.export {
        let json = serde_json::to_string_pretty(&views.collection)
            .context("Failed to serialize filtered journal")?;
        std::fs::write(export, json)
            .with_context(|| format!("Failed to write export to {}", export.display()))?;
        if show_progress {
            println!("💾 Exported filtered journal to: {}", export.display());
        }
    }

    // Step 4: Build the report
    if show_progress {
        println!("📝 Generating report...");
    }
    let insights = analysis::compute_insights(&views.collection, &config.analysis);

    let metadata = ReportMetadata {
        source: input.display().to_string(),
        generated_at: Utc::now(),
        active_filter: dashboard.filter().to_string(),
        skipped_entries: outcome.skipped_entries,
    };
    let report = AnalysisReport::new(metadata, &views, insights);

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = config.general.output_path(args.format);
    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
    info!("Report written to {}", output_path.display());

    if show_progress {
        print_summary(&report);
        println!(
            "\n✅ Analysis complete! Report saved to: {}",
            output_path.display()
        );
    }

    Ok(())
}

/// Print the headline numbers and top recommendations.
fn print_summary(report: &AnalysisReport) {
    let overall = &report.overview;
    println!("\n📊 Summary:");
    println!("   Days: {} | Entries: {}", overall.total_days, overall.total_entries);
    println!(
        "   Average power: {:.2} (min {}, max {})",
        overall.average_power, overall.min_power, overall.max_power
    );
    println!(
        "   Personal: {:.1}% | Professional: {:.1}%",
        overall.personal_percentage, overall.professional_percentage
    );
    println!("   Growth trend: {:+.1}%", report.growth_trend);

    if !report.insights.recommendations.is_empty() {
        println!("\n💡 Top Recommendations:");
        for (i, rec) in report.insights.recommendations.iter().take(3).enumerate() {
            println!("   {}. {}", i + 1, rec);
        }
    }
}

/// Print the detail view for one day.
fn print_day_detail(dashboard: &mut Dashboard, date: NaiveDate) {
    match dashboard.day(&date) {
        Some(day) => {
            println!(
                "\n📅 {}: average {:.2}, mostly {}",
                date,
                day.daily_confidence_average(),
                day.dominant_confidence_area()
            );
            for entry in day.entries() {
                println!(
                    "   [{:>2}] {} ({}, {})",
                    entry.power_level,
                    entry.text,
                    entry.category.display_name(),
                    entry.confidence_type
                );
            }
            println!();
        }
        None => println!("\n📅 {}: no entries match the active filter\n", date),
    }
}

/// Where the effective configuration came from.
enum ConfigSource {
    File(PathBuf),
    Defaults,
    /// The default config file exists but could not be parsed.
    Invalid(anyhow::Error),
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is initialized, so the outcome is returned for
/// the caller to log.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::File(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            let source = ConfigSource::File(PathBuf::from(CONFIG_FILE_NAME));
            Ok((config, source))
        }
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((Config::default(), ConfigSource::Invalid(e))),
    }
}
