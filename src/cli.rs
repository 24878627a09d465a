//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::analysis::EntryFilter;
use crate::models::{Category, ConfidenceType, MAX_POWER_LEVEL, MIN_POWER_LEVEL};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Confidence Journal - analyze a dated confidence log
///
/// Loads a JSON journal of confidence entries, applies optional filters,
/// and writes a Markdown or JSON analysis report.
///
/// Examples:
///   confidence-journal --input journal.json
///   confidence-journal --input journal.json --type professional --min-power 7
///   confidence-journal --input journal.json --category career_development --format json
///   confidence-journal --input journal.json --day 2025-06-17
///   confidence-journal --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Journal JSON file to analyze
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "CONFIDENCE_JOURNAL_INPUT",
        required_unless_present = "init_config"
    )]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting, or confidence_report.md/.json
    /// depending on --format
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Only include entries in this category
    ///
    /// Example: --category career_development
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Only include entries of this confidence type
    #[arg(long = "type", value_name = "TYPE")]
    pub confidence_type: Option<ConfidenceType>,

    /// Only include entries at or above this power level (1-10)
    #[arg(long, value_name = "LEVEL")]
    pub min_power: Option<u8>,

    /// Print the entries recorded on one day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub day: Option<NaiveDate>,

    /// Write the filtered journal, with recomputed daily fields, to this file
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Reject the journal on the first invalid record instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .confidence.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .confidence.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension used for default report names.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(level) = self.min_power {
            if !(MIN_POWER_LEVEL..=MAX_POWER_LEVEL).contains(&level) {
                return Err(format!(
                    "Minimum power level must be between {} and {}",
                    MIN_POWER_LEVEL, MAX_POWER_LEVEL
                ));
            }
        }

        match self.input {
            Some(ref input) if !input.is_file() => {
                Err(format!("Input file does not exist: {}", input.display()))
            }
            None => Err("An input file is required (--input)".to_string()),
            _ => Ok(()),
        }
    }

    /// The entry filter described by the filter flags.
    pub fn entry_filter(&self) -> EntryFilter {
        EntryFilter {
            category: self.category,
            confidence_type: self.confidence_type,
            min_power: self.min_power,
        }
    }

    /// Whether progress and summary lines are printed to stdout.
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `verbose_by_default` comes from the config file; `--quiet` overrides it.
    pub fn log_level(&self, verbose_by_default: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || verbose_by_default {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn make_args(input: Option<PathBuf>) -> Args {
        Args {
            input,
            output: None,
            format: OutputFormat::Markdown,
            category: None,
            confidence_type: None,
            min_power: None,
            day: None,
            export: None,
            strict: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_filter_flags() {
        let args = Args::try_parse_from([
            "confidence-journal",
            "--input",
            "journal.json",
            "--category",
            "career_development",
            "--type",
            "professional",
            "--min-power",
            "7",
            "--day",
            "2025-06-17",
        ])
        .unwrap();

        let filter = args.entry_filter();
        assert_eq!(filter.category, Some(Category::CareerDevelopment));
        assert_eq!(filter.confidence_type, Some(ConfidenceType::Professional));
        assert_eq!(filter.min_power, Some(7));
        assert_eq!(args.day, NaiveDate::from_ymd_opt(2025, 6, 17));
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        let result = Args::try_parse_from([
            "confidence-journal",
            "--input",
            "journal.json",
            "--category",
            "cooking",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_missing_file() {
        let args = make_args(Some(PathBuf::from("/nonexistent/journal.json")));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_min_power_range() {
        let file = NamedTempFile::new().unwrap();
        let mut args = make_args(Some(file.path().to_path_buf()));
        assert!(args.validate().is_ok());

        args.min_power = Some(11);
        assert!(args.validate().is_err());

        args.min_power = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let file = NamedTempFile::new().unwrap();
        let mut args = make_args(Some(file.path().to_path_buf()));
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_init_config() {
        let mut args = make_args(None);
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(None);
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_from_config() {
        let mut args = make_args(None);
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_quiet_hides_progress() {
        let mut args = make_args(None);
        assert!(args.show_progress());

        args.quiet = true;
        assert!(!args.show_progress());
    }
}
