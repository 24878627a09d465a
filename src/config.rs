//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.confidence.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".confidence.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Loader settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Analysis thresholds.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path. When unset, the name follows the report format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// File stem of the report when no output path is configured.
const DEFAULT_REPORT_STEM: &str = "confidence_report";

impl GeneralConfig {
    /// Where the report is written for the given format.
    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        match self.output {
            Some(ref output) => PathBuf::from(output),
            None => PathBuf::from(format!("{}.{}", DEFAULT_REPORT_STEM, format.extension())),
        }
    }
}

/// Journal loader settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Reject the whole file on the first invalid record.
    /// If false, invalid entries are skipped with a warning.
    #[serde(default)]
    pub strict: bool,
}

/// Thresholds used by the insight calculations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Daily average at or above which a day counts toward a high streak.
    #[serde(default = "default_high_streak_threshold")]
    pub high_streak_threshold: f64,

    /// Daily average at or below which a day counts as low confidence.
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,

    /// Minimum consecutive days for a high streak.
    #[serde(default = "default_min_streak_days")]
    pub min_streak_days: usize,

    /// Window (in recorded days) of the moving average.
    #[serde(default = "default_moving_average_window")]
    pub moving_average_window: usize,

    /// Power level at or below which an entry counts as a low score.
    #[serde(default = "default_low_score_level")]
    pub low_score_level: u8,

    /// Power level at or above which an entry feeds keyword extraction.
    #[serde(default = "default_high_confidence_level")]
    pub high_confidence_level: u8,

    /// Number of keywords to report.
    #[serde(default = "default_top_keywords")]
    pub top_keywords: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_streak_threshold: default_high_streak_threshold(),
            low_confidence_threshold: default_low_confidence_threshold(),
            min_streak_days: default_min_streak_days(),
            moving_average_window: default_moving_average_window(),
            low_score_level: default_low_score_level(),
            high_confidence_level: default_high_confidence_level(),
            top_keywords: default_top_keywords(),
        }
    }
}

fn default_high_streak_threshold() -> f64 {
    7.5
}

fn default_low_confidence_threshold() -> f64 {
    5.5
}

fn default_min_streak_days() -> usize {
    2
}

fn default_moving_average_window() -> usize {
    7
}

fn default_low_score_level() -> u8 {
    5
}

fn default_high_confidence_level() -> u8 {
    8
}

fn default_top_keywords() -> usize {
    10
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the keyword/text section.
    #[serde(default = "default_true")]
    pub include_text_insights: bool,

    /// Include generated recommendations.
    #[serde(default = "default_true")]
    pub include_recommendations: bool,

    /// Include the per-day table with moving average.
    #[serde(default = "default_true")]
    pub include_daily_series: bool,

    /// Maximum improvement areas listed in the Markdown report.
    #[serde(default = "default_max_improvement_areas")]
    pub max_improvement_areas: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_text_insights: true,
            include_recommendations: true,
            include_daily_series: true,
            max_improvement_areas: default_max_improvement_areas(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_improvement_areas() -> usize {
    3
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        if args.strict {
            self.loader.strict = true;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, None);
        assert!(!config.general.verbose);
        assert!(!config.loader.strict);
        assert_eq!(config.analysis.high_streak_threshold, 7.5);
        assert_eq!(config.analysis.low_confidence_threshold, 5.5);
        assert_eq!(config.analysis.moving_average_window, 7);
        assert!(config.report.include_recommendations);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "june.md"
verbose = true

[loader]
strict = true

[analysis]
high_streak_threshold = 8.0
top_keywords = 5

[report]
include_text_insights = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output.as_deref(), Some("june.md"));
        assert!(config.general.verbose);
        assert!(config.loader.strict);
        assert_eq!(config.analysis.high_streak_threshold, 8.0);
        assert_eq!(config.analysis.top_keywords, 5);
        // untouched fields keep their defaults
        assert_eq!(config.analysis.min_streak_days, 2);
        assert!(!config.report.include_text_insights);
        assert!(config.report.include_daily_series);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nlow_score_level = 4").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.analysis.low_score_level, 4);
        assert_eq!(config.general.output, None);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[analysis\nnot toml").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[loader]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.analysis.top_keywords, 10);
    }

    #[test]
    fn test_output_path_follows_format() {
        let mut config = Config::default();
        assert_eq!(
            config.general.output_path(OutputFormat::Markdown),
            PathBuf::from("confidence_report.md")
        );
        assert_eq!(
            config.general.output_path(OutputFormat::Json),
            PathBuf::from("confidence_report.json")
        );

        config.general.output = Some("june.md".to_string());
        assert_eq!(
            config.general.output_path(OutputFormat::Json),
            PathBuf::from("june.md")
        );
    }
}
