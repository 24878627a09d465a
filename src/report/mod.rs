//! Analysis report model and generation.
//!
//! This module assembles everything known about a (filtered) journal into
//! one [`AnalysisReport`], which `generator` renders as Markdown or JSON.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{CategoryStats, Insights, OverallStats, HISTOGRAM_BUCKETS};
use crate::dashboard::DerivedViews;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the analyzed journal file.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Human-readable description of the active filter.
    pub active_filter: String,
    /// Entries dropped at load time.
    pub skipped_entries: usize,
}

/// The complete analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub overview: OverallStats,
    /// Percentage change between the early and late thirds of the journal.
    pub growth_trend: f64,
    pub categories: Vec<CategoryStats>,
    /// Entry count per power level; index 0 is level 1.
    pub histogram: [usize; HISTOGRAM_BUCKETS],
    pub insights: Insights,
}

impl AnalysisReport {
    /// Build a report from the dashboard views and the insights over the same collection.
    pub fn new(metadata: ReportMetadata, views: &DerivedViews, insights: Insights) -> Self {
        Self {
            metadata,
            overview: views.overall.clone(),
            growth_trend: views.growth_trend,
            categories: views.categories.clone(),
            histogram: views.histogram,
            insights,
        }
    }
}
