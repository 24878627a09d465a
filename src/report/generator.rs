//! Markdown and JSON report generation.
//!
//! This module renders an [`AnalysisReport`] as a Markdown document or as
//! pretty-printed JSON. Rounding happens here and nowhere else.

use super::{AnalysisReport, ReportMetadata};
use crate::analysis::{
    weekday_name, CategoryStats, ImprovementArea, Insights, OverallStats, PowerDistribution,
    TemporalPatterns, TextInsights, TrackingMetadata,
};
use crate::config::ReportConfig;
use crate::models::MIN_POWER_LEVEL;
use anyhow::Result;

/// Width, in characters, of the longest histogram bar.
const BAR_WIDTH: usize = 30;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalysisReport, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Confidence Journal Report\n\n");

    output.push_str(&generate_metadata_section(
        &report.metadata,
        report.insights.tracking.as_ref(),
    ));
    output.push_str(&generate_table_of_contents(report, config));

    if report.overview.total_entries == 0 {
        output.push_str("## Overview\n\n");
        output.push_str("No entries match the active filter.\n\n");
        output.push_str(&generate_footer());
        return output;
    }

    output.push_str(&generate_overview_section(
        &report.overview,
        report.growth_trend,
        &report.insights.distribution,
    ));
    output.push_str(&generate_categories_section(&report.categories));
    output.push_str(&generate_histogram_section(&report.histogram));
    output.push_str(&generate_temporal_section(&report.insights.temporal));
    output.push_str(&generate_improvement_section(
        &report.insights.improvement_areas,
        config.max_improvement_areas,
    ));

    if config.include_text_insights {
        if let Some(ref text) = report.insights.text {
            output.push_str(&generate_text_section(text));
        }
    }

    if config.include_daily_series {
        output.push_str(&generate_daily_series_section(&report.insights));
    }

    if config.include_recommendations {
        output.push_str(&generate_recommendations_section(
            &report.insights.recommendations,
        ));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, tracking: Option<&TrackingMetadata>) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Filter:** {}\n", metadata.active_filter));

    if let Some(tracking) = tracking {
        section.push_str(&format!("- **Days Tracked:** {}\n", tracking.days_tracked));
        section.push_str(&format!(
            "- **Date Range:** {} to {}\n",
            tracking.first_date, tracking.last_date
        ));
        section.push_str(&format!(
            "- **Data Completeness:** {:.1}%\n",
            tracking.data_completeness
        ));
    }

    if metadata.skipped_entries > 0 {
        section.push_str(&format!(
            "- **Skipped Entries:** {}\n",
            metadata.skipped_entries
        ));
    }
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &AnalysisReport, config: &ReportConfig) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Overview](#overview)\n");

    if report.overview.total_entries > 0 {
        toc.push_str("- [Categories](#categories)\n");
        toc.push_str("- [Power Levels](#power-levels)\n");
        toc.push_str("- [Temporal Patterns](#temporal-patterns)\n");
        toc.push_str("- [Improvement Areas](#improvement-areas)\n");

        if config.include_text_insights && report.insights.text.is_some() {
            toc.push_str("- [Text Insights](#text-insights)\n");
        }
        if config.include_daily_series {
            toc.push_str("- [Daily Series](#daily-series)\n");
        }
        if config.include_recommendations && !report.insights.recommendations.is_empty() {
            toc.push_str("- [Recommendations](#recommendations)\n");
        }
    }

    toc.push('\n');

    toc
}

/// Generate the overview section.
fn generate_overview_section(
    overall: &OverallStats,
    growth_trend: f64,
    distribution: &PowerDistribution,
) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Days | Entries | Avg Power | Min | Max | Personal | Professional | Growth |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {:.2} | {} | {} | {:.1}% | {:.1}% | {:+.1}% |\n\n",
        overall.total_days,
        overall.total_entries,
        overall.average_power,
        overall.min_power,
        overall.max_power,
        overall.personal_percentage,
        overall.professional_percentage,
        growth_trend,
    ));

    section.push_str("### Distribution\n\n");
    if let Some(median) = distribution.median {
        section.push_str(&format!("- **Median:** {:.1}\n", median));
    }
    if let Some(std_dev) = distribution.std_dev {
        section.push_str(&format!("- **Standard Deviation:** {:.2}\n", std_dev));
    }
    if let Some(mode) = distribution.mode {
        section.push_str(&format!("- **Most Common Level:** {}\n", mode));
    }
    for breakdown in &distribution.by_type {
        let avg = breakdown
            .average_power
            .map_or_else(|| "n/a".to_string(), |a| format!("{:.2}", a));
        section.push_str(&format!(
            "- **{}:** {} entries, average {}\n",
            capitalize(breakdown.confidence_type.as_str()),
            breakdown.count,
            avg
        ));
    }
    section.push('\n');

    section
}

/// Generate the categories section.
fn generate_categories_section(categories: &[CategoryStats]) -> String {
    let mut section = String::new();

    section.push_str("## Categories\n\n");
    section.push_str("| Category | Colour | Entries | Avg Power | Share |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|\n");

    for stats in categories {
        section.push_str(&format!(
            "| {} | `{}` | {} | {:.2} | {:.1}% |\n",
            stats.category.display_name(),
            stats.category.color(),
            stats.count,
            stats.average_power,
            stats.percentage
        ));
    }
    section.push('\n');

    section
}

/// Generate the power level histogram section.
fn generate_histogram_section(histogram: &[usize]) -> String {
    let mut section = String::new();

    section.push_str("## Power Levels\n\n");
    section.push_str("| Level | Entries | |\n");
    section.push_str("|:---:|:---:|:---|\n");

    let max = histogram.iter().copied().max().unwrap_or(0);
    for (i, count) in histogram.iter().enumerate() {
        let width = if max == 0 { 0 } else { count * BAR_WIDTH / max };
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            i + usize::from(MIN_POWER_LEVEL),
            count,
            "█".repeat(width)
        ));
    }
    section.push('\n');

    section
}

/// Generate the temporal patterns section.
fn generate_temporal_section(temporal: &TemporalPatterns) -> String {
    let mut section = String::new();

    section.push_str("## Temporal Patterns\n\n");

    if !temporal.by_weekday.is_empty() {
        section.push_str("### By Day of Week\n\n");
        section.push_str("| Day | Entries | Avg Power |\n");
        section.push_str("|:---|:---:|:---:|\n");
        for day in &temporal.by_weekday {
            section.push_str(&format!(
                "| {} | {} | {:.2} |\n",
                weekday_name(day.weekday),
                day.count,
                day.average_power
            ));
        }
        section.push('\n');
    }

    let weekly = &temporal.weekly_trend;
    section.push_str("### Weekly Trend\n\n");
    section.push_str(&format!(
        "- **Improving Weeks:** {}\n- **Declining Weeks:** {}\n\n",
        weekly.improving_weeks, weekly.declining_weeks
    ));

    let streaks = &temporal.streaks;
    section.push_str("### Streaks\n\n");
    match (
        streaks.longest_high_streak.first(),
        streaks.longest_high_streak.last(),
    ) {
        (Some(first), Some(last)) => section.push_str(&format!(
            "- **Longest High Streak:** {} days ({} to {})\n",
            streaks.longest_high_streak.len(),
            first.date,
            last.date
        )),
        _ => section.push_str("- **Longest High Streak:** none\n"),
    }
    section.push_str(&format!(
        "- **Days in High Streaks:** {}\n- **Low Confidence Days:** {}\n\n",
        streaks.total_high_streak_days, streaks.low_confidence_days
    ));

    section
}

/// Generate the improvement areas section.
fn generate_improvement_section(areas: &[ImprovementArea], limit: usize) -> String {
    let mut section = String::new();

    section.push_str("## Improvement Areas\n\n");
    section.push_str("| Category | Avg Power | Entries | Low Scores | Recent Trend | Priority |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");

    for area in areas.iter().take(limit) {
        section.push_str(&format!(
            "| {} | {:.2} | {} | {:.0}% | {} | {:.2} |\n",
            area.category.display_name(),
            area.average_power,
            area.frequency,
            area.low_score_ratio * 100.0,
            area.recent_trend,
            area.priority_score
        ));
    }
    section.push('\n');

    section
}

/// Generate the text insights section.
fn generate_text_section(text: &TextInsights) -> String {
    let mut section = String::new();

    section.push_str("## Text Insights\n\n");

    if !text.high_confidence_keywords.is_empty() {
        let keywords: Vec<String> = text
            .high_confidence_keywords
            .iter()
            .map(|k| format!("{} ({})", k.word, k.count))
            .collect();
        section.push_str(&format!(
            "- **High Confidence Keywords:** {}\n",
            keywords.join(", ")
        ));
    }
    section.push_str(&format!(
        "- **Average Entry Length:** {:.1} characters\n",
        text.average_entry_length
    ));
    section.push_str(&format!("- **Longest Entry:** \"{}\"\n", text.longest_entry));
    section.push_str(&format!("- **Shortest Entry:** \"{}\"\n\n", text.shortest_entry));

    section
}

/// Generate the daily series section.
fn generate_daily_series_section(insights: &Insights) -> String {
    let mut section = String::new();

    section.push_str("## Daily Series\n\n");
    section.push_str("| Date | Entries | Avg Power | Moving Avg |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");

    for point in &insights.daily_series {
        let moving = point
            .moving_average
            .map_or_else(|| "-".to_string(), |m| format!("{:.2}", m));
        section.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            point.date, point.entry_count, point.average_power, moving
        ));
    }
    section.push('\n');

    section
}

/// Generate the recommendations section.
fn generate_recommendations_section(recommendations: &[String]) -> String {
    if recommendations.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Recommendations\n\n");
    for (i, rec) in recommendations.iter().enumerate() {
        section.push_str(&format!("{}. {}\n", i + 1, rec));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "---\n\n*Report generated by confidence-journal v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
