//! Entry filtering and aggregate statistics.
//!
//! This module provides the pure functions every view of the journal is
//! built from: filtering a collection down to matching entries, and the
//! overall, per-category, histogram and growth-trend rollups.

use crate::models::{
    Category, ConfidenceType, Entry, JournalCollection, MAX_POWER_LEVEL, MIN_POWER_LEVEL,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate over entries. `None` on a dimension matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Keep only entries in this category.
    pub category: Option<Category>,
    /// Keep only entries of this confidence type.
    pub confidence_type: Option<ConfidenceType>,
    /// Keep only entries with at least this power level.
    pub min_power: Option<u8>,
}

impl EntryFilter {
    /// Returns true if the entry satisfies every constraint.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.category.map_or(true, |c| entry.category == c)
            && self
                .confidence_type
                .map_or(true, |t| entry.confidence_type == t)
            && self.min_power.map_or(true, |p| entry.power_level >= p)
    }

    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.confidence_type.is_none() && self.min_power.is_none()
    }
}

impl fmt::Display for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        if let Some(category) = self.category {
            parts.push(format!("category = {}", category.display_name()));
        }
        if let Some(confidence_type) = self.confidence_type {
            parts.push(format!("type = {}", confidence_type));
        }
        if let Some(min_power) = self.min_power {
            parts.push(format!("power >= {}", min_power));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Keep only matching entries, dropping days left empty.
///
/// Retained days are rebuilt, so their average and dominant area reflect
/// the filtered entries. The source collection is not modified.
pub fn filter_entries(source: &JournalCollection, filter: &EntryFilter) -> JournalCollection {
    JournalCollection::from_entries(
        source
            .entries()
            .filter(|(_, entry)| filter.matches(entry))
            .map(|(date, entry)| (date, entry.clone())),
    )
}

/// Headline statistics over a whole collection.
///
/// For an empty collection every field is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallStats {
    /// Number of distinct dates.
    pub total_days: usize,
    /// Number of entries across all dates.
    pub total_entries: usize,
    /// Mean power level.
    pub average_power: f64,
    /// Highest power level.
    pub max_power: u8,
    /// Lowest power level.
    pub min_power: u8,
    /// Share of personal entries, 0-100.
    pub personal_percentage: f64,
    /// Share of professional entries, 0-100.
    pub professional_percentage: f64,
}

/// Compute the headline statistics.
pub fn compute_overall_stats(collection: &JournalCollection) -> OverallStats {
    let mut stats = OverallStats {
        total_days: collection.len(),
        ..OverallStats::default()
    };

    let mut sum: u64 = 0;
    let mut personal = 0usize;
    let mut min = u8::MAX;
    let mut max = 0u8;

    for (_, entry) in collection.entries() {
        stats.total_entries += 1;
        sum += u64::from(entry.power_level);
        min = min.min(entry.power_level);
        max = max.max(entry.power_level);
        if entry.confidence_type == ConfidenceType::Personal {
            personal += 1;
        }
    }

    if stats.total_entries == 0 {
        return stats;
    }

    let total = stats.total_entries as f64;
    stats.average_power = sum as f64 / total;
    stats.max_power = max;
    stats.min_power = min;
    stats.personal_percentage = personal as f64 / total * 100.0;
    stats.professional_percentage = (stats.total_entries - personal) as f64 / total * 100.0;

    stats
}

/// Rollup for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    /// Number of entries in the category.
    pub count: usize,
    /// Mean power level of those entries.
    pub average_power: f64,
    /// Share of all entries, 0-100.
    pub percentage: f64,
}

/// Per-category rollups, highest average power first.
///
/// Only categories with at least one entry appear. Ties keep the order in
/// which categories were first seen.
pub fn compute_category_stats(collection: &JournalCollection) -> Vec<CategoryStats> {
    // (category, count, power sum) in first-encounter order
    let mut buckets: Vec<(Category, usize, u64)> = Vec::new();
    let mut total = 0usize;

    for (_, entry) in collection.entries() {
        total += 1;
        match buckets.iter_mut().find(|(c, _, _)| *c == entry.category) {
            Some((_, count, sum)) => {
                *count += 1;
                *sum += u64::from(entry.power_level);
            }
            None => buckets.push((entry.category, 1, u64::from(entry.power_level))),
        }
    }

    let mut stats: Vec<CategoryStats> = buckets
        .into_iter()
        .map(|(category, count, sum)| CategoryStats {
            category,
            count,
            average_power: sum as f64 / count as f64,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();

    // sort_by is stable
    stats.sort_by(|a, b| {
        b.average_power
            .partial_cmp(&a.average_power)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    stats
}

/// Number of histogram buckets, one per power level.
pub const HISTOGRAM_BUCKETS: usize = MAX_POWER_LEVEL as usize;

/// Count of entries at each power level; index 0 is level 1.
///
/// Levels outside 1-10 are clamped into range.
pub fn compute_power_level_histogram(collection: &JournalCollection) -> [usize; HISTOGRAM_BUCKETS] {
    let mut histogram = [0usize; HISTOGRAM_BUCKETS];

    for (_, entry) in collection.entries() {
        let level = entry.power_level.clamp(MIN_POWER_LEVEL, MAX_POWER_LEVEL);
        histogram[usize::from(level - MIN_POWER_LEVEL)] += 1;
    }

    histogram
}

/// Relative change, in percent, between the early and late thirds of the journal.
///
/// Each third covers `max(days / 3, 1)` recorded days and is scored by the
/// mean of its daily averages. Fewer than two days, or an early mean of
/// zero, gives 0.
pub fn compute_growth_trend(collection: &JournalCollection) -> f64 {
    let averages: Vec<f64> = collection
        .days()
        .map(|d| d.daily_confidence_average())
        .collect();

    if averages.len() < 2 {
        return 0.0;
    }

    let third = (averages.len() / 3).max(1);
    let early = mean(&averages[..third]);
    let late = mean(&averages[averages.len() - third..]);

    if early == 0.0 {
        return 0.0;
    }

    (late - early) / early * 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
