//! Descriptive insights over a journal collection.
//!
//! These go beyond the dashboard rollups: distribution shape, weekday and
//! weekly patterns, streaks, categories that need attention, keywords from
//! high-confidence moments, and plain-language recommendations.

use crate::config::AnalysisConfig;
use crate::models::{Category, ConfidenceType, JournalCollection};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// Words ignored when extracting keywords.
const STOP_WORDS: &[&str] = &[
    "the", "and", "to", "of", "in", "a", "my", "i", "with", "for", "on", "at", "about",
];

/// Count and mean power for one confidence type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub confidence_type: ConfidenceType,
    pub count: usize,
    /// None when the type has no entries.
    pub average_power: Option<f64>,
}

/// Shape of the power-level distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerDistribution {
    pub median: Option<f64>,
    /// Sample standard deviation; needs at least two entries.
    pub std_dev: Option<f64>,
    /// Most frequent level (lowest level wins ties).
    pub mode: Option<u8>,
    pub by_type: Vec<TypeBreakdown>,
}

/// Mean power for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayStats {
    pub weekday: Weekday,
    pub average_power: f64,
    pub count: usize,
}

/// Week-over-week movement of the mean power level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// Weeks whose mean rose compared to the previous recorded week.
    pub improving_weeks: usize,
    /// Weeks whose mean fell compared to the previous recorded week.
    pub declining_weeks: usize,
    pub first_week_average: Option<f64>,
    pub last_week_average: Option<f64>,
}

/// A date paired with that day's mean power level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAverage {
    pub date: NaiveDate,
    pub average: f64,
}

/// High and low confidence runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub longest_high_streak: Vec<DayAverage>,
    pub total_high_streak_days: usize,
    pub low_confidence_days: usize,
}

/// Weekday, weekly and streak patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalPatterns {
    pub by_weekday: Vec<WeekdayStats>,
    pub weekly_trend: WeeklyTrend,
    pub streaks: StreakSummary,
}

/// Direction of a category's most recent entries relative to its overall mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecentTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl fmt::Display for RecentTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecentTrend::Improving => write!(f, "Improving"),
            RecentTrend::Declining => write!(f, "Declining"),
            RecentTrend::Stable => write!(f, "Stable"),
            RecentTrend::InsufficientData => write!(f, "Insufficient data"),
        }
    }
}

/// A category ranked by how much attention it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementArea {
    pub category: Category,
    pub average_power: f64,
    pub frequency: usize,
    /// Share of entries at or below the low-score level, 0-1.
    pub low_score_ratio: f64,
    pub recent_trend: RecentTrend,
    /// Higher means more attention needed.
    pub priority_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
}

/// Observations about entry text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInsights {
    pub high_confidence_keywords: Vec<Keyword>,
    /// Mean entry length in characters.
    pub average_entry_length: f64,
    pub longest_entry: String,
    pub shortest_entry: String,
}

/// One point of the daily time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub average_power: f64,
    pub entry_count: usize,
    /// Trailing mean over the configured window; None until the window fills.
    pub moving_average: Option<f64>,
}

/// How much of the covered period has entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingMetadata {
    pub days_tracked: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Days tracked as a percentage of calendar days in the range.
    pub data_completeness: f64,
}

/// Everything the report needs beyond the dashboard rollups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub distribution: PowerDistribution,
    pub temporal: TemporalPatterns,
    pub improvement_areas: Vec<ImprovementArea>,
    pub text: Option<TextInsights>,
    pub daily_series: Vec<DailyPoint>,
    pub tracking: Option<TrackingMetadata>,
    pub recommendations: Vec<String>,
}

/// Compute every insight for a collection.
pub fn compute_insights(collection: &JournalCollection, config: &AnalysisConfig) -> Insights {
    debug!("Computing insights over {} days", collection.len());

    let distribution = compute_power_distribution(collection);
    let temporal = TemporalPatterns {
        by_weekday: compute_weekday_stats(collection),
        weekly_trend: compute_weekly_trend(collection),
        streaks: find_streaks(collection, config),
    };
    let improvement_areas = compute_improvement_areas(collection, config);
    let recommendations = generate_recommendations(&distribution, &temporal, &improvement_areas);

    Insights {
        distribution,
        temporal,
        improvement_areas,
        text: compute_text_insights(collection, config),
        daily_series: compute_daily_series(collection, config.moving_average_window),
        tracking: compute_tracking_metadata(collection),
        recommendations,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Median, spread, mode and per-type breakdown of power levels.
pub fn compute_power_distribution(collection: &JournalCollection) -> PowerDistribution {
    let mut levels: Vec<u8> = collection.entries().map(|(_, e)| e.power_level).collect();
    levels.sort_unstable();

    let n = levels.len();
    let median = match n {
        0 => None,
        _ if n % 2 == 1 => Some(f64::from(levels[n / 2])),
        _ => Some((f64::from(levels[n / 2 - 1]) + f64::from(levels[n / 2])) / 2.0),
    };

    let std_dev = if n < 2 {
        None
    } else {
        let avg = levels.iter().map(|&l| f64::from(l)).sum::<f64>() / n as f64;
        let variance = levels
            .iter()
            .map(|&l| (f64::from(l) - avg).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        Some(variance.sqrt())
    };

    // levels is sorted, so the first run with the top count is the lowest level
    let mut mode: Option<(u8, usize)> = None;
    for chunk in levels.chunk_by(|a, b| a == b) {
        if mode.map_or(true, |(_, best)| chunk.len() > best) {
            mode = Some((chunk[0], chunk.len()));
        }
    }

    let by_type = [ConfidenceType::Personal, ConfidenceType::Professional]
        .into_iter()
        .map(|confidence_type| {
            let values: Vec<f64> = collection
                .entries()
                .filter(|(_, e)| e.confidence_type == confidence_type)
                .map(|(_, e)| f64::from(e.power_level))
                .collect();
            TypeBreakdown {
                confidence_type,
                count: values.len(),
                average_power: mean(&values),
            }
        })
        .collect();

    PowerDistribution {
        median,
        std_dev,
        mode: mode.map(|(level, _)| level),
        by_type,
    }
}

/// Mean power per weekday, Monday first; weekdays with no entries are omitted.
pub fn compute_weekday_stats(collection: &JournalCollection) -> Vec<WeekdayStats> {
    let mut buckets: [(u64, usize); 7] = [(0, 0); 7];

    for (date, entry) in collection.entries() {
        let slot = &mut buckets[date.weekday().num_days_from_monday() as usize];
        slot.0 += u64::from(entry.power_level);
        slot.1 += 1;
    }

    let mut weekday = Weekday::Mon;
    let mut stats = Vec::new();
    for (sum, count) in buckets {
        if count > 0 {
            stats.push(WeekdayStats {
                weekday,
                average_power: sum as f64 / count as f64,
                count,
            });
        }
        weekday = weekday.succ();
    }

    stats
}

/// Count rising and falling weeks, grouping entries by ISO week.
pub fn compute_weekly_trend(collection: &JournalCollection) -> WeeklyTrend {
    let mut weeks: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for (date, entry) in collection.entries() {
        let iso = date.iso_week();
        weeks
            .entry((iso.year(), iso.week()))
            .or_default()
            .push(f64::from(entry.power_level));
    }

    let averages: Vec<f64> = weeks.values().filter_map(|v| mean(v)).collect();

    let mut trend = WeeklyTrend {
        first_week_average: averages.first().copied(),
        last_week_average: averages.last().copied(),
        ..WeeklyTrend::default()
    };

    for pair in averages.windows(2) {
        if pair[1] > pair[0] {
            trend.improving_weeks += 1;
        } else if pair[1] < pair[0] {
            trend.declining_weeks += 1;
        }
    }

    trend
}

/// Find runs of consecutive recorded days at or above the high threshold.
pub fn find_streaks(collection: &JournalCollection, config: &AnalysisConfig) -> StreakSummary {
    let mut streaks: Vec<Vec<DayAverage>> = Vec::new();
    let mut current: Vec<DayAverage> = Vec::new();
    let mut low_confidence_days = 0;

    for day in collection.days() {
        let average = day.daily_confidence_average();

        if average <= config.low_confidence_threshold {
            low_confidence_days += 1;
        }

        if average >= config.high_streak_threshold {
            current.push(DayAverage {
                date: day.date(),
                average,
            });
        } else if !current.is_empty() {
            streaks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        streaks.push(current);
    }

    streaks.retain(|s| s.len() >= config.min_streak_days);

    let total_high_streak_days = streaks.iter().map(Vec::len).sum();

    // first streak wins ties
    let mut longest: Vec<DayAverage> = Vec::new();
    for streak in streaks {
        if streak.len() > longest.len() {
            longest = streak;
        }
    }

    StreakSummary {
        longest_high_streak: longest,
        total_high_streak_days,
        low_confidence_days,
    }
}

/// Rank present categories by how much attention they need, highest priority first.
pub fn compute_improvement_areas(
    collection: &JournalCollection,
    config: &AnalysisConfig,
) -> Vec<ImprovementArea> {
    // (date, level) per category in chronological order, categories in encounter order
    let mut order: Vec<Category> = Vec::new();
    let mut by_category: HashMap<Category, Vec<(NaiveDate, u8)>> = HashMap::new();
    for (date, entry) in collection.entries() {
        by_category
            .entry(entry.category)
            .or_insert_with(|| {
                order.push(entry.category);
                Vec::new()
            })
            .push((date, entry.power_level));
    }

    let mut areas: Vec<ImprovementArea> = order
        .into_iter()
        .filter_map(|category| {
            let samples = by_category.get(&category)?;
            let frequency = samples.len();
            let levels: Vec<f64> = samples.iter().map(|(_, l)| f64::from(*l)).collect();
            let average_power = mean(&levels)?;
            let low = samples
                .iter()
                .filter(|(_, l)| *l <= config.low_score_level)
                .count();
            let low_score_ratio = low as f64 / frequency as f64;

            let priority_score = (10.0 - average_power) * 0.4
                + low_score_ratio * 10.0 * 0.3
                + (1.0 / (frequency as f64 + 1.0)) * 10.0 * 0.3;

            Some(ImprovementArea {
                category,
                average_power,
                frequency,
                low_score_ratio,
                recent_trend: recent_trend(samples, average_power),
                priority_score,
            })
        })
        .collect();

    areas.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    areas
}

/// Compare the mean of the latest ~30% of samples (by date) to the overall mean.
///
/// `samples` must be in chronological order.
fn recent_trend(samples: &[(NaiveDate, u8)], overall: f64) -> RecentTrend {
    if samples.len() < 2 {
        return RecentTrend::InsufficientData;
    }

    // linear-interpolated 0.7 quantile of the sample dates
    let days: Vec<f64> = samples
        .iter()
        .map(|(d, _)| f64::from(d.num_days_from_ce()))
        .collect();
    let position = 0.7 * (days.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let cutoff = days[lower] + (days[upper] - days[lower]) * (position - lower as f64);

    let recent: Vec<f64> = samples
        .iter()
        .zip(&days)
        .filter(|(_, day)| **day >= cutoff)
        .map(|((_, level), _)| f64::from(*level))
        .collect();

    let Some(recent_avg) = mean(&recent) else {
        return RecentTrend::InsufficientData;
    };

    if recent_avg > overall * 1.1 {
        RecentTrend::Improving
    } else if recent_avg < overall * 0.9 {
        RecentTrend::Declining
    } else {
        RecentTrend::Stable
    }
}

/// Keywords of high-confidence entries and entry length extremes.
///
/// Returns `None` for an empty collection.
pub fn compute_text_insights(
    collection: &JournalCollection,
    config: &AnalysisConfig,
) -> Option<TextInsights> {
    if collection.is_empty() {
        return None;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for (_, entry) in collection.entries() {
        if entry.power_level < config.high_confidence_level {
            continue;
        }
        for word in entry.text.to_lowercase().split_whitespace() {
            if word.chars().count() <= 3 || STOP_WORDS.contains(&word) {
                continue;
            }
            let count = counts.entry(word.to_string()).or_insert_with(|| {
                first_seen.push(word.to_string());
                0
            });
            *count += 1;
        }
    }

    let mut keywords: Vec<Keyword> = first_seen
        .into_iter()
        .map(|word| Keyword {
            count: counts.get(&word).copied().unwrap_or(0),
            word,
        })
        .collect();
    // stable, so equal counts keep first-seen order
    keywords.sort_by_key(|k| std::cmp::Reverse(k.count));
    keywords.truncate(config.top_keywords);

    let mut longest: Option<&str> = None;
    let mut shortest: Option<&str> = None;
    let mut total_chars = 0usize;
    let mut count = 0usize;

    for (_, entry) in collection.entries() {
        let len = entry.text.chars().count();
        total_chars += len;
        count += 1;
        if longest.map_or(true, |l| len > l.chars().count()) {
            longest = Some(entry.text.as_str());
        }
        if shortest.map_or(true, |s| len < s.chars().count()) {
            shortest = Some(entry.text.as_str());
        }
    }

    Some(TextInsights {
        high_confidence_keywords: keywords,
        average_entry_length: total_chars as f64 / count as f64,
        longest_entry: longest?.to_string(),
        shortest_entry: shortest?.to_string(),
    })
}

/// Per-day averages with a trailing moving average over `window` recorded days.
pub fn compute_daily_series(collection: &JournalCollection, window: usize) -> Vec<DailyPoint> {
    let window = window.max(1);
    let averages: Vec<f64> = collection
        .days()
        .map(|d| d.daily_confidence_average())
        .collect();

    collection
        .days()
        .enumerate()
        .map(|(i, day)| {
            let moving_average = if i + 1 < window {
                None
            } else {
                mean(&averages[i + 1 - window..=i])
            };
            DailyPoint {
                date: day.date(),
                average_power: day.daily_confidence_average(),
                entry_count: day.entries().len(),
                moving_average,
            }
        })
        .collect()
}

/// Days tracked, date range and completeness. `None` for an empty collection.
pub fn compute_tracking_metadata(collection: &JournalCollection) -> Option<TrackingMetadata> {
    let (first_date, last_date) = collection.date_range()?;
    let span = (last_date - first_date).num_days() + 1;
    let days_tracked = collection.len();

    Some(TrackingMetadata {
        days_tracked,
        first_date,
        last_date,
        data_completeness: days_tracked as f64 / span as f64 * 100.0,
    })
}

/// Plain-language suggestions derived from the other insights.
pub fn generate_recommendations(
    distribution: &PowerDistribution,
    temporal: &TemporalPatterns,
    improvement_areas: &[ImprovementArea],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    let weekly = &temporal.weekly_trend;
    if let (Some(first), Some(last)) = (weekly.first_week_average, weekly.last_week_average) {
        if weekly.improving_weeks + weekly.declining_weeks > 0 && last < first {
            recommendations.push(
                "Confidence has been trending downward. Revisit the activities from your peak days."
                    .to_string(),
            );
        }
    }

    if let Some(top) = improvement_areas.first() {
        recommendations.push(format!(
            "Focus on '{}': it has the highest priority for growth.",
            top.category.display_name()
        ));
    }

    let count_of = |t: ConfidenceType| {
        distribution
            .by_type
            .iter()
            .find(|b| b.confidence_type == t)
            .map_or(0, |b| b.count)
    };
    let personal = count_of(ConfidenceType::Personal) as f64;
    let professional = count_of(ConfidenceType::Professional) as f64;
    if personal < professional * 0.5 {
        recommendations.push(
            "Most entries are professional. Balance them with more personal development."
                .to_string(),
        );
    } else if professional < personal * 0.5 {
        recommendations.push(
            "Personal confidence is strong. Consider bringing that energy to professional challenges."
                .to_string(),
        );
    }

    let best = temporal.by_weekday.iter().fold(None::<&WeekdayStats>, |acc, s| match acc {
        Some(b) if b.average_power >= s.average_power => Some(b),
        _ => Some(s),
    });
    let worst = temporal.by_weekday.iter().fold(None::<&WeekdayStats>, |acc, s| match acc {
        Some(w) if w.average_power <= s.average_power => Some(w),
        _ => Some(s),
    });
    if let Some(best) = best {
        recommendations.push(format!(
            "You feel most confident on {}s. Schedule important activities then.",
            weekday_name(best.weekday)
        ));
    }
    if let Some(worst) = worst {
        recommendations.push(format!(
            "Confidence tends to dip on {}s. Plan supportive activities for those days.",
            weekday_name(worst.weekday)
        ));
    }

    recommendations
}

/// Full English weekday name.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
