//! Data models for the confidence journal.
//!
//! This module contains the core data structures used throughout
//! the application: entries, day records, and the date-keyed collection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Life-domain tag attached to every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Coding, development, technical work
    TechnicalSkills,
    /// Presentations, demos, work interactions
    ProfessionalPresentation,
    /// Personal reflections, self-perception
    SelfImage,
    /// Conversations, relationships, social activities
    SocialInteractions,
    /// Videos, projects, artistic endeavors
    CreativeWork,
    /// Learning, development, insights
    PersonalGrowth,
    /// Health, body, recovery
    PhysicalWellness,
    /// Job search, networking, career moves
    CareerDevelopment,
}

impl Category {
    /// Every category, in canonical order.
    pub const ALL: [Category; 8] = [
        Category::TechnicalSkills,
        Category::ProfessionalPresentation,
        Category::SelfImage,
        Category::SocialInteractions,
        Category::CreativeWork,
        Category::PersonalGrowth,
        Category::PhysicalWellness,
        Category::CareerDevelopment,
    ];

    /// The snake_case tag used in journal files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TechnicalSkills => "technical_skills",
            Category::ProfessionalPresentation => "professional_presentation",
            Category::SelfImage => "self_image",
            Category::SocialInteractions => "social_interactions",
            Category::CreativeWork => "creative_work",
            Category::PersonalGrowth => "personal_growth",
            Category::PhysicalWellness => "physical_wellness",
            Category::CareerDevelopment => "career_development",
        }
    }

    /// Human-readable name (`career_development` -> `Career Development`).
    pub fn display_name(&self) -> String {
        title_case(self.as_str())
    }

    /// Fixed display colour for charts and report tables.
    pub fn color(&self) -> &'static str {
        match self {
            Category::TechnicalSkills => "#3B82F6",
            Category::ProfessionalPresentation => "#8B5CF6",
            Category::SelfImage => "#EC4899",
            Category::SocialInteractions => "#F59E0B",
            Category::CreativeWork => "#10B981",
            Category::PersonalGrowth => "#06B6D4",
            Category::PhysicalWellness => "#EF4444",
            Category::CareerDevelopment => "#6366F1",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Convert a snake_case tag into Title Case words.
pub fn title_case(tag: &str) -> String {
    tag.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The personal/professional axis of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceType {
    Personal,
    Professional,
}

impl ConfidenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceType::Personal => "personal",
            ConfidenceType::Professional => "professional",
        }
    }
}

impl fmt::Display for ConfidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConfidenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(ConfidenceType::Personal),
            "professional" => Ok(ConfidenceType::Professional),
            _ => Err(format!("unknown confidence type '{}'", s)),
        }
    }
}

/// Lowest valid power level.
pub const MIN_POWER_LEVEL: u8 = 1;
/// Highest valid power level.
pub const MAX_POWER_LEVEL: u8 = 10;

/// One recorded confidence moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Free-form description.
    pub text: String,
    /// Life-domain tag.
    pub category: Category,
    /// Personal or professional.
    pub confidence_type: ConfidenceType,
    /// Self-rated intensity, 1-10.
    pub power_level: u8,
}

/// All entries recorded on one calendar date.
///
/// The derived fields are computed in [`DayRecord::new`] and there is no way
/// to mutate `entries` afterwards, so they can never go stale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    #[serde(skip)]
    date: NaiveDate,
    entries: Vec<Entry>,
    daily_confidence_average: f64,
    dominant_confidence_area: ConfidenceType,
}

impl DayRecord {
    /// Build a day record, computing its derived fields.
    ///
    /// Returns `None` when `entries` is empty; a day never exists without entries.
    pub fn new(date: NaiveDate, entries: Vec<Entry>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let daily_confidence_average = mean_power(&entries);
        let dominant_confidence_area = dominant_type(&entries);

        Some(Self {
            date,
            entries,
            daily_confidence_average,
            dominant_confidence_area,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn daily_confidence_average(&self) -> f64 {
        self.daily_confidence_average
    }

    pub fn dominant_confidence_area(&self) -> ConfidenceType {
        self.dominant_confidence_area
    }
}

/// Arithmetic mean of the entries' power levels (0.0 for an empty slice).
pub fn mean_power(entries: &[Entry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let sum: u32 = entries.iter().map(|e| u32::from(e.power_level)).sum();
    f64::from(sum) / entries.len() as f64
}

/// Majority confidence type among `entries`.
///
/// A type must hold strictly more than half of the entries to dominate.
/// Ties, and the empty case, resolve to `Professional`.
pub fn dominant_type(entries: &[Entry]) -> ConfidenceType {
    let personal = entries
        .iter()
        .filter(|e| e.confidence_type == ConfidenceType::Personal)
        .count();

    if personal * 2 > entries.len() {
        ConfidenceType::Personal
    } else {
        ConfidenceType::Professional
    }
}

/// The whole journal: day records keyed by date, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JournalCollection {
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl JournalCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a day record, replacing any record for the same date.
    pub fn insert(&mut self, day: DayRecord) {
        self.days.insert(day.date, day);
    }

    /// Group loose entries by date into a collection.
    ///
    /// Only dates with at least one entry appear.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Entry)>,
    {
        let mut grouped: BTreeMap<NaiveDate, Vec<Entry>> = BTreeMap::new();
        for (date, entry) in entries {
            grouped.entry(date).or_default().push(entry);
        }

        let mut collection = Self::new();
        for (date, entries) in grouped {
            if let Some(day) = DayRecord::new(date, entries) {
                collection.insert(day);
            }
        }
        collection
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&DayRecord> {
        self.days.get(date)
    }

    /// Day records in chronological order.
    pub fn days(&self) -> impl Iterator<Item = &DayRecord> {
        self.days.values()
    }

    /// Every entry paired with its date, chronologically.
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, &Entry)> {
        self.days
            .values()
            .flat_map(|day| day.entries.iter().map(move |e| (day.date, e)))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.days.values().map(|d| d.entries.len()).sum()
    }

    /// First and last recorded date.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.days.keys().next()?;
        let last = self.days.keys().next_back()?;
        Some((*first, *last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(power_level: u8, confidence_type: ConfidenceType) -> Entry {
        Entry {
            text: "Test entry".to_string(),
            category: Category::PersonalGrowth,
            confidence_type,
            power_level,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_category_display_name() {
        assert_eq!(
            Category::CareerDevelopment.display_name(),
            "Career Development"
        );
        assert_eq!(
            Category::ProfessionalPresentation.display_name(),
            "Professional Presentation"
        );
        assert_eq!(title_case("self_image"), "Self Image");
        assert_eq!(title_case("a__b"), "A B");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "technical_skills".parse::<Category>(),
            Ok(Category::TechnicalSkills)
        );
        assert_eq!(
            "Physical Wellness".parse::<Category>(),
            Ok(Category::PhysicalWellness)
        );
        assert!("cooking".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_colors_are_distinct() {
        let mut colors: Vec<_> = Category::ALL.iter().map(|c| c.color()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), Category::ALL.len());
    }

    #[test]
    fn test_confidence_type_from_str() {
        assert_eq!(
            "Personal".parse::<ConfidenceType>(),
            Ok(ConfidenceType::Personal)
        );
        assert!("mixed".parse::<ConfidenceType>().is_err());
    }

    #[test]
    fn test_day_record_derives_fields() {
        let day = DayRecord::new(
            date("2025-01-01"),
            vec![
                entry(8, ConfidenceType::Personal),
                entry(4, ConfidenceType::Professional),
            ],
        )
        .unwrap();

        assert_eq!(day.daily_confidence_average(), 6.0);
        assert_eq!(day.entries().len(), 2);
    }

    #[test]
    fn test_day_record_rejects_empty() {
        assert!(DayRecord::new(date("2025-01-01"), Vec::new()).is_none());
    }

    #[test]
    fn test_dominant_strict_majority() {
        let entries = vec![
            entry(5, ConfidenceType::Personal),
            entry(5, ConfidenceType::Personal),
            entry(5, ConfidenceType::Professional),
        ];
        assert_eq!(dominant_type(&entries), ConfidenceType::Personal);
    }

    #[test]
    fn test_dominant_tie_resolves_to_professional() {
        let entries = vec![
            entry(5, ConfidenceType::Personal),
            entry(5, ConfidenceType::Professional),
        ];
        assert_eq!(dominant_type(&entries), ConfidenceType::Professional);
        assert_eq!(dominant_type(&[]), ConfidenceType::Professional);
    }

    #[test]
    fn test_collection_from_entries_orders_dates() {
        let collection = JournalCollection::from_entries(vec![
            (date("2025-02-01"), entry(3, ConfidenceType::Personal)),
            (date("2025-01-15"), entry(7, ConfidenceType::Personal)),
            (date("2025-02-01"), entry(5, ConfidenceType::Professional)),
        ]);

        let dates: Vec<_> = collection.days().map(|d| d.date()).collect();
        assert_eq!(dates, vec![date("2025-01-15"), date("2025-02-01")]);
        assert_eq!(collection.entry_count(), 3);
        assert_eq!(
            collection.date_range(),
            Some((date("2025-01-15"), date("2025-02-01")))
        );
    }

    #[test]
    fn test_collection_serializes_to_journal_format() {
        let collection = JournalCollection::from_entries(vec![(
            date("2025-01-01"),
            entry(8, ConfidenceType::Personal),
        )]);

        let json = serde_json::to_value(&collection).unwrap();
        let day = &json["2025-01-01"];
        assert_eq!(day["daily_confidence_average"], 8.0);
        assert_eq!(day["dominant_confidence_area"], "personal");
        assert_eq!(day["entries"][0]["category"], "personal_growth");
        assert!(day.get("date").is_none());
    }
}
