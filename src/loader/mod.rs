//! Journal loader: the typed parse-and-validate boundary.
//!
//! This module turns the JSON journal file into a [`JournalCollection`],
//! rejecting or dropping records whose category, confidence type, power
//! level or date key is not valid.

use crate::error::LoadError;
use crate::models::{
    Category, ConfidenceType, DayRecord, Entry, JournalCollection, MAX_POWER_LEVEL,
    MIN_POWER_LEVEL,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Options controlling how invalid records are handled.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Abort on the first invalid record instead of skipping it.
    pub strict: bool,
}

impl From<&crate::config::LoaderConfig> for LoadOptions {
    fn from(config: &crate::config::LoaderConfig) -> Self {
        Self {
            strict: config.strict,
        }
    }
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// The validated collection.
    pub collection: JournalCollection,
    /// Entries dropped because they failed validation.
    pub skipped_entries: usize,
    /// Days dropped because of a bad date key or no valid entries.
    pub skipped_days: usize,
}

/// A day as stored on disk. The derived fields are advisory only.
///
/// Entries stay untyped so that one malformed entry can be skipped
/// without losing the rest of the file.
#[derive(Debug, Deserialize)]
struct RawDay {
    #[serde(default)]
    entries: Vec<Value>,
    #[serde(default)]
    daily_confidence_average: Option<f64>,
    #[serde(default)]
    dominant_confidence_area: Option<String>,
}

/// Loader for journal files.
pub struct JournalLoader {
    options: LoadOptions,
}

impl JournalLoader {
    /// Create a new loader.
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Read and validate a journal file.
    pub fn load_file(&self, path: &Path) -> Result<LoadOutcome, LoadError> {
        info!("Loading journal: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_str(&content)
    }

    /// Parse and validate journal JSON.
    pub fn load_str(&self, json: &str) -> Result<LoadOutcome, LoadError> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(json)?;

        let mut collection = JournalCollection::new();
        let mut skipped_entries = 0;
        let mut skipped_days = 0;

        for (key, value) in raw {
            let date = match NaiveDate::parse_from_str(&key, "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => {
                    let err = LoadError::InvalidDate(key);
                    if self.options.strict {
                        return Err(err);
                    }
                    warn!("Skipping day: {}", err);
                    skipped_days += 1;
                    skipped_entries += value
                        .get("entries")
                        .and_then(Value::as_array)
                        .map_or(0, Vec::len);
                    continue;
                }
            };

            let raw_day: RawDay = match serde_json::from_value(value) {
                Ok(day) => day,
                Err(source) => {
                    let err = LoadError::MalformedDay {
                        date: key,
                        reason: source.to_string(),
                    };
                    if self.options.strict {
                        return Err(err);
                    }
                    warn!("Skipping day: {}", err);
                    skipped_days += 1;
                    continue;
                }
            };

            let mut entries = Vec::with_capacity(raw_day.entries.len());
            for raw_entry in raw_day.entries.into_iter() {
                match validate_entry(&key, raw_entry) {
                    Ok(entry) => entries.push(entry),
                    Err(err) if self.options.strict => return Err(err),
                    Err(err) => {
                        warn!("Skipping entry: {}", err);
                        skipped_entries += 1;
                    }
                }
            }

            let Some(day) = DayRecord::new(date, entries) else {
                debug!("Dropping {}: no valid entries", key);
                skipped_days += 1;
                continue;
            };

            check_stored_fields(
                &key,
                &day,
                raw_day.daily_confidence_average,
                raw_day.dominant_confidence_area.as_deref(),
            );
            collection.insert(day);
        }

        info!(
            "Loaded {} days ({} entries)",
            collection.len(),
            collection.entry_count()
        );
        if skipped_entries > 0 || skipped_days > 0 {
            warn!(
                "Skipped {} invalid entries and {} days",
                skipped_entries, skipped_days
            );
        }

        Ok(LoadOutcome {
            collection,
            skipped_entries,
            skipped_days,
        })
    }
}

/// Convert a raw entry into a typed one.
fn validate_entry(date: &str, raw: Value) -> Result<Entry, LoadError> {
    let malformed = |reason: String| LoadError::MalformedEntry {
        date: date.to_string(),
        reason,
    };

    let mut fields = match raw {
        Value::Object(fields) => fields,
        other => return Err(malformed(format!("expected an object, found {}", other))),
    };

    let text = match fields.remove("text") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => return Err(malformed(format!("text {} is not a string", other))),
    };

    let category = required_str(&mut fields, "category").map_err(&malformed)?;
    let category: Category = category
        .parse()
        .map_err(|_| LoadError::UnknownCategory {
            date: date.to_string(),
            value: category.clone(),
        })?;

    let confidence_type = required_str(&mut fields, "confidence_type").map_err(&malformed)?;
    let confidence_type: ConfidenceType =
        confidence_type
            .parse()
            .map_err(|_| LoadError::UnknownConfidenceType {
                date: date.to_string(),
                value: confidence_type.clone(),
            })?;

    let power_level = match fields.remove("power_level") {
        None | Some(Value::Null) => return Err(malformed("missing field power_level".into())),
        Some(value) => value.as_i64().ok_or_else(|| {
            malformed(format!("power_level {} is not a whole number", value))
        })?,
    };

    let range = i64::from(MIN_POWER_LEVEL)..=i64::from(MAX_POWER_LEVEL);
    if !range.contains(&power_level) {
        return Err(LoadError::PowerLevelOutOfRange {
            date: date.to_string(),
            value: power_level,
        });
    }

    Ok(Entry {
        text,
        category,
        confidence_type,
        // Range checked above.
        power_level: power_level as u8,
    })
}

/// Take a required string field out of an entry object.
fn required_str(fields: &mut Map<String, Value>, name: &str) -> Result<String, String> {
    match fields.remove(name) {
        Some(Value::String(value)) => Ok(value),
        None | Some(Value::Null) => Err(format!("missing field {}", name)),
        Some(other) => Err(format!("{} {} is not a string", name, other)),
    }
}

/// Log when the file's stored derived fields disagree with the recomputed ones.
fn check_stored_fields(
    key: &str,
    day: &DayRecord,
    stored_average: Option<f64>,
    stored_dominant: Option<&str>,
) {
    if let Some(avg) = stored_average {
        if (avg - day.daily_confidence_average()).abs() > 0.01 {
            debug!(
                "{}: stored average {} differs from computed {:.2}",
                key,
                avg,
                day.daily_confidence_average()
            );
        }
    }

    if let Some(dominant) = stored_dominant {
        if !dominant.eq_ignore_ascii_case(day.dominant_confidence_area().as_str()) {
            debug!(
                "{}: stored dominant area '{}' differs from computed '{}'",
                key,
                dominant,
                day.dominant_confidence_area()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = include_str!("../../fixtures/journal.json");

    fn lenient() -> JournalLoader {
        JournalLoader::new(LoadOptions { strict: false })
    }

    fn strict() -> JournalLoader {
        JournalLoader::new(LoadOptions { strict: true })
    }

    #[test]
    fn test_load_fixture() {
        let outcome = strict().load_str(FIXTURE).unwrap();
        assert_eq!(outcome.skipped_entries, 0);
        assert_eq!(outcome.skipped_days, 0);
        assert_eq!(outcome.collection.len(), 10);
        assert!(outcome.collection.entry_count() > 10);
    }

    #[test]
    fn test_recomputes_stored_fields() {
        let json = r#"{
            "2025-01-01": {
                "entries": [
                    {"text": "Shipped", "category": "technical_skills", "confidence_type": "professional", "power_level": 8},
                    {"text": "Ran", "category": "physical_wellness", "confidence_type": "personal", "power_level": 4}
                ],
                "daily_confidence_average": 9.5,
                "dominant_confidence_area": "personal"
            }
        }"#;

        let outcome = lenient().load_str(json).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let day = outcome.collection.get(&date).unwrap();
        assert_eq!(day.daily_confidence_average(), 6.0);
        assert_eq!(day.dominant_confidence_area(), ConfidenceType::Professional);
    }

    #[test]
    fn test_lenient_skips_invalid_entries() {
        let json = r#"{
            "2025-01-01": {
                "entries": [
                    {"text": "ok", "category": "self_image", "confidence_type": "personal", "power_level": 7},
                    {"text": "too high", "category": "self_image", "confidence_type": "personal", "power_level": 11},
                    {"text": "bad cat", "category": "cooking", "confidence_type": "personal", "power_level": 5},
                    {"text": "bad type", "category": "self_image", "confidence_type": "mixed", "power_level": 5}
                ]
            },
            "2025-01-02": {
                "entries": [
                    {"text": "zero", "category": "self_image", "confidence_type": "personal", "power_level": 0}
                ]
            },
            "January 3": {
                "entries": [
                    {"text": "bad date", "category": "self_image", "confidence_type": "personal", "power_level": 5}
                ]
            }
        }"#;

        let outcome = lenient().load_str(json).unwrap();
        assert_eq!(outcome.collection.len(), 1);
        assert_eq!(outcome.collection.entry_count(), 1);
        assert_eq!(outcome.skipped_entries, 5);
        assert_eq!(outcome.skipped_days, 2);
    }

    #[test]
    fn test_strict_rejects_out_of_range() {
        let json = r#"{"2025-01-01": {"entries": [
            {"text": "x", "category": "self_image", "confidence_type": "personal", "power_level": 12}
        ]}}"#;

        let err = strict().load_str(json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::PowerLevelOutOfRange { value: 12, .. }
        ));
    }

    #[test]
    fn test_strict_rejects_unknown_category() {
        let json = r#"{"2025-01-01": {"entries": [
            {"text": "x", "category": "cooking", "confidence_type": "personal", "power_level": 5}
        ]}}"#;

        let err = strict().load_str(json).unwrap_err();
        assert!(matches!(err, LoadError::UnknownCategory { .. }));
    }

    #[test]
    fn test_strict_rejects_bad_date() {
        let json = r#"{"2025-13-01": {"entries": []}}"#;
        assert!(matches!(
            strict().load_str(json),
            Err(LoadError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_empty_day_dropped() {
        let json = r#"{"2025-01-01": {"entries": [], "daily_confidence_average": 0}}"#;
        let outcome = strict().load_str(json).unwrap();
        assert!(outcome.collection.is_empty());
        assert_eq!(outcome.skipped_days, 1);
    }

    #[test]
    fn test_lenient_skips_malformed_entries() {
        let json = r#"{
            "2025-01-01": {"entries": [
                {"text": "ok", "category": "self_image", "confidence_type": "personal", "power_level": 7},
                {"text": "fractional", "category": "self_image", "confidence_type": "personal", "power_level": 7.5},
                {"text": "quoted", "category": "self_image", "confidence_type": "personal", "power_level": "8"},
                {"text": "no category", "confidence_type": "personal", "power_level": 6},
                {"text": "no type", "category": "self_image", "power_level": 6},
                "just a string"
            ]},
            "2025-01-02": {"entries": "not a list"}
        }"#;

        let outcome = lenient().load_str(json).unwrap();
        assert_eq!(outcome.collection.len(), 1);
        assert_eq!(outcome.collection.entry_count(), 1);
        assert_eq!(outcome.skipped_entries, 5);
        assert_eq!(outcome.skipped_days, 1);

        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let day = outcome.collection.get(&date).unwrap();
        assert_eq!(day.entries()[0].text, "ok");
    }

    #[test]
    fn test_strict_rejects_malformed_entry() {
        let json = r#"{"2025-01-01": {"entries": [
            {"text": "ok", "category": "self_image", "confidence_type": "personal", "power_level": 7},
            {"text": "fractional", "category": "self_image", "confidence_type": "personal", "power_level": 7.5}
        ]}}"#;

        let err = strict().load_str(json).unwrap_err();
        assert!(matches!(err, LoadError::MalformedEntry { .. }));
        assert!(err.to_string().contains("7.5"));

        let json = r#"{"2025-01-01": {"entries": [
            {"text": "x", "confidence_type": "personal", "power_level": 5}
        ]}}"#;
        let err = strict().load_str(json).unwrap_err();
        assert!(err.to_string().contains("missing field category"));
    }

    #[test]
    fn test_strict_rejects_malformed_day() {
        let json = r#"{"2025-01-01": {"entries": 3}}"#;
        assert!(matches!(
            strict().load_str(json),
            Err(LoadError::MalformedDay { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            lenient().load_str("[1, 2, 3]"),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let outcome = lenient().load_file(file.path()).unwrap();
        assert_eq!(outcome.collection.len(), 10);
    }

    #[test]
    fn test_load_missing_file() {
        let err = lenient()
            .load_file(Path::new("/nonexistent/journal.json"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
