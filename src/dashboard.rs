//! Dashboard state: the loaded journal, the active filter, and cached views.
//!
//! All derived views are recomputed from the immutable source collection
//! whenever the filter changes; nothing else invalidates them.

use crate::analysis::{
    compute_category_stats, compute_growth_trend, compute_overall_stats,
    compute_power_level_histogram, filter_entries, CategoryStats, EntryFilter, OverallStats,
    HISTOGRAM_BUCKETS,
};
use crate::models::{DayRecord, JournalCollection};
use chrono::NaiveDate;
use tracing::debug;

/// Views derived from the filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedViews {
    /// The source collection after applying the active filter.
    pub collection: JournalCollection,
    pub overall: OverallStats,
    pub categories: Vec<CategoryStats>,
    pub histogram: [usize; HISTOGRAM_BUCKETS],
    pub growth_trend: f64,
}

impl DerivedViews {
    /// Compute every view for `source` under `filter`.
    pub fn compute(source: &JournalCollection, filter: &EntryFilter) -> Self {
        let collection = filter_entries(source, filter);

        Self {
            overall: compute_overall_stats(&collection),
            categories: compute_category_stats(&collection),
            histogram: compute_power_level_histogram(&collection),
            growth_trend: compute_growth_trend(&collection),
            collection,
        }
    }
}

/// Explicit context passed to every query, replacing module-level state.
pub struct Dashboard {
    source: JournalCollection,
    filter: EntryFilter,
    cache: Option<DerivedViews>,
}

impl Dashboard {
    /// Create a dashboard over a loaded collection with no filter applied.
    pub fn new(source: JournalCollection) -> Self {
        Self {
            source,
            filter: EntryFilter::default(),
            cache: None,
        }
    }

    /// The unfiltered collection.
    pub fn source(&self) -> &JournalCollection {
        &self.source
    }

    pub fn filter(&self) -> &EntryFilter {
        &self.filter
    }

    /// Replace the active filter, dropping cached views if it changed.
    pub fn set_filter(&mut self, filter: EntryFilter) {
        if filter == self.filter {
            return;
        }
        debug!("Filter changed to: {}", filter);
        self.filter = filter;
        self.cache = None;
    }

    #[cfg(test)]
    fn clear_filter(&mut self) {
        self.set_filter(EntryFilter::default());
    }

    /// Views for the active filter, computed on first use.
    pub fn views(&mut self) -> &DerivedViews {
        let source = &self.source;
        let filter = &self.filter;
        self.cache
            .get_or_insert_with(|| DerivedViews::compute(source, filter))
    }

    /// Detail view of one day under the active filter.
    pub fn day(&mut self, date: &NaiveDate) -> Option<&DayRecord> {
        self.views().collection.get(date)
    }

    #[cfg(test)]
    fn is_cached(&self) -> bool {
        self.cache.is_some()
    }
}
