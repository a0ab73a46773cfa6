//! Dashboard state and the panels that render it.
//!
//! [`DashboardState`] owns the loaded snapshot and every input of the
//! filter/sort pipeline. Each mutation re-runs [`engine::derive`] so the
//! visible view and its statistics can never drift from the data.

pub mod charts;
pub mod context;
pub mod detail;
pub mod engine;
pub mod export;
pub mod filters;
pub mod import;
pub mod load;
pub mod summary;
pub mod table;
pub mod verify;

use std::collections::HashSet;

use crate::core::collections::unique_sorted;
use crate::core::config::AppConfig;
use crate::core::timing::Stopwatch;
use crate::records::{AmbitoRecord, RecordId};
use engine::{Derived, FilterField, Filters, SortConfig, SortDirection, SortKey, SummaryStats};

/// Region and province choices for the filter selects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptions {
    pub regioni: Vec<String>,
    pub province: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    records: Vec<AmbitoRecord>,
    derived: Derived,
    filters: Filters,
    sort: SortConfig,
    expanded: HashSet<RecordId>,
    pending_loads: usize,
    log_timings: bool,
}

impl DashboardState {
    /// Empty state with the configured default sort.
    pub fn new(config: &AppConfig) -> Self {
        let default_sort = &config.data.default_sort;
        let key = default_sort.key.as_deref().and_then(|raw| {
            raw.parse::<SortKey>()
                .map_err(|err| tracing::warn!("Ignoring default sort: {err}"))
                .ok()
        });
        let direction = default_sort
            .direction
            .parse::<SortDirection>()
            .unwrap_or_default();

        Self {
            sort: SortConfig { key, direction },
            log_timings: config.development.show_performance_metrics,
            ..Self::default()
        }
    }

    /// Replaces the snapshot wholesale. Expansion state does not carry over.
    pub fn set_data(&mut self, records: Vec<AmbitoRecord>) {
        tracing::info!("Loaded {} ambiti", records.len());
        self.records = records;
        self.expanded.clear();
        self.refresh();
    }

    pub fn records(&self) -> &[AmbitoRecord] {
        &self.records
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    /// Visible records in display order.
    pub fn filtered(&self) -> impl Iterator<Item = &AmbitoRecord> + '_ {
        self.derived
            .view
            .iter()
            .map(move |&position| &self.records[position])
    }

    pub fn filtered_len(&self) -> usize {
        self.derived.view.len()
    }

    pub fn stats(&self) -> SummaryStats {
        self.derived.stats
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.filters.set(field, value);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
        self.refresh();
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.click(key);
        self.refresh();
    }

    pub fn is_expanded(&self, id: RecordId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Flips one row; returns whether it is now expanded.
    pub fn toggle_row(&mut self, id: RecordId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    pub fn expand_all(&mut self) {
        let ids: Vec<RecordId> = self.filtered().map(|record| record.id).collect();
        self.expanded.extend(ids);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    /// Loads may overlap; the flag stays up until the last one finishes.
    pub fn begin_load(&mut self) {
        self.pending_loads += 1;
    }

    pub fn finish_load(&mut self) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
    }

    /// Options computed over the full dataset so a filter never hides its own choices.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            regioni: unique_sorted(self.records.iter().filter_map(|r| r.regione.as_deref())),
            province: unique_sorted(self.records.iter().filter_map(AmbitoRecord::provincia_any)),
        }
    }

    fn refresh(&mut self) {
        let stopwatch = Stopwatch::start();
        self.derived = engine::derive(&self.records, &self.filters, &self.sort);
        if self.log_timings {
            tracing::debug!(
                "Filter pipeline: {} of {} records in {:.2}ms",
                self.derived.view.len(),
                self.records.len(),
                stopwatch.elapsed_ms()
            );
        }
    }
}
