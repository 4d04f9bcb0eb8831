use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use solar_dashboard::{
    Country, DashboardConfig, DashboardSnapshot, Dataset, FilterCriteria, Metric, QueryEngine,
};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Unified dataset, shared with the process-wide cache.
    pub dataset: Arc<Dataset>,

    pub config: DashboardConfig,

    /// First and last calendar day present in the dataset.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,

    /// Selected date range, both days inclusive.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub selected_countries: BTreeSet<Country>,

    pub metric: Metric,

    /// Results for the current selection (cached until a filter changes).
    pub snapshot: Option<DashboardSnapshot>,

    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    dirty: bool,
}

impl AppState {
    /// Start with every country, the whole date range and GHI selected.
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        let date_bounds = dataset
            .time_bounds()
            .map(|(start, end)| (start.date(), end.date()));
        let (start_date, end_date) = date_bounds.unwrap_or_default();
        let status_message = date_bounds
            .is_none()
            .then(|| "The loaded dataset contains no observations.".to_string());

        Self {
            selected_countries: dataset.countries(),
            dataset,
            config,
            date_bounds,
            start_date,
            end_date,
            metric: Metric::default(),
            snapshot: None,
            color_map: ColorMap::default(),
            status_message,
            dirty: true,
        }
    }

    /// Criteria for the current selection. The end day is included up to its
    /// last instant.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            start: NaiveDateTime::new(self.start_date, NaiveTime::MIN),
            end: self
                .end_date
                .and_hms_nano_opt(23, 59, 59, 999_999_999)
                .unwrap_or_else(|| NaiveDateTime::new(self.end_date, NaiveTime::MIN)),
            countries: self.selected_countries.clone(),
            metric: self.metric,
        }
    }

    /// Recompute the snapshot if a filter changed since the last call.
    pub fn refresh_if_needed(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        if self.date_bounds.is_none() {
            self.snapshot = None;
            return;
        }
        let engine = QueryEngine::new(&self.dataset, &self.config);
        let snapshot = engine.evaluate(&self.criteria());
        log::debug!(
            "Refreshed dashboard: {} visible rows, {} sampled",
            snapshot.view.len(),
            snapshot.sample.len()
        );
        self.snapshot = Some(snapshot);
    }

    /// Number of rows passing the current filters.
    pub fn visible_rows(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.view.len())
    }

    /// Set the date range, clamped to the dataset bounds.
    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        let (lo, hi) = match self.date_bounds {
            Some(bounds) => bounds,
            None => return,
        };
        let start = start.clamp(lo, hi);
        let end = end.clamp(lo, hi);
        if (start, end) != (self.start_date, self.end_date) {
            self.start_date = start;
            self.end_date = end;
            self.status_message = (start > end)
                .then(|| "Start date is after end date; nothing is selected.".to_string());
            self.dirty = true;
        }
    }

    pub fn set_metric(&mut self, metric: Metric) {
        if self.metric != metric {
            self.metric = metric;
            self.dirty = true;
        }
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: Country) {
        if !self.selected_countries.remove(&country) {
            self.selected_countries.insert(country);
        }
        self.dirty = true;
    }

    /// Select every country present in the dataset.
    pub fn select_all(&mut self) {
        self.selected_countries = self.dataset.countries();
        self.dirty = true;
    }

    /// Deselect all countries.
    pub fn select_none(&mut self) {
        self.selected_countries.clear();
        self.dirty = true;
    }
}
