use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use super::error::DataError;
use super::model::{Country, Dataset, Metric};

// ---------------------------------------------------------------------------
// Filter criteria: what the user currently has selected
// ---------------------------------------------------------------------------

/// Date range, country set and metric for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive lower bound.
    pub start: NaiveDateTime,
    /// Inclusive upper bound.
    pub end: NaiveDateTime,
    /// Empty set selects nothing.
    pub countries: BTreeSet<Country>,
    pub metric: Metric,
}

impl FilterCriteria {
    /// Build criteria from a metric name, rejecting anything but GHI/DNI/DHI.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        countries: impl IntoIterator<Item = Country>,
        metric: &str,
    ) -> Result<Self, DataError> {
        Ok(Self {
            start,
            end,
            countries: countries.into_iter().collect(),
            metric: metric.parse()?,
        })
    }

    /// Everything in `dataset`: all present countries over the full time range.
    /// `None` when the dataset is empty.
    pub fn covering(dataset: &Dataset, metric: Metric) -> Option<Self> {
        let (start, end) = dataset.time_bounds()?;
        Some(Self {
            start,
            end,
            countries: dataset.countries(),
            metric,
        })
    }

    /// Whether a row with this country and timestamp passes.
    pub fn matches(&self, country: Country, timestamp: NaiveDateTime) -> bool {
        self.countries.contains(&country) && self.start <= timestamp && timestamp <= self.end
    }
}

// ---------------------------------------------------------------------------
// Filtered view: the projected rows of one query
// ---------------------------------------------------------------------------

/// One projected row: `Timestamp`, `country`, the selected metric and `RH`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRow {
    pub timestamp: NaiveDateTime,
    pub country: Country,
    /// Value of [`FilteredView::metric`].
    pub value: f64,
    pub rh: f64,
}

/// Rows of the dataset that passed a [`FilterCriteria`], in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    pub metric: Metric,
    pub rows: Vec<ViewRow>,
}

impl FilteredView {
    pub fn empty(metric: Metric) -> Self {
        FilteredView {
            metric,
            rows: Vec::new(),
        }
    }

    /// Column names carried by the view.
    pub fn columns(&self) -> [&'static str; 4] {
        ["Timestamp", "country", self.metric.column(), "RH"]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Countries with at least one row in the view.
    pub fn countries(&self) -> BTreeSet<Country> {
        self.rows.iter().map(|r| r.country).collect()
    }
}

/// Select the rows matching `criteria` and project them to the view columns.
///
/// An empty country set or an inverted date range gives an empty view.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> FilteredView {
    let metric = criteria.metric;
    let rows = dataset
        .observations
        .iter()
        .filter(|obs| criteria.matches(obs.country, obs.timestamp))
        .map(|obs| ViewRow {
            timestamp: obs.timestamp,
            country: obs.country,
            value: metric.value_of(obs),
            rh: obs.rh,
        })
        .collect();
    FilteredView { metric, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AmbientReadings, Observation};
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn dataset() -> Dataset {
        let obs = |country, day, hour, base: f64| Observation {
            timestamp: at(day, hour),
            country,
            ghi: base,
            dni: base + 1.0,
            dhi: base + 2.0,
            rh: 40.0 + base,
            ambient: AmbientReadings::default(),
        };
        Dataset::from_groups(vec![
            vec![obs(Country::Benin, 1, 0, 10.0), obs(Country::Benin, 2, 12, 20.0)],
            vec![obs(Country::SierraLeone, 1, 6, 30.0)],
            vec![obs(Country::Togo, 3, 0, 40.0)],
        ])
    }

    #[test]
    fn every_row_is_tested_against_both_conditions() {
        let ds = dataset();
        let criteria = FilterCriteria {
            start: at(1, 6),
            end: at(3, 0),
            countries: [Country::Benin, Country::SierraLeone].into(),
            metric: Metric::Ghi,
        };
        let view = filter(&ds, &criteria);
        for obs in &ds.observations {
            let included = view
                .rows
                .iter()
                .any(|r| r.timestamp == obs.timestamp && r.country == obs.country);
            assert_eq!(included, criteria.matches(obs.country, obs.timestamp));
        }
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            start: at(1, 0),
            end: at(3, 0),
            countries: Country::ALL.into(),
            metric: Metric::Ghi,
        };
        assert_eq!(filter(&ds, &criteria).len(), 4);
    }

    #[test]
    fn projects_the_selected_metric() {
        let ds = dataset();
        let mut criteria = FilterCriteria::covering(&ds, Metric::Dhi).unwrap();
        criteria.countries = [Country::Togo].into();
        let view = filter(&ds, &criteria);
        assert_eq!(view.columns(), ["Timestamp", "country", "DHI", "RH"]);
        assert_eq!(view.rows[0].value, 42.0);
        assert_eq!(view.rows[0].rh, 80.0);
    }

    #[test]
    fn empty_selection_and_inverted_range_are_empty() {
        let ds = dataset();
        let mut criteria = FilterCriteria::covering(&ds, Metric::Ghi).unwrap();
        criteria.countries.clear();
        assert!(filter(&ds, &criteria).is_empty());

        let mut inverted = FilterCriteria::covering(&ds, Metric::Ghi).unwrap();
        std::mem::swap(&mut inverted.start, &mut inverted.end);
        assert!(filter(&ds, &inverted).is_empty());
    }

    #[test]
    fn unknown_metric_name_fails_fast() {
        let err = FilterCriteria::new(at(1, 0), at(2, 0), Country::ALL, "Tamb").unwrap_err();
        assert!(matches!(err, DataError::InvalidMetric(_)));
    }
}
