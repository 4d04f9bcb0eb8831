use std::collections::BTreeMap;

use super::filter::{filter, FilterCriteria, FilteredView};
use super::model::{Country, Dataset};
use super::stats::{self, BoxStats, DailyMean, SummaryStats};
use crate::config::DashboardConfig;

/// Everything the dashboard draws for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub view: FilteredView,
    pub summary: BTreeMap<Country, SummaryStats>,
    pub distribution: BTreeMap<Country, BoxStats>,
    /// One series per selected country, in country order. A selected country
    /// with no rows gets an empty series.
    pub trends: Vec<(Country, Vec<DailyMean>)>,
    pub sample: FilteredView,
    pub ranking: Vec<(Country, f64)>,
}

/// Read-only queries over a loaded dataset.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    dataset: &'a Dataset,
    sample_size: usize,
    sample_seed: u64,
}

impl<'a> QueryEngine<'a> {
    pub fn new(dataset: &'a Dataset, config: &DashboardConfig) -> Self {
        QueryEngine {
            dataset,
            sample_size: config.sample_size,
            sample_seed: config.sample_seed,
        }
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> FilteredView {
        filter(self.dataset, criteria)
    }

    /// Filter once, then compute every aggregate from the same view.
    pub fn evaluate(&self, criteria: &FilterCriteria) -> DashboardSnapshot {
        let view = self.filter(criteria);
        log::debug!(
            "Evaluating {} for {} countries: {} rows",
            criteria.metric,
            criteria.countries.len(),
            view.len()
        );

        let trends = criteria
            .countries
            .iter()
            .map(|&country| (country, stats::resample_daily(&view, country)))
            .collect();

        DashboardSnapshot {
            summary: stats::summarize(&view),
            distribution: stats::distribution(&view),
            trends,
            sample: stats::sample(&view, self.sample_size, self.sample_seed),
            ranking: stats::rank_by_mean(&view),
            view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AmbientReadings, Metric, Observation};
    use chrono::NaiveDate;

    #[test]
    fn snapshot_covers_selected_countries() {
        let obs = |country, day| Observation {
            timestamp: NaiveDate::from_ymd_opt(2024, 6, day)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            country,
            ghi: 400.0 + day as f64,
            dni: 0.0,
            dhi: 0.0,
            rh: 70.0,
            ambient: AmbientReadings::default(),
        };
        let ds = Dataset::from_groups(vec![
            (1..=5).map(|d| obs(Country::Benin, d)).collect(),
            vec![],
            vec![obs(Country::Togo, 2)],
        ]);
        let config = DashboardConfig {
            sample_size: 3,
            ..DashboardConfig::default()
        };
        let engine = QueryEngine::new(&ds, &config);

        let mut criteria = FilterCriteria::covering(&ds, Metric::Ghi).unwrap();
        criteria.countries.insert(Country::SierraLeone);
        let snap = engine.evaluate(&criteria);

        assert_eq!(snap.view.len(), 6);
        assert_eq!(snap.sample.len(), 3);
        assert_eq!(snap.summary.len(), 2);
        assert!(!snap.summary.contains_key(&Country::SierraLeone));
        assert_eq!(snap.ranking[0].0, Country::Benin);
        let trend_countries: Vec<_> = snap.trends.iter().map(|(c, s)| (*c, s.len())).collect();
        assert_eq!(
            trend_countries,
            vec![(Country::Benin, 5), (Country::SierraLeone, 0), (Country::Togo, 1)]
        );
    }
}
