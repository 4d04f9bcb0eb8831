use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::filter::FilteredView;
use super::model::Country;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Summary of the selected metric for one country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1). NaN for a single observation.
    pub std_dev: f64,
}

/// Five-number summary plus box-plot whiskers for one country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest observation not below `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation not above `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
}

/// Mean of the selected metric over one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyMean {
    pub date: NaiveDate,
    pub mean: f64,
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Metric values per country, in view order.
fn values_by_country(view: &FilteredView) -> BTreeMap<Country, Vec<f64>> {
    let mut groups: BTreeMap<Country, Vec<f64>> = BTreeMap::new();
    for row in &view.rows {
        groups.entry(row.country).or_default().push(row.value);
    }
    groups
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Linear-interpolated quantile of already sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Mean, median and sample standard deviation per country present in `view`.
/// Countries without rows have no entry.
pub fn summarize(view: &FilteredView) -> BTreeMap<Country, SummaryStats> {
    values_by_country(view)
        .into_iter()
        .map(|(country, values)| {
            let mean = mean(&values);
            let std_dev = sample_std_dev(&values, mean);
            let count = values.len();
            let median = quantile(&sorted(values), 0.5);
            (
                country,
                SummaryStats {
                    count,
                    mean,
                    median,
                    std_dev,
                },
            )
        })
        .collect()
}

/// Box-plot statistics per country present in `view`.
pub fn distribution(view: &FilteredView) -> BTreeMap<Country, BoxStats> {
    values_by_country(view)
        .into_iter()
        .map(|(country, values)| {
            let values = sorted(values);
            let q1 = quantile(&values, 0.25);
            let q3 = quantile(&values, 0.75);
            let reach = 1.5 * (q3 - q1);
            let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);
            let min = values[0];
            let max = values[values.len() - 1];
            let lower_whisker = values
                .iter()
                .copied()
                .find(|v| *v >= lo_fence)
                .unwrap_or(min);
            let upper_whisker = values
                .iter()
                .rev()
                .copied()
                .find(|v| *v <= hi_fence)
                .unwrap_or(max);
            (
                country,
                BoxStats {
                    min,
                    q1,
                    median: quantile(&values, 0.5),
                    q3,
                    max,
                    lower_whisker,
                    upper_whisker,
                },
            )
        })
        .collect()
}

/// Daily means for one country, ascending by date. Days without rows are
/// left out rather than filled.
pub fn resample_daily(view: &FilteredView, country: Country) -> Vec<DailyMean> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for row in view.rows.iter().filter(|r| r.country == country) {
        let slot = days.entry(row.timestamp.date()).or_insert((0.0, 0));
        slot.0 += row.value;
        slot.1 += 1;
    }
    days.into_iter()
        .map(|(date, (sum, n))| DailyMean {
            date,
            mean: sum / n as f64,
        })
        .collect()
}

/// Draw `min(max_n, view.len())` rows uniformly without replacement.
///
/// The generator is seeded with `seed`, so the same view always yields the
/// same rows in the same order.
pub fn sample(view: &FilteredView, max_n: usize, seed: u64) -> FilteredView {
    let amount = max_n.min(view.len());
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = rand::seq::index::sample(&mut rng, view.len(), amount)
        .into_iter()
        .map(|i| view.rows[i])
        .collect();
    FilteredView {
        metric: view.metric,
        rows,
    }
}

/// Per-country means, highest first. Equal means keep country-label order.
pub fn rank_by_mean(view: &FilteredView) -> Vec<(Country, f64)> {
    let mut ranking: Vec<(Country, f64)> = values_by_country(view)
        .into_iter()
        .map(|(country, values)| (country, mean(&values)))
        .collect();
    ranking.sort_by(|a, b| a.0.label().cmp(b.0.label()));
    ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranking
}
