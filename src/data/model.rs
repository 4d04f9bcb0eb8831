use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use super::error::DataError;

// ---------------------------------------------------------------------------
// Country – the closed set of data sources
// ---------------------------------------------------------------------------

/// A country with one cleaned measurement file.
///
/// Variants are declared in label order so the derived `Ord` matches the
/// lexical order of [`Country::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Country {
    Benin,
    SierraLeone,
    Togo,
}

impl Country {
    /// All countries in load order.
    pub const ALL: [Country; 3] = [Country::Benin, Country::SierraLeone, Country::Togo];

    /// Human-readable label, injected into every loaded row.
    pub fn label(self) -> &'static str {
        match self {
            Country::Benin => "Benin",
            Country::SierraLeone => "Sierra Leone",
            Country::Togo => "Togo",
        }
    }

    /// File name of the cleaned CSV for this country, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Country::Benin => "benin_clean.csv",
            Country::SierraLeone => "sierraleone_clean.csv",
            Country::Togo => "togo_clean.csv",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Metric – the selectable irradiance column
// ---------------------------------------------------------------------------

/// Irradiance metric selectable in the dashboard (W/m²).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Metric {
    /// Global Horizontal Irradiance.
    #[default]
    Ghi,
    /// Direct Normal Irradiance.
    Dni,
    /// Diffuse Horizontal Irradiance.
    Dhi,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Ghi, Metric::Dni, Metric::Dhi];

    /// Column name as it appears in the source files.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Ghi => "GHI",
            Metric::Dni => "DNI",
            Metric::Dhi => "DHI",
        }
    }

    /// Read this metric from an observation.
    pub fn value_of(self, obs: &Observation) -> f64 {
        match self {
            Metric::Ghi => obs.ghi,
            Metric::Dni => obs.dni,
            Metric::Dhi => obs.dhi,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.column() == s)
            .ok_or_else(|| DataError::InvalidMetric(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of a cleaned source file
// ---------------------------------------------------------------------------

/// Optional ambient sensor readings carried alongside the irradiance columns.
/// A column missing from the source, or a cell that does not parse, is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmbientReadings {
    pub mod_a: Option<f64>,
    pub mod_b: Option<f64>,
    /// Ambient temperature (°C).
    pub tamb: Option<f64>,
    /// Wind speed (m/s).
    pub ws: Option<f64>,
    pub ws_gust: Option<f64>,
    pub ws_stdev: Option<f64>,
    /// Wind direction (degrees).
    pub wd: Option<f64>,
    pub wd_stdev: Option<f64>,
    /// Barometric pressure (hPa).
    pub bp: Option<f64>,
    pub cleaning: Option<f64>,
    pub precipitation: Option<f64>,
    pub t_mod_a: Option<f64>,
    pub t_mod_b: Option<f64>,
}

/// A single measurement. Built with its country already set and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Naive local instant; no timezone normalisation.
    pub timestamp: NaiveDateTime,
    pub country: Country,
    pub ghi: f64,
    pub dni: f64,
    pub dhi: f64,
    /// Relative humidity (%).
    pub rh: f64,
    pub ambient: AmbientReadings,
}

// ---------------------------------------------------------------------------
// Dataset – the unified table
// ---------------------------------------------------------------------------

/// All observations of all countries. Position in `observations` is the row
/// identity; rows are grouped by country in [`Country::ALL`] order, each group
/// in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    /// Concatenate per-country groups in the order given.
    pub fn from_groups(groups: Vec<Vec<Observation>>) -> Self {
        let observations = groups.into_iter().flatten().collect();
        Dataset { observations }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Countries that have at least one observation.
    pub fn countries(&self) -> BTreeSet<Country> {
        self.observations.iter().map(|o| o.country).collect()
    }

    /// Earliest and latest timestamp, `None` when there are no rows.
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let mut iter = self.observations.iter().map(|o| o.timestamp);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts))))
    }

    /// Row count for one country.
    pub fn count_for(&self, country: Country) -> usize {
        self.observations
            .iter()
            .filter(|o| o.country == country)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(country: Country, day: u32, ghi: f64) -> Observation {
        Observation {
            timestamp: NaiveDate::from_ymd_opt(2023, 1, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            country,
            ghi,
            dni: 0.0,
            dhi: 0.0,
            rh: 50.0,
            ambient: AmbientReadings::default(),
        }
    }

    #[test]
    fn country_order_matches_label_order() {
        let mut by_label = Country::ALL.to_vec();
        by_label.sort_by_key(|c| c.label());
        let mut by_ord = Country::ALL.to_vec();
        by_ord.sort();
        assert_eq!(by_label, by_ord);
    }

    #[test]
    fn metric_parses_known_names_only() {
        assert_eq!("GHI".parse::<Metric>().unwrap(), Metric::Ghi);
        assert_eq!("DNI".parse::<Metric>().unwrap(), Metric::Dni);
        assert_eq!("DHI".parse::<Metric>().unwrap(), Metric::Dhi);
        for name in ["ghi", " DHI ", "Dni", ""] {
            assert!(name.parse::<Metric>().is_err(), "accepted '{name}'");
        }
        assert!(matches!(
            "RH".parse::<Metric>(),
            Err(DataError::InvalidMetric(name)) if name == "RH"
        ));
    }

    #[test]
    fn bounds_and_countries() {
        let ds = Dataset::from_groups(vec![
            vec![obs(Country::Benin, 3, 1.0), obs(Country::Benin, 1, 2.0)],
            vec![],
            vec![obs(Country::Togo, 9, 3.0)],
        ]);
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.countries().into_iter().collect::<Vec<_>>(),
            vec![Country::Benin, Country::Togo]
        );
        let (lo, hi) = ds.time_bounds().unwrap();
        assert_eq!(lo.date(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(hi.date(), NaiveDate::from_ymd_opt(2023, 1, 9).unwrap());
        assert_eq!(ds.count_for(Country::SierraLeone), 0);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        assert!(Dataset::default().time_bounds().is_none());
    }
}
