use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::error::DataError;
use super::model::{AmbientReadings, Country, Dataset, Observation};

/// Columns every source must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Timestamp", "GHI", "DNI", "DHI", "RH"];

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Something that can hand out the raw CSV bytes for each country.
pub trait ObservationSource {
    /// Open the source for `country`. A missing or unreadable source must be
    /// reported as [`DataError::SourceUnavailable`].
    fn open(&self, country: Country) -> Result<Box<dyn Read + '_>, DataError>;
}

/// Reads `<root>/<country file name>` from disk.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CsvDirectory { root: root.into() }
    }

    pub fn path_for(&self, country: Country) -> PathBuf {
        self.root.join(country.file_name())
    }
}

impl ObservationSource for CsvDirectory {
    fn open(&self, country: Country) -> Result<Box<dyn Read + '_>, DataError> {
        let path = self.path_for(country);
        match File::open(&path) {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(source) => Err(DataError::SourceUnavailable {
                country,
                path,
                source,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read every country from `source` and concatenate them in [`Country::ALL`]
/// order. Any failure aborts the whole load; no partial dataset is returned.
pub fn load_dataset(source: &dyn ObservationSource) -> Result<Dataset, DataError> {
    let mut groups = Vec::with_capacity(Country::ALL.len());
    for country in Country::ALL {
        let reader = source.open(country)?;
        let rows = read_country(country, reader)?;
        log::info!("Loaded {} rows for {country}", rows.len());
        groups.push(rows);
    }

    let dataset = Dataset::from_groups(groups);
    match dataset.time_bounds() {
        Some((start, end)) => log::info!(
            "Unified dataset: {} rows spanning {start} .. {end}",
            dataset.len()
        ),
        None => log::warn!("Unified dataset is empty"),
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// One CSV row as written by the cleaning step. Unknown columns such as
/// `Comments` are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "GHI")]
    ghi: f64,
    #[serde(rename = "DNI")]
    dni: f64,
    #[serde(rename = "DHI")]
    dhi: f64,
    #[serde(rename = "RH")]
    rh: f64,
    #[serde(rename = "ModA", default, deserialize_with = "csv::invalid_option")]
    mod_a: Option<f64>,
    #[serde(rename = "ModB", default, deserialize_with = "csv::invalid_option")]
    mod_b: Option<f64>,
    #[serde(rename = "Tamb", default, deserialize_with = "csv::invalid_option")]
    tamb: Option<f64>,
    #[serde(rename = "WS", default, deserialize_with = "csv::invalid_option")]
    ws: Option<f64>,
    #[serde(rename = "WSgust", default, deserialize_with = "csv::invalid_option")]
    ws_gust: Option<f64>,
    #[serde(rename = "WSstdev", default, deserialize_with = "csv::invalid_option")]
    ws_stdev: Option<f64>,
    #[serde(rename = "WD", default, deserialize_with = "csv::invalid_option")]
    wd: Option<f64>,
    #[serde(rename = "WDstdev", default, deserialize_with = "csv::invalid_option")]
    wd_stdev: Option<f64>,
    #[serde(rename = "BP", default, deserialize_with = "csv::invalid_option")]
    bp: Option<f64>,
    #[serde(rename = "Cleaning", default, deserialize_with = "csv::invalid_option")]
    cleaning: Option<f64>,
    #[serde(rename = "Precipitation", default, deserialize_with = "csv::invalid_option")]
    precipitation: Option<f64>,
    #[serde(rename = "TModA", default, deserialize_with = "csv::invalid_option")]
    t_mod_a: Option<f64>,
    #[serde(rename = "TModB", default, deserialize_with = "csv::invalid_option")]
    t_mod_b: Option<f64>,
}

impl RawRecord {
    fn into_observation(
        self,
        country: Country,
        line: Option<u64>,
    ) -> Result<Observation, DataError> {
        let timestamp =
            parse_timestamp(&self.timestamp).ok_or_else(|| DataError::MalformedInput {
                country,
                line,
                detail: format!("unparseable Timestamp '{}'", self.timestamp),
            })?;

        for (column, value) in [
            ("GHI", self.ghi),
            ("DNI", self.dni),
            ("DHI", self.dhi),
            ("RH", self.rh),
        ] {
            if !value.is_finite() {
                return Err(DataError::MalformedInput {
                    country,
                    line,
                    detail: format!("non-finite {column} value '{value}'"),
                });
            }
        }

        Ok(Observation {
            timestamp,
            country,
            ghi: self.ghi,
            dni: self.dni,
            dhi: self.dhi,
            rh: self.rh,
            ambient: AmbientReadings {
                mod_a: self.mod_a,
                mod_b: self.mod_b,
                tamb: self.tamb,
                ws: self.ws,
                ws_gust: self.ws_gust,
                ws_stdev: self.ws_stdev,
                wd: self.wd,
                wd_stdev: self.wd_stdev,
                bp: self.bp,
                cleaning: self.cleaning,
                precipitation: self.precipitation,
                t_mod_a: self.t_mod_a,
                t_mod_b: self.t_mod_b,
            },
        })
    }
}

/// Parse one country's CSV into observations labelled with `country`.
///
/// A header-only input yields an empty vector. A missing required column,
/// an unparseable timestamp or a non-numeric (including NaN or infinite)
/// required value rejects the whole source.
pub fn read_country<R: Read>(country: Country, input: R) -> Result<Vec<Observation>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(country, e, None))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn { country, column });
        }
    }

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| csv_error(country, e, None))?
    {
        let line = record.position().map(|p| p.line());
        let raw: RawRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(country, e, line))?;
        rows.push(raw.into_observation(country, line)?);
    }
    Ok(rows)
}

fn csv_error(country: Country, err: csv::Error, line: Option<u64>) -> DataError {
    let line = err.position().map(|p| p.line()).or(line);
    let detail = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DataError::ReadFailed { country, source },
        _ => DataError::MalformedInput {
            country,
            line,
            detail,
        },
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp as a naive local instant.
///
/// Offsets on RFC 3339 input are dropped and the wall-clock time kept. A bare
/// date means midnight.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const HEADER: &str = "Timestamp,GHI,DNI,DHI,ModA,ModB,Tamb,RH,WS,WSgust,WSstdev,WD,WDstdev,BP,Cleaning,Precipitation,TModA,TModB,Comments\n";

    #[test]
    fn parses_common_timestamp_forms() {
        let full = parse_timestamp("2021-08-09 00:01").unwrap();
        assert_eq!(full.minute(), 1);
        assert!(parse_timestamp("2021-08-09T00:01:30").is_some());
        assert!(parse_timestamp("2021-08-09 00:01:30.250").is_some());
        assert_eq!(
            parse_timestamp("2021-08-09T10:00:00+01:00").unwrap().hour(),
            10
        );
        assert_eq!(parse_timestamp("2021-08-09").unwrap().hour(), 0);
        assert!(parse_timestamp("09/08/2021").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn reads_full_cleaned_schema() {
        let csv = format!(
            "{HEADER}2021-08-09 00:01,-1.2,-0.2,-1.1,0.0,0.0,26.2,93.4,0.0,0.4,0.1,122.1,0.0,998,0,0.0,26.3,26.2,\n"
        );
        let rows = read_country(Country::Benin, csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.country, Country::Benin);
        assert_eq!(row.ghi, -1.2);
        assert_eq!(row.rh, 93.4);
        assert_eq!(row.ambient.tamb, Some(26.2));
        assert_eq!(row.ambient.bp, Some(998.0));
    }

    #[test]
    fn optional_columns_may_be_absent_or_blank() {
        let csv = "Timestamp,GHI,DNI,DHI,RH,Tamb\n2023-01-01 10:00,100,50,20,40,\n";
        let rows = read_country(Country::Togo, csv.as_bytes()).unwrap();
        assert_eq!(rows[0].ambient.tamb, None);
        assert_eq!(rows[0].ambient.ws, None);
    }

    #[test]
    fn header_only_source_is_empty() {
        let rows = read_country(Country::Togo, "Timestamp,GHI,DNI,DHI,RH\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let err = read_country(Country::Benin, "Timestamp,GHI,DNI,DHI\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn { column: "RH", .. }
        ));
    }

    #[test]
    fn bad_timestamp_rejects_source() {
        let csv = "Timestamp,GHI,DNI,DHI,RH\n2023-01-01,1,1,1,1\nnot-a-date,1,1,1,1\n";
        let err = read_country(Country::SierraLeone, csv.as_bytes()).unwrap_err();
        match err {
            DataError::MalformedInput {
                country,
                line,
                detail,
            } => {
                assert_eq!(country, Country::SierraLeone);
                assert_eq!(line, Some(3));
                assert!(detail.contains("not-a-date"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_metric_rejects_source() {
        let csv = "Timestamp,GHI,DNI,DHI,RH\n2023-01-01,abc,1,1,1\n";
        let err = read_country(Country::Benin, csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MalformedInput { .. }));
    }

    #[test]
    fn non_finite_metric_rejects_source() {
        for cell in ["NaN", "inf", "-infinity"] {
            let csv = format!("Timestamp,GHI,DNI,DHI,RH\n2023-01-01,900,1,1,40\n2023-01-02,{cell},1,1,50\n");
            match read_country(Country::Benin, csv.as_bytes()) {
                Err(DataError::MalformedInput { line, detail, .. }) => {
                    assert_eq!(line, Some(3), "cell {cell}");
                    assert!(detail.contains("GHI"), "cell {cell}: {detail}");
                }
                other => panic!("cell {cell}: expected MalformedInput, got {other:?}"),
            }
        }
        let csv = "Timestamp,GHI,DNI,DHI,RH\n2023-01-01,900,1,1,NaN\n";
        assert!(matches!(
            read_country(Country::Togo, csv.as_bytes()),
            Err(DataError::MalformedInput { .. })
        ));
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
        }
    }

    #[test]
    fn io_failure_while_reading_is_read_failed() {
        let err = read_country(Country::SierraLeone, BrokenReader).unwrap_err();
        assert!(matches!(
            err,
            DataError::ReadFailed {
                country: Country::SierraLeone,
                ..
            }
        ));
    }

    #[test]
    fn missing_directory_is_source_unavailable() {
        let dir = CsvDirectory::new("/nonexistent/solar-dashboard-data");
        let err = load_dataset(&dir).unwrap_err();
        assert!(matches!(
            err,
            DataError::SourceUnavailable {
                country: Country::Benin,
                ..
            }
        ));
    }
}
