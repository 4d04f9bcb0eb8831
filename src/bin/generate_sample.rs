use std::f64::consts::PI;
use std::fs;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use solar_dashboard::{Country, DashboardConfig};

const DAYS: i64 = 56;
/// Fixed so regenerated files are identical.
const GENERATOR_SEED: u64 = 2021;

/// One row in the cleaned-file layout the dashboard reads.
#[derive(Debug, Serialize)]
struct CleanRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "GHI")]
    ghi: f64,
    #[serde(rename = "DNI")]
    dni: f64,
    #[serde(rename = "DHI")]
    dhi: f64,
    #[serde(rename = "Tamb")]
    tamb: f64,
    #[serde(rename = "RH")]
    rh: f64,
    #[serde(rename = "WS")]
    ws: f64,
    #[serde(rename = "BP")]
    bp: f64,
}

/// Peak clear-sky GHI, base humidity and base temperature per country.
fn climate(country: Country) -> (f64, f64, f64) {
    match country {
        Country::Benin => (950.0, 55.0, 28.0),
        Country::SierraLeone => (820.0, 75.0, 26.0),
        Country::Togo => (900.0, 62.0, 27.5),
    }
}

/// Box-Muller transform for a normal draw.
fn gauss(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn generate_rows(country: Country, start: NaiveDateTime, rng: &mut impl Rng) -> Vec<CleanRow> {
    let (peak, base_rh, base_tamb) = climate(country);
    let mut rows = Vec::new();

    for day in 0..DAYS {
        // Skip a few days so the daily trend has gaps like real logger outages.
        if rng.gen_bool(0.05) {
            continue;
        }
        let cloudiness = rng.gen_range(0.55..1.0);
        for hour in 0..24 {
            let ts = start + Duration::days(day) + Duration::hours(hour);
            let solar = ((ts.hour() as f64 - 6.0) * PI / 12.0).sin().max(0.0);
            let ghi = (peak * solar * cloudiness + gauss(rng, 0.0, 15.0)).max(0.0);
            let dni = (ghi * rng.gen_range(0.55..0.8)).max(0.0);
            let dhi = (ghi - dni * 0.9).max(0.0);
            let rh = (base_rh + 25.0 * (1.0 - solar) + gauss(rng, 0.0, 4.0)).clamp(5.0, 100.0);

            rows.push(CleanRow {
                timestamp: ts.format("%Y-%m-%d %H:%M").to_string(),
                ghi: round1(ghi),
                dni: round1(dni),
                dhi: round1(dhi),
                tamb: round1(base_tamb + 6.0 * solar + gauss(rng, 0.0, 0.8)),
                rh: round1(rh),
                ws: round1(gauss(rng, 2.5, 1.0).abs()),
                bp: round1(gauss(rng, 997.0, 1.5)),
            });
        }
    }
    rows
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env().context("reading configuration")?;
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;

    let start = NaiveDate::from_ymd_opt(2021, 8, 9)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;
    let mut rng = StdRng::seed_from_u64(GENERATOR_SEED);

    for country in Country::ALL {
        let rows = generate_rows(country, start, &mut rng);
        let path = config.data_dir.join(country.file_name());
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        println!("Wrote {} rows for {country} to {}", rows.len(), path.display());
    }
    Ok(())
}
