/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  benin_clean.csv  sierraleone_clean.csv  togo_clean.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + label each source → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  load once per process, shared as Arc<Dataset>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + countries + metric → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  summary, box stats, daily series, sample, ranking
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
pub mod stats;
