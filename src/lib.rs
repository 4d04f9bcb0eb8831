pub mod config;
pub mod data;

pub use config::DashboardConfig;
pub use data::error::DataError;
pub use data::filter::{filter, FilterCriteria, FilteredView, ViewRow};
pub use data::model::{Country, Dataset, Metric, Observation};
pub use data::query::{DashboardSnapshot, QueryEngine};
