use std::path::PathBuf;

use thiserror::Error;

use super::model::Country;

/// Errors raised while loading or querying the dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// A source file is missing or cannot be read. Fatal at startup.
    #[error("{country}: cannot read source {}", .path.display())]
    SourceUnavailable {
        country: Country,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An opened source failed while being read.
    #[error("{country}: read failed")]
    ReadFailed {
        country: Country,
        #[source]
        source: std::io::Error,
    },

    /// The header row lacks a required column.
    #[error("{country}: missing required column '{column}'")]
    MissingColumn {
        country: Country,
        column: &'static str,
    },

    /// An unparseable timestamp or numeric value. The whole source is rejected.
    #[error("{country}: malformed input{}: {detail}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    MalformedInput {
        country: Country,
        line: Option<u64>,
        detail: String,
    },

    #[error("unsupported metric '{0}' (expected GHI, DNI or DHI)")]
    InvalidMetric(String),

    #[error("invalid value '{value}' for {var}")]
    InvalidConfig { var: &'static str, value: String },
}
