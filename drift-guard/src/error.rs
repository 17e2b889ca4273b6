//! Error types shared across the profiling, inference, and detection engines.

use thiserror::Error;

/// Result type for drift-guard operations.
pub type GuardResult<T> = Result<T, GuardError>;

/// Errors that can occur while building datasets or computing statistics.
///
/// A failing call never returns a partially populated artifact: the profiler
/// either produces a complete [`crate::statistics::DatasetStatistics`] or one
/// of these errors. Schema inference and anomaly detection are total and do
/// not produce errors; disagreement with the schema is reported as anomalies,
/// not as failures.
#[derive(Error, Debug)]
pub enum GuardError {
    /// The dataset has zero rows; statistics are undefined.
    #[error("Dataset has no rows; statistics are undefined for an empty dataset")]
    EmptyDataset,

    /// A column's values could not be classified into a single kind.
    #[error("Column '{column}' mixes value kinds: {detail}")]
    MixedKind { column: String, detail: String },

    /// A column uses an Arrow type the profiler does not aggregate.
    #[error("Column '{column}' has unsupported Arrow type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    /// Two columns in the same dataset share a name.
    #[error("Duplicate column name '{0}' in dataset")]
    DuplicateColumn(String),

    /// A column's length disagrees with the dataset row count.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Arrow computation error.
    #[error("Arrow computation failed: {0}")]
    ArrowCompute(#[from] arrow::error::ArrowError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GuardError {
    /// Creates a mixed-kind error for the given column.
    pub fn mixed_kind(column: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MixedKind {
            column: column.into(),
            detail: detail.into(),
        }
    }

    /// Creates an unsupported-column-type error for the given column.
    pub fn unsupported_column_type(
        column: impl Into<String>,
        data_type: impl std::fmt::Display,
    ) -> Self {
        Self::UnsupportedColumnType {
            column: column.into(),
            data_type: data_type.to_string(),
        }
    }
}

/// Converts serde_json errors to GuardError.
impl From<serde_json::Error> for GuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
