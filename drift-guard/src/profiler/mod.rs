//! Dataset profiling: one pass over every column, producing per-feature
//! statistics tagged by inferred kind.
//!
//! The profiler is a pure function of its input: it never mutates the
//! dataset, owns its accumulation buffers for the duration of one call, and
//! can be invoked concurrently on independent datasets (e.g. the reference
//! and candidate branches of a validation pipeline).
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Float64Array};
//! use drift_guard::dataset::{Column, Dataset};
//! use drift_guard::profiler::DatasetProfiler;
//!
//! # fn main() -> Result<(), drift_guard::GuardError> {
//! let dataset = Dataset::try_new(vec![Column::new(
//!     "fare",
//!     Arc::new(Float64Array::from(vec![2.5, 8.0, 12.5])) as ArrayRef,
//! )])?;
//!
//! let profiler = DatasetProfiler::builder().num_buckets(5).build();
//! let stats = profiler.profile(&dataset)?;
//! assert_eq!(stats.num_examples, 3);
//! # Ok(())
//! # }
//! ```

mod classify;
mod frequency;
mod numeric;
mod values;

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use crate::dataset::Dataset;
use crate::error::{GuardError, GuardResult};
use crate::statistics::{
    DatasetStatistics, FeatureKind, FeatureStatistics, FeatureValueStats,
};

/// Configuration for dataset profiling.
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    /// Display cap for frequency tables (count desc, value asc).
    pub top_k: usize,
    /// Number of equal-width histogram buckets for numeric features.
    pub num_buckets: usize,
    /// Full frequency tables are retained up to this many distinct values;
    /// beyond it the table is truncated to `top_k` and the schema inferrer
    /// will leave the domain open.
    pub exhaustive_limit: usize,
    /// Tolerated fraction of numeric-looking values inside an otherwise
    /// categorical string column before classification fails as mixed.
    pub mixed_kind_tolerance: f64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            top_k: 20,
            num_buckets: 10,
            exhaustive_limit: 100,
            mixed_kind_tolerance: 0.1,
        }
    }
}

/// Builder for [`DatasetProfiler`].
pub struct DatasetProfilerBuilder {
    config: ProfilerConfig,
}

impl DatasetProfilerBuilder {
    /// Set the display cap for frequency tables.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Set the number of histogram buckets for numeric features.
    pub fn num_buckets(mut self, num_buckets: usize) -> Self {
        self.config.num_buckets = num_buckets;
        self
    }

    /// Set the exhaustive-retention limit for frequency tables.
    pub fn exhaustive_limit(mut self, limit: usize) -> Self {
        self.config.exhaustive_limit = limit;
        self
    }

    /// Set the mixed-kind classification tolerance.
    pub fn mixed_kind_tolerance(mut self, tolerance: f64) -> Self {
        self.config.mixed_kind_tolerance = tolerance;
        self
    }

    /// Build the profiler.
    pub fn build(self) -> DatasetProfiler {
        DatasetProfiler {
            config: self.config,
        }
    }
}

/// Computes [`DatasetStatistics`] for an in-memory columnar [`Dataset`].
pub struct DatasetProfiler {
    config: ProfilerConfig,
}

impl DatasetProfiler {
    /// Create a new builder.
    pub fn builder() -> DatasetProfilerBuilder {
        DatasetProfilerBuilder {
            config: ProfilerConfig::default(),
        }
    }

    /// Create a profiler with default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// The active configuration.
    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Profiles every column of `dataset`.
    ///
    /// Fails with [`GuardError::EmptyDataset`] when the dataset has zero
    /// rows (statistics are undefined there), and with
    /// [`GuardError::MixedKind`] when a string column cannot be classified
    /// into a single kind. A failing call returns no partial statistics.
    #[instrument(skip(self, dataset), fields(num_rows = dataset.num_rows(), num_columns = dataset.num_columns()))]
    pub fn profile(&self, dataset: &Dataset) -> GuardResult<DatasetStatistics> {
        if dataset.num_rows() == 0 {
            return Err(GuardError::EmptyDataset);
        }

        let mut features = BTreeMap::new();
        for column in dataset.columns() {
            let kind = classify::classify_column(column, self.config.mixed_kind_tolerance)?;
            let total_count = column.len() as u64;

            let (values, missing_count) = match kind {
                FeatureKind::Numeric => {
                    let (stats, value_count) =
                        numeric::profile_numeric(column, self.config.num_buckets)?;
                    (FeatureValueStats::Numeric(stats), total_count - value_count)
                }
                FeatureKind::Categorical | FeatureKind::Bytes => {
                    let stats = frequency::profile_frequency(
                        column,
                        kind,
                        self.config.top_k,
                        self.config.exhaustive_limit,
                    )?;
                    (
                        FeatureValueStats::Frequency(stats),
                        column.null_count() as u64,
                    )
                }
            };

            debug!(
                column = column.name(),
                kind = %kind,
                missing = missing_count,
                "profiled column"
            );

            features.insert(
                column.name().to_string(),
                FeatureStatistics {
                    name: column.name().to_string(),
                    kind,
                    total_count,
                    missing_count,
                    values,
                },
            );
        }

        info!(
            num_examples = dataset.num_rows(),
            num_features = features.len(),
            "profiled dataset"
        );

        Ok(DatasetStatistics {
            num_examples: dataset.num_rows() as u64,
            features,
        })
    }
}

impl Default for DatasetProfiler {
    fn default() -> Self {
        Self::new()
    }
}
