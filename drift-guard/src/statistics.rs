//! Per-feature and per-dataset statistics produced by the profiler.
//!
//! Every artifact here is an immutable value type: the profiler builds a
//! fresh [`DatasetStatistics`] on each call and never hands out a partially
//! populated one. Maps are `BTreeMap`s so that iteration order, and therefore
//! serialized output, is deterministic across runs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The value kind inferred for a feature, fixed for the duration of one
/// profiling call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Every non-missing value parses as a real number.
    Numeric,
    /// Finite-domain strings.
    Categorical,
    /// Opaque byte values.
    Bytes,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureKind::Numeric => "NUMERIC",
            FeatureKind::Categorical => "CATEGORICAL",
            FeatureKind::Bytes => "BYTES",
        };
        f.write_str(name)
    }
}

/// One equal-width histogram bucket over `[low, high)` (the last bucket is
/// closed on both ends).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub low: f64,
    pub high: f64,
    pub count: u64,
}

/// Statistics for a numeric feature.
///
/// When every value of a numeric column is missing, the summary fields are
/// all zero and the histogram is empty; the bucket counts still sum to the
/// non-missing count (zero) as required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation, computed via Welford's online update.
    pub stddev: f64,
    pub num_zeros: u64,
    pub histogram: Vec<HistogramBucket>,
}

/// A single (value, count) frequency entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// The retained portion of a feature's frequency table.
///
/// The tag is the explicit contract between the profiler and the schema
/// inferrer: a domain can be enumerated exactly only when the table is
/// `Exhaustive`. Both variants are sorted by count descending, then value
/// ascending as the tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueCounts {
    /// Every distinct observed value is retained.
    Exhaustive(Vec<ValueCount>),
    /// Only the top-K values by frequency are retained.
    Truncated(Vec<ValueCount>),
}

impl ValueCounts {
    /// The retained entries, regardless of variant.
    pub fn entries(&self) -> &[ValueCount] {
        match self {
            ValueCounts::Exhaustive(entries) | ValueCounts::Truncated(entries) => entries,
        }
    }

    /// True when the full frequency table was retained.
    pub fn is_exhaustive(&self) -> bool {
        matches!(self, ValueCounts::Exhaustive(_))
    }
}

/// Statistics for a categorical or bytes feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyStatistics {
    /// Exact number of distinct non-missing values, even when not all are
    /// retained in `value_counts`.
    pub unique_count: u64,
    pub value_counts: ValueCounts,
}

impl FrequencyStatistics {
    /// The most frequent values, capped at `k` for display purposes.
    pub fn top_values(&self, k: usize) -> &[ValueCount] {
        let entries = self.value_counts.entries();
        &entries[..entries.len().min(k)]
    }
}

/// Kind-specific statistics payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValueStats {
    Numeric(NumericStatistics),
    Frequency(FrequencyStatistics),
}

/// Statistics for one named feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStatistics {
    pub name: String,
    pub kind: FeatureKind,
    /// Total number of rows, including missing ones.
    pub total_count: u64,
    /// Rows whose value is missing. Arrow nulls are always missing; for
    /// numeric features, non-finite values (NaN, infinities) also count as
    /// missing, matching the behavior of the reference implementation this
    /// engine reproduces.
    pub missing_count: u64,
    pub values: FeatureValueStats,
}

impl FeatureStatistics {
    /// Number of rows carrying an actual value.
    pub fn non_missing_count(&self) -> u64 {
        self.total_count - self.missing_count
    }

    /// Fraction of rows carrying an actual value; zero for an all-missing
    /// feature.
    pub fn non_missing_fraction(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.non_missing_count() as f64 / self.total_count as f64
        }
    }

    /// The numeric payload, when this is a numeric feature.
    pub fn numeric(&self) -> Option<&NumericStatistics> {
        match &self.values {
            FeatureValueStats::Numeric(stats) => Some(stats),
            FeatureValueStats::Frequency(_) => None,
        }
    }

    /// The frequency payload, when this is a categorical or bytes feature.
    pub fn frequency(&self) -> Option<&FrequencyStatistics> {
        match &self.values {
            FeatureValueStats::Frequency(stats) => Some(stats),
            FeatureValueStats::Numeric(_) => None,
        }
    }
}

/// Statistics for a whole dataset: one entry per feature, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    /// Row count of the profiled dataset.
    pub num_examples: u64,
    pub features: BTreeMap<String, FeatureStatistics>,
}

impl DatasetStatistics {
    /// Looks up one feature's statistics by name.
    pub fn feature(&self, name: &str) -> Option<&FeatureStatistics> {
        self.features.get(name)
    }

    /// Number of profiled features.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Feature names in sorted order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }
}
