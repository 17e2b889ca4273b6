//! Schema inference from reference-dataset statistics.
//!
//! A [`Schema`] records, per feature, the expected kind, the minimum
//! required presence (fraction of non-missing rows), and a domain. It is
//! produced once from the statistics of a reference dataset and is the sole
//! schema-side input to anomaly detection.
//!
//! Inference is total: given well-formed statistics it never fails, and
//! empty statistics produce an empty schema.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::statistics::{DatasetStatistics, FeatureKind, FeatureStatistics, FeatureValueStats};

/// The set or range of values a feature is expected to take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    /// Inclusive numeric range observed in the reference.
    Range { min: f64, max: f64 },
    /// Closed membership set of observed categorical values.
    Values(BTreeSet<String>),
    /// No membership or range constraint; only kind and presence are
    /// checked.
    Open,
}

/// Per-feature expectations inferred from the reference statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub kind: FeatureKind,
    /// Minimum required fraction of non-missing rows.
    pub presence: f64,
    pub domain: Domain,
}

/// Expected shape of future data, keyed by feature name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub features: BTreeMap<String, FeatureSpec>,
}

impl Schema {
    /// Looks up one feature's spec by name.
    pub fn feature(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.get(name)
    }

    /// Number of features the schema constrains.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// True when the schema constrains no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Configuration for schema inference.
#[derive(Debug, Clone)]
pub struct InferrerConfig {
    /// Fraction of the observed reference range added symmetrically to the
    /// numeric domain. Zero keeps the exact reference bounds, meaning any
    /// candidate value outside them is flagged.
    pub range_tolerance: f64,
}

impl Default for InferrerConfig {
    fn default() -> Self {
        Self {
            range_tolerance: 0.0,
        }
    }
}

/// Builder for [`SchemaInferrer`].
pub struct SchemaInferrerBuilder {
    config: InferrerConfig,
}

impl SchemaInferrerBuilder {
    /// Set the numeric range tolerance fraction.
    pub fn range_tolerance(mut self, tolerance: f64) -> Self {
        self.config.range_tolerance = tolerance;
        self
    }

    /// Build the inferrer.
    pub fn build(self) -> SchemaInferrer {
        SchemaInferrer {
            config: self.config,
        }
    }
}

/// Derives a [`Schema`] from one reference [`DatasetStatistics`].
pub struct SchemaInferrer {
    config: InferrerConfig,
}

impl SchemaInferrer {
    /// Create a new builder.
    pub fn builder() -> SchemaInferrerBuilder {
        SchemaInferrerBuilder {
            config: InferrerConfig::default(),
        }
    }

    /// Create an inferrer with default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Infers a schema from reference statistics in a single pass.
    ///
    /// Presence is the exact non-missing fraction of the reference, so a
    /// dataset re-validated against its own schema cannot fail the strict
    /// presence check. Domain openness for categorical features is decided
    /// from the frequency table's `Exhaustive`/`Truncated` tag alone.
    #[instrument(skip(self, stats), fields(num_features = stats.num_features()))]
    pub fn infer(&self, stats: &DatasetStatistics) -> Schema {
        let mut features = BTreeMap::new();
        for (name, feature) in &stats.features {
            let spec = self.infer_feature(feature);
            debug!(feature = name.as_str(), kind = %spec.kind, "inferred feature spec");
            features.insert(name.clone(), spec);
        }

        info!(num_features = features.len(), "inferred schema");
        Schema { features }
    }

    fn infer_feature(&self, feature: &FeatureStatistics) -> FeatureSpec {
        let domain = match &feature.values {
            FeatureValueStats::Numeric(numeric) if feature.non_missing_count() > 0 => {
                let margin = self.config.range_tolerance * (numeric.max - numeric.min);
                Domain::Range {
                    min: numeric.min - margin,
                    max: numeric.max + margin,
                }
            }
            // An all-missing numeric feature carries no usable bounds.
            FeatureValueStats::Numeric(_) => Domain::Open,
            FeatureValueStats::Frequency(frequency)
                if feature.kind == FeatureKind::Categorical
                    && frequency.value_counts.is_exhaustive() =>
            {
                Domain::Values(
                    frequency
                        .value_counts
                        .entries()
                        .iter()
                        .map(|e| e.value.clone())
                        .collect(),
                )
            }
            // Truncated categorical tables and bytes features cannot be
            // membership-checked.
            FeatureValueStats::Frequency(_) => Domain::Open,
        };

        FeatureSpec {
            kind: feature.kind,
            presence: feature.non_missing_fraction(),
            domain,
        }
    }
}

impl Default for SchemaInferrer {
    fn default() -> Self {
        Self::new()
    }
}
