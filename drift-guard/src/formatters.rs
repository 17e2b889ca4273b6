//! Deterministic serialization of the three artifact types.
//!
//! Two runs over byte-identical input must produce byte-identical output:
//! artifact maps are `BTreeMap`s, frequency tables carry a total order, no
//! timestamps are embedded, and floats render through their shortest
//! round-trip `Display` form. The text format is field-per-line with
//! indented nested blocks, in the manner of the `.pbtxt` artifacts the
//! surrounding pipeline persists.
//!
//! # Example
//!
//! ```rust
//! use drift_guard::formatters::{ArtifactFormatter, TextFormatter};
//! use drift_guard::detector::AnomaliesReport;
//!
//! let formatter = TextFormatter::new();
//! let report = AnomaliesReport::default();
//! let text = formatter.format_anomalies(&report).unwrap();
//! assert_eq!(text, "num_anomalies: 0\n");
//! ```

use std::fmt::Write;

use crate::detector::AnomaliesReport;
use crate::error::{GuardError, GuardResult};
use crate::schema::{Domain, Schema};
use crate::statistics::{DatasetStatistics, FeatureValueStats, ValueCounts};

/// Configuration options for artifact formatting.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Maximum frequency-table entries rendered per feature.
    pub max_top_values: usize,
    /// Whether numeric histograms are rendered.
    pub include_histograms: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            max_top_values: 20,
            include_histograms: true,
        }
    }
}

impl FormatterConfig {
    /// A compact configuration without histograms.
    pub fn minimal() -> Self {
        Self {
            max_top_values: 5,
            include_histograms: false,
        }
    }

    /// Sets the frequency-table rendering cap.
    pub fn with_max_top_values(mut self, max: usize) -> Self {
        self.max_top_values = max;
        self
    }

    /// Sets whether histograms are rendered.
    pub fn with_histograms(mut self, include: bool) -> Self {
        self.include_histograms = include;
        self
    }
}

/// Formats the three artifact types into a serialized representation.
pub trait ArtifactFormatter {
    /// Formats dataset statistics.
    fn format_statistics(&self, stats: &DatasetStatistics) -> GuardResult<String>;

    /// Formats an inferred schema.
    fn format_schema(&self, schema: &Schema) -> GuardResult<String>;

    /// Formats an anomalies report.
    fn format_anomalies(&self, report: &AnomaliesReport) -> GuardResult<String>;
}

/// Human-readable, field-per-line text formatter.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    config: FormatterConfig,
}

impl TextFormatter {
    /// Create a text formatter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text formatter with the given configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl ArtifactFormatter for TextFormatter {
    fn format_statistics(&self, stats: &DatasetStatistics) -> GuardResult<String> {
        let mut out = String::new();
        line(&mut out, format_args!("num_examples: {}", stats.num_examples))?;
        for feature in stats.features.values() {
            line(&mut out, format_args!("feature {{"))?;
            line(&mut out, format_args!("  name: {:?}", feature.name))?;
            line(&mut out, format_args!("  kind: {}", feature.kind))?;
            line(&mut out, format_args!("  total_count: {}", feature.total_count))?;
            line(&mut out, format_args!("  missing_count: {}", feature.missing_count))?;
            match &feature.values {
                FeatureValueStats::Numeric(numeric) => {
                    line(&mut out, format_args!("  min: {}", numeric.min))?;
                    line(&mut out, format_args!("  max: {}", numeric.max))?;
                    line(&mut out, format_args!("  mean: {}", numeric.mean))?;
                    line(&mut out, format_args!("  stddev: {}", numeric.stddev))?;
                    line(&mut out, format_args!("  num_zeros: {}", numeric.num_zeros))?;
                    if self.config.include_histograms {
                        for bucket in &numeric.histogram {
                            line(
                                &mut out,
                                format_args!(
                                    "  bucket {{ low: {} high: {} count: {} }}",
                                    bucket.low, bucket.high, bucket.count
                                ),
                            )?;
                        }
                    }
                }
                FeatureValueStats::Frequency(frequency) => {
                    line(
                        &mut out,
                        format_args!("  unique_count: {}", frequency.unique_count),
                    )?;
                    let tag = match frequency.value_counts {
                        ValueCounts::Exhaustive(_) => "EXHAUSTIVE",
                        ValueCounts::Truncated(_) => "TRUNCATED",
                    };
                    line(&mut out, format_args!("  retention: {tag}"))?;
                    for entry in frequency.top_values(self.config.max_top_values) {
                        line(
                            &mut out,
                            format_args!(
                                "  value {{ value: {:?} count: {} }}",
                                entry.value, entry.count
                            ),
                        )?;
                    }
                }
            }
            line(&mut out, format_args!("}}"))?;
        }
        Ok(out)
    }

    fn format_schema(&self, schema: &Schema) -> GuardResult<String> {
        let mut out = String::new();
        line(&mut out, format_args!("num_features: {}", schema.num_features()))?;
        for (name, spec) in &schema.features {
            line(&mut out, format_args!("feature {{"))?;
            line(&mut out, format_args!("  name: {name:?}"))?;
            line(&mut out, format_args!("  kind: {}", spec.kind))?;
            line(&mut out, format_args!("  presence: {}", spec.presence))?;
            match &spec.domain {
                Domain::Range { min, max } => {
                    line(&mut out, format_args!("  domain {{ min: {min} max: {max} }}"))?;
                }
                Domain::Values(values) => {
                    line(&mut out, format_args!("  domain {{"))?;
                    for value in values {
                        line(&mut out, format_args!("    value: {value:?}"))?;
                    }
                    line(&mut out, format_args!("  }}"))?;
                }
                Domain::Open => {
                    line(&mut out, format_args!("  domain {{ open: true }}"))?;
                }
            }
            line(&mut out, format_args!("}}"))?;
        }
        Ok(out)
    }

    fn format_anomalies(&self, report: &AnomaliesReport) -> GuardResult<String> {
        let mut out = String::new();
        line(&mut out, format_args!("num_anomalies: {}", report.len()))?;
        for anomaly in report.iter() {
            line(&mut out, format_args!("anomaly {{"))?;
            line(&mut out, format_args!("  feature: {:?}", anomaly.feature))?;
            line(&mut out, format_args!("  kind: {}", anomaly.kind))?;
            line(&mut out, format_args!("  severity: {}", anomaly.severity))?;
            line(
                &mut out,
                format_args!("  short_description: {:?}", anomaly.short_description),
            )?;
            line(
                &mut out,
                format_args!("  long_description: {:?}", anomaly.long_description),
            )?;
            for sample in &anomaly.sample_values {
                line(&mut out, format_args!("  sample_value: {sample:?}"))?;
            }
            line(&mut out, format_args!("}}"))?;
        }
        Ok(out)
    }
}

/// Pretty-printed JSON formatter backed by serde.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactFormatter for JsonFormatter {
    fn format_statistics(&self, stats: &DatasetStatistics) -> GuardResult<String> {
        Ok(serde_json::to_string_pretty(stats)?)
    }

    fn format_schema(&self, schema: &Schema) -> GuardResult<String> {
        Ok(serde_json::to_string_pretty(schema)?)
    }

    fn format_anomalies(&self, report: &AnomaliesReport) -> GuardResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

fn line(out: &mut String, args: std::fmt::Arguments<'_>) -> GuardResult<()> {
    out.write_fmt(args)
        .and_then(|_| out.write_char('\n'))
        .map_err(|e| GuardError::Serialization(e.to_string()))
}
