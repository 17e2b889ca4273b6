//! Anomaly detection: comparing candidate statistics against a schema.
//!
//! Detection is total and deterministic. Each independent check appends at
//! most one anomaly per feature; the report is ordered by feature name, then
//! by [`AnomalyKind`] declaration order. Anomalies are data, not errors: a
//! non-empty report is a successful result, and the decision to fail a
//! pipeline on ERROR-severity findings belongs to the caller.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::logging::truncate_field;
use crate::schema::{Domain, FeatureSpec, Schema};
use crate::statistics::{DatasetStatistics, FeatureStatistics, FeatureValueStats};

/// Maximum number of sample offending values attached to one anomaly.
const MAX_SAMPLE_VALUES: usize = 5;

/// Byte budget for description fields in debug log events.
const MAX_LOGGED_DESCRIPTION: usize = 256;

/// The ways candidate data can disagree with a schema.
///
/// Declaration order is the report's secondary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnomalyKind {
    /// Feature present in the candidate but absent from the schema.
    NewColumn,
    /// Feature present in the schema but absent from the candidate.
    MissingColumn,
    /// Candidate kind disagrees with the expected kind.
    TypeMismatch,
    /// Non-missing fraction fell below the required presence.
    HighMissingRatio,
    /// Numeric values outside the expected range.
    OutOfRange,
    /// Categorical values outside the closed membership set.
    UnexpectedStringValue,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnomalyKind::NewColumn => "NEW_COLUMN",
            AnomalyKind::MissingColumn => "MISSING_COLUMN",
            AnomalyKind::TypeMismatch => "TYPE_MISMATCH",
            AnomalyKind::HighMissingRatio => "HIGH_MISSING_RATIO",
            AnomalyKind::OutOfRange => "OUT_OF_RANGE",
            AnomalyKind::UnexpectedStringValue => "UNEXPECTED_STRING_VALUE",
        };
        f.write_str(name)
    }
}

/// How severe a finding is for the consuming pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// One way in which candidate data disagrees with the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub feature: String,
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub short_description: String,
    pub long_description: String,
    /// Up to five sample offending values, where applicable.
    pub sample_values: Vec<String>,
}

/// Ordered collection of anomalies; empty means the candidate conforms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomaliesReport {
    pub anomalies: Vec<Anomaly>,
}

impl AnomaliesReport {
    /// True when no anomaly was found.
    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Number of anomalies.
    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    /// Iterates anomalies in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter()
    }

    /// Anomalies recorded for one feature.
    pub fn for_feature<'a>(&'a self, feature: &'a str) -> impl Iterator<Item = &'a Anomaly> {
        self.anomalies.iter().filter(move |a| a.feature == feature)
    }

    /// True when at least one finding has ERROR severity.
    pub fn has_errors(&self) -> bool {
        self.anomalies.iter().any(|a| a.severity == Severity::Error)
    }
}

/// Compares candidate statistics against a schema.
#[derive(Debug, Default)]
pub struct AnomalyDetector;

impl AnomalyDetector {
    /// Create a detector.
    pub fn new() -> Self {
        Self
    }

    /// Runs every check for every feature present in either input.
    ///
    /// A feature missing from one side suppresses the remaining checks for
    /// it; a kind mismatch suppresses the domain checks (range and
    /// membership) but not the presence check.
    #[instrument(skip(self, schema, candidate), fields(schema_features = schema.num_features(), candidate_features = candidate.num_features()))]
    pub fn detect(&self, schema: &Schema, candidate: &DatasetStatistics) -> AnomaliesReport {
        let names: BTreeSet<&str> = schema
            .features
            .keys()
            .map(String::as_str)
            .chain(candidate.features.keys().map(String::as_str))
            .collect();

        let mut anomalies = Vec::new();
        for name in names {
            match (schema.feature(name), candidate.feature(name)) {
                (None, Some(_)) => anomalies.push(new_column(name)),
                (Some(_), None) => anomalies.push(missing_column(name)),
                (Some(spec), Some(stats)) => {
                    check_feature(name, spec, stats, &mut anomalies);
                }
                (None, None) => unreachable!("name drawn from the union of both inputs"),
            }
        }

        for anomaly in &anomalies {
            debug!(
                feature = %anomaly.feature,
                kind = %anomaly.kind,
                severity = %anomaly.severity,
                description = %truncate_field(&anomaly.long_description, MAX_LOGGED_DESCRIPTION),
                "anomaly found"
            );
        }

        info!(
            num_anomalies = anomalies.len(),
            has_errors = anomalies.iter().any(|a| a.severity == Severity::Error),
            "validated candidate statistics"
        );

        AnomaliesReport { anomalies }
    }
}

/// Runs the per-feature checks in [`AnomalyKind`] order.
fn check_feature(
    name: &str,
    spec: &FeatureSpec,
    stats: &FeatureStatistics,
    anomalies: &mut Vec<Anomaly>,
) {
    let kind_matches = stats.kind == spec.kind;
    if !kind_matches {
        anomalies.push(type_mismatch(name, spec, stats));
    }

    if let Some(anomaly) = check_presence(name, spec, stats) {
        anomalies.push(anomaly);
    }

    // A feature whose kind disagrees with the schema cannot be meaningfully
    // range- or membership-checked.
    if !kind_matches {
        return;
    }

    match (&spec.domain, &stats.values) {
        (Domain::Range { min, max }, FeatureValueStats::Numeric(numeric))
            if stats.non_missing_count() > 0 =>
        {
            if let Some(anomaly) = check_range(name, *min, *max, numeric.min, numeric.max) {
                anomalies.push(anomaly);
            }
        }
        (Domain::Values(allowed), FeatureValueStats::Frequency(frequency)) => {
            if let Some(anomaly) = check_membership(name, allowed, frequency) {
                anomalies.push(anomaly);
            }
        }
        _ => {}
    }
}

fn new_column(name: &str) -> Anomaly {
    Anomaly {
        feature: name.to_string(),
        kind: AnomalyKind::NewColumn,
        severity: Severity::Warning,
        short_description: "New column".to_string(),
        long_description: format!(
            "Feature '{name}' is present in the candidate statistics but absent from the schema"
        ),
        sample_values: Vec::new(),
    }
}

fn missing_column(name: &str) -> Anomaly {
    Anomaly {
        feature: name.to_string(),
        kind: AnomalyKind::MissingColumn,
        severity: Severity::Error,
        short_description: "Column dropped".to_string(),
        long_description: format!(
            "Feature '{name}' is required by the schema but absent from the candidate statistics"
        ),
        sample_values: Vec::new(),
    }
}

fn type_mismatch(name: &str, spec: &FeatureSpec, stats: &FeatureStatistics) -> Anomaly {
    Anomaly {
        feature: name.to_string(),
        kind: AnomalyKind::TypeMismatch,
        severity: Severity::Error,
        short_description: "Unexpected value kind".to_string(),
        long_description: format!(
            "Feature '{name}' has kind {} but the schema expects {}",
            stats.kind, spec.kind
        ),
        sample_values: Vec::new(),
    }
}

fn check_presence(name: &str, spec: &FeatureSpec, stats: &FeatureStatistics) -> Option<Anomaly> {
    let observed = stats.non_missing_fraction();
    if observed >= spec.presence {
        return None;
    }
    Some(Anomaly {
        feature: name.to_string(),
        kind: AnomalyKind::HighMissingRatio,
        severity: Severity::Error,
        short_description: "Too many missing values".to_string(),
        long_description: format!(
            "Feature '{name}' has non-missing fraction {observed} but the schema requires at least {}",
            spec.presence
        ),
        sample_values: Vec::new(),
    })
}

fn check_range(
    name: &str,
    expected_min: f64,
    expected_max: f64,
    observed_min: f64,
    observed_max: f64,
) -> Option<Anomaly> {
    let below = observed_min < expected_min;
    let above = observed_max > expected_max;
    if !below && !above {
        return None;
    }

    let mut violations = Vec::new();
    let mut samples = Vec::new();
    if below {
        violations.push(format!("min {observed_min} < expected min {expected_min}"));
        samples.push(observed_min.to_string());
    }
    if above {
        violations.push(format!("max {observed_max} > expected max {expected_max}"));
        samples.push(observed_max.to_string());
    }

    Some(Anomaly {
        feature: name.to_string(),
        kind: AnomalyKind::OutOfRange,
        severity: Severity::Warning,
        short_description: "Values out of range".to_string(),
        long_description: format!("Feature '{name}': {}", violations.join("; ")),
        sample_values: samples,
    })
}

fn check_membership(
    name: &str,
    allowed: &BTreeSet<String>,
    frequency: &crate::statistics::FrequencyStatistics,
) -> Option<Anomaly> {
    // The retained frequency table is already sorted; collect unexpected
    // values in ascending order for a stable sample list.
    let mut unexpected: Vec<&str> = frequency
        .value_counts
        .entries()
        .iter()
        .filter(|e| !allowed.contains(&e.value))
        .map(|e| e.value.as_str())
        .collect();
    if unexpected.is_empty() {
        return None;
    }
    unexpected.sort_unstable();

    let samples: Vec<String> = unexpected
        .iter()
        .take(MAX_SAMPLE_VALUES)
        .map(|v| v.to_string())
        .collect();

    Some(Anomaly {
        feature: name.to_string(),
        kind: AnomalyKind::UnexpectedStringValue,
        severity: Severity::Warning,
        short_description: "Unexpected string values".to_string(),
        long_description: format!(
            "Feature '{name}' contains {} value(s) outside the expected domain: {}",
            unexpected.len(),
            samples.join(", ")
        ),
        sample_values: samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::{
        FeatureKind, FrequencyStatistics, HistogramBucket, NumericStatistics, ValueCount,
        ValueCounts,
    };
    use std::collections::BTreeMap;

    fn numeric_stats(name: &str, min: f64, max: f64, total: u64, missing: u64) -> FeatureStatistics {
        FeatureStatistics {
            name: name.into(),
            kind: FeatureKind::Numeric,
            total_count: total,
            missing_count: missing,
            values: FeatureValueStats::Numeric(NumericStatistics {
                min,
                max,
                mean: (min + max) / 2.0,
                stddev: 0.0,
                num_zeros: 0,
                histogram: vec![HistogramBucket {
                    low: min,
                    high: max,
                    count: total - missing,
                }],
            }),
        }
    }

    fn categorical_stats(name: &str, values: &[(&str, u64)]) -> FeatureStatistics {
        let total: u64 = values.iter().map(|(_, c)| c).sum();
        FeatureStatistics {
            name: name.into(),
            kind: FeatureKind::Categorical,
            total_count: total,
            missing_count: 0,
            values: FeatureValueStats::Frequency(FrequencyStatistics {
                unique_count: values.len() as u64,
                value_counts: ValueCounts::Exhaustive(
                    values
                        .iter()
                        .map(|(v, c)| ValueCount {
                            value: v.to_string(),
                            count: *c,
                        })
                        .collect(),
                ),
            }),
        }
    }

    fn candidate_of(features: Vec<FeatureStatistics>) -> DatasetStatistics {
        DatasetStatistics {
            num_examples: features.first().map(|f| f.total_count).unwrap_or(0),
            features: features
                .into_iter()
                .map(|f| (f.name.clone(), f))
                .collect(),
        }
    }

    fn schema_of(features: Vec<(&str, FeatureSpec)>) -> Schema {
        Schema {
            features: features
                .into_iter()
                .map(|(n, s)| (n.to_string(), s))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn numeric_spec(min: f64, max: f64) -> FeatureSpec {
        FeatureSpec {
            kind: FeatureKind::Numeric,
            presence: 1.0,
            domain: Domain::Range { min, max },
        }
    }

    #[test]
    fn conforming_candidate_produces_empty_report() {
        let schema = schema_of(vec![("fare", numeric_spec(0.0, 100.0))]);
        let candidate = candidate_of(vec![numeric_stats("fare", 0.0, 100.0, 50, 0)]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        assert!(report.is_empty());
        assert!(!report.has_errors());
    }

    #[test]
    fn numeric_drift_flags_exactly_one_out_of_range_warning() {
        let schema = schema_of(vec![("fare", numeric_spec(0.0, 100.0))]);
        let candidate = candidate_of(vec![numeric_stats("fare", -5.0, 100.0, 50, 0)]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        assert_eq!(report.len(), 1);
        let anomaly = &report.anomalies[0];
        assert_eq!(anomaly.kind, AnomalyKind::OutOfRange);
        assert_eq!(anomaly.severity, Severity::Warning);
        assert!(anomaly.long_description.contains("min -5"));
        assert_eq!(anomaly.sample_values, vec!["-5"]);
    }

    #[test]
    fn unexpected_string_value_names_the_offender() {
        let spec = FeatureSpec {
            kind: FeatureKind::Categorical,
            presence: 1.0,
            domain: Domain::Values(["NYC".to_string(), "LA".to_string()].into_iter().collect()),
        };
        let schema = schema_of(vec![("city", spec)]);
        let candidate =
            candidate_of(vec![categorical_stats("city", &[("NYC", 10), ("LA", 5), ("SF", 2)])]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        assert_eq!(report.len(), 1);
        let anomaly = &report.anomalies[0];
        assert_eq!(anomaly.kind, AnomalyKind::UnexpectedStringValue);
        assert_eq!(anomaly.severity, Severity::Warning);
        assert_eq!(anomaly.sample_values, vec!["SF"]);
    }

    #[test]
    fn missing_feature_is_an_error_and_nothing_else() {
        let schema = schema_of(vec![("fare", numeric_spec(0.0, 100.0))]);
        let candidate = candidate_of(vec![]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        assert_eq!(report.len(), 1);
        assert_eq!(report.anomalies[0].kind, AnomalyKind::MissingColumn);
        assert_eq!(report.anomalies[0].severity, Severity::Error);
    }

    #[test]
    fn new_feature_is_a_warning() {
        let schema = schema_of(vec![]);
        let candidate = candidate_of(vec![numeric_stats("extra", 0.0, 1.0, 10, 0)]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        assert_eq!(report.len(), 1);
        assert_eq!(report.anomalies[0].kind, AnomalyKind::NewColumn);
        assert_eq!(report.anomalies[0].severity, Severity::Warning);
    }

    #[test]
    fn high_missing_ratio_fires_on_strictly_lower_fraction() {
        let schema = schema_of(vec![("tip", numeric_spec(0.0, 10.0))]);
        let candidate = candidate_of(vec![numeric_stats("tip", 0.0, 10.0, 100, 40)]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        assert_eq!(report.len(), 1);
        assert_eq!(report.anomalies[0].kind, AnomalyKind::HighMissingRatio);
        assert_eq!(report.anomalies[0].severity, Severity::Error);
    }

    #[test]
    fn type_mismatch_suppresses_domain_checks_but_not_presence() {
        let schema = schema_of(vec![("fare", numeric_spec(0.0, 100.0))]);
        let candidate = candidate_of(vec![FeatureStatistics {
            missing_count: 10,
            ..categorical_stats("fare", &[("a", 20)])
        }]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        let kinds: Vec<_> = report.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AnomalyKind::TypeMismatch, AnomalyKind::HighMissingRatio]
        );
    }

    #[test]
    fn report_is_ordered_by_feature_then_kind() {
        let schema = schema_of(vec![
            ("b_fare", numeric_spec(0.0, 10.0)),
            ("a_gone", numeric_spec(0.0, 1.0)),
        ]);
        let candidate = candidate_of(vec![
            numeric_stats("b_fare", -1.0, 20.0, 100, 60),
            numeric_stats("c_new", 0.0, 1.0, 100, 0),
        ]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        let keys: Vec<_> = report
            .iter()
            .map(|a| (a.feature.as_str(), a.kind))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a_gone", AnomalyKind::MissingColumn),
                ("b_fare", AnomalyKind::HighMissingRatio),
                ("b_fare", AnomalyKind::OutOfRange),
                ("c_new", AnomalyKind::NewColumn),
            ]
        );
    }

    #[test]
    fn open_domain_skips_membership_checks() {
        let spec = FeatureSpec {
            kind: FeatureKind::Categorical,
            presence: 1.0,
            domain: Domain::Open,
        };
        let schema = schema_of(vec![("comment", spec)]);
        let candidate = candidate_of(vec![categorical_stats("comment", &[("anything", 5)])]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        assert!(report.is_empty());
    }

    #[test]
    fn membership_samples_cap_at_five() {
        let spec = FeatureSpec {
            kind: FeatureKind::Categorical,
            presence: 1.0,
            domain: Domain::Values(std::iter::once("ok".to_string()).collect()),
        };
        let schema = schema_of(vec![("c", spec)]);
        let candidate = candidate_of(vec![categorical_stats(
            "c",
            &[
                ("ok", 10),
                ("u1", 1),
                ("u2", 1),
                ("u3", 1),
                ("u4", 1),
                ("u5", 1),
                ("u6", 1),
            ],
        )]);

        let report = AnomalyDetector::new().detect(&schema, &candidate);
        assert_eq!(report.len(), 1);
        let anomaly = &report.anomalies[0];
        assert_eq!(anomaly.sample_values.len(), 5);
        assert_eq!(anomaly.sample_values[0], "u1");
        assert!(anomaly.long_description.contains("6 value(s)"));
    }
}
