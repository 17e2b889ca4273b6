//! Property-based tests for the statistics/schema/anomaly engine.
//!
//! These verify the invariants that must hold for all inputs: count
//! balances, histogram mass, tie-break determinism, and the schema
//! round-trip (a dataset never flags anomalies against a schema inferred
//! from itself while its domains stay closed).

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use drift_guard::prelude::*;
use proptest::prelude::*;

fn numeric_dataset(values: &[Option<f64>]) -> Dataset {
    Dataset::try_new(vec![Column::new(
        "n",
        Arc::new(Float64Array::from(values.to_vec())) as ArrayRef,
    )])
    .unwrap()
}

fn categorical_dataset(values: &[String]) -> Dataset {
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    Dataset::try_new(vec![Column::new(
        "c",
        Arc::new(StringArray::from(refs)) as ArrayRef,
    )])
    .unwrap()
}

/// Small categorical alphabet so generated columns stay below the
/// exhaustive-retention limit.
fn category() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "alpha".to_string(),
        "beta".to_string(),
        "gamma".to_string(),
        "delta".to_string(),
        "epsilon".to_string(),
    ])
}

proptest! {
    #[test]
    fn num_examples_always_matches_row_count(
        values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 1..200)
    ) {
        let dataset = numeric_dataset(&values);
        let stats = DatasetProfiler::new().profile(&dataset).unwrap();
        prop_assert_eq!(stats.num_examples, dataset.num_rows() as u64);
    }

    #[test]
    fn numeric_counts_balance(
        values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 1..200)
    ) {
        let stats = DatasetProfiler::new().profile(&numeric_dataset(&values)).unwrap();
        let feature = stats.feature("n").unwrap();
        let numeric = feature.numeric().unwrap();

        let mass: u64 = numeric.histogram.iter().map(|b| b.count).sum();
        prop_assert_eq!(feature.missing_count + mass, feature.total_count);

        let expected_missing = values.iter().filter(|v| v.is_none()).count() as u64;
        prop_assert_eq!(feature.missing_count, expected_missing);
    }

    #[test]
    fn numeric_bounds_enclose_every_value(
        values in prop::collection::vec(-1e6f64..1e6, 1..200)
    ) {
        let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
        let stats = DatasetProfiler::new().profile(&numeric_dataset(&wrapped)).unwrap();
        let numeric = stats.feature("n").unwrap().numeric().unwrap();

        for v in &values {
            prop_assert!(numeric.min <= *v && *v <= numeric.max);
        }
        prop_assert!(numeric.min <= numeric.mean && numeric.mean <= numeric.max);
        prop_assert!(numeric.stddev >= 0.0);
    }

    #[test]
    fn frequency_counts_balance_and_tie_break(
        values in prop::collection::vec(category(), 1..200)
    ) {
        let stats = DatasetProfiler::new().profile(&categorical_dataset(&values)).unwrap();
        let frequency = stats.feature("c").unwrap().frequency().unwrap();

        let mass: u64 = frequency.value_counts.entries().iter().map(|e| e.count).sum();
        prop_assert_eq!(mass, values.len() as u64);

        // Sorted by count descending, value ascending on ties.
        let entries = frequency.value_counts.entries();
        for pair in entries.windows(2) {
            prop_assert!(
                pair[0].count > pair[1].count
                    || (pair[0].count == pair[1].count && pair[0].value < pair[1].value)
            );
        }
    }

    #[test]
    fn schema_round_trip_yields_empty_report(
        numeric in prop::collection::vec(prop::option::of(-1e3f64..1e3), 1..100),
        categorical in prop::collection::vec(category(), 1..100)
    ) {
        let rows = numeric.len().min(categorical.len()).max(1);
        let refs: Vec<&str> = categorical[..rows].iter().map(String::as_str).collect();
        let dataset = Dataset::try_new(vec![
            Column::new("n", Arc::new(Float64Array::from(numeric[..rows].to_vec())) as ArrayRef),
            Column::new("c", Arc::new(StringArray::from(refs)) as ArrayRef),
        ]).unwrap();

        let stats = DatasetProfiler::new().profile(&dataset).unwrap();
        let schema = SchemaInferrer::new().infer(&stats);
        let report = AnomalyDetector::new().detect(&schema, &stats);

        prop_assert!(report.is_empty(), "self-validation found: {:?}", report.anomalies);
    }

    #[test]
    fn profile_is_deterministic(
        values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 1..100)
    ) {
        let dataset = numeric_dataset(&values);
        let profiler = DatasetProfiler::new();
        let formatter = TextFormatter::new();

        let first = formatter.format_statistics(&profiler.profile(&dataset).unwrap()).unwrap();
        let second = formatter.format_statistics(&profiler.profile(&dataset).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }
}
