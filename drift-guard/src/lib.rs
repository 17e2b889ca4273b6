//! # Drift Guard - Dataset Validation for Rust
//!
//! Drift Guard validates that a dataset conforms to expectations learned
//! from a reference ("training") dataset. It does three things: compute
//! per-feature statistics over an in-memory columnar dataset, infer a
//! schema (expected kind, presence, and domain per feature) from the
//! reference statistics, and compare a candidate dataset's statistics
//! against that schema, emitting a structured list of anomalies for every
//! violation.
//!
//! Fetching rows from a warehouse, persisting artifacts, and sequencing the
//! two pipeline branches are the caller's job: the engines here are pure,
//! synchronous functions over immutable inputs. The required ordering
//! (profile the reference before inferring, infer before detecting) is
//! carried by the type signatures alone, since a [`schema::Schema`] is the
//! only schema-side input [`detector::AnomalyDetector::detect`] accepts.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Float64Array, StringArray};
//! use drift_guard::prelude::*;
//!
//! # fn main() -> Result<(), GuardError> {
//! // Reference branch: profile, then infer the schema.
//! let reference = Dataset::try_new(vec![
//!     Column::new(
//!         "fare",
//!         Arc::new(Float64Array::from(vec![2.5, 8.0, 12.5])) as ArrayRef,
//!     ),
//!     Column::new(
//!         "city",
//!         Arc::new(StringArray::from(vec!["NYC", "LA", "NYC"])) as ArrayRef,
//!     ),
//! ])?;
//! let profiler = DatasetProfiler::new();
//! let reference_stats = profiler.profile(&reference)?;
//! let schema = SchemaInferrer::new().infer(&reference_stats);
//!
//! // Candidate branch: profile independently, then validate.
//! let candidate = Dataset::try_new(vec![
//!     Column::new(
//!         "fare",
//!         Arc::new(Float64Array::from(vec![3.0, 9.5])) as ArrayRef,
//!     ),
//!     Column::new(
//!         "city",
//!         Arc::new(StringArray::from(vec!["LA", "SF"])) as ArrayRef,
//!     ),
//! ])?;
//! let candidate_stats = profiler.profile(&candidate)?;
//! let report = AnomalyDetector::new().detect(&schema, &candidate_stats);
//!
//! // "SF" was never observed in the reference.
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.anomalies[0].kind, AnomalyKind::UnexpectedStringValue);
//!
//! // Artifacts serialize deterministically for reproducibility testing.
//! let text = TextFormatter::new().format_anomalies(&report)?;
//! assert!(text.contains("UNEXPECTED_STRING_VALUE"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`dataset`]: the read-only columnar input (Arrow-backed columns)
//! - [`profiler`]: per-feature statistics with kind-specific aggregation
//! - [`statistics`]: the statistics artifact types
//! - [`schema`]: schema types and inference from reference statistics
//! - [`detector`]: schema-vs-statistics comparison and the anomaly report
//! - [`formatters`]: deterministic text and JSON artifact serialization
//! - [`logging`]: `tracing` configuration helpers
//!
//! Profiling calls over independent datasets share no state and may run
//! concurrently; errors from the profiler abort the calling branch and are
//! never downgraded to anomalies.

pub mod dataset;
pub mod detector;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod profiler;
pub mod schema;
pub mod statistics;

pub use error::{GuardError, GuardResult};
