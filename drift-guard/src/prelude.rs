//! Prelude for commonly used types in drift-guard.

pub use crate::dataset::{Column, Dataset};
pub use crate::detector::{AnomaliesReport, Anomaly, AnomalyDetector, AnomalyKind, Severity};
pub use crate::error::{GuardError, GuardResult};
pub use crate::formatters::{ArtifactFormatter, FormatterConfig, JsonFormatter, TextFormatter};
pub use crate::logging::LogConfig;
pub use crate::profiler::{DatasetProfiler, ProfilerConfig};
pub use crate::schema::{Domain, FeatureSpec, Schema, SchemaInferrer};
pub use crate::statistics::{DatasetStatistics, FeatureKind, FeatureStatistics};
