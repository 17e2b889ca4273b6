//! Logging utilities and configuration for drift-guard.
//!
//! The engines themselves only emit `tracing` events; how those events are
//! collected is the caller's choice. This module provides a [`LogConfig`]
//! for tuning verbosity and a [`setup`] submodule for callers that want a
//! ready-made subscriber.

use tracing::Level;

/// Logging configuration for drift-guard components.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for drift-guard components.
    pub base_level: Level,
    /// Whether to log per-column profiling details.
    pub log_column_details: bool,
    /// Whether to log per-anomaly detection details.
    pub log_anomaly_details: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_column_details: false,
            log_anomaly_details: true,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_column_details: true,
            log_anomaly_details: true,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_column_details: false,
            log_anomaly_details: false,
        }
    }

    /// Creates a balanced configuration suitable for most use cases.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Renders the filter directives this configuration stands for.
    ///
    /// The detail flags raise the profiler and detector modules to DEBUG so
    /// their per-column and per-anomaly events are emitted even when the
    /// base level is higher.
    pub fn filter_directives(&self) -> String {
        let mut directives = format!("drift_guard={}", self.base_level.as_str().to_lowercase());
        if self.log_column_details {
            directives.push_str(",drift_guard::profiler=debug");
        }
        if self.log_anomaly_details {
            directives.push_str(",drift_guard::detector=debug");
        }
        directives
    }
}

/// Truncates a string for log output, cutting at a char boundary.
///
/// `max_length` is a byte budget; when it falls inside a multibyte
/// character the cut moves back to the preceding boundary.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut cut = max_length;
    while !value.is_char_boundary(cut) {
        cut -= 1;
    }
    let truncated = &value[..cut];
    format!("{truncated}...(truncated)")
}

/// Subscriber setup helpers for binaries embedding the engine.
pub mod setup {
    use super::LogConfig;
    use tracing_subscriber::EnvFilter;

    /// Initializes a global subscriber honoring `RUST_LOG`, falling back to
    /// the directives derived from the configuration.
    ///
    /// Returns an error string when a global subscriber is already set.
    pub fn init_logging(config: &LogConfig) -> Result<(), String> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| e.to_string())
    }

    /// Initializes a JSON-output subscriber for structured log pipelines.
    pub fn init_json_logging(config: &LogConfig) -> Result<(), String> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_order_verbosity() {
        assert_eq!(LogConfig::verbose().base_level, Level::DEBUG);
        assert_eq!(LogConfig::balanced().base_level, Level::INFO);
        assert_eq!(LogConfig::production().base_level, Level::WARN);
        assert!(LogConfig::verbose().log_column_details);
        assert!(!LogConfig::production().log_anomaly_details);
    }

    #[test]
    fn filter_directives_reflect_detail_flags() {
        assert_eq!(
            LogConfig::verbose().filter_directives(),
            "drift_guard=debug,drift_guard::profiler=debug,drift_guard::detector=debug"
        );
        assert_eq!(LogConfig::production().filter_directives(), "drift_guard=warn");
        assert_eq!(
            LogConfig::balanced().filter_directives(),
            "drift_guard=info,drift_guard::detector=debug"
        );
    }

    #[test]
    fn truncate_field_preserves_short_values() {
        assert_eq!(truncate_field("short", 10), "short");
        assert_eq!(truncate_field("0123456789", 4), "0123...(truncated)");
    }

    #[test]
    fn truncate_field_respects_char_boundaries() {
        // Each of these characters is three bytes; a budget of four lands
        // mid-character and must move back to the boundary before it.
        assert_eq!(truncate_field("日本語テスト", 4), "日...(truncated)");
        assert_eq!(truncate_field("日本語テスト", 6), "日本...(truncated)");
        // A budget smaller than the first character yields an empty prefix.
        assert_eq!(truncate_field("日本語", 2), "...(truncated)");
        assert_eq!(truncate_field("日本語", 18), "日本語");
    }
}
