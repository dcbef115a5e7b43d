//! Configuration schema definitions.
//!
//! This module defines the configuration structure for breakers and for the
//! watchdog binary. All types derive Serde traits for deserialization from
//! config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the `rate-breaker` watchdog.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Breaker thresholds.
    pub breaker: BreakerConfig,

    /// Which input lines count as errors.
    pub watch: WatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Breaker configuration.
///
/// Fixed for the lifetime of a breaker instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Breaker identifier for logging/metrics.
    pub name: String,

    /// Number of errors inside one sliding window that trips the breaker.
    pub limit: usize,

    /// Quiet period after the most recent error before the count resets,
    /// in milliseconds.
    pub cooldown_ms: u64,
}

impl BreakerConfig {
    /// Build a config from a name, limit and cooldown.
    ///
    /// The cooldown is rounded up to whole milliseconds, so any non-zero
    /// duration stays non-zero and the window never shrinks.
    pub fn new(name: impl Into<String>, limit: usize, cooldown: Duration) -> Self {
        let cooldown_ms = cooldown.as_nanos().div_ceil(1_000_000);
        Self {
            name: name.into(),
            limit,
            cooldown_ms: u64::try_from(cooldown_ms).unwrap_or(u64::MAX),
        }
    }

    /// Cooldown as a `Duration`.
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            limit: 5,
            cooldown_ms: 30_000,
        }
    }
}

/// Input matching configuration for the watchdog.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Substring a line must contain to count as an error.
    /// Empty means every line counts.
    pub pattern: String,

    /// Start a new cycle after a trip instead of exiting.
    pub rearm: bool,
}

impl WatchConfig {
    /// Return true if `line` should be reported to the breaker.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_empty() || line.contains(&self.pattern)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: WatchdogConfig = toml::from_str("[breaker]\nlimit = 3\n").unwrap();
        assert_eq!(config.breaker.limit, 3);
        assert_eq!(config.breaker.cooldown_ms, 30_000);
        assert_eq!(config.breaker.name, "default");
        assert!(!config.watch.rearm);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_cooldown_conversion() {
        let config = BreakerConfig::new("smtp", 3, Duration::from_secs(3));
        assert_eq!(config.cooldown_ms, 3_000);
        assert_eq!(config.cooldown(), Duration::from_secs(3));
    }

    #[test]
    fn test_sub_millisecond_cooldown_rounds_up() {
        let config = BreakerConfig::new("smtp", 3, Duration::from_micros(500));
        assert_eq!(config.cooldown(), Duration::from_millis(1));
        assert!(crate::config::validation::validate_breaker(&config).is_ok());

        let config = BreakerConfig::new("smtp", 3, Duration::from_micros(1_900));
        assert_eq!(config.cooldown(), Duration::from_millis(2));

        let config = BreakerConfig::new("smtp", 3, Duration::ZERO);
        assert_eq!(config.cooldown_ms, 0);
    }

    #[test]
    fn test_pattern_matching() {
        let mut watch = WatchConfig::default();
        assert!(watch.matches("anything"));

        watch.pattern = "ERROR".to_string();
        assert!(watch.matches("2024-01-01 ERROR send failed"));
        assert!(!watch.matches("2024-01-01 INFO sent"));
    }
}
