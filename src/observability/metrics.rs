//! Metrics collection.
//!
//! # Metrics
//! - `rate_breaker_errors_total` (counter): error reports counted while active
//! - `rate_breaker_trips_total` (counter): trips
//! - `rate_breaker_resets_total` (counter): cooldown resets
//! - `rate_breaker_error_count` (gauge): current error log length
//!
//! # Design Decisions
//! - Labelled by breaker name
//! - No exporter here; the embedding application installs a recorder

use metrics::{counter, gauge};

/// Record a counted error and the resulting log length.
pub fn record_error(breaker: &str, count: usize) {
    counter!("rate_breaker_errors_total", "breaker" => breaker.to_string()).increment(1);
    record_count(breaker, count);
}

/// Record a trip.
pub fn record_trip(breaker: &str) {
    counter!("rate_breaker_trips_total", "breaker" => breaker.to_string()).increment(1);
    record_count(breaker, 0);
}

/// Record a cooldown reset.
pub fn record_reset(breaker: &str) {
    counter!("rate_breaker_resets_total", "breaker" => breaker.to_string()).increment(1);
    record_count(breaker, 0);
}

/// Record the current error log length.
pub fn record_count(breaker: &str, count: usize) {
    gauge!("rate_breaker_error_count", "breaker" => breaker.to_string()).set(count as f64);
}
