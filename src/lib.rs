//! Rate-based circuit breaker.
//!
//! [`RateCircuitBreaker`] counts reported errors, forgets them after a
//! sliding quiet period, and fires a one-shot [`TripSignal`] once too many
//! arrive too close together.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use rate_breaker::{BreakerConfig, RateCircuitBreaker, TracingLog};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let breaker = RateCircuitBreaker::new(
//!     BreakerConfig::new("smtp", 3, Duration::from_secs(3)),
//!     Arc::new(TracingLog),
//! )?;
//! breaker.activate();
//!
//! let signal = breaker.trip_signal();
//! breaker.add_error("connection refused");
//!
//! if tokio::time::timeout(Duration::from_secs(1), signal.tripped()).await == Ok(true) {
//!     // stop sending for a while, then breaker.activate() again
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod watchdog;

pub use config::{BreakerConfig, WatchdogConfig};
pub use lifecycle::Shutdown;
pub use observability::{BreakerLog, TracingLog};
pub use resilience::{BreakerError, RateCircuitBreaker, TripSignal};
pub use watchdog::{ExitReason, RunSummary, Watchdog};
