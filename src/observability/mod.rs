//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! RateCircuitBreaker produces:
//!     → logging.rs (diagnostics through the injected BreakerLog)
//!     → metrics.rs (counters and gauges via the `metrics` facade)
//!
//! Consumers:
//!     → tracing subscriber installed by the binary (stderr)
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The breaker never picks a logger itself; it logs through the instance
//!   it was built with
//! - Metrics are cheap (atomic increments) and no-ops without a recorder

pub mod logging;
pub mod metrics;

pub use logging::{BreakerLog, TracingLog};
