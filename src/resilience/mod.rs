//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Protected operation fails:
//!     → caller reports it: RateCircuitBreaker::add_error
//!     → circuit_breaker.rs (count inside a sliding cooldown window)
//!     → limit reached: signal.rs fires once, cycle ends
//!     → caller stops hammering the dependency, later calls activate()
//! ```
//!
//! # Design Decisions
//! - The breaker only counts and signals; what to do after a trip is the
//!   caller's decision
//! - Construction is the only fallible step (error.rs)

pub mod circuit_breaker;
pub mod error;
pub mod signal;

pub use circuit_breaker::{RateCircuitBreaker, SharedBreaker};
pub use error::{BreakerError, BreakerResult};
pub use signal::TripSignal;
