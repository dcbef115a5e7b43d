//! Lifecycle management for the watchdog binary.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     SIGINT / Ctrl-C → Shutdown::trigger → watchdog loop exits
//!     → breaker deactivated → process exits
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - Shutdown always deactivates the breaker so no reset task outlives it

pub mod shutdown;

pub use shutdown::Shutdown;
