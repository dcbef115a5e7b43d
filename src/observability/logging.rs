//! Structured logging.
//!
//! # Responsibilities
//! - Define the diagnostic collaborator a breaker is built with
//! - Provide the default `tracing`-backed implementation
//! - Initialize the subscriber for the binary
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and `RUST_LOG`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Diagnostic output sink for a breaker.
///
/// Output is informational only; nothing a sink does feeds back into
/// breaker state.
pub trait BreakerLog: Send + Sync {
    fn warn(&self, breaker: &str, message: &str);

    fn debug(&self, breaker: &str, message: &str);
}

/// Forwards breaker diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl BreakerLog for TracingLog {
    fn warn(&self, breaker: &str, message: &str) {
        tracing::warn!(target: "rate_breaker", breaker = %breaker, "{}", message);
    }

    fn debug(&self, breaker: &str, message: &str) {
        tracing::debug!(target: "rate_breaker", breaker = %breaker, "{}", message);
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
