//! Line-oriented error watchdog.
//!
//! # Data Flow
//! ```text
//! input lines
//!     → WatchConfig::matches (pattern filter)
//!     → RateCircuitBreaker::add_error
//!     → trip signal checked after every report
//!     → tripped: stop (or start a new cycle when rearm is set)
//! ```

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast;

use crate::config::{WatchConfig, WatchdogConfig};
use crate::observability::logging::BreakerLog;
use crate::resilience::{BreakerResult, RateCircuitBreaker, SharedBreaker};

/// Why a watchdog run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The breaker tripped and rearm is off.
    Tripped,
    /// Input reached EOF.
    InputClosed,
    /// Shutdown was requested.
    Shutdown,
}

/// Totals for one watchdog run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: ExitReason,
    /// Matching lines handed to the breaker.
    pub reported: u64,
    pub trips: u64,
}

/// Feeds matching input lines into a breaker.
#[derive(Debug)]
pub struct Watchdog {
    breaker: SharedBreaker,
    watch: WatchConfig,
}

impl Watchdog {
    /// Build a watchdog and its breaker on the current runtime.
    pub fn new(config: &WatchdogConfig, log: Arc<dyn BreakerLog>) -> BreakerResult<Self> {
        Ok(Self {
            breaker: RateCircuitBreaker::new(config.breaker.clone(), log)?,
            watch: config.watch.clone(),
        })
    }

    /// The breaker this watchdog reports to.
    pub fn breaker(&self) -> &SharedBreaker {
        &self.breaker
    }

    /// Read `input` until EOF, shutdown, or a trip without rearm.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily. A read error ends
    /// the run with that error, after the breaker has been deactivated.
    pub async fn run<R>(
        &self,
        mut input: R,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();
        let mut reported = 0u64;
        let mut trips = 0u64;

        self.breaker.activate();
        let mut signal = self.breaker.trip_signal();

        let outcome: std::io::Result<ExitReason> = loop {
            tokio::select! {
                // read_until is cancel safe: a partial line stays in `buf`.
                read = input.read_until(b'\n', &mut buf) => {
                    match read {
                        Ok(0) => break Ok(ExitReason::InputClosed),
                        Ok(_) => {}
                        Err(e) => break Err(e),
                    }
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    buf.clear();

                    if !self.watch.matches(&line) {
                        continue;
                    }

                    reported += 1;
                    self.breaker.add_error(line);

                    if signal.is_tripped() {
                        trips += 1;
                        tracing::error!(
                            breaker = %self.breaker.name(),
                            limit = self.breaker.config().limit,
                            cooldown_ms = self.breaker.config().cooldown_ms,
                            "Error rate limit reached"
                        );
                        if !self.watch.rearm {
                            break Ok(ExitReason::Tripped);
                        }
                        self.breaker.activate();
                        signal = self.breaker.trip_signal();
                    }
                }
                _ = shutdown.recv() => {
                    break Ok(ExitReason::Shutdown);
                }
            }
        };

        self.breaker.deactivate();

        let reason = match outcome {
            Ok(reason) => reason,
            Err(e) => {
                tracing::error!(breaker = %self.breaker.name(), error = %e, "Watchdog input failed");
                return Err(e);
            }
        };

        tracing::info!(
            breaker = %self.breaker.name(),
            reason = ?reason,
            reported,
            trips,
            "Watchdog stopped"
        );

        Ok(RunSummary {
            reason,
            reported,
            trips,
        })
    }
}
