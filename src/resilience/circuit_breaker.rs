//! Rate-based circuit breaker.
//!
//! Counts reported errors and trips once `limit` of them arrive inside one
//! sliding window: every error pushes the reset point `cooldown` into the
//! future, so the count only returns to zero after a full quiet period.
//!
//! # States
//! - Inactive: reports are ignored
//! - Active: reports are counted
//! - Tripped: limit reached, signal fired, reports ignored until `activate`
//!
//! # State Transitions
//! ```text
//! Inactive → Active: activate() (count = 0, fresh trip signal)
//! Active → Active:   add_error() with count + 1 < limit (timer rearmed)
//! Active → Active:   cooldown elapses with no new error (count = 0)
//! Active → Tripped:  add_error() with count + 1 == limit (signal fired)
//! Active → Inactive: deactivate() (count = 0, timer cancelled)
//! Tripped → Active:  activate() (new cycle, new signal)
//! ```
//!
//! # Locking
//! - The count lock guards the error log, the active flag, the rearm
//!   generation and the trip sender. Every transition happens under it.
//! - The timer lock guards the pending reset task. It is only ever taken
//!   while the count lock is held, so the order is always count → timer.
//! - A reset task takes only the count lock, and clears the log only if the
//!   rearm generation it was spawned with is still current.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::validation::validate_breaker;
use crate::config::BreakerConfig;
use crate::observability::logging::BreakerLog;
use crate::observability::metrics;
use crate::resilience::error::{BreakerError, BreakerResult};
use crate::resilience::signal::TripSignal;

/// Rate-based circuit breaker.
///
/// Cheap to clone; all clones drive the same breaker. Safe to use from any
/// thread, inside or outside the runtime it was built with.
pub struct RateCircuitBreaker<E> {
    inner: Arc<Inner<E>>,
}

struct Inner<E> {
    config: BreakerConfig,
    cooldown: Duration,
    log: Arc<dyn BreakerLog>,
    runtime: Handle,
    /// Count lock.
    state: Mutex<CycleState<E>>,
    /// Timer lock. Holds the pending reset task, if any.
    timer: Mutex<Option<JoinHandle<()>>>,
}

struct CycleState<E> {
    active: bool,
    errors: Vec<E>,
    /// Bumped on every rearm and cycle end; stale reset tasks compare against it.
    rearm: u64,
    cycle: u64,
    /// Present while the cycle is alive and has not tripped.
    trip_tx: Option<watch::Sender<bool>>,
    signal: TripSignal,
}

enum Outcome {
    Ignored,
    Counted,
    Tripped { cycle: u64, errors: String },
}

impl<E> RateCircuitBreaker<E>
where
    E: fmt::Debug + Send + 'static,
{
    /// Create a breaker whose reset timers run on the current Tokio runtime.
    ///
    /// The breaker starts inactive.
    pub fn new(config: BreakerConfig, log: Arc<dyn BreakerLog>) -> BreakerResult<Self> {
        let runtime = Handle::try_current().map_err(|_| BreakerError::NoRuntime)?;
        Self::with_handle(config, log, runtime)
    }

    /// Create a breaker whose reset timers run on `runtime`.
    pub fn with_handle(
        config: BreakerConfig,
        log: Arc<dyn BreakerLog>,
        runtime: Handle,
    ) -> BreakerResult<Self> {
        validate_breaker(&config).map_err(BreakerError::InvalidConfig)?;

        Ok(Self {
            inner: Arc::new(Inner {
                cooldown: config.cooldown(),
                config,
                log,
                runtime,
                state: Mutex::new(CycleState {
                    active: false,
                    errors: Vec::new(),
                    rearm: 0,
                    cycle: 0,
                    trip_tx: None,
                    signal: TripSignal::closed(),
                }),
                timer: Mutex::new(None),
            }),
        })
    }

    /// Breaker name from the config.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Breaker configuration.
    pub fn config(&self) -> &BreakerConfig {
        &self.inner.config
    }

    /// Start a counting cycle.
    ///
    /// A cycle that is still alive is ended first: its pending reset is
    /// cancelled and its signal closes without firing.
    pub fn activate(&self) {
        let mut state = self.inner.lock_state();
        let superseded = state.active;
        if superseded {
            self.inner.end_cycle(&mut state);
        }

        let (tx, signal) = TripSignal::channel();
        state.trip_tx = Some(tx);
        state.signal = signal;
        state.active = true;
        state.cycle += 1;
        let cycle = state.cycle;
        drop(state);

        metrics::record_count(self.name(), 0);
        if superseded {
            self.inner.log.debug(
                self.name(),
                &format!("cycle {} ended by reactivation", cycle - 1),
            );
        }
        self.inner.log.debug(
            self.name(),
            &format!(
                "cycle {} started (limit {}, cooldown {:?})",
                cycle, self.inner.config.limit, self.inner.cooldown
            ),
        );
    }

    /// Stop counting and cancel any pending reset.
    ///
    /// No-op when already inactive, including after a trip.
    pub fn deactivate(&self) {
        let mut state = self.inner.lock_state();
        if !state.active {
            return;
        }
        self.inner.end_cycle(&mut state);
        let cycle = state.cycle;
        drop(state);

        metrics::record_count(self.name(), 0);
        self.inner
            .log
            .debug(self.name(), &format!("cycle {} deactivated", cycle));
    }

    /// Return true while error reports are being counted.
    pub fn is_active(&self) -> bool {
        self.inner.lock_state().active
    }

    /// Number of errors in the current window.
    pub fn current(&self) -> usize {
        self.inner.lock_state().errors.len()
    }

    /// The current (or most recent) cycle's trip signal.
    pub fn trip_signal(&self) -> TripSignal {
        self.inner.lock_state().signal.clone()
    }

    /// Report one error.
    ///
    /// Ignored while inactive. Never blocks beyond lock contention.
    pub fn add_error(&self, err: E) {
        let outcome = {
            let mut state = self.inner.lock_state();
            if !state.active {
                Outcome::Ignored
            } else {
                state.errors.push(err);
                state.rearm = state.rearm.wrapping_add(1);
                let count = state.errors.len();
                metrics::record_error(self.name(), count);

                if count >= self.inner.config.limit {
                    let errors = format!("{:?}", state.errors);
                    if let Some(tx) = state.trip_tx.take() {
                        tx.send_replace(true);
                    }
                    self.inner.end_cycle(&mut state);
                    Outcome::Tripped {
                        cycle: state.cycle,
                        errors,
                    }
                } else {
                    self.schedule_reset(state.rearm);
                    Outcome::Counted
                }
            }
        };

        if let Outcome::Tripped { cycle, errors } = outcome {
            metrics::record_trip(self.name());
            self.inner.log.warn(
                self.name(),
                &format!(
                    "tripped: {} errors within {:?} of each other in cycle {}: {}",
                    self.inner.config.limit, self.inner.cooldown, cycle, errors
                ),
            );
        }
    }

    /// Report the error side of `result`, then hand it back unchanged.
    pub fn observe<T>(&self, result: Result<T, E>) -> Result<T, E>
    where
        E: Clone,
    {
        if let Err(err) = &result {
            self.add_error(err.clone());
        }
        result
    }

    /// Replace the pending reset task. Caller holds the count lock.
    fn schedule_reset(&self, generation: u64) {
        let weak = Arc::downgrade(&self.inner);
        let cooldown = self.inner.cooldown;
        let task = self.inner.runtime.spawn(async move {
            tokio::time::sleep(cooldown).await;
            reset_if_current(&weak, generation);
        });

        if let Some(previous) = self.inner.lock_timer().replace(task) {
            previous.abort();
        }
    }
}

fn reset_if_current<E>(weak: &Weak<Inner<E>>, generation: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };

    let mut state = inner.lock_state();
    if !state.active || state.rearm != generation || state.errors.is_empty() {
        return;
    }
    let cleared = state.errors.len();
    state.errors.clear();
    // The finished task is our own handle; dropping it just detaches.
    inner.lock_timer().take();
    drop(state);

    metrics::record_reset(&inner.config.name);
    inner.log.debug(
        &inner.config.name,
        &format!(
            "cooldown of {:?} elapsed, cleared {} error(s)",
            inner.cooldown, cleared
        ),
    );
}

impl<E> Inner<E> {
    fn lock_state(&self) -> MutexGuard<'_, CycleState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shared cleanup for trip, deactivation and reactivation.
    ///
    /// Caller holds the count lock. A fired signal is left as is; an
    /// unfired one closes when its sender drops here.
    fn end_cycle(&self, state: &mut CycleState<E>) {
        state.active = false;
        state.errors.clear();
        state.rearm = state.rearm.wrapping_add(1);
        state.trip_tx = None;

        if let Some(task) = self.lock_timer().take() {
            task.abort();
        }
    }
}

impl<E> Drop for Inner<E> {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = timer.take() {
            task.abort();
        }
    }
}

impl<E> Clone for RateCircuitBreaker<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for RateCircuitBreaker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock_state();
        f.debug_struct("RateCircuitBreaker")
            .field("name", &self.inner.config.name)
            .field("limit", &self.inner.config.limit)
            .field("cooldown", &self.inner.cooldown)
            .field("active", &state.active)
            .field("current", &state.errors.len())
            .field("cycle", &state.cycle)
            .finish()
    }
}

/// Shareable breaker reference for string-typed error reports.
pub type SharedBreaker = RateCircuitBreaker<String>;
