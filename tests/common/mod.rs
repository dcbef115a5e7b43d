//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rate_breaker::{BreakerConfig, BreakerLog, RateCircuitBreaker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warn,
    Debug,
}

/// A `BreakerLog` that keeps every line for inspection.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(Level, String, String)>>,
}

impl RecordingLog {
    pub fn warnings(&self) -> Vec<String> {
        self.messages(Level::Warn)
    }

    #[allow(dead_code)]
    pub fn debugs(&self) -> Vec<String> {
        self.messages(Level::Debug)
    }

    #[allow(dead_code)]
    pub fn breakers(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap();
        entries.iter().map(|(_, breaker, _)| breaker.clone()).collect()
    }

    fn messages(&self, level: Level) -> Vec<String> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .filter(|(l, _, _)| *l == level)
            .map(|(_, _, message)| message.clone())
            .collect()
    }

    fn push(&self, level: Level, breaker: &str, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, breaker.to_string(), message.to_string()));
    }
}

impl BreakerLog for RecordingLog {
    fn warn(&self, breaker: &str, message: &str) {
        self.push(Level::Warn, breaker, message);
    }

    fn debug(&self, breaker: &str, message: &str) {
        self.push(Level::Debug, breaker, message);
    }
}

/// Build a breaker on the current runtime with a recording log.
#[allow(dead_code)]
pub fn recorded_breaker(
    limit: usize,
    cooldown: Duration,
) -> (RateCircuitBreaker<String>, Arc<RecordingLog>) {
    let log = Arc::new(RecordingLog::default());
    let breaker = RateCircuitBreaker::new(
        BreakerConfig::new("smtp", limit, cooldown),
        log.clone(),
    )
    .unwrap();
    (breaker, log)
}
