//! End-to-end behaviour of the rate breaker: thresholds, cooldown resets,
//! cycle management and the diagnostics it routes through its log.

use std::time::Duration;

use tokio::time::{sleep, timeout};

mod common;

use common::recorded_breaker;

#[tokio::test(start_paused = true)]
async fn test_reference_scenario_cooldown_prevents_trip() {
    let (cb, log) = recorded_breaker(3, Duration::from_secs(3));
    cb.activate();
    let signal = cb.trip_signal();

    cb.add_error("e1".into());
    assert_eq!(cb.current(), 1);

    sleep(Duration::from_secs(4)).await;
    assert_eq!(cb.current(), 0);

    cb.add_error("e2".into());
    sleep(Duration::from_secs(4)).await;
    cb.add_error("e3".into());
    cb.add_error("e4".into());

    assert!(!signal.is_tripped());
    assert!(cb.is_active());
    assert_eq!(cb.current(), 2);
    assert!(log.warnings().is_empty());
}

#[tokio::test]
async fn test_reference_scenario_quick_burst_trips() {
    let (cb, log) = recorded_breaker(3, Duration::from_secs(3));
    cb.activate();
    let signal = cb.trip_signal();

    cb.add_error("e1".into());
    cb.add_error("e2".into());
    cb.add_error("e3".into());

    assert_eq!(timeout(Duration::from_millis(10), signal.tripped()).await, Ok(true));
    assert_eq!(cb.current(), 0);
    assert!(!cb.is_active());

    let warnings = log.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("\"e1\""));
    assert!(warnings[0].contains("\"e3\""));
}

#[tokio::test(start_paused = true)]
async fn test_sliding_window_is_not_a_fixed_bucket() {
    let (cb, _log) = recorded_breaker(4, Duration::from_secs(3));
    cb.activate();
    let signal = cb.trip_signal();

    // Three errors two seconds apart: four seconds span the burst.
    cb.add_error("a".into());
    sleep(Duration::from_secs(2)).await;
    cb.add_error("b".into());
    sleep(Duration::from_secs(2)).await;
    cb.add_error("c".into());
    assert_eq!(cb.current(), 3);

    sleep(Duration::from_millis(3500)).await;
    assert_eq!(cb.current(), 0);
    assert!(!signal.is_tripped());
}

#[tokio::test(start_paused = true)]
async fn test_spaced_errors_still_trip_when_each_gap_is_short() {
    let (cb, _log) = recorded_breaker(3, Duration::from_secs(3));
    cb.activate();
    let signal = cb.trip_signal();

    cb.add_error("a".into());
    sleep(Duration::from_millis(2500)).await;
    cb.add_error("b".into());
    sleep(Duration::from_millis(2500)).await;
    cb.add_error("c".into());

    assert!(signal.tripped().await);
}

#[tokio::test(start_paused = true)]
async fn test_reset_is_logged_through_injected_log() {
    let (cb, log) = recorded_breaker(3, Duration::from_secs(3));
    cb.activate();
    cb.add_error("a".into());

    sleep(Duration::from_secs(4)).await;

    assert!(log
        .debugs()
        .iter()
        .any(|line| line.contains("cleared 1 error(s)")));
    assert!(log.breakers().iter().all(|name| name == "smtp"));
}

#[tokio::test]
async fn test_deactivation_stops_counting_until_reactivated() {
    let (cb, _log) = recorded_breaker(2, Duration::from_secs(3));
    cb.activate();
    cb.deactivate();

    for i in 0..5 {
        cb.add_error(format!("ignored {}", i));
    }
    assert_eq!(cb.current(), 0);
    assert!(!cb.trip_signal().is_tripped());

    cb.activate();
    cb.add_error("counted".into());
    assert_eq!(cb.current(), 1);
}

#[tokio::test]
async fn test_never_activated_breaker_is_inert() {
    let (cb, log) = recorded_breaker(1, Duration::from_secs(3));
    cb.deactivate();
    cb.deactivate();
    cb.add_error("a".into());

    assert_eq!(cb.current(), 0);
    assert!(!cb.is_active());
    assert_eq!(
        timeout(Duration::from_millis(10), cb.trip_signal().tripped()).await,
        Ok(false)
    );
    assert!(log.warnings().is_empty());
}

#[tokio::test]
async fn test_deactivate_closes_unfired_signal() {
    let (cb, _log) = recorded_breaker(3, Duration::from_secs(3));
    cb.activate();
    let signal = cb.trip_signal();
    let waiter = tokio::spawn(async move { signal.tripped().await });

    cb.add_error("a".into());
    cb.deactivate();

    assert!(!waiter.await.unwrap());
}

#[tokio::test]
async fn test_waiters_registered_before_trip_are_released() {
    let (cb, _log) = recorded_breaker(2, Duration::from_secs(3));
    cb.activate();

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let signal = cb.trip_signal();
            tokio::spawn(async move { signal.tripped().await })
        })
        .collect();

    cb.add_error("a".into());
    cb.add_error("b".into());

    for waiter in waiters {
        assert!(waiter.await.unwrap());
    }
    // Late observers of the same cycle see it too.
    assert!(cb.trip_signal().tripped().await);
}

#[tokio::test(start_paused = true)]
async fn test_reactivation_after_trip_starts_clean_cycle() {
    let (cb, log) = recorded_breaker(2, Duration::from_secs(3));
    cb.activate();
    let first = cb.trip_signal();
    cb.add_error("a".into());
    cb.add_error("b".into());
    assert!(first.is_tripped());

    cb.activate();
    let second = cb.trip_signal();
    cb.add_error("c".into());
    sleep(Duration::from_secs(4)).await;
    assert_eq!(cb.current(), 0);
    assert!(!second.is_tripped());
    assert!(first.is_tripped());
    assert_eq!(log.warnings().len(), 1);
}
