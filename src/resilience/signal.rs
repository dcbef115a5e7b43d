//! One-shot trip notification.

use tokio::sync::watch;

/// Broadcast-once signal that a breaker cycle tripped.
///
/// Every clone observes the same cycle. Once fired it stays fired, for
/// current and future observers alike. If the cycle ends without a trip
/// (deactivation or reactivation) the signal closes unfired.
#[derive(Debug, Clone)]
pub struct TripSignal {
    rx: watch::Receiver<bool>,
}

impl TripSignal {
    /// Create the sender half and the signal for a new cycle.
    pub(crate) fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// A signal that never fires. Used before the first activation.
    pub(crate) fn closed() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    /// Return true if the cycle has tripped.
    pub fn is_tripped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the cycle trips.
    ///
    /// Resolves `true` on trip (immediately if already fired) and `false`
    /// if the cycle ended without tripping. Wrap in `tokio::time::timeout`
    /// to bound the wait.
    pub async fn tripped(&self) -> bool {
        let mut rx = self.rx.clone();
        let fired = rx.wait_for(|fired| *fired).await.is_ok();
        fired
    }
}
