//! Single-shot, re-armable reminder.
//!
//! Each `arm` spawns a sleeping task that runs the callback with the token it
//! was armed under. Cancellation stops the task, and because a fired callback
//! only *delivers* its token, the owner must still `accept` the token before
//! acting on it. A token that was superseded between firing and processing is
//! therefore rejected.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifies one arming of a [`ReminderTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReminderToken(u64);

#[derive(Debug, Default)]
pub struct ReminderTimer {
    armed: Option<(ReminderToken, CancellationToken)>,
}

impl ReminderTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any outstanding reminder and schedules `callback` after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<F>(&mut self, delay: Duration, callback: F) -> ReminderToken
    where
        F: FnOnce(ReminderToken) + Send + 'static,
    {
        self.cancel();

        let token = ReminderToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();
        let cancelled = cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {
                    trace!("Reminder {:?} cancelled", token);
                }
                _ = tokio::time::sleep(delay) => {
                    trace!("Reminder {:?} fired", token);
                    callback(token);
                }
            }
        });

        debug!("Reminder {:?} armed for {:?}", token, delay);
        self.armed = Some((token, cancel));
        token
    }

    /// Cancels the outstanding reminder, if any. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some((token, cancel)) => {
                cancel.cancel();
                debug!("Reminder {:?} disarmed", token);
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Consumes a fired token. Only the live token is accepted, after which
    /// the timer is no longer armed.
    pub fn accept(&mut self, token: ReminderToken) -> bool {
        match &self.armed {
            Some((live, _)) if *live == token => {
                self.armed = None;
                true
            }
            _ => {
                debug!("Ignoring stale reminder {:?}", token);
                false
            }
        }
    }
}

impl Drop for ReminderTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    fn sender() -> (
        mpsc::UnboundedSender<ReminderToken>,
        mpsc::UnboundedReceiver<ReminderToken>,
    ) {
        mpsc::unbounded_channel()
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = sender();
        let mut timer = ReminderTimer::new();
        let start = Instant::now();

        let token = timer.arm(Duration::from_secs(30), move |t| {
            let _ = tx.send(t);
        });

        assert_eq!(rx.recv().await, Some(token));
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert!(timer.accept(token));
        assert!(!timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let (tx, mut rx) = sender();
        let mut timer = ReminderTimer::new();

        timer.arm(Duration::from_secs(30), move |t| {
            let _ = tx.send(t);
        });
        assert!(timer.cancel());
        assert!(!timer.cancel());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_previous() {
        let (tx, mut rx) = sender();
        let mut timer = ReminderTimer::new();

        let first_tx = tx.clone();
        let first = timer.arm(Duration::from_secs(10), move |t| {
            let _ = first_tx.send(t);
        });
        let second = timer.arm(Duration::from_secs(20), move |t| {
            let _ = tx.send(t);
        });
        assert_ne!(first, second);

        assert_eq!(rx.recv().await, Some(second));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_token_rejected() {
        let (tx, mut rx) = sender();
        let mut timer = ReminderTimer::new();

        let stale = timer.arm(Duration::from_secs(1), move |t| {
            let _ = tx.send(t);
        });
        assert_eq!(rx.recv().await, Some(stale));

        // Re-armed before the fired token was processed
        let live = timer.arm(Duration::from_secs(30), |_| {});
        assert!(!timer.accept(stale));
        assert!(timer.is_armed());
        assert!(timer.accept(live));
    }
}
