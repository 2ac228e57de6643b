//! Acknowledgment window for set-power requests.
//!
//! Every set-power request is acknowledged a fixed time after it arrives,
//! whatever the remote is doing. Only one acknowledgment may be pending per
//! device: arming a new one aborts the previous timer, whose caller then sees
//! [`AckError::Cancelled`] instead of a success.
//!
//! The timer task owns the acknowledgment and fires it itself, so it keeps
//! running if the actor stops because every handle was dropped. Only an
//! explicit cancel (a newer request or a shutdown) withholds it.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::AckError;

/// Resolves when a set-power request is acknowledged.
///
/// Yields `Ok(())` once the acknowledgment window has elapsed, or
/// `Err(AckError::Cancelled)` if a newer request superseded this one or the
/// device actor was shut down first.
#[derive(Debug)]
#[must_use = "an acknowledgment does nothing unless awaited"]
pub struct Acknowledgment {
    rx: oneshot::Receiver<()>,
}

impl Acknowledgment {
    pub(crate) fn channel() -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { rx })
    }
}

impl Future for Acknowledgment {
    type Output = Result<(), AckError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.map_err(|_| AckError::Cancelled))
    }
}

/// Cancel-and-replace holder for the pending acknowledgment timer.
#[derive(Debug, Default)]
pub(crate) struct AckTimer {
    pending: Option<JoinHandle<()>>,
}

impl AckTimer {
    /// Abort any pending acknowledgment and arm a new one for `ack`.
    pub(crate) fn arm(&mut self, ack: oneshot::Sender<()>, window: Duration) {
        self.cancel();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // The caller may have stopped waiting; that is fine.
            let _ = ack.send(());
        }));
    }

    /// Abort the pending acknowledgment without firing it.
    ///
    /// Returns whether one was still pending.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(timer) if !timer.is_finished() => {
                timer.abort();
                true
            }
            _ => false,
        }
    }

    /// Let the pending acknowledgment fire on its own schedule.
    ///
    /// Returns whether one was still pending.
    pub(crate) fn detach(&mut self) -> bool {
        self.pending.take().is_some_and(|timer| !timer.is_finished())
    }

    /// Whether an acknowledgment is pending.
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|timer| !timer.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_after_window() {
        let mut timer = AckTimer::default();
        let (ack_tx, ack) = Acknowledgment::channel();

        let start = tokio::time::Instant::now();
        timer.arm(ack_tx, Duration::from_secs(30));
        assert!(timer.is_pending());

        assert_eq!(ack.await, Ok(()));
        assert!(start.elapsed() >= Duration::from_secs(30));
        tokio::task::yield_now().await;
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_cancels_previous() {
        let mut timer = AckTimer::default();

        let (first_tx, first) = Acknowledgment::channel();
        timer.arm(first_tx, Duration::from_secs(30));

        let (second_tx, second) = Acknowledgment::channel();
        timer.arm(second_tx, Duration::from_secs(30));

        assert_eq!(first.await, Err(AckError::Cancelled));
        assert!(timer.is_pending());
        assert_eq!(second.await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_ack() {
        let mut timer = AckTimer::default();
        let (ack_tx, ack) = Acknowledgment::channel();
        timer.arm(ack_tx, Duration::from_secs(30));

        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(ack.await, Err(AckError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn detached_ack_still_fires() {
        let mut timer = AckTimer::default();
        let (ack_tx, ack) = Acknowledgment::channel();
        timer.arm(ack_tx, Duration::from_secs(30));

        assert!(timer.detach());
        drop(timer);
        assert_eq!(ack.await, Ok(()));
    }
}
