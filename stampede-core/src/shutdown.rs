//! Run-level stop signal and bounded grace waiting
//!
//! One controller per run broadcasts the stop signal; every worker holds a
//! [`StopSignal`] and observes it cooperatively at the top of each loop
//! iteration. In-flight calls finish or time out naturally.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::warn;

/// Broadcasts the run-level stop signal
pub struct StopController {
    sender: broadcast::Sender<()>,
}

impl StopController {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Signal every subscribed worker to stop
    pub fn signal(&self) {
        // Send fails only when nothing subscribes, which is fine
        let _ = self.sender.send(());
    }

    pub fn subscribe(&self) -> StopSignal {
        StopSignal {
            receiver: self.sender.subscribe(),
            stopped: false,
        }
    }
}

impl Default for StopController {
    fn default() -> Self {
        Self::new()
    }
}

/// A worker's view of the stop signal
pub struct StopSignal {
    receiver: broadcast::Receiver<()>,
    stopped: bool,
}

impl StopSignal {
    /// Non-blocking check, intended for the top of a worker loop
    pub fn is_stopped(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        match self.receiver.try_recv() {
            Ok(()) => {
                self.stopped = true;
                true
            }
            Err(broadcast::error::TryRecvError::Empty) => false,
            // Lagged or closed both mean the run is over
            Err(_) => {
                self.stopped = true;
                true
            }
        }
    }

    /// Suspend until the signal fires
    pub async fn wait(&mut self) {
        if !self.stopped {
            let _ = self.receiver.recv().await;
            self.stopped = true;
        }
    }

    /// A pre-fired signal, for components that should run exactly one pass
    pub fn already_stopped() -> Self {
        let (sender, receiver) = broadcast::channel(1);
        drop(sender);
        Self {
            receiver,
            stopped: true,
        }
    }
}

impl Clone for StopSignal {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.resubscribe(),
            stopped: self.stopped,
        }
    }
}

/// Wait for worker tasks to finish, up to the grace period. Whatever is
/// still running afterwards gets aborted so teardown can proceed.
pub async fn drain_with_grace(set: &mut JoinSet<()>, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;

    while !set.is_empty() {
        match tokio::time::timeout_at(deadline, set.join_next()).await {
            Ok(Some(Ok(()))) => {}
            Ok(Some(Err(error))) => {
                if !error.is_cancelled() {
                    warn!(%error, "worker task did not finish cleanly");
                }
            }
            Ok(None) => break,
            Err(_) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    workers = set.len(),
                    "grace period elapsed with workers still running; forcing teardown"
                );
                set.abort_all();
                while set.join_next().await.is_some() {}
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signal_observed_by_all_subscribers() {
        let controller = StopController::new();
        let mut first = controller.subscribe();
        let mut second = controller.subscribe();

        assert!(!first.is_stopped());
        assert!(!second.is_stopped());

        controller.signal();

        assert!(first.is_stopped());
        assert!(second.is_stopped());
        // Sticky once observed
        assert!(first.is_stopped());
    }

    #[tokio::test]
    async fn test_dropped_controller_counts_as_stop() {
        let controller = StopController::new();
        let mut signal = controller.subscribe();
        drop(controller);
        assert!(signal.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_with_grace_aborts_stragglers() {
        let mut set = JoinSet::new();
        set.spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });

        drain_with_grace(&mut set, Duration::from_secs(5)).await;
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_drain_with_grace_absorbs_panicked_workers() {
        let mut set = JoinSet::new();
        set.spawn(async { panic!("worker blew up") });
        set.spawn(async {});

        drain_with_grace(&mut set, Duration::from_secs(5)).await;
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_drain_with_grace_joins_finished_workers() {
        let mut set = JoinSet::new();
        for _ in 0..4 {
            set.spawn(async {});
        }

        drain_with_grace(&mut set, Duration::from_secs(5)).await;
        assert!(set.is_empty());
    }
}
