//! Shutdown coordination: the signal forwarding loop.

use std::sync::Arc;
use std::time::Duration;

use nix::sys::signal::Signal;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::health::LinkedContainerWaiter;
use crate::lifecycle::process::SignalTarget;
use crate::lifecycle::signals::is_graceful_shutdown;
use crate::metadata::TaskStatusProvider;

/// Settings the coordinator applies to graceful shutdown signals.
#[derive(Debug, Clone, Default)]
pub struct ShutdownPolicy {
    pub linked_containers: Vec<String>,
    pub stop_wait_timeout: Duration,
    pub forwarding_delay: Duration,
}

/// Coordinator for forwarding signals to the child.
///
/// Handles one signal at a time. A graceful shutdown signal first waits for
/// the linked containers (and the forwarding delay); a second signal arriving
/// meanwhile stays queued and does not cut the wait short.
pub struct SignalCoordinator<P, T> {
    waiter: LinkedContainerWaiter<P>,
    policy: ShutdownPolicy,
    target: T,
}

impl<P: TaskStatusProvider, T: SignalTarget> SignalCoordinator<P, T> {
    pub fn new(provider: Arc<P>, policy: ShutdownPolicy, target: T) -> Self {
        Self {
            waiter: LinkedContainerWaiter::new(provider),
            policy,
            target,
        }
    }

    /// Drain the signal queue for the lifetime of the process.
    pub async fn run(self, mut queue: mpsc::Receiver<Signal>) {
        while let Some(sig) = queue.recv().await {
            self.handle(sig).await;
        }
        tracing::debug!("Signal queue closed");
    }

    /// Handle a single signal end to end.
    pub async fn handle(&self, sig: Signal) {
        let received_at = Instant::now();

        if is_graceful_shutdown(sig) {
            self.waiter
                .wait_for_linked_containers(
                    &self.policy.linked_containers,
                    self.policy.stop_wait_timeout,
                )
                .await;

            if !self.policy.forwarding_delay.is_zero() {
                tracing::debug!(
                    delay_secs = self.policy.forwarding_delay.as_secs(),
                    "Delaying signal forwarding"
                );
                tokio::time::sleep(self.policy.forwarding_delay).await;
            }
        }

        tracing::debug!(
            signal = ?sig,
            held_ms = received_at.elapsed().as_millis() as u64,
            "Send signal to child process"
        );

        if let Err(e) = self.target.deliver(sig) {
            tracing::warn!(error = %e, "Failed to forward signal");
        }
    }
}
