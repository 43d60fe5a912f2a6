//! Linked container stop detection.
//!
//! # Responsibilities
//! - Poll the task metadata endpoint on a fixed interval
//! - Return once every linked container reports `STOPPED`
//! - Give up at the deadline and let shutdown proceed anyway

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::metadata::TaskStatusProvider;

/// Interval between metadata polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Deadline offset used when a timeout does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// How a linked-container wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Every linked container reported `STOPPED`.
    AllStopped,
    /// The deadline passed first.
    TimedOut,
}

pub struct LinkedContainerWaiter<P> {
    provider: Arc<P>,
}

impl<P: TaskStatusProvider> LinkedContainerWaiter<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Wait until all of `linked` have stopped or `timeout` elapses.
    ///
    /// The first poll happens immediately and then every second. The deadline
    /// is checked before each poll, so a zero timeout returns without polling.
    /// A fetch that hangs delays the deadline check until it returns.
    pub async fn wait_for_linked_containers(
        &self,
        linked: &[String],
        timeout: Duration,
    ) -> WaitOutcome {
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE);
        let expiry = time::sleep_until(deadline);
        tokio::pin!(expiry);

        let mut ticker = time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = &mut expiry => return timed_out(linked, timeout),
                _ = ticker.tick() => {
                    if Instant::now() >= deadline {
                        return timed_out(linked, timeout);
                    }

                    let task = match self.provider.fetch_task().await {
                        Ok(task) => task,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to get ECS task information");
                            continue;
                        }
                    };

                    for container in &task.containers {
                        tracing::trace!(
                            name = %container.name,
                            desired_status = %container.desired_status,
                            known_status = %container.known_status,
                            "Container status"
                        );
                    }

                    if task.linked_containers_stopped(linked) {
                        tracing::debug!("All linked containers have stopped");
                        return WaitOutcome::AllStopped;
                    }
                }
            }
        }
    }
}

fn timed_out(linked: &[String], timeout: Duration) -> WaitOutcome {
    tracing::warn!(
        timeout_secs = timeout.as_secs(),
        linked = ?linked,
        "Linked containers didn't stop within {} seconds",
        timeout.as_secs()
    );
    WaitOutcome::TimedOut
}
