//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for every forwardable signal
//! - Feed received signals, in arrival order, into the coordinator's queue
//! - Classify SIGINT/SIGQUIT/SIGTERM as graceful shutdown signals
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The queue holds one signal. While the coordinator is busy with a
//!   graceful wait, one more signal waits in the slot and the listener blocks
//!   on the next; the kernel and Tokio coalesce repeats of the same signal
//!   meanwhile.
//! - Signals outside the set keep their default disposition

use std::future::poll_fn;
use std::task::Poll;

use nix::sys::signal::Signal;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

/// Signals forwarded to the child.
pub const FORWARDABLE_SIGNALS: [Signal; 8] = [
    Signal::SIGCONT,
    Signal::SIGHUP,
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTERM,
    Signal::SIGTSTP,
    Signal::SIGUSR1,
    Signal::SIGUSR2,
];

/// Capacity of the queue between listener and coordinator.
pub const SIGNAL_QUEUE_CAPACITY: usize = 1;

/// Signals that wait for linked containers before being forwarded.
pub fn is_graceful_shutdown(signal: Signal) -> bool {
    matches!(signal, Signal::SIGINT | Signal::SIGQUIT | Signal::SIGTERM)
}

/// Create the bounded signal queue.
pub fn signal_queue() -> (mpsc::Sender<Signal>, mpsc::Receiver<Signal>) {
    mpsc::channel(SIGNAL_QUEUE_CAPACITY)
}

/// Registered interest in [`FORWARDABLE_SIGNALS`].
pub struct SignalListener {
    streams: Vec<(Signal, tokio::signal::unix::Signal)>,
}

impl SignalListener {
    /// Install handlers. Must be called inside a Tokio runtime.
    pub fn register() -> std::io::Result<Self> {
        let streams = FORWARDABLE_SIGNALS
            .iter()
            .map(|&sig| -> std::io::Result<_> {
                Ok((sig, signal(SignalKind::from_raw(sig as i32))?))
            })
            .collect::<std::io::Result<Vec<_>>>()?;

        tracing::debug!(signals = ?FORWARDABLE_SIGNALS, "Registered signal handlers");
        Ok(Self { streams })
    }

    /// Wait for the next signal.
    ///
    /// Returns `None` only if every handler has been torn down.
    pub async fn recv(&mut self) -> Option<Signal> {
        poll_fn(|cx| {
            let mut open = false;
            for (sig, stream) in self.streams.iter_mut() {
                match stream.poll_recv(cx) {
                    Poll::Ready(Some(())) => return Poll::Ready(Some(*sig)),
                    Poll::Ready(None) => {}
                    Poll::Pending => open = true,
                }
            }
            if open {
                Poll::Pending
            } else {
                Poll::Ready(None)
            }
        })
        .await
    }

    /// Push received signals into `queue` until the coordinator goes away.
    pub async fn pump(mut self, queue: mpsc::Sender<Signal>) {
        while let Some(sig) = self.recv().await {
            tracing::debug!(signal = ?sig, "Received signal");
            if queue.send(sig).await.is_err() {
                break;
            }
        }
    }
}
