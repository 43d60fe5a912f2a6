//! Linked container health subsystem.
//!
//! # Data Flow
//! ```text
//! Graceful signal received (lifecycle::shutdown)
//!     → linked.rs: deadline = now + stop-wait timeout
//!     → poll metadata every second
//!     → all linked STOPPED? return : keep polling
//!     → deadline reached? warn and return
//! ```
//!
//! # Design Decisions
//! - A failed poll is never fatal; shutdown must not get stuck on the agent
//! - Timing out is not an error, the signal is forwarded anyway
//! - Fixed interval, no backoff

pub mod linked;

pub use linked::{LinkedContainerWaiter, WaitOutcome, POLL_INTERVAL};
