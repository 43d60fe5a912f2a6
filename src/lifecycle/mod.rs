//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Register signals → Spawn child (process.rs) → Detach signal activity → Wait for child
//!
//! Signals (signals.rs):
//!     SIGCONT/SIGHUP/SIGINT/SIGQUIT/SIGTERM/SIGTSTP/SIGUSR1/SIGUSR2
//!     → bounded queue (capacity 1)
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGQUIT/SIGTERM → wait for linked containers → optional delay → forward
//!     anything else → forward immediately
//! ```
//!
//! # Design Decisions
//! - One signal handled at a time, in arrival order
//! - An in-progress linked-container wait is never pre-empted
//! - Exit code follows shell convention (128 + signal)

pub mod process;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use process::{ChildHandle, ChildProcess, ExitReport, ProcessError, Termination};
pub use shutdown::{ShutdownPolicy, SignalCoordinator};
pub use startup::Supervisor;
