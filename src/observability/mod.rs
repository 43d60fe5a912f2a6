//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing macros (structured events)
//!     → logging.rs subscriber (stdout, shared with the child's output)
//! ```
//!
//! # Design Decisions
//! - The level is fixed once at startup from `-v` (or RUST_LOG) and never
//!   changed afterwards
//! - Fatal startup errors go to stderr directly, not through the logger

pub mod logging;

pub use logging::init_logging;
