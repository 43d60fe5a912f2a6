//! ECS signal-forwarding wrapper library.
//!
//! Runs a command as a child process and forwards signals to it. SIGINT,
//! SIGQUIT and SIGTERM are held until the task's linked containers report
//! `STOPPED` (or a timeout passes), so e.g. a fluentd sidecar keeps accepting
//! logs until the application containers sending to it have stopped.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod metadata;
pub mod observability;

pub use config::WrapperConfig;
pub use lifecycle::Supervisor;
