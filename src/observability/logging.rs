//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem once per process
//! - Map `-v` counts to a level: none → info, `-v` → debug, `-vv` → trace
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - RUST_LOG, when set, overrides the verbosity flags
//! - Logs go to stdout like the wrapped process's own output

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level for a given number of `-v` flags.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Filter directive for this crate at the given verbosity.
pub fn default_directive(verbosity: u8) -> String {
    format!(
        "ecswrap={}",
        level_for_verbosity(verbosity).to_string().to_lowercase()
    )
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .try_init();
}
