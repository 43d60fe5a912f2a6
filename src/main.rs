//! ecswrap: run a command and forward signals to it once linked ECS
//! containers have stopped.
//!
//! ```text
//! ecswrap [OPTIONS] -- COMMAND [ARGS]...
//!
//!   SIGTERM ─▶ ecswrap ─▶ poll ${ECS_CONTAINER_METADATA_URI}/task
//!                 │          until linked containers are STOPPED
//!                 │          (or --stop-wait-timeout passes)
//!                 ▼
//!           sleep --signal-forwarding-delay
//!                 ▼
//!           SIGTERM ─▶ COMMAND
//! ```

use ecswrap::config::{Cli, ConfigError};
use ecswrap::lifecycle::process::DEFAULT_ERROR_EXIT_CODE;
use ecswrap::observability::init_logging;
use ecswrap::Supervisor;

#[tokio::main]
async fn main() {
    let (config, command) = match Cli::load_from(std::env::args_os()) {
        Ok(parts) => parts,
        Err(ConfigError::Args(e)) => {
            // --help and --version also arrive here and exit cleanly.
            let code = if e.use_stderr() { DEFAULT_ERROR_EXIT_CODE } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
        Err(e @ ConfigError::Validation(_)) => {
            eprintln!("{}", e);
            std::process::exit(DEFAULT_ERROR_EXIT_CODE);
        }
    };

    init_logging(config.verbosity);

    tracing::debug!(
        config = ?config,
        command = ?command,
        pid = std::process::id(),
        "ecswrap v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let supervisor = Supervisor::from_config(&config, command);
    let code = supervisor.run().await;

    // The signal activity is still parked on its handlers; exiting here
    // reclaims it.
    std::process::exit(code);
}
