//! Configuration loading from the command line and environment.

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::config::schema::{WrapperConfig, DEFAULT_STOP_WAIT_TIMEOUT_SECS};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Parser)]
#[command(name = "ecswrap", version)]
#[command(about = "Forward signals to a child process after linked ECS containers stop")]
#[command(override_usage = "ecswrap [OPTIONS] -- COMMAND [ARGS]...")]
pub struct Cli {
    /// Maximum seconds to wait for linked containers after SIGTERM, SIGQUIT
    /// or SIGINT before forwarding it to the child. Should be less than
    /// ECS_CONTAINER_STOP_TIMEOUT.
    #[arg(
        long,
        env = "ECSWRAP_STOP_WAIT_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_STOP_WAIT_TIMEOUT_SECS
    )]
    pub stop_wait_timeout: u64,

    /// Name of a container linked with the one this program runs in.
    #[arg(
        long = "linked-container",
        env = "ECSWRAP_LINKED_CONTAINERS",
        value_name = "NAME",
        value_delimiter = ','
    )]
    pub linked_containers: Vec<String>,

    /// Delay seconds before forwarding SIGTERM, SIGQUIT or SIGINT to the child.
    #[arg(
        long,
        env = "ECSWRAP_SIGNAL_FORWARDING_DELAY",
        value_name = "SECS",
        default_value_t = 0
    )]
    pub signal_forwarding_delay: u64,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,

    /// Base URI of the ECS task metadata endpoint.
    #[arg(long, env = "ECS_CONTAINER_METADATA_URI", value_name = "URI")]
    pub metadata_uri: Option<String>,

    /// Command to run, followed by its arguments.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Parse from an explicit argument list (the first item is the binary name).
    pub fn load_from<I, T>(args: I) -> Result<(WrapperConfig, Vec<String>), ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        cli.into_parts()
    }

    /// Split into the validated config and the child command line.
    pub fn into_parts(self) -> Result<(WrapperConfig, Vec<String>), ConfigError> {
        let mut linked_containers: Vec<String> = self
            .linked_containers
            .into_iter()
            .map(|name| name.trim().to_string())
            .collect();
        // An empty ECSWRAP_LINKED_CONTAINERS yields a single empty value.
        if let [only] = linked_containers.as_slice() {
            if only.is_empty() {
                linked_containers.clear();
            }
        }

        let config = WrapperConfig {
            stop_wait_timeout_secs: self.stop_wait_timeout,
            linked_containers,
            signal_forwarding_delay_secs: self.signal_forwarding_delay,
            verbosity: self.verbosity,
            metadata_uri: self.metadata_uri.filter(|uri| !uri.is_empty()),
        };

        validate_config(&config).map_err(ConfigError::Validation)?;

        Ok((config, self.command))
    }
}
