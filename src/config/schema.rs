//! Configuration schema definitions.

use std::time::Duration;

/// Default seconds to wait for linked containers after a graceful signal.
pub const DEFAULT_STOP_WAIT_TIMEOUT_SECS: u64 = 10;

/// Root configuration for the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperConfig {
    /// Maximum seconds to wait for linked containers before forwarding
    /// SIGINT/SIGQUIT/SIGTERM. Should stay below the agent's
    /// `ECS_CONTAINER_STOP_TIMEOUT`.
    pub stop_wait_timeout_secs: u64,

    /// Names of sibling containers whose stop is awaited.
    pub linked_containers: Vec<String>,

    /// Extra seconds to sleep after the linked-container wait.
    pub signal_forwarding_delay_secs: u64,

    /// Number of `-v` flags.
    pub verbosity: u8,

    /// Base URI of the task metadata endpoint (v3).
    pub metadata_uri: Option<String>,
}

impl WrapperConfig {
    pub fn stop_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_wait_timeout_secs)
    }

    pub fn signal_forwarding_delay(&self) -> Duration {
        Duration::from_secs(self.signal_forwarding_delay_secs)
    }
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            stop_wait_timeout_secs: DEFAULT_STOP_WAIT_TIMEOUT_SECS,
            linked_containers: Vec::new(),
            signal_forwarding_delay_secs: 0,
            verbosity: 0,
            metadata_uri: None,
        }
    }
}
