//! Startup orchestration.
//!
//! # Responsibilities
//! - Register signal interest before the child exists
//! - Start the child, then detach the signal forwarding activity
//! - Block on the child and turn its termination into our exit code
//!
//! # Design Decisions
//! - Fail fast: registration and spawn errors are fatal, exit code 1
//! - The signal activity is never cancelled; process exit reclaims the
//!   handlers and the task
//! - Everything after spawn is best effort and never changes the exit code

use std::sync::Arc;

use crate::config::WrapperConfig;
use crate::lifecycle::process::{ChildProcess, DEFAULT_ERROR_EXIT_CODE};
use crate::lifecycle::shutdown::{ShutdownPolicy, SignalCoordinator};
use crate::lifecycle::signals::{signal_queue, SignalListener};
use crate::metadata::{MetadataClient, TaskStatusProvider};

/// Top-level supervisor wiring the child, signals and metadata polling.
pub struct Supervisor<P> {
    command: Vec<String>,
    policy: ShutdownPolicy,
    provider: Arc<P>,
}

impl Supervisor<MetadataClient> {
    /// Build a supervisor backed by the real task metadata endpoint.
    pub fn from_config(config: &WrapperConfig, command: Vec<String>) -> Self {
        let provider = Arc::new(MetadataClient::new(config.metadata_uri.as_deref()));
        Self::new(config, command, provider)
    }
}

impl<P: TaskStatusProvider + 'static> Supervisor<P> {
    pub fn new(config: &WrapperConfig, command: Vec<String>, provider: Arc<P>) -> Self {
        let policy = ShutdownPolicy {
            linked_containers: config.linked_containers.clone(),
            stop_wait_timeout: config.stop_wait_timeout(),
            forwarding_delay: config.signal_forwarding_delay(),
        };

        Self {
            command,
            policy,
            provider,
        }
    }

    /// Run the child to completion and return the process exit code.
    pub async fn run(self) -> i32 {
        let listener = match SignalListener::register() {
            Ok(listener) => listener,
            Err(e) => {
                eprintln!("Failed to register signal handlers: {}", e);
                return DEFAULT_ERROR_EXIT_CODE;
            }
        };

        let child = match ChildProcess::start(&self.command) {
            Ok(child) => child,
            Err(e) => {
                eprintln!("{}", e);
                return DEFAULT_ERROR_EXIT_CODE;
            }
        };

        let handle = child.handle();
        tracing::info!(
            pid = handle.pid().as_raw(),
            linked = ?self.policy.linked_containers,
            "Started child process, forwarding signals"
        );

        let coordinator = SignalCoordinator::new(self.provider, self.policy, handle);
        let (tx, rx) = signal_queue();
        tokio::spawn(async move {
            tokio::join!(listener.pump(tx), coordinator.run(rx));
        });

        match child.wait().await {
            Ok(report) => {
                if let Some(condition) = report.condition() {
                    eprintln!("{}", condition);
                }
                report.code
            }
            Err(e) => {
                eprintln!("{}", e);
                DEFAULT_ERROR_EXIT_CODE
            }
        }
    }
}
