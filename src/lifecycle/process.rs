//! Child process ownership and exit status translation.
//!
//! # Responsibilities
//! - Spawn the wrapped command with inherited stdout/stderr
//! - Deliver forwarded signals by PID
//! - Translate the child's wait status into a shell-style exit code

use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use thiserror::Error;
use tokio::process::{Child, Command};

/// Exit code used whenever no better code is known.
pub const DEFAULT_ERROR_EXIT_CODE: i32 = 1;

/// Errors that can occur while managing the child.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("no command given")]
    EmptyCommand,

    #[error("failed to start command {command:?}: {source}")]
    Spawn {
        command: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("not sending {signal:?}: PID {pid} has already been reaped")]
    Reaped {
        signal: Signal,
        pid: Pid,
    },

    #[error("failed to send {signal:?} to PID {pid}: {source}")]
    Signal {
        signal: Signal,
        pid: Pid,
        #[source]
        source: nix::Error,
    },
}

/// How the child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited on its own with this code.
    Exited(i32),
    /// Killed by this signal number.
    Signaled(i32),
    /// Neither exited nor signaled (e.g. a stop status).
    Unknown,
}

impl Termination {
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            Termination::Exited(code)
        } else if let Some(signal) = status.signal() {
            Termination::Signaled(signal)
        } else {
            Termination::Unknown
        }
    }

    /// Shell convention: own code, or 128 + signal number.
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Exited(code) => code,
            Termination::Signaled(signal) => 128 + signal,
            Termination::Unknown => DEFAULT_ERROR_EXIT_CODE,
        }
    }
}

/// Result of waiting on the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    pub code: i32,
    pub termination: Termination,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.termination == Termination::Exited(0)
    }

    /// A human-readable description of an unsuccessful exit.
    pub fn condition(&self) -> Option<String> {
        match self.termination {
            Termination::Exited(0) => None,
            Termination::Exited(code) => Some(format!("exit status {}", code)),
            Termination::Signaled(signal) => Some(match Signal::try_from(signal) {
                Ok(sig) => format!("signal: {}", sig.as_str()),
                Err(_) => format!("signal: {}", signal),
            }),
            Termination::Unknown => Some("unknown wait status".to_string()),
        }
    }
}

/// Anything that can receive a forwarded signal.
pub trait SignalTarget: Send + Sync {
    fn deliver(&self, signal: Signal) -> Result<(), ProcessError>;
}

/// Shared reference to the running child, used by the signal activity.
///
/// Delivery stops once [`ChildProcess::wait`] has reaped the child, so a late
/// signal cannot reach a recycled PID. A signal already past that check when
/// the reap happens can still race it.
#[derive(Debug, Clone)]
pub struct ChildHandle {
    pid: Pid,
    reaped: Arc<AtomicBool>,
}

impl ChildHandle {
    pub fn pid(&self) -> Pid {
        self.pid
    }
}

impl SignalTarget for ChildHandle {
    fn deliver(&self, signal: Signal) -> Result<(), ProcessError> {
        if self.reaped.load(Ordering::Acquire) {
            return Err(ProcessError::Reaped {
                signal,
                pid: self.pid,
            });
        }
        kill(self.pid, signal).map_err(|source| ProcessError::Signal {
            signal,
            pid: self.pid,
            source,
        })
    }
}

/// The supervised child process.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    handle: ChildHandle,
}

impl ChildProcess {
    /// Spawn `command[0]` with `command[1..]` as arguments.
    pub fn start(command: &[String]) -> Result<Self, ProcessError> {
        let (program, args) = command.split_first().ok_or(ProcessError::EmptyCommand)?;

        let spawn_error = |source| ProcessError::Spawn {
            command: command.to_vec(),
            source,
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_error)?;

        let pid = child.id().ok_or_else(|| {
            spawn_error(std::io::Error::new(
                std::io::ErrorKind::Other,
                "child exited before its PID was known",
            ))
        })?;

        let handle = ChildHandle {
            pid: Pid::from_raw(pid as i32),
            reaped: Arc::new(AtomicBool::new(false)),
        };

        tracing::debug!(command = ?command, pid = pid, "Started command");

        Ok(Self { child, handle })
    }

    pub fn handle(&self) -> ChildHandle {
        self.handle.clone()
    }

    /// Wait for the child to terminate. Consumes the process; it can only be
    /// reaped once.
    pub async fn wait(mut self) -> Result<ExitReport, ProcessError> {
        let status = self.child.wait().await.map_err(ProcessError::Wait)?;
        self.handle.reaped.store(true, Ordering::Release);
        let termination = Termination::from_status(status);

        match termination {
            Termination::Exited(code) => {
                tracing::debug!(code, "Child process exited");
            }
            Termination::Signaled(signal) => {
                tracing::debug!(signal, "Child process was terminated by signal");
            }
            Termination::Unknown => {
                tracing::warn!(status = ?status, "Child process exited with unknown wait status");
            }
        }

        Ok(ExitReport {
            code: termination.exit_code(),
            termination,
        })
    }
}
