//! Task metadata types and error definitions.

use serde::Deserialize;
use thiserror::Error;

/// The only `KnownStatus` the wrapper interprets.
pub const STOPPED: &str = "STOPPED";

/// Snapshot of the ECS task, as served by `${ECS_CONTAINER_METADATA_URI}/task`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(default)]
    pub containers: Vec<Container>,
}

/// One container of the task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Container {
    pub name: String,
    pub desired_status: String,
    pub known_status: String,
}

impl Container {
    pub fn is_stopped(&self) -> bool {
        self.known_status == STOPPED
    }
}

impl Task {
    /// True when every container named in `linked` has stopped.
    ///
    /// Containers outside `linked` are ignored, so an empty set is always
    /// satisfied. A linked name missing from the task does not block.
    pub fn linked_containers_stopped(&self, linked: &[String]) -> bool {
        self.containers
            .iter()
            .filter(|c| linked.iter().any(|name| *name == c.name))
            .all(Container::is_stopped)
    }
}

/// Errors that can occur while querying the metadata endpoint.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Connection, URL or transport failure.
    #[error("metadata request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("metadata endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    /// Body was not a valid task document.
    #[error("failed to decode task metadata: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;
