//! ECS task metadata subsystem.
//!
//! # Data Flow
//! ```text
//! LinkedContainerWaiter tick
//!     → client.rs (GET <ECS_CONTAINER_METADATA_URI>/task)
//!     → types.rs (Task / Container decode)
//!     → Task::linked_containers_stopped
//! ```
//!
//! # Design Decisions
//! - `TaskStatusProvider` is the seam; tests drive the waiter in memory
//! - No caching and no retry here; the waiter owns the polling cadence
//! - Only `KnownStatus == "STOPPED"` carries meaning

pub mod client;
pub mod types;

pub use client::{MetadataClient, TaskStatusProvider};
pub use types::{Container, MetadataError, MetadataResult, Task};
