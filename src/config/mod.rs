//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! argv + environment (ECSWRAP_*, ECS_CONTAINER_METADATA_URI)
//!     → loader.rs (clap parse & env binding)
//!     → validation.rs (semantic checks)
//!     → WrapperConfig (validated, immutable) + child command
//!     → handed to the Supervisor at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so `ecswrap -- cmd` works with no options
//! - Validation separates syntactic (clap) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{Cli, ConfigError};
pub use schema::WrapperConfig;
