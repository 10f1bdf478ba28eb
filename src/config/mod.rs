//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! route file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouteFile (validated, immutable)
//!     → Router::from_config (build once)
//!
//! On reload:
//!     watcher.rs detects change
//!     → loader.rs loads new file
//!     → validation.rs validates
//!     → full rebuild, atomic swap of the router
//! ```
//!
//! # Design Decisions
//! - A router is never patched; changes always rebuild from scratch
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{IncludeConfig, RouteConfig, RouteFile, RouterConfig};
pub use validation::ValidationError;
