//! Prefix-tree acceleration for ordered regex route lists.
//!
//! Build a [`Router`] from an ordered list of rules; it resolves paths the
//! same way as trying each rule in turn, while skipping whole groups of
//! rules with a literal prefix comparison.

pub mod config;
pub mod observability;
pub mod routing;

pub use config::schema::RouteFile;
pub use routing::{Router, RouteEntry, RouteError, Rule};
