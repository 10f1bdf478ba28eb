//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Route builds produce:
//!     → report.rs (BuildStats / BuildReport values)
//!     → logging.rs (structured log events)
//!     → metrics.rs (gauges and counters per build)
//! ```
//!
//! # Design Decisions
//! - Build counters travel in returned values, never in globals
//! - Resolution is not instrumented; it must stay a string compare plus
//!   regex calls
//! - The library emits events and metrics; the binary installs subscribers

pub mod logging;
pub mod metrics;
pub mod report;

pub use report::{BuildReport, BuildStats};
