//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for machine consumption, pretty format for terminals
//! - `RUST_LOG` overrides the level chosen on the command line

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Call once, from the binary.
pub fn init(json: bool, verbose: bool) {
    let default_level = if verbose { "fast_route=debug" } else { "fast_route=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
