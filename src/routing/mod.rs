//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteEntry[] (ordered rules + opaque patterns)
//!     → segment.rs (split patterns, keep groups whole)
//!     → tree.rs (insert into prefix tree, flatten pure includes)
//!     → compact.rs (fold single-child branches)
//!     → render.rs (emit prefix-guarded resolvers)
//!     → Freeze as immutable Router
//!
//! Incoming Path
//!     → router.rs (root resolver)
//!     → matcher.rs (literal prefix guard per group)
//!     → pattern.rs (regex evaluation on surviving candidates)
//!     → Return: ResolverMatch or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - A malformed pattern fails the whole build
//! - Sibling order follows first insertion; the first match wins
//! - Overlapping literal and pattern segments may resolve in a different
//!   order than the flat list; this is accepted

pub mod compact;
pub mod error;
pub mod matcher;
pub mod pattern;
pub mod render;
pub mod router;
pub mod rule;
pub mod segment;
pub mod tree;

pub use error::{RouteError, RouteResult};
pub use matcher::{GuardedResolver, PrefixGuard, Resolve};
pub use pattern::{compile_flat, Matchable, RegexPattern, ResolverMatch, UrlPattern, UrlResolver};
pub use render::{build_routes, FastRoutes};
pub use router::{Router, SharedRouter};
pub use rule::{Handler, Include, Kwargs, RouteEntry, Rule, Target};
