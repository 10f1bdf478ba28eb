//! Route lookup.
//!
//! # Responsibilities
//! - Own the rendered route list behind a root resolver
//! - Resolve request paths to a match or explicit no-match
//! - Offer the flat, unaccelerated form for comparison
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Reloading swaps in a fully rebuilt router, never edits one in place

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::RouteFile;
use crate::config::ConfigError;
use crate::observability::metrics;
use crate::observability::report::BuildReport;
use crate::routing::error::RouteResult;
use crate::routing::matcher::{GuardedResolver, Resolve};
use crate::routing::pattern::{compile_flat, Matchable, RegexPattern, ResolverMatch, UrlResolver};
use crate::routing::render::build_routes;
use crate::routing::rule::RouteEntry;

/// Root pattern applied to raw request paths.
pub const DEFAULT_ROOT: &str = "^/";

/// A built route set ready for lookups.
#[derive(Debug, Clone)]
pub struct Router {
    root: Matchable,
    report: Option<BuildReport>,
}

impl Router {
    /// Build the trie-accelerated router under [`DEFAULT_ROOT`].
    pub fn accelerated(entries: Vec<RouteEntry>) -> RouteResult<Self> {
        Self::accelerated_with_root(DEFAULT_ROOT, entries)
    }

    pub fn accelerated_with_root(root: &str, entries: Vec<RouteEntry>) -> RouteResult<Self> {
        let built = build_routes(entries)?;
        metrics::record_build(&built.report);
        let resolver = UrlResolver::new(RegexPattern::new(root)?, built.routes);
        Ok(Self {
            root: GuardedResolver::new(resolver).into(),
            report: Some(built.report),
        })
    }

    /// Build the flat router that tries every rule in declaration order.
    pub fn naive(entries: Vec<RouteEntry>) -> RouteResult<Self> {
        Self::naive_with_root(DEFAULT_ROOT, entries)
    }

    pub fn naive_with_root(root: &str, entries: Vec<RouteEntry>) -> RouteResult<Self> {
        let resolver = UrlResolver::new(RegexPattern::new(root)?, compile_flat(entries)?);
        Ok(Self {
            root: resolver.into(),
            report: None,
        })
    }

    /// Build from a loaded route file, honouring its router settings.
    pub fn from_config(config: &RouteFile) -> Result<Self, ConfigError> {
        let entries = config.entries()?;
        let router = if config.router.accelerate {
            Self::accelerated_with_root(&config.router.root, entries)?
        } else {
            Self::naive_with_root(&config.router.root, entries)?
        };
        Ok(router)
    }

    /// Resolve a request path such as `/a/b/c`.
    pub fn resolve(&self, path: &str) -> Option<ResolverMatch> {
        self.root.resolve(path)
    }

    /// Diagnostics of the build; `None` for a naive router.
    pub fn report(&self) -> Option<&BuildReport> {
        self.report.as_ref()
    }

    pub fn is_accelerated(&self) -> bool {
        self.report.is_some()
    }

    /// Entries directly under the root resolver.
    pub fn routes(&self) -> &[Matchable] {
        match &self.root {
            Matchable::Guarded(g) => &g.resolver().entries,
            Matchable::Resolver(r) => &r.entries,
            Matchable::Pattern(_) => &[],
        }
    }
}

/// A router slot that can be replaced while readers hold the old one.
#[derive(Debug)]
pub struct SharedRouter {
    current: ArcSwap<Router>,
}

impl SharedRouter {
    pub fn new(router: Router) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Snapshot of the current router.
    pub fn load(&self) -> Arc<Router> {
        self.current.load_full()
    }

    pub fn replace(&self, router: Router) {
        self.current.store(Arc::new(router));
    }

    pub fn resolve(&self, path: &str) -> Option<ResolverMatch> {
        self.current.load().resolve(path)
    }
}
