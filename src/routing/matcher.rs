//! Route matching logic.
//!
//! # Responsibilities
//! - Define the [`Resolve`] seam every matchable entry implements
//! - Pre-filter rendered groups with a literal prefix test
//! - Delegate to the pattern engine only when the prefix test passes
//!
//! # Design Decisions
//! - The guard is decided once at construction; resolving never mutates it
//! - Prefix comparison is case-sensitive, like the patterns it stands in for
//! - A guard that cannot be decided literally admits everything

use crate::routing::pattern::{ResolverMatch, UrlResolver};
use crate::routing::segment::is_literal;

/// Trait for resolving a path against a route entry.
pub trait Resolve: Send + Sync + std::fmt::Debug {
    /// Returns the match for `path`, or `None` when this entry does not apply.
    fn resolve(&self, path: &str) -> Option<ResolverMatch>;
}

/// Cheap pre-check standing in front of a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixGuard {
    /// The anchored pattern is a plain string; paths must start with it.
    Literal(String),
    /// The pattern needs the engine; every path is delegated.
    Passthrough,
}

impl PrefixGuard {
    /// Derive the guard for a resolver pattern.
    pub fn for_pattern(pattern: &str) -> Self {
        match pattern.strip_prefix('^') {
            Some(prefix) if is_literal(prefix) => PrefixGuard::Literal(prefix.to_owned()),
            _ => PrefixGuard::Passthrough,
        }
    }

    /// Returns true if `path` may match and must be handed to the engine.
    pub fn admits(&self, path: &str) -> bool {
        match self {
            PrefixGuard::Literal(prefix) => path.starts_with(prefix.as_str()),
            PrefixGuard::Passthrough => true,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, PrefixGuard::Passthrough)
    }
}

/// A resolver wrapped with a [`PrefixGuard`].
#[derive(Debug, Clone, PartialEq)]
pub struct GuardedResolver {
    guard: PrefixGuard,
    resolver: UrlResolver,
}

impl GuardedResolver {
    pub fn new(resolver: UrlResolver) -> Self {
        let guard = PrefixGuard::for_pattern(resolver.pattern.as_str());
        Self { guard, resolver }
    }

    #[cfg(test)]
    pub(crate) fn with_guard(guard: PrefixGuard, resolver: UrlResolver) -> Self {
        Self { guard, resolver }
    }

    pub fn guard(&self) -> &PrefixGuard {
        &self.guard
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    /// Returns true if `path` gets past the prefix check.
    pub fn admits(&self, path: &str) -> bool {
        self.guard.admits(path)
    }
}

impl Resolve for GuardedResolver {
    fn resolve(&self, path: &str) -> Option<ResolverMatch> {
        if !self.guard.admits(path) {
            return None;
        }
        self.resolver.resolve(path)
    }
}
