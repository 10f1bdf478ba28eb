//! Regex-backed route resolution.
//!
//! These are the plain resolvers every route list ends up as: a
//! [`UrlPattern`] dispatches to a handler, a [`UrlResolver`] consumes a
//! prefix and tries its entries against the remainder. The trie renderer
//! produces the same types, so an accelerated list and a flat list are
//! interchangeable to callers.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::matcher::{GuardedResolver, Resolve};
use crate::routing::rule::{Handler, Kwargs, RouteEntry, Target};

/// A compiled pattern that keeps its source text.
#[derive(Clone)]
pub struct RegexPattern {
    source: String,
    regex: Regex,
    has_named_groups: bool,
}

impl RegexPattern {
    pub fn new(source: impl Into<String>) -> RouteResult<Self> {
        let source = source.into();
        let regex = Regex::new(&source).map_err(|e| RouteError::InvalidRegex {
            pattern: source.clone(),
            source: e,
        })?;
        let has_named_groups = regex.capture_names().flatten().next().is_some();
        Ok(Self {
            source,
            regex,
            has_named_groups,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Search the pattern anywhere in `path`.
    ///
    /// Named groups become kwargs, skipping groups that did not participate.
    /// Unnamed groups become positional args only when the pattern declares
    /// no named groups at all.
    pub fn search(&self, path: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(path)?;
        let end = caps.get(0).map_or(0, |m| m.end());

        let mut args = Vec::new();
        let mut kwargs = Kwargs::new();
        for (i, name) in self.regex.capture_names().enumerate().skip(1) {
            let Some(m) = caps.get(i) else { continue };
            match name {
                Some(name) => {
                    kwargs.insert(name.to_owned(), m.as_str().into());
                }
                None if !self.has_named_groups => args.push(m.as_str().to_owned()),
                None => {}
            }
        }

        Some(PatternMatch { end, args, kwargs })
    }
}

impl fmt::Debug for RegexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegexPattern").field(&self.source).finish()
    }
}

impl PartialEq for RegexPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Captures from a single pattern search.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    /// Byte offset where the match ended; the rest of the path is the remainder.
    pub end: usize,
    pub args: Vec<String>,
    pub kwargs: Kwargs,
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolverMatch {
    pub handler: Handler,
    pub args: Vec<String>,
    pub kwargs: Kwargs,
    pub url_name: Option<String>,
    pub app_names: Vec<String>,
    pub namespaces: Vec<String>,
}

/// A pattern bound to a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlPattern {
    pub pattern: RegexPattern,
    pub handler: Handler,
    pub default_kwargs: Kwargs,
    pub name: Option<String>,
}

impl UrlPattern {
    pub fn new(pattern: RegexPattern, handler: Handler) -> Self {
        Self {
            pattern,
            handler,
            default_kwargs: Kwargs::new(),
            name: None,
        }
    }

    pub fn with_kwargs(mut self, kwargs: Kwargs) -> Self {
        self.default_kwargs = kwargs;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

impl Resolve for UrlPattern {
    fn resolve(&self, path: &str) -> Option<ResolverMatch> {
        let PatternMatch { args, mut kwargs, .. } = self.pattern.search(path)?;
        kwargs.extend(self.default_kwargs.iter().map(|(k, v)| (k.clone(), v.clone())));
        Some(ResolverMatch {
            handler: self.handler.clone(),
            args,
            kwargs,
            url_name: self.name.clone(),
            app_names: Vec::new(),
            namespaces: Vec::new(),
        })
    }
}

/// A pattern prefix in front of an ordered list of entries.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlResolver {
    pub pattern: RegexPattern,
    pub entries: Vec<Matchable>,
    pub default_kwargs: Kwargs,
    pub app_name: Option<String>,
    pub namespace: Option<String>,
}

impl UrlResolver {
    pub fn new(pattern: RegexPattern, entries: Vec<Matchable>) -> Self {
        Self {
            pattern,
            entries,
            default_kwargs: Kwargs::new(),
            app_name: None,
            namespace: None,
        }
    }

    pub fn with_kwargs(mut self, kwargs: Kwargs) -> Self {
        self.default_kwargs = kwargs;
        self
    }

    pub fn with_names(mut self, app_name: Option<String>, namespace: Option<String>) -> Self {
        self.app_name = app_name.filter(|s| !s.is_empty());
        self.namespace = namespace.filter(|s| !s.is_empty());
        self
    }

    fn merge(&self, outer: PatternMatch, sub: ResolverMatch) -> ResolverMatch {
        let mut kwargs = outer.kwargs;
        kwargs.extend(self.default_kwargs.iter().map(|(k, v)| (k.clone(), v.clone())));
        kwargs.extend(sub.kwargs);

        let args = if kwargs.is_empty() {
            let mut args = outer.args;
            args.extend(sub.args);
            args
        } else {
            sub.args
        };

        let mut app_names: Vec<String> = self.app_name.iter().cloned().collect();
        app_names.extend(sub.app_names);
        let mut namespaces: Vec<String> = self.namespace.iter().cloned().collect();
        namespaces.extend(sub.namespaces);

        ResolverMatch {
            handler: sub.handler,
            args,
            kwargs,
            url_name: sub.url_name,
            app_names,
            namespaces,
        }
    }
}

impl Resolve for UrlResolver {
    fn resolve(&self, path: &str) -> Option<ResolverMatch> {
        let outer = self.pattern.search(path)?;
        let remainder = &path[outer.end..];
        let sub = self.entries.iter().find_map(|entry| entry.resolve(remainder))?;
        Some(self.merge(outer, sub))
    }
}

/// Anything a resolver can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Matchable {
    Pattern(UrlPattern),
    Resolver(UrlResolver),
    Guarded(GuardedResolver),
}

impl Matchable {
    pub fn pattern(&self) -> &str {
        match self {
            Matchable::Pattern(p) => p.pattern.as_str(),
            Matchable::Resolver(r) => r.pattern.as_str(),
            Matchable::Guarded(g) => g.resolver().pattern.as_str(),
        }
    }

    /// Number of handler-bearing patterns reachable from this entry.
    pub fn pattern_count(&self) -> usize {
        match self {
            Matchable::Pattern(_) => 1,
            Matchable::Resolver(r) => r.entries.iter().map(Matchable::pattern_count).sum(),
            Matchable::Guarded(g) => g.resolver().entries.iter().map(Matchable::pattern_count).sum(),
        }
    }
}

impl Resolve for Matchable {
    fn resolve(&self, path: &str) -> Option<ResolverMatch> {
        match self {
            Matchable::Pattern(p) => p.resolve(path),
            Matchable::Resolver(r) => r.resolve(path),
            Matchable::Guarded(g) => g.resolve(path),
        }
    }
}

impl From<UrlPattern> for Matchable {
    fn from(p: UrlPattern) -> Self {
        Matchable::Pattern(p)
    }
}

impl From<UrlResolver> for Matchable {
    fn from(r: UrlResolver) -> Self {
        Matchable::Resolver(r)
    }
}

impl From<GuardedResolver> for Matchable {
    fn from(g: GuardedResolver) -> Self {
        Matchable::Guarded(g)
    }
}

/// Compile a route list one pattern per rule, in declaration order.
///
/// This is the unaccelerated form: every rule keeps its own pattern and
/// resolution scans them linearly.
pub fn compile_flat(entries: Vec<RouteEntry>) -> RouteResult<Vec<Matchable>> {
    entries.into_iter().map(compile_entry).collect()
}

fn compile_entry(entry: RouteEntry) -> RouteResult<Matchable> {
    let rule = match entry {
        RouteEntry::Passthrough(matchable) => return Ok(matchable),
        RouteEntry::Rule(rule) => rule,
    };
    let (pattern, target, kwargs, name) = rule.into_parts();
    let pattern = RegexPattern::new(pattern)?;
    Ok(match target {
        Target::View(handler) => UrlPattern::new(pattern, handler)
            .with_kwargs(kwargs)
            .with_name(name)
            .into(),
        Target::Include(include) => UrlResolver::new(pattern, compile_flat(include.routes)?)
            .with_kwargs(kwargs)
            .with_names(include.app_name, include.namespace)
            .into(),
    })
}
