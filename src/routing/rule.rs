//! Route rule definitions.
//!
//! A [`Rule`] binds a pattern to either a view [`Handler`] or an [`Include`]
//! of further routes. Rules are immutable once built; the builder methods
//! consume and return `self`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::routing::pattern::Matchable;

/// Extra keyword arguments passed through to the handler untouched.
pub type Kwargs = BTreeMap<String, serde_json::Value>;

/// Opaque reference to the callable a matched rule dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handler(Arc<str>);

impl Handler {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Handler {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Serialize for Handler {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A nested route list, optionally behind an application name and namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    pub routes: Vec<RouteEntry>,
    pub app_name: Option<String>,
    pub namespace: Option<String>,
}

impl Include {
    pub fn new(routes: Vec<RouteEntry>) -> Self {
        Self {
            routes,
            app_name: None,
            namespace: None,
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// True when the include carries no naming boundary at all.
    /// Empty strings count as absent.
    pub fn is_pure_grouping(&self) -> bool {
        let blank = |s: &Option<String>| s.as_deref().map_or(true, str::is_empty);
        blank(&self.app_name) && blank(&self.namespace)
    }
}

/// What a rule resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    View(Handler),
    Include(Include),
}

/// A pattern bound to a handler or an include.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pattern: String,
    target: Target,
    kwargs: Kwargs,
    name: Option<String>,
}

impl Rule {
    /// A rule dispatching to a view handler.
    pub fn view(pattern: impl Into<String>, handler: impl Into<Handler>) -> Self {
        Self::new(pattern, Target::View(handler.into()))
    }

    /// A rule mounting another route list.
    pub fn include(pattern: impl Into<String>, include: Include) -> Self {
        Self::new(pattern, Target::Include(include))
    }

    pub fn new(pattern: impl Into<String>, target: Target) -> Self {
        Self {
            pattern: pattern.into(),
            target,
            kwargs: Kwargs::new(),
            name: None,
        }
    }

    pub fn with_kwargs(mut self, kwargs: Kwargs) -> Self {
        self.kwargs = kwargs;
        self
    }

    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Takes the include out of a rule that only groups routes.
    ///
    /// Hands the rule back unchanged when it is a view, when the include is
    /// named or namespaced, or when the rule carries kwargs that every child
    /// would otherwise have to inherit.
    pub(crate) fn into_grouping_include(self) -> Result<Include, Rule> {
        match self.target {
            Target::Include(include) if include.is_pure_grouping() && self.kwargs.is_empty() => {
                Ok(include)
            }
            target => Err(Rule { target, ..self }),
        }
    }

    pub(crate) fn into_parts(self) -> (String, Target, Kwargs, Option<String>) {
        (self.pattern, self.target, self.kwargs, self.name)
    }
}

/// One element of an ordered route list.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEntry {
    /// A rule the tree builder may decompose.
    Rule(Rule),
    /// An already-compiled matchable carried through untouched.
    Passthrough(Matchable),
}

impl From<Rule> for RouteEntry {
    fn from(rule: Rule) -> Self {
        RouteEntry::Rule(rule)
    }
}

impl From<Matchable> for RouteEntry {
    fn from(matchable: Matchable) -> Self {
        RouteEntry::Passthrough(matchable)
    }
}
