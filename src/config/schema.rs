//! Configuration schema definitions.
//!
//! This module defines the route file structure.
//! All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::pattern::compile_flat;
use crate::routing::router::DEFAULT_ROOT;
use crate::routing::rule::{Handler, Include, Kwargs, RouteEntry, Rule};

/// Root of a route file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteFile {
    /// Router-wide settings.
    pub router: RouterConfig,

    /// Ordered route declarations.
    pub routes: Vec<RouteConfig>,
}

impl RouteFile {
    /// Convert the declarations into route entries, in order.
    pub fn entries(&self) -> RouteResult<Vec<RouteEntry>> {
        self.routes.iter().map(RouteConfig::to_entry).collect()
    }
}

/// Router-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Pattern consumed from every request path before route lookup.
    pub root: String,

    /// Use the prefix tree; `false` resolves against the flat list.
    pub accelerate: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            accelerate: true,
        }
    }
}

/// A single route declaration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RouteConfig {
    /// Regex pattern matched against the remaining path.
    pub pattern: String,

    /// Handler name for a view route.
    #[serde(default)]
    pub handler: Option<String>,

    /// Nested routes for an include.
    #[serde(default)]
    pub include: Option<IncludeConfig>,

    /// Reverse-lookup name.
    #[serde(default)]
    pub name: Option<String>,

    /// Extra keyword arguments handed to the handler.
    #[serde(default)]
    pub kwargs: Kwargs,

    /// Compile as-is and carry through the tree without decomposing it.
    #[serde(default)]
    pub raw: bool,
}

impl RouteConfig {
    pub fn to_rule(&self) -> RouteResult<Rule> {
        let rule = match (&self.handler, &self.include) {
            (Some(handler), _) => Rule::view(&self.pattern, Handler::new(handler)),
            (None, Some(include)) => Rule::include(&self.pattern, include.to_include()?),
            (None, None) => {
                return Err(RouteError::MissingTarget {
                    pattern: self.pattern.clone(),
                })
            }
        };
        let rule = rule.with_kwargs(self.kwargs.clone());
        Ok(match &self.name {
            Some(name) => rule.with_name(name),
            None => rule,
        })
    }

    pub fn to_entry(&self) -> RouteResult<RouteEntry> {
        let rule = self.to_rule()?;
        if !self.raw {
            return Ok(rule.into());
        }
        let mut compiled = compile_flat(vec![rule.into()])?;
        match compiled.pop() {
            Some(matchable) => Ok(matchable.into()),
            None => Err(RouteError::MissingTarget {
                pattern: self.pattern.clone(),
            }),
        }
    }
}

/// Nested route list of an include.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct IncludeConfig {
    #[serde(default)]
    pub app_name: Option<String>,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl IncludeConfig {
    pub fn to_include(&self) -> RouteResult<Include> {
        let routes = self
            .routes
            .iter()
            .map(RouteConfig::to_entry)
            .collect::<RouteResult<Vec<_>>>()?;
        Ok(Include {
            routes,
            app_name: self.app_name.clone(),
            namespace: self.namespace.clone(),
        })
    }
}
