//! Tree rendering.
//!
//! Turns a compacted tree back into an ordered list of matchables:
//! branches become prefix-guarded resolvers, terminals become plain
//! patterns or resolvers, and passthrough entries are emitted verbatim.

use crate::observability::report::{BuildReport, BuildStats};
use crate::routing::compact::Compactor;
use crate::routing::error::RouteResult;
use crate::routing::matcher::GuardedResolver;
use crate::routing::pattern::{Matchable, RegexPattern, UrlPattern, UrlResolver};
use crate::routing::rule::{RouteEntry, Rule, Target};
use crate::routing::tree::{build_tree, Entry, Node};

/// Rendered routes plus the diagnostics of the build that produced them.
#[derive(Debug, Clone)]
pub struct FastRoutes {
    pub routes: Vec<Matchable>,
    pub report: BuildReport,
}

/// Tokenize, insert, compact and render `entries`.
///
/// The result resolves paths the same way as compiling `entries` one
/// pattern per rule, but visits only branches whose literal prefix fits.
pub fn build_routes(entries: Vec<RouteEntry>) -> RouteResult<FastRoutes> {
    let (tree, mut stats) = build_tree(entries)?;

    let mut compactor = Compactor::new();
    let tree = compactor.compact(tree);
    stats.merges += compactor.merges();

    let dump = tree.to_string();
    let total_rules = tree.leaf_count();
    let routes = render(tree, &mut stats)?;

    let report = BuildReport {
        tree: dump,
        top_level: routes.len(),
        total_rules,
        stats,
    };
    tracing::info!(
        top_level = report.top_level,
        total_rules = report.total_rules,
        passthrough = report.stats.passthrough,
        merges = report.stats.merges,
        duplicates = report.stats.duplicates.len(),
        "Route tree rendered"
    );

    Ok(FastRoutes { routes, report })
}

/// Render a tree into matchables, in key order.
///
/// Includes kept as terminals are built through [`build_routes`] in turn;
/// their counters are folded into `stats`.
pub fn render(tree: Node, stats: &mut BuildStats) -> RouteResult<Vec<Matchable>> {
    let mut routes = Vec::with_capacity(tree.len());
    for (key, entry) in tree.into_children() {
        let route = match entry {
            Entry::Passthrough(matchable) => matchable,
            Entry::Terminal(rule) => render_terminal(key.as_segment(), rule, stats)?,
            Entry::Branch(node) => render_group(key.as_segment(), node, stats)?,
        };
        routes.push(route);
    }
    Ok(routes)
}

fn render_group(key: &str, node: Node, stats: &mut BuildStats) -> RouteResult<Matchable> {
    let pattern = RegexPattern::new(format!("{}/", anchored(key)))?;
    let resolver = UrlResolver::new(pattern, render(node, stats)?);
    Ok(GuardedResolver::new(resolver).into())
}

fn render_terminal(key: &str, rule: Rule, stats: &mut BuildStats) -> RouteResult<Matchable> {
    let (_, target, kwargs, name) = rule.into_parts();
    match target {
        Target::View(handler) => {
            let pattern = if key.is_empty() {
                "^$".to_owned()
            } else {
                anchored(key)
            };
            Ok(UrlPattern::new(RegexPattern::new(pattern)?, handler)
                .with_kwargs(kwargs)
                .with_name(name)
                .into())
        }
        Target::Include(include) => {
            let nested = build_routes(include.routes)?;
            stats.absorb(nested.report.stats);
            Ok(UrlResolver::new(RegexPattern::new(anchored(key))?, nested.routes)
                .with_kwargs(kwargs)
                .with_names(include.app_name, include.namespace)
                .into())
        }
    }
}

fn anchored(key: &str) -> String {
    if key.starts_with('^') {
        key.to_owned()
    } else {
        format!("^{}", key)
    }
}
