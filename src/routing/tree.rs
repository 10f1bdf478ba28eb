//! Prefix tree of route segments.
//!
//! # Responsibilities
//! - Insert rules along their tokenized segments
//! - Flatten pure grouping includes into the same tree
//! - Keep opaque entries in encounter order under reserved keys
//! - Report duplicate entries (last insertion wins)
//!
//! Sibling order is insertion order; it becomes resolution order once the
//! tree is rendered.

use std::fmt;

use indexmap::IndexMap;

use crate::observability::report::BuildStats;
use crate::routing::error::RouteResult;
use crate::routing::pattern::Matchable;
use crate::routing::rule::{RouteEntry, Rule};
use crate::routing::segment::tokenize;

/// Key of a child within a [`Node`].
///
/// A terminal and a branch may share segment text: `^x` and `^x/...` are
/// different rules and both stay in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Segment text of a terminal rule.
    Segment(String),
    /// Segment text of a branch.
    Group(String),
    /// Reserved key for the n-th opaque entry of a build.
    Passthrough(usize),
}

impl Key {
    pub fn segment(s: impl Into<String>) -> Self {
        Key::Segment(s.into())
    }

    pub fn group(s: impl Into<String>) -> Self {
        Key::Group(s.into())
    }

    /// The segment text; empty for passthrough keys.
    pub fn as_segment(&self) -> &str {
        match self {
            Key::Segment(s) | Key::Group(s) => s,
            Key::Passthrough(_) => "",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Segment(s) => f.write_str(s),
            Key::Group(s) => write!(f, "{}/", s),
            Key::Passthrough(n) => write!(f, "<passthrough #{}>", n),
        }
    }
}

/// Value stored under a [`Key`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Branch(Node),
    Terminal(Rule),
    Passthrough(Matchable),
}

/// An ordered map of child entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub(crate) children: IndexMap<Key, Entry>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, key: &Key) -> Option<&Entry> {
        self.children.get(key)
    }

    /// Look up a terminal child by segment text.
    pub fn child(&self, segment: &str) -> Option<&Entry> {
        self.children.get(&Key::segment(segment))
    }

    /// Look up a branch by segment text.
    pub fn group(&self, segment: &str) -> Option<&Node> {
        match self.children.get(&Key::group(segment)) {
            Some(Entry::Branch(node)) => Some(node),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.children.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Entry)> {
        self.children.iter()
    }

    /// Insert or replace a child, keeping the position of an existing key.
    pub fn insert(&mut self, key: Key, entry: Entry) -> Option<Entry> {
        self.children.insert(key, entry)
    }

    pub(crate) fn into_children(self) -> impl Iterator<Item = (Key, Entry)> {
        self.children.into_iter()
    }

    /// Count of terminal and passthrough entries below this node.
    pub fn leaf_count(&self) -> usize {
        self.children
            .values()
            .map(|entry| match entry {
                Entry::Branch(node) => node.leaf_count(),
                Entry::Terminal(_) | Entry::Passthrough(_) => 1,
            })
            .sum()
    }

    /// Splits off the only child unless it is a passthrough entry.
    pub(crate) fn into_only_child(mut self) -> Result<(Key, Entry), Node> {
        if self.children.len() == 1 && !matches!(self.children.first(), Some((Key::Passthrough(_), _))) {
            if let Some(child) = self.children.pop() {
                return Ok(child);
            }
        }
        Err(self)
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for (key, entry) in &self.children {
            writeln!(f, "{:indent$}{}", "", key, indent = indent)?;
            if let Entry::Branch(node) = entry {
                node.write_tree(f, indent + 2)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// Builds a [`Node`] tree from an ordered route list.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Node,
    stats: BuildStats,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one entry at the root.
    pub fn insert(&mut self, entry: RouteEntry) -> RouteResult<()> {
        insert_entry(&mut self.root, entry, &mut self.stats)
    }

    pub fn insert_rule(&mut self, rule: Rule) -> RouteResult<()> {
        insert_rule(&mut self.root, rule, &mut self.stats)
    }

    pub fn insert_passthrough(&mut self, matchable: Matchable) {
        insert_passthrough(&mut self.root, matchable, &mut self.stats)
    }

    pub fn finish(self) -> (Node, BuildStats) {
        (self.root, self.stats)
    }
}

/// Build a tree from `entries`, failing on the first malformed pattern.
pub fn build_tree(entries: impl IntoIterator<Item = RouteEntry>) -> RouteResult<(Node, BuildStats)> {
    let mut builder = TreeBuilder::new();
    for entry in entries {
        builder.insert(entry)?;
    }
    Ok(builder.finish())
}

fn insert_entry(node: &mut Node, entry: RouteEntry, stats: &mut BuildStats) -> RouteResult<()> {
    match entry {
        RouteEntry::Rule(rule) => insert_rule(node, rule, stats),
        RouteEntry::Passthrough(matchable) => {
            insert_passthrough(node, matchable, stats);
            Ok(())
        }
    }
}

fn insert_passthrough(node: &mut Node, matchable: Matchable, stats: &mut BuildStats) {
    let key = Key::Passthrough(stats.passthrough);
    stats.passthrough += 1;
    tracing::debug!(pattern = matchable.pattern(), %key, "Carrying opaque pattern through tree");
    node.children.insert(key, Entry::Passthrough(matchable));
}

fn insert_rule(node: &mut Node, rule: Rule, stats: &mut BuildStats) -> RouteResult<()> {
    let segments = tokenize(rule.pattern())?;
    insert_along(node, segments.into_iter(), rule, stats)
}

/// Walk `segments`, creating branches as needed, and place `rule` under the
/// last one.
fn insert_along(
    node: &mut Node,
    mut segments: std::vec::IntoIter<String>,
    rule: Rule,
    stats: &mut BuildStats,
) -> RouteResult<()> {
    let segment = segments.next().unwrap_or_default();
    if segments.len() == 0 {
        return place(node, segment, rule, stats);
    }

    let key = Key::Group(segment);
    if let Some(Entry::Branch(child)) = node.children.get_mut(&key) {
        return insert_along(child, segments, rule, stats);
    }
    let mut child = Node::new();
    insert_along(&mut child, segments, rule, stats)?;
    node.children.insert(key, Entry::Branch(child));
    Ok(())
}

fn place(node: &mut Node, last: String, rule: Rule, stats: &mut BuildStats) -> RouteResult<()> {
    // An include whose pattern ends on a separator mounts its children on
    // the node already reached.
    let rule = if last.is_empty() || last == "^" {
        match rule.into_grouping_include() {
            Ok(include) => {
                tracing::debug!(children = include.routes.len(), "Flattening include into tree");
                for child in include.routes {
                    insert_entry(node, child, stats)?;
                }
                return Ok(());
            }
            Err(rule) => rule,
        }
    } else {
        rule
    };

    let key = Key::Segment(last);
    if node.children.contains_key(&key) {
        stats.record_duplicate(rule.pattern());
    }
    node.children.insert(key, Entry::Terminal(rule));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::pattern::{RegexPattern, UrlPattern};
    use crate::routing::rule::{Handler, Include, Target};

    fn rule(pattern: &str, handler: &str) -> RouteEntry {
        Rule::view(pattern, handler).into()
    }

    fn handler_at<'a>(node: &'a Node, path: &[&str]) -> Option<&'a str> {
        let (last, parents) = path.split_last()?;
        let mut node = node;
        for segment in parents {
            node = node.group(segment)?;
        }
        match node.child(last)? {
            Entry::Terminal(rule) => match rule.target() {
                Target::View(h) => Some(h.name()),
                Target::Include(_) => None,
            },
            _ => None,
        }
    }

    #[test]
    fn test_insert_shares_prefixes() {
        let (tree, stats) = build_tree(vec![
            rule("^a/b/c$", "abc"),
            rule("^a/b/d$", "abd"),
            rule("^a/e$", "ae"),
        ])
        .unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(handler_at(&tree, &["^a", "b", "c$"]), Some("abc"));
        assert_eq!(handler_at(&tree, &["^a", "b", "d$"]), Some("abd"));
        assert_eq!(handler_at(&tree, &["^a", "e$"]), Some("ae"));
        assert_eq!(tree.leaf_count(), 3);
        assert!(stats.duplicates.is_empty());
    }

    #[test]
    fn test_sibling_order_is_first_insertion() {
        let (tree, _) = build_tree(vec![
            rule("b/1", "b1"),
            rule("a/1", "a1"),
            rule("b/2", "b2"),
            rule("c", "c"),
        ])
        .unwrap();
        let keys: Vec<String> = tree.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b/", "a/", "c"]);
    }

    #[test]
    fn test_duplicate_last_writer_wins() {
        let (tree, stats) = build_tree(vec![rule("x/y", "first"), rule("x/y", "second")]).unwrap();
        assert_eq!(stats.duplicates, vec!["x/y"]);
        assert_eq!(handler_at(&tree, &["x", "y"]), Some("second"));
    }

    #[test]
    fn test_terminal_and_branch_share_text() {
        let (tree, stats) = build_tree(vec![
            rule(r"^user/(?P<id>\d+)", "profile"),
            rule(r"^user/(?P<id>\d+)/edit$", "edit"),
        ])
        .unwrap();
        assert!(stats.duplicates.is_empty());
        assert_eq!(handler_at(&tree, &["^user", r"(?P<id>\d+)"]), Some("profile"));
        assert_eq!(handler_at(&tree, &["^user", r"(?P<id>\d+)", "edit$"]), Some("edit"));

        let (tree, stats) = build_tree(vec![rule("^x/y$", "xy"), rule("^x/z$", "xz"), rule("^x", "x")]).unwrap();
        assert!(stats.duplicates.is_empty());
        let keys: Vec<String> = tree.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["^x/", "^x"]);
        assert_eq!(handler_at(&tree, &["^x", "z$"]), Some("xz"));
        assert_eq!(handler_at(&tree, &["^x"]), Some("x"));
    }

    #[test]
    fn test_malformed_pattern_aborts() {
        let err = build_tree(vec![rule("ok/$", "ok"), rule("a/(b/c", "bad")]).unwrap_err();
        assert!(err.to_string().contains("a/(b/c"));
    }

    #[test]
    fn test_grouping_include_flattens() {
        let include = Include::new(vec![rule("^users/$", "users"), rule("^teams/$", "teams")]);
        let (tree, _) = build_tree(vec![
            rule("^api/health$", "health"),
            Rule::include("^api/", include).into(),
        ])
        .unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(handler_at(&tree, &["^api", "health$"]), Some("health"));
        assert_eq!(handler_at(&tree, &["^api", "^users", "$"]), None);
        assert_eq!(handler_at(&tree, &["^api", "^users/$"]), Some("users"));
        assert_eq!(handler_at(&tree, &["^api", "^teams/$"]), Some("teams"));
    }

    #[test]
    fn test_named_include_stays_terminal() {
        let include = Include::new(vec![rule("^users/$", "users")]).with_namespace("api");
        let (tree, _) = build_tree(vec![Rule::include("^api/", include).into()]).unwrap();

        let api = tree.group("^api").expect("expected branch");
        assert!(matches!(api.child(""), Some(Entry::Terminal(_))));
    }

    #[test]
    fn test_include_without_trailing_separator_stays_terminal() {
        let include = Include::new(vec![rule("^/users/$", "users")]);
        let (tree, _) = build_tree(vec![Rule::include("^api", include).into()]).unwrap();
        assert!(matches!(tree.child("^api"), Some(Entry::Terminal(_))));
        assert!(tree.group("^api").is_none());
    }

    #[test]
    fn test_passthrough_keys_in_encounter_order() {
        let raw = |p: &str| -> RouteEntry {
            Matchable::from(UrlPattern::new(RegexPattern::new(p).unwrap(), Handler::new("raw"))).into()
        };
        let (tree, stats) = build_tree(vec![raw("^one$"), rule("a/b", "ab"), raw("^two$")]).unwrap();

        assert_eq!(stats.passthrough, 2);
        let keys: Vec<&Key> = tree.keys().collect();
        assert_eq!(
            keys,
            vec![&Key::Passthrough(0), &Key::group("a"), &Key::Passthrough(1)]
        );
    }

    #[test]
    fn test_display_indents_children() {
        let (tree, _) = build_tree(vec![rule("a/b", "ab"), rule("a/c", "ac")]).unwrap();
        assert_eq!(tree.to_string(), "a/\n  b\n  c\n");
    }
}
