//! Shared utilities for integration and property tests.

#![allow(dead_code)]

use fast_route::routing::{ResolverMatch, RouteEntry, Router, Rule};

/// Literal words plus one pattern word, as used in route-set generation.
pub const WORDS: [&str; 8] = [
    "lorem",
    "ipsum",
    "delorean",
    "time-traveling",
    "hovering",
    "skateboards",
    "biff",
    "X([^/]+)",
];

/// Request-side counterparts of [`WORDS`]; `Xasdf` hits the pattern word.
pub const PATH_WORDS: [&str; 8] = [
    "lorem",
    "ipsum",
    "delorean",
    "time-traveling",
    "hovering",
    "skateboards",
    "biff",
    "Xasdf",
];

/// Every ordered selection of `depth` words, with repetition.
pub fn permutations(depth: usize, words: &[&str]) -> Vec<Vec<String>> {
    if depth == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for word in words {
        for mut rest in permutations(depth - 1, words) {
            rest.insert(0, (*word).to_owned());
            out.push(rest);
        }
    }
    out
}

/// One view rule per permutation, named after its words.
pub fn permutation_rules(depth: usize) -> Vec<RouteEntry> {
    permutations(depth, &WORDS)
        .into_iter()
        .map(|words| {
            let name = words.join("-");
            Rule::view(words.join("/"), name.as_str()).with_name(name).into()
        })
        .collect()
}

/// Build both routers from the same rules.
pub fn routers(rules: Vec<RouteEntry>) -> (Router, Router) {
    let naive = Router::naive(rules.clone()).expect("naive router builds");
    let fast = Router::accelerated(rules).expect("accelerated router builds");
    (naive, fast)
}

/// Resolve `path` on both routers, panicking with context if they differ.
pub fn assert_same(naive: &Router, fast: &Router, path: &str) -> Option<ResolverMatch> {
    let expected = naive.resolve(path);
    let actual = fast.resolve(path);
    assert_eq!(actual, expected, "routers disagree on {path:?}");
    actual
}
