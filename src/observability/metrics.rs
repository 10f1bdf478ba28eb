//! Route build metrics.
//!
//! # Metrics
//! - `route_trie_rules_total` (gauge): terminal and passthrough entries in the tree
//! - `route_trie_top_level_entries` (gauge): rendered top-level entries
//! - `route_trie_passthrough_entries` (gauge): opaque entries carried through
//! - `route_trie_merges_total` (counter): single-child branches folded
//! - `route_trie_duplicates_total` (counter): entries replaced on insert
//!
//! Nothing is recorded unless the embedding process installs a recorder.

use crate::observability::report::BuildReport;

/// Publish the counters of a finished build.
pub fn record_build(report: &BuildReport) {
    ::metrics::gauge!("route_trie_rules_total").set(report.total_rules as f64);
    ::metrics::gauge!("route_trie_top_level_entries").set(report.top_level as f64);
    ::metrics::gauge!("route_trie_passthrough_entries").set(report.stats.passthrough as f64);
    ::metrics::counter!("route_trie_merges_total").increment(report.stats.merges as u64);
    ::metrics::counter!("route_trie_duplicates_total").increment(report.stats.duplicates.len() as u64);
}
