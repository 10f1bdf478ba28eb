//! Build diagnostics.
//!
//! Counters are carried in values returned from the build instead of
//! process-wide state, so independent builds never observe each other.

use std::fmt;

use serde::Serialize;

/// Counters accumulated while building one route set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Opaque entries carried through without decomposition.
    pub passthrough: usize,
    /// Single-child branches folded into their parent.
    pub merges: usize,
    /// Patterns whose insertion replaced an existing entry.
    pub duplicates: Vec<String>,
}

impl BuildStats {
    pub(crate) fn record_duplicate(&mut self, pattern: &str) {
        tracing::warn!(pattern, "Duplicate entry for urlpattern");
        self.duplicates.push(pattern.to_owned());
    }

    /// Fold in the counters of a nested build.
    pub(crate) fn absorb(&mut self, other: BuildStats) {
        self.passthrough += other.passthrough;
        self.merges += other.merges;
        self.duplicates.extend(other.duplicates);
    }
}

/// Verbose summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Indented dump of the compacted tree.
    pub tree: String,
    /// Entries in the rendered top-level list.
    pub top_level: usize,
    /// Terminal and passthrough entries in the tree.
    pub total_rules: usize,
    pub stats: BuildStats,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree)?;
        writeln!(
            f,
            "Generated {} top level url patterns from {} total urls",
            self.top_level, self.total_rules
        )?;
        writeln!(f, "There were {} passthrough url patterns.", self.stats.passthrough)?;
        writeln!(f, "{} branches were merged", self.stats.merges)?;
        if !self.stats.duplicates.is_empty() {
            writeln!(f, "{} duplicate entries:", self.stats.duplicates.len())?;
            for pattern in &self.stats.duplicates {
                writeln!(f, "  {}", pattern)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb() {
        let mut stats = BuildStats {
            passthrough: 1,
            merges: 2,
            duplicates: vec!["a".into()],
        };
        stats.absorb(BuildStats {
            passthrough: 1,
            merges: 3,
            duplicates: vec!["b".into()],
        });
        assert_eq!(stats.passthrough, 2);
        assert_eq!(stats.merges, 5);
        assert_eq!(stats.duplicates, vec!["a", "b"]);
    }

    #[test]
    fn test_report_display() {
        let report = BuildReport {
            tree: "a/b\n".into(),
            top_level: 1,
            total_rules: 3,
            stats: BuildStats {
                passthrough: 0,
                merges: 4,
                duplicates: vec!["x/y".into()],
            },
        };
        let text = report.to_string();
        assert!(text.starts_with("a/b\n"));
        assert!(text.contains("Generated 1 top level url patterns from 3 total urls"));
        assert!(text.contains("4 branches were merged"));
        assert!(text.contains("  x/y"));
    }
}
