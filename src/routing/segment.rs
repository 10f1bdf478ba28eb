//! Pattern tokenizer.
//!
//! Splits a route pattern into `/`-delimited segments without ever cutting
//! through a `(...)` or `[...]` group.
//!
//! Group detection counts delimiter characters. Escaped delimiters such as
//! `\(` or a `)` inside a character class are not understood and can
//! mis-tokenize; such patterns fail loudly at build time rather than at
//! resolution time.

use crate::routing::error::{RouteError, RouteResult};

/// Characters that make a segment unusable as a literal prefix.
pub const PATTERN_CHARS: &[char] = &[
    '$', '(', ')', '[', ']', '<', '>', '*', '?', '\\', '.', '+', '{', '}', '|', '^',
];

/// Standalone trailing segments that belong to the segment before them.
const TRAILING_ANCHORS: [&str; 3] = ["?", "?$", "$"];

/// True if `text` contains no pattern-special character.
pub fn is_literal(text: &str) -> bool {
    !text.contains(PATTERN_CHARS)
}

/// True if a segment can be compared literally once its leading anchor is
/// dropped.
pub fn is_literal_segment(segment: &str) -> bool {
    is_literal(segment.strip_prefix('^').unwrap_or(segment))
}

/// Tokenize `pattern` into path segments.
///
/// Fails with [`RouteError::MalformedPattern`] when the group delimiters do
/// not balance.
pub fn tokenize(pattern: &str) -> RouteResult<Vec<String>> {
    let mut words: Vec<String> = pattern.split('/').map(str::to_owned).collect();
    rejoin_split_tokens(&mut words);
    let mut segments = join_open_groups(pattern, &words)?;
    merge_trailing_anchor(&mut segments);
    Ok(segments)
}

/// Glue pairs split right at a `^` (e.g. `[^/]`) or before a `?` quantifier.
fn rejoin_split_tokens(words: &mut Vec<String>) {
    let mut i = words.len().saturating_sub(1);
    while i > 0 {
        i -= 1;
        let glue = match (words[i].chars().last(), words[i + 1].chars().next()) {
            (Some(last), Some(first)) => last == '^' || first == '?',
            _ => false,
        };
        if glue {
            let next = words.remove(i + 1);
            words[i].push('/');
            words[i].push_str(&next);
        }
    }
}

fn join_open_groups(pattern: &str, words: &[String]) -> RouteResult<Vec<String>> {
    let malformed = || RouteError::MalformedPattern {
        pattern: pattern.to_owned(),
    };

    let mut segments = Vec::with_capacity(words.len());
    let mut depth: isize = 0;
    let mut open_at: Option<usize> = None;

    for (i, word) in words.iter().enumerate() {
        let opens = word.chars().filter(|c| matches!(c, '(' | '[')).count() as isize;
        let closes = word.chars().filter(|c| matches!(c, ')' | ']')).count() as isize;

        if opens > 0 && depth == 0 {
            open_at = Some(i);
        }
        depth += opens - closes;
        if depth < 0 {
            return Err(malformed());
        }

        match open_at {
            None => segments.push(word.clone()),
            Some(start) if depth == 0 => {
                segments.push(words[start..=i].join("/"));
                open_at = None;
            }
            Some(_) => {}
        }
    }

    if open_at.is_some() {
        return Err(malformed());
    }
    Ok(segments)
}

fn merge_trailing_anchor(segments: &mut Vec<String>) {
    if segments.len() < 2 {
        return;
    }
    let trailing = segments
        .last()
        .is_some_and(|s| TRAILING_ANCHORS.contains(&s.as_str()));
    if !trailing {
        return;
    }
    if let Some(anchor) = segments.pop() {
        if let Some(prev) = segments.last_mut() {
            prev.push('/');
            prev.push_str(&anchor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(pattern: &str) -> Vec<String> {
        tokenize(pattern).unwrap()
    }

    #[test]
    fn test_plain_segments() {
        assert_eq!(tok("a/b/c$"), vec!["a", "b", "c$"]);
        assert_eq!(tok("^a/b/c$"), vec!["^a", "b", "c$"]);
        assert_eq!(tok("^api/"), vec!["^api", ""]);
        assert_eq!(tok(""), vec![""]);
    }

    #[test]
    fn test_group_spanning_separator() {
        assert_eq!(
            tok(r"foo/bar/baz(/(?P<id>\w+))?/?"),
            vec!["foo", "bar", r"baz(/(?P<id>\w+))?/?"]
        );
        assert_eq!(
            tok(r"^foo/bar/baz(/(?P<message_id>\w+)\.(?P<fragment_type>\w+)\.(?P<msg_format>\w+))?/?"),
            vec![
                "^foo",
                "bar",
                r"baz(/(?P<message_id>\w+)\.(?P<fragment_type>\w+)\.(?P<msg_format>\w+))?/?"
            ]
        );
    }

    #[test]
    fn test_character_class_with_slash() {
        assert_eq!(tok("lorem/X([^/]+)/biff"), vec!["lorem", "X([^/]+)", "biff"]);
        assert_eq!(tok("(?P<slug>[^/]+)/edit/$"), vec!["(?P<slug>[^/]+)", "edit/$"]);
    }

    #[test]
    fn test_trailing_anchor_merged() {
        assert_eq!(tok("^a/b/$"), vec!["^a", "b/$"]);
        assert_eq!(tok("^a/b/?$"), vec!["^a", "b/?$"]);
        assert_eq!(tok("$"), vec!["$"]);
    }

    #[test]
    fn test_question_mark_continuation() {
        assert_eq!(tok("a/b/?c"), vec!["a", "b/?c"]);
        assert_eq!(tok("a//?"), vec!["a", "/?"]);
    }

    #[test]
    fn test_mismatched_groups_rejected() {
        let err = tokenize("a/(b/c").unwrap_err();
        assert!(err.to_string().contains("a/(b/c"));
        assert!(tokenize("a/[b/c").is_err());
        assert!(tokenize("a)/b").is_err());
    }

    #[test]
    fn test_literal_classification() {
        assert!(is_literal("foo/bar/"));
        assert!(is_literal_segment("^foo"));
        assert!(!is_literal_segment("X([^/]+)"));
        assert!(!is_literal_segment("c$"));
        assert!(!is_literal("favicon.ico"));
        assert!(!is_literal("a^b"));
    }
}
