//! Route construction errors.

use thiserror::Error;

/// Errors that abort building a route set.
///
/// A failed build never yields a partial router. No-match at resolution
/// time is not represented here; resolvers return `None` for that.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Group delimiters did not balance after splitting the pattern.
    #[error("Mismatched parentheses in urlpattern {pattern}")]
    MalformedPattern { pattern: String },

    /// The pattern engine rejected a pattern.
    #[error("Invalid regex in urlpattern {pattern}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A route declared neither a handler nor an include.
    #[error("urlpattern {pattern} has no handler or include")]
    MissingTarget { pattern: String },
}

/// Result type for route construction.
pub type RouteResult<T> = Result<T, RouteError>;
