//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Each route names exactly one of a handler or an include
//! - Only includes may have an empty pattern
//! - Patterns tokenize with balanced group delimiters
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouteFile → Result<(), Vec<ValidationError>>
//! - Runs before any router is built

use thiserror::Error;

use crate::config::schema::{RouteConfig, RouteFile};
use crate::routing::segment::tokenize;

/// A semantic problem in a route file, located by its route path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("router.root must not be empty")]
    EmptyRoot,

    #[error("{location}: one of `handler` or `include` is required")]
    MissingTarget { location: String },

    #[error("{location}: `handler` and `include` are mutually exclusive")]
    ConflictingTarget { location: String },

    #[error("{location}: `pattern` may only be empty on an include")]
    EmptyPattern { location: String },

    #[error("{location}: mismatched group delimiters in `{pattern}`")]
    MalformedPattern { location: String, pattern: String },
}

/// Validate a parsed route file.
pub fn validate_config(config: &RouteFile) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.router.root.is_empty() {
        errors.push(ValidationError::EmptyRoot);
    }
    validate_routes(&config.routes, "routes", &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(routes: &[RouteConfig], prefix: &str, errors: &mut Vec<ValidationError>) {
    for (i, route) in routes.iter().enumerate() {
        let location = format!("{}[{}]", prefix, i);

        match (&route.handler, &route.include) {
            (None, None) => errors.push(ValidationError::MissingTarget {
                location: location.clone(),
            }),
            (Some(_), Some(_)) => errors.push(ValidationError::ConflictingTarget {
                location: location.clone(),
            }),
            _ => {}
        }

        if route.pattern.is_empty() && route.include.is_none() {
            errors.push(ValidationError::EmptyPattern {
                location: location.clone(),
            });
        }

        if tokenize(&route.pattern).is_err() {
            errors.push(ValidationError::MalformedPattern {
                location: location.clone(),
                pattern: route.pattern.clone(),
            });
        }

        if let Some(include) = &route.include {
            validate_routes(&include.routes, &format!("{}.include.routes", location), errors);
        }
    }
}
