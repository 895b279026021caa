//! Domain error types for redirect resolution and candidate templates.

use crate::domain::tracking_param::TrackingParam;

/// Failure to resolve a redirect for a category.
///
/// Both variants are user-facing: they are rendered as a JSON payload rather
/// than an HTTP error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("No URLs found for category '{category}'")]
    NoCandidates { category: String },

    #[error("Missing required parameter '{0}'")]
    MissingParameter(TrackingParam),
}

impl ResolveError {
    /// Stable machine-readable code for the payload.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::NoCandidates { .. } => "no_candidates",
            ResolveError::MissingParameter(_) => "missing_parameter",
        }
    }
}

/// A candidate URL that cannot be turned into a usable template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Unknown placeholder '{{{0}}}' in path template")]
    UnknownPlaceholder(String),

    #[error("Invalid candidate domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    #[error("Invalid character {character:?} at byte {position} of path template")]
    InvalidCharacter { character: char, position: usize },
}
