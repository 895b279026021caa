//! Parsed destination URL templates.
//!
//! A candidate's `domain + path_template` is compiled once when the candidate
//! is loaded. Compilation resolves every `{name}` placeholder against
//! [`TrackingParam`], so an unknown placeholder is caught before any request
//! is served from it.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

use crate::domain::errors::{ResolveError, TemplateError};
use crate::domain::tracking_param::{TrackingParam, TrackingParams};

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]*)\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `in_query` is set for placeholders after the first `?`.
    Param { param: TrackingParam, in_query: bool },
}

/// A compiled URL template ready for substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    segments: Vec<Segment>,
}

impl UrlTemplate {
    /// Compiles `domain` + `path_template` into a template.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::InvalidDomain`] if `domain` is not an absolute
    ///   `http`/`https` URL
    /// - [`TemplateError::UnknownPlaceholder`] if the path references a name
    ///   outside the tracking parameter set
    /// - [`TemplateError::InvalidCharacter`] if the path contains anything
    ///   other than visible ASCII
    pub fn compile(domain: &str, path_template: &str) -> Result<Self, TemplateError> {
        validate_domain(domain)?;
        validate_path(path_template)?;

        let raw = format!("{}{}", domain, path_template);
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER_REGEX.captures_iter(&raw) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = name.as_str();

            let param = TrackingParam::from_name(name)
                .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;

            if whole.start() > last {
                segments.push(Segment::Literal(raw[last..whole.start()].to_string()));
            }
            segments.push(Segment::Param {
                param,
                in_query: raw[..whole.start()].contains('?'),
            });
            last = whole.end();
        }

        if last < raw.len() {
            segments.push(Segment::Literal(raw[last..].to_string()));
        }

        Ok(Self { segments })
    }

    /// Parameters referenced by this template, in name order.
    pub fn placeholders(&self) -> BTreeSet<TrackingParam> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param { param, .. } => Some(*param),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitutes every placeholder with its encoded value.
    ///
    /// Path placeholders are percent-encoded as a path segment (`%20` for a
    /// space); query placeholders use form encoding (`+` for a space).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingParameter`] naming the first referenced
    /// parameter that `params` does not supply.
    pub fn render(&self, params: &TrackingParams) -> Result<String, ResolveError> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param { param, in_query } => {
                    let value = params
                        .get(*param)
                        .ok_or(ResolveError::MissingParameter(*param))?;
                    if *in_query {
                        out.extend(url::form_urlencoded::byte_serialize(value.as_bytes()));
                    } else {
                        out.push_str(&urlencoding::encode(value));
                    }
                }
            }
        }

        Ok(out)
    }
}

fn validate_domain(domain: &str) -> Result<(), TemplateError> {
    let invalid = |reason: String| TemplateError::InvalidDomain {
        domain: domain.to_string(),
        reason,
    };

    if !domain.chars().all(|c| c.is_ascii_graphic()) {
        return Err(invalid("contains whitespace or non-ASCII characters".to_string()));
    }

    let parsed = Url::parse(domain).map_err(|e| invalid(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(())
}

/// The rendered URL ends up in a `Location` header.
fn validate_path(path_template: &str) -> Result<(), TemplateError> {
    match path_template
        .char_indices()
        .find(|(_, c)| !c.is_ascii_graphic())
    {
        Some((position, character)) => Err(TemplateError::InvalidCharacter {
            character,
            position,
        }),
        None => Ok(()),
    }
}
