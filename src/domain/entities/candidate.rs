//! Candidate destination URLs grouped by campaign category.

use chrono::{DateTime, Utc};

use crate::domain::errors::TemplateError;
use crate::domain::url_template::UrlTemplate;

/// One templated destination belonging to a campaign category.
///
/// Rows are immutable once loaded; many rows share a category and the
/// redirect resolver picks among them at random.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CandidateUrl {
    pub id: i64,
    pub domain: String,
    pub path_template: String,
    pub category: String,
    pub network: String,
    pub geography: String,
    pub created_at: DateTime<Utc>,
}

impl CandidateUrl {
    /// Concatenated `domain + path_template`, placeholders left in place.
    pub fn raw_url(&self) -> String {
        format!("{}{}", self.domain, self.path_template)
    }

    /// Compiles this candidate's template.
    ///
    /// # Errors
    ///
    /// See [`UrlTemplate::compile`].
    pub fn compile(self) -> Result<CompiledCandidate, TemplateError> {
        let template = UrlTemplate::compile(&self.domain, &self.path_template)?;
        Ok(CompiledCandidate {
            candidate: self,
            template,
        })
    }
}

/// Input data for inserting a candidate.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub domain: String,
    pub path_template: String,
    pub category: String,
    pub network: String,
    pub geography: String,
}

impl NewCandidate {
    /// Checks that the template compiles before the row is written.
    ///
    /// # Errors
    ///
    /// See [`UrlTemplate::compile`].
    pub fn validate(&self) -> Result<UrlTemplate, TemplateError> {
        UrlTemplate::compile(&self.domain, &self.path_template)
    }
}

/// A candidate paired with its parsed template.
#[derive(Debug, Clone)]
pub struct CompiledCandidate {
    pub candidate: CandidateUrl,
    pub template: UrlTemplate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(path: &str) -> CandidateUrl {
        CandidateUrl {
            id: 1,
            domain: "https://a.example".to_string(),
            path_template: path.to_string(),
            category: "finance".to_string(),
            network: "mgid".to_string(),
            geography: "US".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_raw_url() {
        assert_eq!(
            candidate("/go/{click_id}").raw_url(),
            "https://a.example/go/{click_id}"
        );
    }

    #[test]
    fn test_compile_valid() {
        let compiled = candidate("/go/{click_id}").compile().unwrap();
        assert_eq!(compiled.candidate.network, "mgid");
        assert_eq!(compiled.template.placeholders().len(), 1);
    }

    #[test]
    fn test_compile_unknown_placeholder() {
        assert!(candidate("/go/{gclid}").compile().is_err());
    }

    #[test]
    fn test_new_candidate_validate() {
        let new_candidate = NewCandidate {
            domain: "not a url".to_string(),
            path_template: "/".to_string(),
            category: "c".to_string(),
            network: "n".to_string(),
            geography: "g".to_string(),
        };
        assert!(new_candidate.validate().is_err());
    }
}
