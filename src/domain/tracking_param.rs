//! Allow-listed tracking parameters accepted by redirects and beacons.

use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use std::fmt;

/// A named tracking parameter that may appear as a `{name}` placeholder in a
/// candidate URL template.
///
/// The set is closed: templates referencing anything else are rejected when
/// the candidate is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackingParam {
    TeaserId,
    ClickId,
    CampaignId,
    SiteId,
    Cpc,
    Content,
    UtmSource,
    NewsId,
}

impl TrackingParam {
    pub const ALL: [TrackingParam; 8] = [
        TrackingParam::TeaserId,
        TrackingParam::ClickId,
        TrackingParam::CampaignId,
        TrackingParam::SiteId,
        TrackingParam::Cpc,
        TrackingParam::Content,
        TrackingParam::UtmSource,
        TrackingParam::NewsId,
    ];

    /// Name used in query strings and template placeholders.
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingParam::TeaserId => "teaser_id",
            TrackingParam::ClickId => "click_id",
            TrackingParam::CampaignId => "campaign_id",
            TrackingParam::SiteId => "site_id",
            TrackingParam::Cpc => "cpc",
            TrackingParam::Content => "content",
            TrackingParam::UtmSource => "utm_source",
            TrackingParam::NewsId => "news_id",
        }
    }

    /// Looks up a parameter by its placeholder name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for TrackingParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied values for the tracking parameters.
///
/// Empty strings deserialize to `None`, so `?teaser_id=` counts as absent.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrackingParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub teaser_id: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub click_id: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub cpc: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub content: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub utm_source: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub news_id: Option<String>,
}

impl TrackingParams {
    /// Returns the value supplied for `param`, if any.
    pub fn get(&self, param: TrackingParam) -> Option<&str> {
        let value = match param {
            TrackingParam::TeaserId => &self.teaser_id,
            TrackingParam::ClickId => &self.click_id,
            TrackingParam::CampaignId => &self.campaign_id,
            TrackingParam::SiteId => &self.site_id,
            TrackingParam::Cpc => &self.cpc,
            TrackingParam::Content => &self.content,
            TrackingParam::UtmSource => &self.utm_source,
            TrackingParam::NewsId => &self.news_id,
        };
        value.as_deref()
    }

    /// Sets the value for `param`, replacing any previous one.
    pub fn with(mut self, param: TrackingParam, value: impl Into<String>) -> Self {
        let slot = match param {
            TrackingParam::TeaserId => &mut self.teaser_id,
            TrackingParam::ClickId => &mut self.click_id,
            TrackingParam::CampaignId => &mut self.campaign_id,
            TrackingParam::SiteId => &mut self.site_id,
            TrackingParam::Cpc => &mut self.cpc,
            TrackingParam::Content => &mut self.content,
            TrackingParam::UtmSource => &mut self.utm_source,
            TrackingParam::NewsId => &mut self.news_id,
        };
        *slot = Some(value.into());
        self
    }
}
