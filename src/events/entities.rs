//! Context entities attached to analytics events.

use serde::{Deserialize, Serialize};

/// An article as seen by the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleEntity {
    pub article_id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    /// 1-based position in the list the article was shown in.
    pub position: Option<u32>,
}

impl ArticleEntity {
    pub fn new(article_id: &str, title: &str, author: &str, category: &str) -> Self {
        Self {
            article_id: article_id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            position: None,
        }
    }

    pub fn at_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdPlacement {
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "sidebar")]
    Sidebar,
    #[serde(rename = "footer")]
    Footer,
    #[serde(rename = "in-feed")]
    InFeed,
    #[serde(rename = "native")]
    Native,
    #[serde(rename = "search_results")]
    SearchResults,
    #[serde(rename = "content_body")]
    ContentBody,
    #[serde(rename = "video_pre-roll")]
    VideoPreRoll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdType {
    Banner,
    Video,
    Native,
    Interstitial,
    RichMedia,
    SponsoredContent,
    Search,
    Email,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostModel {
    Cpc,
    Cpm,
    Cpa,
}

/// An advertisement impression or click context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdEntity {
    pub ad_id: String,
    pub advertiser_id: Option<String>,
    pub campaign_id: Option<String>,
    pub creative_id: Option<String>,
    pub placement: Option<AdPlacement>,
    pub position: Option<u32>,
    #[serde(rename = "type")]
    pub ad_type: Option<AdType>,
    pub cost: Option<f64>,
    pub cost_model: Option<CostModel>,
}

impl AdEntity {
    pub fn new(ad_id: &str) -> Self {
        Self {
            ad_id: ad_id.to_string(),
            advertiser_id: None,
            campaign_id: None,
            creative_id: None,
            placement: None,
            position: None,
            ad_type: None,
            cost: None,
            cost_model: None,
        }
    }
}

/// A/B test assignment attached to a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbTest {
    pub experiment_id: String,
    pub experiment_name: Option<String>,
    pub variant_id: String,
    pub variant_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Email,
    Google,
    Facebook,
    Apple,
}

/// Subscription plan. The annual plan keeps the collector's historical
/// `annualy` spelling on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanType {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "annualy")]
    Annual,
}
