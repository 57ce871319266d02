//! Typed tracker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Page-ping (activity) tracking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTrackingConfig {
    pub minimum_visit_length_secs: u32,
    pub heartbeat_delay_secs: u32,
}

impl Default for ActivityTrackingConfig {
    fn default() -> Self {
        Self {
            minimum_visit_length_secs: 20,
            heartbeat_delay_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTrackingConfig {
    /// Capture link text content with each click.
    pub track_content: bool,
}

impl Default for LinkTrackingConfig {
    fn default() -> Self {
        Self {
            track_content: true,
        }
    }
}

/// Which forms and fields form tracking may capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormTrackingConfig {
    /// Forms carrying any of these classes are never tracked.
    pub form_denylist: Vec<String>,
    /// When non-empty, only forms carrying one of these classes are tracked.
    pub form_allowlist: Vec<String>,
    /// Field names whose values are never captured.
    pub field_denylist: Vec<String>,
}

impl Default for FormTrackingConfig {
    fn default() -> Self {
        Self {
            form_denylist: vec!["no-track".to_string()],
            form_allowlist: Vec::new(),
            field_denylist: vec![
                "password".to_string(),
                "ssn".to_string(),
                "credit-card".to_string(),
            ],
        }
    }
}

/// Static parts of the enhanced-consent document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentDocumentConfig {
    pub basis_for_processing: String,
    pub consent_url: String,
    pub consent_version: String,
    pub domains_applied: Vec<String>,
    pub gdpr_applies: bool,
}

impl Default for ConsentDocumentConfig {
    fn default() -> Self {
        Self {
            basis_for_processing: "consent".to_string(),
            consent_url: "http://localhost:3000/privacy-policy".to_string(),
            consent_version: "1.0".to_string(),
            domains_applied: vec!["localhost".to_string()],
            gdpr_applies: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub namespace: String,
    pub collector_url: String,
    pub app_id: String,
    pub app_version: String,
    pub cookie_same_site: String,
    pub event_method: String,
    pub buffer_size: u32,
    pub web_page_context: bool,
    /// Outbound links to these hosts carry the cross-domain `_sp` parameter.
    pub cross_domain_hosts: Vec<String>,
    pub activity: ActivityTrackingConfig,
    pub link_tracking: LinkTrackingConfig,
    pub form_tracking: FormTrackingConfig,
    pub consent_document: ConsentDocumentConfig,
    /// Delay between an article page mounting and its view event.
    pub article_view_delay_ms: u64,
    /// Window after media attach during which `play` is ignored.
    pub media_warmup_ms: u64,
    pub media_player_type: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            namespace: "sp1".to_string(),
            collector_url: "http://localhost:9090".to_string(),
            app_id: "demo-media-publishing-web".to_string(),
            app_version: "1.0.0".to_string(),
            cookie_same_site: "Lax".to_string(),
            event_method: "post".to_string(),
            buffer_size: 1,
            web_page_context: true,
            cross_domain_hosts: vec!["snowplow.io".to_string()],
            activity: ActivityTrackingConfig::default(),
            link_tracking: LinkTrackingConfig::default(),
            form_tracking: FormTrackingConfig::default(),
            consent_document: ConsentDocumentConfig::default(),
            article_view_delay_ms: 100,
            media_warmup_ms: 100,
            media_player_type: "org.whatwg-media_element".to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn article_view_delay(&self) -> Duration {
        Duration::from_millis(self.article_view_delay_ms)
    }

    pub fn media_warmup(&self) -> Duration {
        Duration::from_millis(self.media_warmup_ms)
    }

    /// Whether an outbound link to `hostname` gets cross-domain decoration.
    pub fn decorates_link(&self, hostname: &str) -> bool {
        self.cross_domain_hosts
            .iter()
            .any(|host| host.eq_ignore_ascii_case(hostname))
    }
}
