//! The analytics event union.
//!
//! Events are built once by the emitter and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::{AbTest, AdEntity, ArticleEntity, LoginMethod, PlanType};

/// Percent boundaries the tracker derives progress events for.
pub const MEDIA_PROGRESS_BOUNDARIES: [u8; 4] = [25, 50, 75, 100];

/// Subscription funnel steps, in the order a user normally completes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step_name", rename_all = "snake_case")]
pub enum FunnelStep {
    BeginWorkflow,
    SelectPlan { value: PlanType },
    PersonalDetails,
    ConfirmPayment,
}

impl FunnelStep {
    pub fn name(&self) -> &'static str {
        match self {
            FunnelStep::BeginWorkflow => "begin_workflow",
            FunnelStep::SelectPlan { .. } => "select_plan",
            FunnelStep::PersonalDetails => "personal_details",
            FunnelStep::ConfirmPayment => "confirm_payment",
        }
    }
}

/// Player state snapshot supplied on every playback tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub current_time: f64,
    pub duration: f64,
    pub paused: bool,
    /// 0..=100
    pub volume: u8,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaEvent {
    /// Media tracking registered for a player.
    Start {
        player_type: String,
        boundaries: Vec<u8>,
    },
    Play,
    Pause,
    End,
    SeekStart,
    SeekEnd,
    VolumeChange { new_volume: u8 },
    FullscreenChange { fullscreen: bool },
    /// Continuous progress update; percent boundaries are derived downstream.
    Progress { player: PlayerSnapshot },
}

impl MediaEvent {
    pub fn name(&self) -> &'static str {
        match self {
            MediaEvent::Start { .. } => "start",
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::End => "end",
            MediaEvent::SeekStart => "seek_start",
            MediaEvent::SeekEnd => "seek_end",
            MediaEvent::VolumeChange { .. } => "volume_change",
            MediaEvent::FullscreenChange { .. } => "fullscreen_change",
            MediaEvent::Progress { .. } => "progress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentAction {
    Allow,
    /// Part of the collector schema. Never sent: rejecting turns analytics off.
    Deny,
    Selected,
    Withdrawn,
}

/// Enhanced-consent document describing a consent decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentDocument {
    pub consent_scopes: Vec<String>,
    pub basis_for_processing: String,
    pub consent_url: String,
    pub consent_version: String,
    pub domains_applied: Vec<String>,
    pub gdpr_applies: bool,
}

/// Every event the tracking layer can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    PageView {
        path: String,
        title: Option<String>,
        referrer: Option<String>,
    },
    ArticleView {
        article: ArticleEntity,
    },
    SearchQuick {
        term: String,
        article: ArticleEntity,
    },
    SearchFull {
        term: String,
        total_results: usize,
        articles: Vec<ArticleEntity>,
    },
    AdImpression {
        ad: AdEntity,
    },
    AdClick {
        ad: AdEntity,
    },
    NewsletterSignup {
        ab_test: Option<AbTest>,
    },
    FunnelStep {
        step: FunnelStep,
    },
    LoginSuccess {
        method: Option<LoginMethod>,
    },
    Consent {
        action: ConsentAction,
        document: ConsentDocument,
    },
    CmpVisible {
        elapsed_time_ms: f64,
    },
    MediaEvent {
        media_id: String,
        media: MediaEvent,
    },
}

/// Discriminant of [`AnalyticsEvent`], used for stats and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PageView,
    ArticleView,
    SearchQuick,
    SearchFull,
    AdImpression,
    AdClick,
    NewsletterSignup,
    FunnelStep,
    LoginSuccess,
    Consent,
    CmpVisible,
    MediaEvent,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PageView => "page_view",
            EventKind::ArticleView => "article_view",
            EventKind::SearchQuick => "search_quick",
            EventKind::SearchFull => "search_full",
            EventKind::AdImpression => "ad_impression",
            EventKind::AdClick => "ad_click",
            EventKind::NewsletterSignup => "newsletter_signup",
            EventKind::FunnelStep => "funnel_step",
            EventKind::LoginSuccess => "login_success",
            EventKind::Consent => "consent",
            EventKind::CmpVisible => "cmp_visible",
            EventKind::MediaEvent => "media_event",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnalyticsEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AnalyticsEvent::PageView { .. } => EventKind::PageView,
            AnalyticsEvent::ArticleView { .. } => EventKind::ArticleView,
            AnalyticsEvent::SearchQuick { .. } => EventKind::SearchQuick,
            AnalyticsEvent::SearchFull { .. } => EventKind::SearchFull,
            AnalyticsEvent::AdImpression { .. } => EventKind::AdImpression,
            AnalyticsEvent::AdClick { .. } => EventKind::AdClick,
            AnalyticsEvent::NewsletterSignup { .. } => EventKind::NewsletterSignup,
            AnalyticsEvent::FunnelStep { .. } => EventKind::FunnelStep,
            AnalyticsEvent::LoginSuccess { .. } => EventKind::LoginSuccess,
            AnalyticsEvent::Consent { .. } => EventKind::Consent,
            AnalyticsEvent::CmpVisible { .. } => EventKind::CmpVisible,
            AnalyticsEvent::MediaEvent { .. } => EventKind::MediaEvent,
        }
    }
}

/// An event as handed to a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: Uuid,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: AnalyticsEvent,
}

impl EventEnvelope {
    pub fn new(session_id: &str, event: AnalyticsEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            created_at: Utc::now(),
            event,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_tagging() {
        let event = AnalyticsEvent::FunnelStep {
            step: FunnelStep::SelectPlan {
                value: PlanType::Monthly,
            },
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], json!("funnel_step"));
        assert_eq!(value["step"]["step_name"], json!("select_plan"));
        assert_eq!(value["step"]["value"], json!("monthly"));
    }

    #[test]
    fn test_media_event_tagging() {
        let event = AnalyticsEvent::MediaEvent {
            media_id: "demo".to_string(),
            media: MediaEvent::VolumeChange { new_volume: 40 },
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], json!("media_event"));
        assert_eq!(value["media"]["type"], json!("volume_change"));
        assert_eq!(value["media"]["new_volume"], json!(40));
    }

    #[test]
    fn test_envelope_flattens_event() {
        let envelope = EventEnvelope::new(
            "sess-1",
            AnalyticsEvent::PageView {
                path: "/".to_string(),
                title: None,
                referrer: None,
            },
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["event"], json!("page_view"));
        assert_eq!(value["path"], json!("/"));
        assert_eq!(value["session_id"], json!("sess-1"));
        assert_eq!(envelope.kind(), EventKind::PageView);

        let decoded: EventEnvelope = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_step_names() {
        assert_eq!(FunnelStep::BeginWorkflow.name(), "begin_workflow");
        assert_eq!(FunnelStep::ConfirmPayment.name(), "confirm_payment");
        assert_eq!(EventKind::SearchFull.to_string(), "search_full");
    }
}
