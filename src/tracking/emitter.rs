//! Event emitter.
//!
//! Every tracking call funnels through one pipeline:
//! validate, consent gate, optional dedup mark, envelope, transport.
//! Nothing here returns an error to the caller; each call reports an
//! [`EmitOutcome`] and a log line instead.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::consent::{ConsentCategory, ConsentStore};
use crate::error::{TransportError, ValidationError};
use crate::events::entities::{AbTest, AdEntity, ArticleEntity, LoginMethod};
use crate::events::types::{
    AnalyticsEvent, ConsentAction, ConsentDocument, EventEnvelope, FunnelStep, MediaEvent,
};
use crate::identity::IdentityPropagator;
use crate::logging::structured::LogContext;
use crate::transport::Transport;

use super::dedup::TrackedEntityRegistry;

/// What happened to one tracking call.
#[derive(Debug, Clone, PartialEq)]
pub enum EmitOutcome {
    /// Handed to the transport.
    Sent,
    /// A required field was missing.
    Dropped(ValidationError),
    /// Analytics consent not granted. Never replayed.
    SuppressedNoConsent,
    /// Already tracked in this session.
    SuppressedDuplicate,
    /// The transport refused the event. Not retried.
    TransportFailed(TransportError),
}

impl EmitOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, EmitOutcome::Sent)
    }

    fn label(&self) -> &'static str {
        match self {
            EmitOutcome::Sent => "sent",
            EmitOutcome::Dropped(_) => "dropped",
            EmitOutcome::SuppressedNoConsent => "no_consent",
            EmitOutcome::SuppressedDuplicate => "duplicate",
            EmitOutcome::TransportFailed(_) => "transport_failed",
        }
    }
}

/// Per-session emission counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitterStats {
    pub sent: u64,
    pub dropped: u64,
    pub suppressed_no_consent: u64,
    pub suppressed_duplicate: u64,
    pub transport_failed: u64,
}

impl EmitterStats {
    fn record(&mut self, outcome: &EmitOutcome) {
        match outcome {
            EmitOutcome::Sent => self.sent += 1,
            EmitOutcome::Dropped(_) => self.dropped += 1,
            EmitOutcome::SuppressedNoConsent => self.suppressed_no_consent += 1,
            EmitOutcome::SuppressedDuplicate => self.suppressed_duplicate += 1,
            EmitOutcome::TransportFailed(_) => self.transport_failed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.sent
            + self.dropped
            + self.suppressed_no_consent
            + self.suppressed_duplicate
            + self.transport_failed
    }
}

/// Typed facade over the transport.
pub struct Emitter {
    session_id: String,
    consent: ConsentStore,
    identity: Arc<IdentityPropagator>,
    transport: Arc<dyn Transport>,
    registry: Arc<TrackedEntityRegistry>,
    stats: Mutex<EmitterStats>,
    ctx: LogContext,
}

impl Emitter {
    pub fn new(
        session_id: &str,
        consent: ConsentStore,
        identity: Arc<IdentityPropagator>,
        transport: Arc<dyn Transport>,
        registry: Arc<TrackedEntityRegistry>,
        ctx: &LogContext,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            consent,
            identity,
            transport,
            registry,
            stats: Mutex::new(EmitterStats::default()),
            ctx: ctx.with_component("emitter"),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn registry(&self) -> &Arc<TrackedEntityRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> EmitterStats {
        self.stats.lock().clone()
    }

    /// Run `event` through the pipeline without dedup.
    pub fn emit(&self, event: AnalyticsEvent) -> EmitOutcome {
        self.dispatch(event, None)
    }

    /// Page view for `path`. The stored identity is re-attached first.
    pub fn track_page_view(
        &self,
        path: &str,
        title: Option<&str>,
        referrer: Option<&str>,
    ) -> EmitOutcome {
        self.identity.restore();
        self.emit(AnalyticsEvent::PageView {
            path: path.to_string(),
            title: title.map(str::to_string),
            referrer: referrer.map(str::to_string),
        })
    }

    /// Article view, at most once per article id per session.
    ///
    /// The id is marked before the transport is called.
    pub fn track_article_view(&self, article: ArticleEntity) -> EmitOutcome {
        let key = article.article_id.clone();
        self.dispatch(AnalyticsEvent::ArticleView { article }, Some(&key))
    }

    /// Full search results; positions are assigned 1-based in result order.
    pub fn track_search_full(&self, term: &str, articles: Vec<ArticleEntity>) -> EmitOutcome {
        let articles: Vec<ArticleEntity> = articles
            .into_iter()
            .enumerate()
            .map(|(i, article)| article.at_position(i as u32 + 1))
            .collect();
        self.emit(AnalyticsEvent::SearchFull {
            term: term.to_string(),
            total_results: articles.len(),
            articles,
        })
    }

    /// Click on a quick-search result at 1-based `position`.
    pub fn track_search_quick(
        &self,
        term: &str,
        article: ArticleEntity,
        position: u32,
    ) -> EmitOutcome {
        self.emit(AnalyticsEvent::SearchQuick {
            term: term.to_string(),
            article: article.at_position(position),
        })
    }

    pub fn track_ad_impression(&self, ad: AdEntity) -> EmitOutcome {
        self.emit(AnalyticsEvent::AdImpression { ad })
    }

    pub fn track_ad_click(&self, ad: AdEntity) -> EmitOutcome {
        self.emit(AnalyticsEvent::AdClick { ad })
    }

    /// Newsletter conversion. The email itself is never sent.
    pub fn track_newsletter_signup(&self, email: &str, ab_test: Option<AbTest>) -> EmitOutcome {
        if email.trim().is_empty() {
            return self.finish(
                "newsletter_signup",
                EmitOutcome::Dropped(ValidationError::missing("newsletter_signup", "email")),
            );
        }
        self.emit(AnalyticsEvent::NewsletterSignup { ab_test })
    }

    pub fn track_funnel_step(&self, step: FunnelStep) -> EmitOutcome {
        self.emit(AnalyticsEvent::FunnelStep { step })
    }

    pub fn track_login_success(&self, method: Option<LoginMethod>) -> EmitOutcome {
        self.emit(AnalyticsEvent::LoginSuccess { method })
    }

    pub fn track_consent(&self, action: ConsentAction, document: ConsentDocument) -> EmitOutcome {
        self.emit(AnalyticsEvent::Consent { action, document })
    }

    pub fn track_cmp_visible(&self, elapsed_time_ms: f64) -> EmitOutcome {
        self.emit(AnalyticsEvent::CmpVisible { elapsed_time_ms })
    }

    pub fn track_media(&self, media_id: &str, media: MediaEvent) -> EmitOutcome {
        self.emit(AnalyticsEvent::MediaEvent {
            media_id: media_id.to_string(),
            media,
        })
    }

    fn dispatch(&self, event: AnalyticsEvent, dedup_key: Option<&str>) -> EmitOutcome {
        let kind = event.kind();

        if let Err(e) = event.validate() {
            return self.finish(kind.as_str(), EmitOutcome::Dropped(e));
        }

        if !self.consent.has_consent(ConsentCategory::Analytics) {
            return self.finish(kind.as_str(), EmitOutcome::SuppressedNoConsent);
        }

        if let Some(key) = dedup_key {
            if !self.registry.mark(key) {
                return self.finish(kind.as_str(), EmitOutcome::SuppressedDuplicate);
            }
        }

        let envelope = EventEnvelope::new(&self.session_id, event);
        let outcome = match self.transport.send_event(&envelope) {
            Ok(()) => EmitOutcome::Sent,
            Err(e) => EmitOutcome::TransportFailed(e),
        };
        self.finish(kind.as_str(), outcome)
    }

    fn finish(&self, kind: &str, outcome: EmitOutcome) -> EmitOutcome {
        self.stats.lock().record(&outcome);

        match &outcome {
            EmitOutcome::Sent => {
                crate::log_debug!(self.ctx, "EVENT_SENT", kind = kind);
            }
            EmitOutcome::Dropped(e) => {
                crate::log_warn!(self.ctx, "EVENT_DROPPED", kind = kind, reason = e.to_string());
            }
            EmitOutcome::SuppressedNoConsent | EmitOutcome::SuppressedDuplicate => {
                crate::log_debug!(
                    self.ctx,
                    "EVENT_SUPPRESSED",
                    kind = kind,
                    reason = outcome.label()
                );
            }
            EmitOutcome::TransportFailed(e) => {
                crate::log_error!(
                    self.ctx,
                    "EVENT_TRANSPORT_FAILED",
                    kind = kind,
                    error = e.to_string()
                );
            }
        }
        outcome
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{article, Harness};
    use super::*;
    use crate::consent::ConsentPreferences;
    use crate::events::types::EventKind;
    use crate::storage::{KeyValueStore, USER_KEY};

    #[test]
    fn test_sends_with_consent() {
        let h = Harness::new(true);
        let outcome = h.emitter.track_page_view("/", Some("Home"), None);
        assert_eq!(outcome, EmitOutcome::Sent);
        assert_eq!(h.transport.count_of(EventKind::PageView), 1);
        assert_eq!(h.transport.events()[0].session_id, "test-session");
    }

    #[test]
    fn test_no_consent_is_silent_and_not_replayed() {
        let h = Harness::new(false);
        assert_eq!(
            h.emitter.track_page_view("/", None, None),
            EmitOutcome::SuppressedNoConsent
        );

        h.consent.save(ConsentPreferences::accept_all()).unwrap();
        assert!(h.transport.events().is_empty());

        h.emitter.track_page_view("/next", None, None);
        let events = h.transport.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0].event,
            AnalyticsEvent::PageView { path, .. } if path == "/next"
        ));
    }

    #[test]
    fn test_marketing_only_does_not_open_analytics() {
        let h = Harness::new(false);
        h.consent
            .save(ConsentPreferences::new(false, true, true))
            .unwrap();
        assert_eq!(
            h.emitter.track_ad_click(AdEntity::new("ad-1")),
            EmitOutcome::SuppressedNoConsent
        );
    }

    #[test]
    fn test_invalid_event_dropped() {
        let h = Harness::new(true);
        let outcome = h.emitter.track_article_view(article(""));
        assert!(matches!(outcome, EmitOutcome::Dropped(_)));
        assert!(h.transport.events().is_empty());
        assert!(h.emitter.registry().is_empty());
    }

    #[test]
    fn test_article_view_dedup() {
        let h = Harness::new(true);
        assert!(h.emitter.track_article_view(article("a-1")).is_sent());
        assert_eq!(
            h.emitter.track_article_view(article("a-1")),
            EmitOutcome::SuppressedDuplicate
        );
        assert_eq!(h.transport.count_of(EventKind::ArticleView), 1);
    }

    #[test]
    fn test_transport_failure_swallowed() {
        let h = Harness::new(true);
        h.transport
            .fail_sends(Some(TransportError::Unavailable("offline".into())));

        let outcome = h.emitter.track_article_view(article("a-1"));
        assert!(matches!(outcome, EmitOutcome::TransportFailed(_)));
        // marked before the send, so a failed send is not retried on remount
        assert!(h.emitter.registry().contains("a-1"));

        h.transport.fail_sends(None);
        assert_eq!(
            h.emitter.track_article_view(article("a-1")),
            EmitOutcome::SuppressedDuplicate
        );
    }

    #[test]
    fn test_search_full_positions() {
        let h = Harness::new(true);
        h.emitter
            .track_search_full("ai", vec![article("a-1"), article("a-2")]);

        match &h.transport.events()[0].event {
            AnalyticsEvent::SearchFull {
                term,
                total_results,
                articles,
            } => {
                assert_eq!(term, "ai");
                assert_eq!(*total_results, 2);
                assert_eq!(articles[0].position, Some(1));
                assert_eq!(articles[1].position, Some(2));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_newsletter_blank_email_dropped() {
        let h = Harness::new(true);
        assert!(matches!(
            h.emitter.track_newsletter_signup("  ", None),
            EmitOutcome::Dropped(_)
        ));
        assert!(h
            .emitter
            .track_newsletter_signup("reader@example.com", None)
            .is_sent());
        let body = serde_json::to_string(&h.transport.events()[0]).unwrap();
        assert!(!body.contains("reader@example.com"));
    }

    #[test]
    fn test_page_view_restores_identity() {
        let h = Harness::new(true);
        h.store
            .set(USER_KEY, r#"{"email":"a@example.com","isLoggedIn":true}"#)
            .unwrap();
        h.emitter.track_page_view("/", None, None);
        assert_eq!(h.transport.identity().as_deref(), Some("a@example.com"));
        assert_eq!(h.identity.current().unwrap().as_str(), "a@example.com");
    }

    #[test]
    fn test_stats() {
        let h = Harness::new(true);
        h.emitter.track_article_view(article("a-1"));
        h.emitter.track_article_view(article("a-1"));
        h.emitter.track_article_view(article(""));

        let stats = h.emitter.stats();
        assert_eq!(stats.sent, 1);
        assert_eq!(stats.suppressed_duplicate, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.total(), 3);
    }
}
