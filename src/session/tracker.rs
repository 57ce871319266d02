//! Session wiring.
//!
//! A [`TrackingSession`] owns every session-scoped service: the consent
//! store, identity propagator, dedup registry, emitter and timer queue. Page
//! components borrow it to create their own trackers, which share the
//! registry and emitter for the life of the session.

use std::sync::Arc;

use crate::catalog::{AdSlot, Article};
use crate::config::TrackerConfig;
use crate::consent::{ConsentManager, ConsentStore};
use crate::error::{IdentityError, TransportError};
use crate::events::entities::AbTest;
use crate::identity::{Identity, IdentityPropagator};
use crate::logging::structured::LogContext;
use crate::media::{MediaElementEvent, MediaTracking};
use crate::privacy::{should_decorate_link, FormField, FormFieldPolicy};
use crate::runtime::{Clock, EventTarget, TimerQueue};
use crate::storage::KeyValueStore;
use crate::tracking::{
    AdImpressionObserver, ArticleViewMount, EmitOutcome, Emitter, EmitterStats,
    NavigationOutcome, NavigationTracker, PageLocation, SearchSession, SubscriptionFunnel,
    TrackedEntityRegistry,
};
use crate::transport::Transport;

use super::context::SessionContext;

pub struct TrackingSession {
    context: SessionContext,
    config: TrackerConfig,
    identity: Arc<IdentityPropagator>,
    emitter: Arc<Emitter>,
    consent: ConsentManager,
    navigation: NavigationTracker,
    timers: TimerQueue,
    form_policy: FormFieldPolicy,
    ctx: LogContext,
}

impl TrackingSession {
    /// Initialize the tracker and restore the stored identity.
    ///
    /// Transport failures during initialization are logged; the session is
    /// usable regardless.
    pub fn start(
        config: TrackerConfig,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let probe = ConsentStore::new(Arc::clone(&store), &LogContext::new("startup"));
        let context = SessionContext::new(probe.record().map(|record| record.timestamp));
        let ctx = context.log_context();

        let consent_store = ConsentStore::new(Arc::clone(&store), &ctx);
        let identity = Arc::new(IdentityPropagator::new(
            Arc::clone(&store),
            Arc::clone(&transport),
            &ctx,
        ));
        let emitter = Arc::new(Emitter::new(
            &context.session_id,
            consent_store.clone(),
            Arc::clone(&identity),
            Arc::clone(&transport),
            Arc::new(TrackedEntityRegistry::new()),
            &ctx,
        ));
        let consent = ConsentManager::new(
            consent_store,
            Arc::clone(&emitter),
            config.consent_document.clone(),
            Arc::clone(&clock),
            &ctx,
        );
        let navigation = NavigationTracker::new(Arc::clone(&emitter), &ctx);
        let timers = TimerQueue::new(clock);
        let form_policy = FormFieldPolicy::new(&config.form_tracking);

        let steps: [(&str, Result<(), TransportError>); 4] = [
            ("initialize", transport.initialize(&config)),
            ("auto_pings", transport.enable_auto_pings(&config.activity)),
            ("link_tracking", transport.enable_link_tracking(&config.link_tracking)),
            ("form_tracking", transport.enable_form_tracking(&config.form_tracking)),
        ];
        for (step, result) in steps {
            if let Err(e) = result {
                crate::log_error!(ctx, "TRACKER_INIT_FAILED", step = step, error = e.to_string());
            }
        }

        let restored = identity.restore();
        crate::log_info!(
            ctx,
            "SESSION_STARTED",
            namespace = config.namespace,
            app_id = config.app_id,
            consent_given = context.consent_timestamp.is_some(),
            identity_restored = restored.is_some()
        );

        Self {
            context,
            config,
            identity,
            emitter,
            consent,
            navigation,
            timers,
            form_policy,
            ctx,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn emitter(&self) -> &Arc<Emitter> {
        &self.emitter
    }

    pub fn consent(&self) -> &ConsentManager {
        &self.consent
    }

    pub fn identity(&self) -> &Arc<IdentityPropagator> {
        &self.identity
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn stats(&self) -> EmitterStats {
        self.emitter.stats()
    }

    /// Fire due timers. Called by the host loop.
    pub fn tick(&self) -> usize {
        self.timers.run_due()
    }

    /// Report a navigation, including the initial load.
    pub fn navigate(&self, location: &PageLocation) -> NavigationOutcome {
        self.navigation.observe(location)
    }

    /// An article page mounted. Keep the handle until it unmounts.
    pub fn mount_article(&self, article: &Article) -> ArticleViewMount {
        ArticleViewMount::mount(
            &self.emitter,
            &self.timers,
            self.config.article_view_delay(),
            article.entity(),
        )
    }

    pub fn search_session(&self) -> SearchSession {
        SearchSession::new(Arc::clone(&self.emitter))
    }

    /// Pick and observe the ad for `slot`. `None` when no ad fits.
    pub fn render_ad(&self, slot: AdSlot, category: Option<&str>) -> Option<AdImpressionObserver> {
        let ad = crate::catalog::select_ad(slot, category)?;
        Some(AdImpressionObserver::observe(
            Arc::clone(&self.emitter),
            ad.entity(slot),
        ))
    }

    pub fn subscription_funnel(&self) -> SubscriptionFunnel {
        SubscriptionFunnel::new(Arc::clone(&self.emitter), Arc::clone(&self.identity))
    }

    pub fn attach_media(
        &self,
        element: &EventTarget<MediaElementEvent>,
        media_id: &str,
    ) -> MediaTracking {
        MediaTracking::attach(
            element,
            media_id,
            &self.config.media_player_type,
            Arc::clone(&self.emitter),
            &self.timers,
            self.config.media_warmup(),
            &self.ctx,
        )
    }

    pub fn login(&self, email: &str) -> Result<Identity, IdentityError> {
        self.identity.login(email)
    }

    pub fn logout(&self) -> Result<(), IdentityError> {
        self.identity.logout()
    }

    pub fn newsletter_signup(&self, email: &str, ab_test: Option<AbTest>) -> EmitOutcome {
        self.emitter.track_newsletter_signup(email, ab_test)
    }

    /// Values form tracking may record for a submission, or `None` for an
    /// untracked form.
    pub fn redact_form(
        &self,
        classes: &[&str],
        fields: &[FormField],
    ) -> Option<Vec<(String, String)>> {
        self.form_policy.redact_form(classes, fields, &self.ctx)
    }

    /// Whether an outbound link gets the cross-domain parameter.
    pub fn decorates_link(&self, href: &str) -> bool {
        should_decorate_link(&self.config, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ManualClock;
    use crate::storage::{MemoryStore, USER_KEY};
    use crate::transport::{RecordingTransport, TransportCall};

    fn start(store: Arc<MemoryStore>) -> (Arc<RecordingTransport>, TrackingSession) {
        let transport = Arc::new(RecordingTransport::new());
        let session = TrackingSession::start(
            TrackerConfig::default(),
            store,
            transport.clone(),
            Arc::new(ManualClock::new()),
        );
        (transport, session)
    }

    #[test]
    fn test_start_initializes_transport() {
        let (transport, session) = start(Arc::new(MemoryStore::new()));
        let calls = transport.calls();

        assert!(matches!(
            &calls[0],
            TransportCall::Initialize { namespace, .. } if namespace == "sp1"
        ));
        assert!(matches!(calls[1], TransportCall::EnableAutoPings(_)));
        assert!(matches!(calls[2], TransportCall::EnableLinkTracking(_)));
        assert!(matches!(calls[3], TransportCall::EnableFormTracking(_)));
        assert_eq!(calls.len(), 4);
        assert!(session.context().consent_timestamp.is_none());
    }

    #[test]
    fn test_start_restores_identity() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(USER_KEY, r#"{"email":"a@example.com","isLoggedIn":true}"#)
            .unwrap();
        let (transport, session) = start(store);

        assert_eq!(transport.identity().as_deref(), Some("a@example.com"));
        assert_eq!(session.identity().current().unwrap().as_str(), "a@example.com");
    }

    #[test]
    fn test_decorates_link() {
        let (_transport, session) = start(Arc::new(MemoryStore::new()));
        assert!(session.decorates_link("https://snowplow.io/get-started"));
        assert!(!session.decorates_link("https://example.com/"));
    }

    #[test]
    fn test_render_ad_uses_catalog() {
        let (_transport, session) = start(Arc::new(MemoryStore::new()));
        let observer = session.render_ad(AdSlot::Sidebar, None).unwrap();
        assert_eq!(observer.ad().ad_id, "professional-development");
    }
}
