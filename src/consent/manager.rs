//! Consent banner actions.
//!
//! Each decision is persisted first and then reported as an enhanced-consent
//! event. The event goes through the normal analytics gate, so a decision
//! that leaves analytics off reports nothing.

use std::sync::Arc;

use crate::config::ConsentDocumentConfig;
use crate::error::StorageError;
use crate::events::types::{ConsentAction, ConsentDocument};
use crate::logging::structured::LogContext;
use crate::runtime::Clock;
use crate::tracking::{EmitOutcome, Emitter};

use super::preferences::ConsentPreferences;
use super::store::ConsentStore;

pub struct ConsentManager {
    store: ConsentStore,
    emitter: Arc<Emitter>,
    document: ConsentDocumentConfig,
    clock: Arc<dyn Clock>,
    ctx: LogContext,
}

impl ConsentManager {
    pub fn new(
        store: ConsentStore,
        emitter: Arc<Emitter>,
        document: ConsentDocumentConfig,
        clock: Arc<dyn Clock>,
        ctx: &LogContext,
    ) -> Self {
        Self {
            store,
            emitter,
            document,
            clock,
            ctx: ctx.with_component("consent"),
        }
    }

    /// Whether the banner should be shown (no decision stored yet).
    pub fn needs_decision(&self) -> bool {
        !self.store.is_given()
    }

    /// Current preferences, defaulting to necessary-only.
    pub fn preferences(&self) -> ConsentPreferences {
        self.store.load().unwrap_or_default()
    }

    pub fn accept_all(&self) -> Result<EmitOutcome, StorageError> {
        self.decide(ConsentAction::Allow, ConsentPreferences::accept_all())
    }

    /// Persist necessary-only consent.
    ///
    /// The decision turns analytics off, so no consent event is built; the
    /// outcome is always [`EmitOutcome::SuppressedNoConsent`].
    pub fn reject_all(&self) -> Result<EmitOutcome, StorageError> {
        let record = self.store.save(ConsentPreferences::reject_all())?;
        crate::log_info!(
            self.ctx,
            "CONSENT_DECISION",
            action = ConsentAction::Deny,
            scopes = record.preferences.granted_scopes()
        );
        Ok(EmitOutcome::SuppressedNoConsent)
    }

    pub fn save_custom(&self, prefs: ConsentPreferences) -> Result<EmitOutcome, StorageError> {
        self.decide(ConsentAction::Selected, prefs)
    }

    /// The banner became visible. Reports time since session start.
    pub fn show_banner(&self) -> EmitOutcome {
        let elapsed_ms = self.clock.now().as_secs_f64() * 1000.0;
        crate::log_info!(self.ctx, "CONSENT_BANNER_SHOWN", elapsed_ms = elapsed_ms);
        self.emitter.track_cmp_visible(elapsed_ms)
    }

    /// Withdraw a previous decision.
    ///
    /// Reported while the old decision still applies, then cleared.
    pub fn withdraw(&self) -> Result<EmitOutcome, StorageError> {
        let scopes = self.preferences().granted_scopes();
        let outcome = self
            .emitter
            .track_consent(ConsentAction::Withdrawn, self.document(scopes));
        self.store.clear()?;
        crate::log_info!(self.ctx, "CONSENT_WITHDRAWN");
        Ok(outcome)
    }

    fn decide(
        &self,
        action: ConsentAction,
        prefs: ConsentPreferences,
    ) -> Result<EmitOutcome, StorageError> {
        let record = self.store.save(prefs)?;
        let scopes = record.preferences.granted_scopes();
        crate::log_info!(self.ctx, "CONSENT_DECISION", action = action, scopes = scopes);
        Ok(self.emitter.track_consent(action, self.document(scopes)))
    }

    fn document(&self, consent_scopes: Vec<String>) -> ConsentDocument {
        ConsentDocument {
            consent_scopes,
            basis_for_processing: self.document.basis_for_processing.clone(),
            consent_url: self.document.consent_url.clone(),
            consent_version: self.document.consent_version.clone(),
            domains_applied: self.document.domains_applied.clone(),
            gdpr_applies: self.document.gdpr_applies,
        }
    }
}
