//! Subscription funnel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::IdentityError;
use crate::events::entities::{LoginMethod, PlanType};
use crate::events::types::FunnelStep;
use crate::identity::IdentityPropagator;

use super::emitter::{EmitOutcome, Emitter};

/// One pass through the subscribe page. Steps are sent as they complete.
pub struct SubscriptionFunnel {
    emitter: Arc<Emitter>,
    identity: Arc<IdentityPropagator>,
    entered: AtomicBool,
}

impl SubscriptionFunnel {
    pub fn new(emitter: Arc<Emitter>, identity: Arc<IdentityPropagator>) -> Self {
        Self {
            emitter,
            identity,
            entered: AtomicBool::new(false),
        }
    }

    /// Entering the flow. Tracked once per funnel instance.
    pub fn begin(&self) -> Option<EmitOutcome> {
        if self.entered.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(self.emitter.track_funnel_step(FunnelStep::BeginWorkflow))
    }

    pub fn select_plan(&self, plan: PlanType) -> EmitOutcome {
        self.emitter
            .track_funnel_step(FunnelStep::SelectPlan { value: plan })
    }

    pub fn personal_details(&self) -> EmitOutcome {
        self.emitter.track_funnel_step(FunnelStep::PersonalDetails)
    }

    /// Payment confirmed: track the step, then log the subscriber in.
    ///
    /// A successful login also emits `login_success`.
    pub fn confirm_payment(&self, email: &str) -> Result<EmitOutcome, IdentityError> {
        let outcome = self.emitter.track_funnel_step(FunnelStep::ConfirmPayment);
        self.identity.login(email)?;
        self.emitter.track_login_success(Some(LoginMethod::Email));
        Ok(outcome)
    }
}
