//! Ad impression and click tracking.
//!
//! An [`AdImpressionObserver`] is created per rendered ad. It reports one
//! impression the first time the ad is at least half visible and then stops
//! observing.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::events::entities::AdEntity;

use super::emitter::{EmitOutcome, Emitter};

/// Fraction of the ad that must be visible to count an impression.
pub const IMPRESSION_VISIBILITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObserverState {
    Observing,
    Fired,
    Disconnected,
}

pub struct AdImpressionObserver {
    emitter: Arc<Emitter>,
    ad: AdEntity,
    state: Mutex<ObserverState>,
}

impl AdImpressionObserver {
    pub fn observe(emitter: Arc<Emitter>, ad: AdEntity) -> Self {
        Self {
            emitter,
            ad,
            state: Mutex::new(ObserverState::Observing),
        }
    }

    pub fn ad(&self) -> &AdEntity {
        &self.ad
    }

    /// Visibility update from the host, as a ratio in `[0, 1]`.
    pub fn visibility_changed(&self, ratio: f64) -> Option<EmitOutcome> {
        {
            let mut state = self.state.lock();
            if *state != ObserverState::Observing || ratio < IMPRESSION_VISIBILITY_THRESHOLD {
                return None;
            }
            *state = ObserverState::Fired;
        }
        log::debug!("AD_VISIBLE ad_id={} ratio={:.2}", self.ad.ad_id, ratio);
        Some(self.emitter.track_ad_impression(self.ad.clone()))
    }

    pub fn is_observing(&self) -> bool {
        *self.state.lock() == ObserverState::Observing
    }

    /// Stop observing, e.g. when the ad unmounts before becoming visible.
    pub fn disconnect(&self) {
        let mut state = self.state.lock();
        if *state == ObserverState::Observing {
            *state = ObserverState::Disconnected;
        }
    }

    /// Click on this ad. Clicks are not deduplicated.
    pub fn clicked(&self) -> EmitOutcome {
        self.emitter.track_ad_click(self.ad.clone())
    }
}
