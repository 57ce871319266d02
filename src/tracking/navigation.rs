//! Page views per navigation.
//!
//! `Uninitialized -> Tracked(path)`. The host reports every navigation,
//! including the initial load; a page view is emitted only when the path
//! differs from the last tracked one.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::logging::structured::LogContext;
use crate::privacy::strip_cross_domain_param;

use super::emitter::{EmitOutcome, Emitter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    Uninitialized,
    Tracked(String),
}

/// Where the host currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    pub path: String,
    pub href: String,
    pub title: Option<String>,
    pub referrer: Option<String>,
}

impl PageLocation {
    pub fn new(path: &str, href: &str) -> Self {
        Self {
            path: path.to_string(),
            href: href.to_string(),
            title: None,
            referrer: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_referrer(mut self, referrer: &str) -> Self {
        self.referrer = Some(referrer.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationOutcome {
    /// `None` when the path was already tracked.
    pub page_view: Option<EmitOutcome>,
    /// Replacement address with the cross-domain parameter removed, if any.
    pub cleaned_href: Option<String>,
}

pub struct NavigationTracker {
    emitter: Arc<Emitter>,
    state: Mutex<NavigationState>,
    ctx: LogContext,
}

impl NavigationTracker {
    pub fn new(emitter: Arc<Emitter>, ctx: &LogContext) -> Self {
        Self {
            emitter,
            state: Mutex::new(NavigationState::Uninitialized),
            ctx: ctx.with_component("navigation"),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state.lock().clone()
    }

    /// Report a navigation. The state advances even when consent blocks
    /// the page view.
    pub fn observe(&self, location: &PageLocation) -> NavigationOutcome {
        {
            let mut state = self.state.lock();
            if matches!(&*state, NavigationState::Tracked(path) if *path == location.path) {
                crate::log_debug!(self.ctx, "NAVIGATION_REPEAT", path = location.path);
                return NavigationOutcome {
                    page_view: None,
                    cleaned_href: None,
                };
            }
            *state = NavigationState::Tracked(location.path.clone());
        }

        let outcome = self.emitter.track_page_view(
            &location.path,
            location.title.as_deref(),
            location.referrer.as_deref(),
        );

        let cleaned_href = strip_cross_domain_param(&location.href);
        if cleaned_href.is_some() {
            crate::log_debug!(self.ctx, "CROSS_DOMAIN_PARAM_CLEANED", path = location.path);
        }

        NavigationOutcome {
            page_view: Some(outcome),
            cleaned_href,
        }
    }
}
