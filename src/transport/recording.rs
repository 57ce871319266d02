//! In-memory transport that records every call.

use parking_lot::Mutex;

use crate::config::{
    ActivityTrackingConfig, FormTrackingConfig, LinkTrackingConfig, TrackerConfig,
};
use crate::error::TransportError;
use crate::events::types::{EventEnvelope, EventKind};

use super::Transport;

/// One call made against a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Initialize { namespace: String, collector_url: String },
    SetIdentity(Option<String>),
    SendEvent(EventEnvelope),
    EnableAutoPings(ActivityTrackingConfig),
    EnableLinkTracking(LinkTrackingConfig),
    EnableFormTracking(FormTrackingConfig),
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<TransportCall>,
    identity: Option<String>,
    send_failure: Option<TransportError>,
}

/// Records calls in order. Used by tests and replay tooling.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    inner: Mutex<Recorded>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `send_event` fail with `error` (or succeed with `None`).
    pub fn fail_sends(&self, error: Option<TransportError>) {
        self.inner.lock().send_failure = error;
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().calls.clone()
    }

    /// Events accepted by `send_event`, in order.
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::SendEvent(envelope) => Some(envelope.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events().iter().filter(|e| e.kind() == kind).count()
    }

    /// The identity most recently set.
    pub fn identity(&self) -> Option<String> {
        self.inner.lock().identity.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().calls.clear();
    }
}

impl Transport for RecordingTransport {
    fn initialize(&self, config: &TrackerConfig) -> Result<(), TransportError> {
        self.inner.lock().calls.push(TransportCall::Initialize {
            namespace: config.namespace.clone(),
            collector_url: config.collector_url.clone(),
        });
        Ok(())
    }

    fn set_identity(&self, identity: Option<&str>) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.identity = identity.map(str::to_string);
        inner
            .calls
            .push(TransportCall::SetIdentity(identity.map(str::to_string)));
        Ok(())
    }

    fn send_event(&self, event: &EventEnvelope) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        if let Some(error) = &inner.send_failure {
            return Err(error.clone());
        }
        inner.calls.push(TransportCall::SendEvent(event.clone()));
        Ok(())
    }

    fn enable_auto_pings(&self, config: &ActivityTrackingConfig) -> Result<(), TransportError> {
        self.inner
            .lock()
            .calls
            .push(TransportCall::EnableAutoPings(config.clone()));
        Ok(())
    }

    fn enable_link_tracking(&self, config: &LinkTrackingConfig) -> Result<(), TransportError> {
        self.inner
            .lock()
            .calls
            .push(TransportCall::EnableLinkTracking(config.clone()));
        Ok(())
    }

    fn enable_form_tracking(&self, config: &FormTrackingConfig) -> Result<(), TransportError> {
        self.inner
            .lock()
            .calls
            .push(TransportCall::EnableFormTracking(config.clone()));
        Ok(())
    }
}
