//! Transports that never leave the process.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{
    ActivityTrackingConfig, FormTrackingConfig, LinkTrackingConfig, TrackerConfig,
};
use crate::error::TransportError;
use crate::events::types::EventEnvelope;

use super::Transport;

/// Writes each event as a JSON log line. Refuses events before `initialize`.
#[derive(Debug, Default)]
pub struct LogTransport {
    initialized: AtomicBool,
}

impl LogTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_initialized(&self) -> Result<(), TransportError> {
        if self.initialized.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(TransportError::NotInitialized)
        }
    }
}

impl Transport for LogTransport {
    fn initialize(&self, config: &TrackerConfig) -> Result<(), TransportError> {
        log::info!(
            "TRACKER_INIT namespace={} collector={} app_id={} app_version={} method={} buffer_size={}",
            config.namespace,
            config.collector_url,
            config.app_id,
            config.app_version,
            config.event_method,
            config.buffer_size
        );
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    fn set_identity(&self, identity: Option<&str>) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        log::info!("TRACKER_IDENTITY set={}", identity.is_some());
        Ok(())
    }

    fn send_event(&self, event: &EventEnvelope) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        let body = serde_json::to_string(event)
            .map_err(|e| TransportError::Rejected(e.to_string()))?;
        log::info!("TRACKER_EVENT kind={} body={}", event.kind(), body);
        Ok(())
    }

    fn enable_auto_pings(&self, config: &ActivityTrackingConfig) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        log::info!(
            "TRACKER_PINGS minimum_visit_length={}s heartbeat={}s",
            config.minimum_visit_length_secs,
            config.heartbeat_delay_secs
        );
        Ok(())
    }

    fn enable_link_tracking(&self, config: &LinkTrackingConfig) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        log::info!("TRACKER_LINKS track_content={}", config.track_content);
        Ok(())
    }

    fn enable_form_tracking(&self, config: &FormTrackingConfig) -> Result<(), TransportError> {
        self.ensure_initialized()?;
        log::info!(
            "TRACKER_FORMS denied_forms={:?} denied_fields={:?}",
            config.form_denylist,
            config.field_denylist
        );
        Ok(())
    }
}

/// Accepts and discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn initialize(&self, _config: &TrackerConfig) -> Result<(), TransportError> {
        Ok(())
    }

    fn set_identity(&self, _identity: Option<&str>) -> Result<(), TransportError> {
        Ok(())
    }

    fn send_event(&self, _event: &EventEnvelope) -> Result<(), TransportError> {
        Ok(())
    }

    fn enable_auto_pings(&self, _config: &ActivityTrackingConfig) -> Result<(), TransportError> {
        Ok(())
    }

    fn enable_link_tracking(&self, _config: &LinkTrackingConfig) -> Result<(), TransportError> {
        Ok(())
    }

    fn enable_form_tracking(&self, _config: &FormTrackingConfig) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::AnalyticsEvent;

    #[test]
    fn test_log_transport_requires_init() {
        let transport = LogTransport::new();
        let envelope = EventEnvelope::new("s-1", AnalyticsEvent::CmpVisible { elapsed_time_ms: 3.0 });

        assert_eq!(
            transport.send_event(&envelope),
            Err(TransportError::NotInitialized)
        );
        transport.initialize(&TrackerConfig::default()).unwrap();
        assert!(transport.send_event(&envelope).is_ok());
    }
}
