//! Session context management.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Identity and timing of one page session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    /// When the stored consent decision was made, if any.
    pub consent_timestamp: Option<DateTime<Utc>>,
}

impl SessionContext {
    pub fn new(consent_timestamp: Option<DateTime<Utc>>) -> Self {
        let session_id = format!("session-{}", &Uuid::new_v4().to_string()[..8]);
        Self {
            session_id,
            started_at: Utc::now(),
            consent_timestamp,
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_format() {
        let ctx = SessionContext::new(None);
        assert!(ctx.session_id.starts_with("session-"));
        assert_eq!(ctx.session_id.len(), "session-".len() + 8);
        assert_ne!(ctx.session_id, SessionContext::new(None).session_id);
    }

    #[test]
    fn test_log_context() {
        let ctx = SessionContext::new(None);
        assert_eq!(
            ctx.log_context().to_string(),
            format!("[session={}]", ctx.session_id)
        );
    }
}
