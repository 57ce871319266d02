//! Structured logging utilities.
//!
//! Log lines follow the `[session=...] [component=...] EVENT_NAME key=value`
//! layout so a single session can be grepped end to end.

use std::fmt;

/// Logging context for one tracking session.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub session_id: String,
    pub component: Option<String>,
}

impl LogContext {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            component: None,
        }
    }

    pub fn with_component(&self, component: &str) -> Self {
        Self {
            session_id: self.session_id.clone(),
            component: Some(component.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component {
            Some(component) => write!(f, "[session={}] [component={}]", self.session_id, component),
            None => write!(f, "[session={}]", self.session_id),
        }
    }
}

/// Log an info message with context.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*) $(, $value)*)
        );
    };
}

/// Log a warning message with context.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*) $(, $value)*)
        );
    };
}

/// Log an error message with context.
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::error!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*) $(, $value)*)
        );
    };
}

/// Log a debug message with context.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),*) $(, $value)*)
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context_display() {
        let ctx = LogContext::new("sess-123");
        assert_eq!(format!("{}", ctx), "[session=sess-123]");

        let media_ctx = ctx.with_component("media");
        assert_eq!(
            format!("{}", media_ctx),
            "[session=sess-123] [component=media]"
        );
    }

    #[test]
    fn test_macros_accept_pairs_and_bare_events() {
        let ctx = LogContext::new("sess-1");
        crate::log_info!(ctx, "SESSION_READY");
        crate::log_warn!(ctx, "EVENT_DROPPED", kind = "page_view", field = "path");
        crate::log_debug!(ctx, "EVENT_SENT", kind = "media_event",);
        crate::log_error!(ctx.with_component("media"), "DETACH_FAILED", id = 1);
    }
}
