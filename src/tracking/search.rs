//! Search tracking.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::events::entities::ArticleEntity;

use super::emitter::{EmitOutcome, Emitter};

/// One search page instance. Remembers the last term it tracked.
pub struct SearchSession {
    emitter: Arc<Emitter>,
    last_term: Mutex<Option<String>>,
}

impl SearchSession {
    pub fn new(emitter: Arc<Emitter>) -> Self {
        Self {
            emitter,
            last_term: Mutex::new(None),
        }
    }

    /// Results shown for `term`.
    ///
    /// Returns `None` for a blank term or a repeat of the last tracked term.
    /// The term is remembered even if consent blocks the event.
    pub fn results_shown(&self, term: &str, results: Vec<ArticleEntity>) -> Option<EmitOutcome> {
        if term.trim().is_empty() {
            return None;
        }
        {
            let mut last = self.last_term.lock();
            if last.as_deref() == Some(term) {
                log::debug!("SEARCH_REPEAT term={:?}", term);
                return None;
            }
            *last = Some(term.to_string());
        }
        Some(self.emitter.track_search_full(term, results))
    }

    /// Click on a quick-search dropdown result at 1-based `position`.
    pub fn result_clicked(&self, term: &str, article: ArticleEntity, position: u32) -> EmitOutcome {
        self.emitter.track_search_quick(term, article, position)
    }

    pub fn last_term(&self) -> Option<String> {
        self.last_term.lock().clone()
    }
}
