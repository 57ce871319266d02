//! Article views bound to a page mount.
//!
//! A mount whose article was already tracked schedules nothing. Otherwise it
//! schedules the view after a short delay; the registry is checked and marked
//! again when the timer fires, so overlapping mounts of the same article
//! still yield a single event. Unmounting cancels a pending view.

use std::sync::Arc;
use std::time::Duration;

use crate::events::entities::ArticleEntity;
use crate::runtime::{TimerHandle, TimerQueue};

use super::emitter::Emitter;

#[derive(Debug)]
pub struct ArticleViewMount {
    article_id: String,
    timer: Option<TimerHandle>,
}

impl ArticleViewMount {
    pub fn mount(
        emitter: &Arc<Emitter>,
        timers: &TimerQueue,
        delay: Duration,
        article: ArticleEntity,
    ) -> Self {
        let article_id = article.article_id.clone();

        if emitter.registry().contains(&article_id) {
            log::debug!("ARTICLE_VIEW_SKIPPED article_id={} reason=already_tracked", article_id);
            return Self {
                article_id,
                timer: None,
            };
        }

        let emitter = Arc::clone(emitter);
        let timer = timers.schedule(delay, move || {
            emitter.track_article_view(article);
        });

        Self {
            article_id,
            timer: Some(timer),
        }
    }

    pub fn article_id(&self) -> &str {
        &self.article_id
    }

    /// Whether the view is still waiting on its timer.
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().map(TimerHandle::is_pending).unwrap_or(false)
    }

    pub fn unmount(mut self) {
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(timer) = self.timer.take() {
            if timer.cancel() {
                log::debug!("ARTICLE_VIEW_CANCELLED article_id={}", self.article_id);
            }
        }
    }
}

impl Drop for ArticleViewMount {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::EventKind;
    use crate::runtime::ManualClock;
    use crate::tracking::emitter::test_support::{article, Harness};

    const DELAY: Duration = Duration::from_millis(100);

    fn timers() -> (ManualClock, TimerQueue) {
        let clock = ManualClock::new();
        let timers = TimerQueue::new(Arc::new(clock.clone()));
        (clock, timers)
    }

    #[test]
    fn test_fires_after_delay() {
        let h = Harness::new(true);
        let (clock, timers) = timers();
        let mount = ArticleViewMount::mount(&h.emitter, &timers, DELAY, article("a-1"));

        clock.advance(Duration::from_millis(99));
        timers.run_due();
        assert!(mount.is_pending());
        assert!(h.transport.events().is_empty());

        clock.advance(Duration::from_millis(1));
        timers.run_due();
        assert!(!mount.is_pending());
        assert_eq!(h.transport.count_of(EventKind::ArticleView), 1);
    }

    #[test]
    fn test_remount_after_view_schedules_nothing() {
        let h = Harness::new(true);
        let (clock, timers) = timers();

        let first = ArticleViewMount::mount(&h.emitter, &timers, DELAY, article("a-1"));
        clock.advance(DELAY);
        timers.run_due();
        first.unmount();

        let second = ArticleViewMount::mount(&h.emitter, &timers, DELAY, article("a-1"));
        assert!(!second.is_pending());
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_unmount_before_delay_cancels() {
        let h = Harness::new(true);
        let (clock, timers) = timers();

        let mount = ArticleViewMount::mount(&h.emitter, &timers, DELAY, article("a-1"));
        mount.unmount();
        clock.advance(DELAY * 2);
        assert_eq!(timers.run_due(), 0);
        assert!(h.transport.events().is_empty());
        assert!(!h.emitter.registry().contains("a-1"));
    }

    #[test]
    fn test_unmount_from_earlier_timer_in_same_tick() {
        let h = Harness::new(true);
        let (clock, timers) = timers();

        let mount = Arc::new(parking_lot::Mutex::new(Some(ArticleViewMount::mount(
            &h.emitter,
            &timers,
            DELAY,
            article("a-1"),
        ))));
        let page = Arc::clone(&mount);
        timers.schedule(Duration::from_millis(50), move || {
            if let Some(mount) = page.lock().take() {
                mount.unmount();
            }
        });

        clock.advance(DELAY * 2);
        assert_eq!(timers.run_due(), 1);
        assert_eq!(h.transport.count_of(EventKind::ArticleView), 0);
        assert!(!h.emitter.registry().contains("a-1"));
        assert!(mount.lock().is_none());
    }

    #[test]
    fn test_overlapping_mounts_emit_once() {
        let h = Harness::new(true);
        let (clock, timers) = timers();

        let a = ArticleViewMount::mount(&h.emitter, &timers, DELAY, article("a-1"));
        let b = ArticleViewMount::mount(&h.emitter, &timers, DELAY, article("a-1"));
        clock.advance(DELAY);
        assert_eq!(timers.run_due(), 2);

        assert_eq!(h.transport.count_of(EventKind::ArticleView), 1);
        drop((a, b));
    }
}
