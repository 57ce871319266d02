//! Media element to media analytics events.
//!
//! Attaching emits a tracking start and opens a warm-up window. A `play`
//! inside the window is treated as autoplay noise and dropped; a genuine
//! user play that early is lost too, which is logged as a known race.
//! Detaching removes the listener and cancels the warm-up timer in one step.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::events::types::{MediaEvent, MEDIA_PROGRESS_BOUNDARIES};
use crate::logging::structured::LogContext;
use crate::runtime::{EventTarget, Teardown, TimerQueue};
use crate::tracking::Emitter;

use super::state::{volume_percent, MediaPlaybackState};

/// Events raised by a media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaElementEvent {
    Play,
    Pause,
    Ended,
    VolumeChange { volume: f64 },
    FullscreenChange { fullscreen_element_set: bool },
    TimeUpdate {
        current_time: f64,
        duration: f64,
        paused: bool,
        volume: f64,
    },
    Seeking,
    Seeked,
}

/// A live tracking session for one player.
#[derive(Debug)]
pub struct MediaTracking {
    media_id: String,
    state: Arc<Mutex<MediaPlaybackState>>,
    teardown: Teardown,
    ctx: LogContext,
}

impl MediaTracking {
    pub fn attach(
        target: &EventTarget<MediaElementEvent>,
        media_id: &str,
        player_type: &str,
        emitter: Arc<Emitter>,
        timers: &TimerQueue,
        warmup: Duration,
        ctx: &LogContext,
    ) -> Self {
        let ctx = ctx.with_component("media");
        let state = Arc::new(Mutex::new(MediaPlaybackState::new(media_id)));
        let mut teardown = Teardown::new();

        emitter.track_media(
            media_id,
            MediaEvent::Start {
                player_type: player_type.to_string(),
                boundaries: MEDIA_PROGRESS_BOUNDARIES.to_vec(),
            },
        );

        let warm_state = Arc::clone(&state);
        teardown.add_timer(timers.schedule(warmup, move || {
            warm_state.lock().is_warmed_up = true;
        }));

        let listener_state = Arc::clone(&state);
        let listener_ctx = ctx.clone();
        let id = media_id.to_string();
        teardown.add_subscription(target.subscribe(move |event: &MediaElementEvent| {
            if let Some(media) = translate(&listener_state, event, &listener_ctx) {
                emitter.track_media(&id, media);
            }
        }));

        crate::log_info!(ctx, "MEDIA_ATTACHED", media_id = media_id, warmup_ms = warmup.as_millis());

        Self {
            media_id: media_id.to_string(),
            state,
            teardown,
            ctx,
        }
    }

    pub fn media_id(&self) -> &str {
        &self.media_id
    }

    pub fn state(&self) -> MediaPlaybackState {
        self.state.lock().clone()
    }

    pub fn is_attached(&self) -> bool {
        !self.teardown.is_done()
    }

    /// Remove the listener and cancel the warm-up timer.
    pub fn detach(mut self) {
        self.teardown.run();
        crate::log_info!(self.ctx, "MEDIA_DETACHED", media_id = self.media_id);
    }
}

/// Update `state` for `event` and return the analytics event to send, if any.
///
/// The state lock is released before the caller emits.
fn translate(
    state: &Mutex<MediaPlaybackState>,
    event: &MediaElementEvent,
    ctx: &LogContext,
) -> Option<MediaEvent> {
    let mut state = state.lock();
    match event {
        MediaElementEvent::Play => {
            if !state.is_warmed_up {
                crate::log_warn!(ctx, "MEDIA_PLAY_SUPPRESSED", media_id = state.id, reason = "warmup");
                return None;
            }
            state.paused = false;
            Some(MediaEvent::Play)
        }
        MediaElementEvent::Pause => {
            state.paused = true;
            Some(MediaEvent::Pause)
        }
        MediaElementEvent::Ended => {
            state.paused = true;
            Some(MediaEvent::End)
        }
        MediaElementEvent::VolumeChange { volume } => {
            let new_volume = volume_percent(*volume);
            state.volume_percent = new_volume;
            Some(MediaEvent::VolumeChange { new_volume })
        }
        MediaElementEvent::FullscreenChange {
            fullscreen_element_set,
        } => {
            state.fullscreen = *fullscreen_element_set;
            Some(MediaEvent::FullscreenChange {
                fullscreen: *fullscreen_element_set,
            })
        }
        MediaElementEvent::TimeUpdate {
            current_time,
            duration,
            paused,
            volume,
        } => {
            if !duration.is_finite() || *duration <= 0.0 {
                return None;
            }
            state.current_time = *current_time;
            state.duration = *duration;
            state.paused = *paused;
            state.volume_percent = volume_percent(*volume);
            Some(MediaEvent::Progress {
                player: state.snapshot(),
            })
        }
        MediaElementEvent::Seeking => state.begin_seek().then_some(MediaEvent::SeekStart),
        MediaElementEvent::Seeked => state.end_seek().then_some(MediaEvent::SeekEnd),
    }
}
