//! Playback state for one tracked player.

use crate::events::types::PlayerSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekState {
    NotSeeking,
    Seeking,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaPlaybackState {
    pub id: String,
    pub current_time: f64,
    pub duration: f64,
    pub paused: bool,
    /// 0..=100
    pub volume_percent: u8,
    pub fullscreen: bool,
    pub seek: SeekState,
    pub is_warmed_up: bool,
}

impl MediaPlaybackState {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            current_time: 0.0,
            duration: 0.0,
            paused: true,
            volume_percent: 100,
            fullscreen: false,
            seek: SeekState::NotSeeking,
            is_warmed_up: false,
        }
    }

    pub fn is_seeking(&self) -> bool {
        self.seek == SeekState::Seeking
    }

    /// `NotSeeking -> Seeking`. Returns false if already seeking.
    pub fn begin_seek(&mut self) -> bool {
        match self.seek {
            SeekState::NotSeeking => {
                self.seek = SeekState::Seeking;
                true
            }
            SeekState::Seeking => false,
        }
    }

    /// `Seeking -> NotSeeking`. Returns false if not seeking.
    pub fn end_seek(&mut self) -> bool {
        match self.seek {
            SeekState::Seeking => {
                self.seek = SeekState::NotSeeking;
                true
            }
            SeekState::NotSeeking => false,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_time: self.current_time,
            duration: self.duration,
            paused: self.paused,
            volume: self.volume_percent,
            fullscreen: self.fullscreen,
        }
    }
}

/// Element volume in `[0.0, 1.0]` as a whole percentage.
pub fn volume_percent(volume: f64) -> u8 {
    if !volume.is_finite() {
        return 0;
    }
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}
