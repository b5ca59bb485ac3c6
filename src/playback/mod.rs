//! Single-voice playback on the default output device.
//!
//! ```text
//! hook callback ─▶ PlaybackEngine::play ─▶ playback-worker
//!                                           decode → convert → VoiceSlot
//!                                                               │
//!                                    cpal output callback ◀─────┘ render
//! ```
//!
//! Only one [`Voice`] exists at a time; starting a clip drops the previous
//! one with no fade.

pub mod engine;
pub mod output;
pub mod voice;

pub use engine::PlaybackEngine;
pub use output::{AudioOutput, StreamHandle};
pub use voice::{NoOutput, Voice, VoiceSink, VoiceSlot};

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::DecodeError;

/// Errors raised while opening the output or starting a clip.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio output unavailable: {0}")]
    NoDevice(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to query default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported output sample format {0}")]
    UnsupportedSampleFormat(String),
}

/// Reported by the playback worker to the GUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Failed { path: String, message: String },
}

/// Playback volume shared between the slider and hook callbacks.
///
/// Stored as `f32` bits in an atomic so a trigger on the hook thread reads
/// the value the slider holds at that moment.
#[derive(Debug, Clone)]
pub struct Volume(Arc<AtomicU32>);

impl Volume {
    pub const DEFAULT: f32 = 0.5;

    pub fn new(value: f32) -> Self {
        Self(Arc::new(AtomicU32::new(sanitize(value).to_bits())))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Store `value` clamped to `[0.0, 1.0]`; NaN counts as silence.
    pub fn set(&self, value: f32) {
        self.0.store(sanitize(value).to_bits(), Ordering::Relaxed);
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
