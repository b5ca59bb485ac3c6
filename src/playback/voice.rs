//! The single playback voice and the slot that holds it.
//!
//! [`VoiceSlot`] is shared between the playback worker (which installs
//! voices) and the cpal callback (which renders them).  It holds at most one
//! [`Voice`]; installing a new one drops the old one mid-sample, which is the
//! hard cutoff the soundboard wants.

use std::sync::{Arc, Mutex, PoisonError};

use super::PlaybackError;
use crate::audio::AudioFormat;

// ---------------------------------------------------------------------------
// Voice
// ---------------------------------------------------------------------------

/// A clip already converted to the output format, plus its play position.
#[derive(Debug, Clone)]
pub struct Voice {
    label: String,
    samples: Vec<f32>,
    position: usize,
    volume: f32,
}

impl Voice {
    /// `samples` must already be interleaved in the output's format.
    pub fn new(label: impl Into<String>, samples: Vec<f32>, volume: f32) -> Self {
        Self {
            label: label.into(),
            samples,
            position: 0,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Human-readable identity, normally the clip's path.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.samples.len()
    }

    /// Write the next `out.len()` samples scaled by the voice volume.
    ///
    /// Any part of `out` past the end of the clip is zero-filled.  Returns
    /// the number of clip samples written.
    pub fn render(&mut self, out: &mut [f32]) -> usize {
        let remaining = &self.samples[self.position.min(self.samples.len())..];
        let n = remaining.len().min(out.len());
        for (dst, &src) in out[..n].iter_mut().zip(remaining) {
            *dst = src * self.volume;
        }
        out[n..].fill(0.0);
        self.position += n;
        n
    }
}

// ---------------------------------------------------------------------------
// VoiceSink
// ---------------------------------------------------------------------------

/// Where the playback engine sends finished voices.
///
/// Implementations hold at most one voice at a time.
pub trait VoiceSink: Send + Sync {
    /// Format voices must be converted to before [`VoiceSink::start`].
    fn format(&self) -> AudioFormat;

    /// Make `voice` the only sounding voice, stopping whatever was playing.
    fn start(&self, voice: Voice) -> Result<(), PlaybackError>;

    /// Silence the current voice, if any.
    fn stop(&self);
}

// ---------------------------------------------------------------------------
// VoiceSlot
// ---------------------------------------------------------------------------

/// One-voice sink rendered by the output stream.
#[derive(Clone)]
pub struct VoiceSlot {
    format: AudioFormat,
    current: Arc<Mutex<Option<Voice>>>,
}

impl VoiceSlot {
    pub fn new(format: AudioFormat) -> Self {
        Self {
            format,
            current: Arc::new(Mutex::new(None)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Voice>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fill `out` from the current voice (silence if none) and release the
    /// voice once it has played to the end.
    pub fn render(&self, out: &mut [f32]) {
        let mut current = self.lock();
        match current.as_mut() {
            Some(voice) => {
                voice.render(out);
                if voice.is_finished() {
                    *current = None;
                }
            }
            None => out.fill(0.0),
        }
    }

    /// Label of the voice currently sounding.
    pub fn current_label(&self) -> Option<String> {
        self.lock().as_ref().map(|v| v.label().to_string())
    }

    pub fn is_playing(&self) -> bool {
        self.lock().is_some()
    }
}

impl VoiceSink for VoiceSlot {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn start(&self, voice: Voice) -> Result<(), PlaybackError> {
        let previous = self.lock().replace(voice);
        if let Some(previous) = previous {
            log::debug!("cut off {}", previous.label());
        }
        Ok(())
    }

    fn stop(&self) {
        self.lock().take();
    }
}

// ---------------------------------------------------------------------------
// NoOutput
// ---------------------------------------------------------------------------

/// Sink used when no output device could be opened; every play fails.
pub struct NoOutput {
    reason: String,
}

impl NoOutput {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl VoiceSink for NoOutput {
    fn format(&self) -> AudioFormat {
        AudioFormat::new(44_100, 2)
    }

    fn start(&self, _voice: Voice) -> Result<(), PlaybackError> {
        Err(PlaybackError::NoDevice(self.reason.clone()))
    }

    fn stop(&self) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_scales_by_volume_and_zero_fills() {
        let mut voice = Voice::new("clip", vec![1.0, -1.0, 0.5], 0.5);
        let mut out = [9.0_f32; 5];

        assert_eq!(voice.render(&mut out), 3);
        assert_eq!(out, [0.5, -0.5, 0.25, 0.0, 0.0]);
        assert!(voice.is_finished());
        assert_eq!(voice.render(&mut out), 0);
        assert_eq!(out, [0.0; 5]);
    }

    #[test]
    fn volume_is_clamped() {
        assert_eq!(Voice::new("loud", vec![], 3.0).volume(), 1.0);
        assert_eq!(Voice::new("neg", vec![], -1.0).volume(), 0.0);
    }

    #[test]
    fn starting_a_voice_replaces_the_current_one() {
        let slot = VoiceSlot::new(AudioFormat::new(8_000, 1));
        slot.start(Voice::new("first", vec![0.1; 100], 1.0)).unwrap();
        slot.start(Voice::new("second", vec![0.9; 100], 1.0)).unwrap();

        assert_eq!(slot.current_label().as_deref(), Some("second"));
        let mut out = [0.0_f32; 4];
        slot.render(&mut out);
        assert!(out.iter().all(|&s| (s - 0.9).abs() < 1e-6));
    }

    #[test]
    fn finished_voice_is_released() {
        let slot = VoiceSlot::new(AudioFormat::new(8_000, 1));
        slot.start(Voice::new("short", vec![0.2; 3], 1.0)).unwrap();

        let mut out = [0.0_f32; 8];
        slot.render(&mut out);
        assert!(!slot.is_playing());

        slot.render(&mut out);
        assert_eq!(out, [0.0; 8]);
    }

    #[test]
    fn stop_silences_immediately() {
        let slot = VoiceSlot::new(AudioFormat::new(8_000, 1));
        slot.start(Voice::new("clip", vec![0.5; 100], 1.0)).unwrap();
        slot.stop();

        assert!(!slot.is_playing());
        let mut out = [1.0_f32; 4];
        slot.render(&mut out);
        assert_eq!(out, [0.0; 4]);
    }

    #[test]
    fn no_output_reports_error() {
        let sink = NoOutput::new("no default output device");
        let err = sink.start(Voice::new("clip", vec![0.5], 1.0)).unwrap_err();
        assert!(err.to_string().contains("no default output device"));
    }
}
