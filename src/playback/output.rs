//! Speaker output via `cpal`.
//!
//! [`AudioOutput`] wraps the cpal host/device/stream lifecycle for the
//! default output device.  [`AudioOutput::start`] begins rendering a
//! [`VoiceSlot`] and returns a [`StreamHandle`], a RAII guard; dropping it
//! stops the underlying cpal stream.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample};

use super::voice::VoiceSlot;
use super::PlaybackError;
use crate::audio::AudioFormat;

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// `cpal::Stream` is not `Send` on every platform, so the handle stays on the
/// thread that created it (the main thread).
pub struct StreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// AudioOutput
// ---------------------------------------------------------------------------

/// Default output device wrapper.
///
/// # Example
///
/// ```rust,no_run
/// use soundboard::playback::AudioOutput;
///
/// let output = AudioOutput::new().unwrap();
/// let slot = output.slot();
/// let _handle = output.start(slot.clone()).unwrap();
/// // voices started on `slot` are now audible
/// ```
pub struct AudioOutput {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_format: SampleFormat,
    format: AudioFormat,
}

impl AudioOutput {
    /// Open the system default output device at its preferred config.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NoDevice`] when the host has no output device, or
    /// [`PlaybackError::DefaultConfig`] when it cannot report a config.
    pub fn new() -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            PlaybackError::NoDevice("no output device found on the default audio host".into())
        })?;

        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let format = AudioFormat::new(supported.sample_rate().0, supported.channels());
        let config: cpal::StreamConfig = supported.into();

        if let Ok(name) = device.name() {
            log::info!(
                "audio output: {name} ({} Hz, {} ch, {sample_format:?})",
                format.sample_rate,
                format.channels
            );
        }

        Ok(Self {
            device,
            config,
            sample_format,
            format,
        })
    }

    /// Device format; voices must be converted to this before playing.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// An empty voice slot in this device's format.
    pub fn slot(&self) -> VoiceSlot {
        VoiceSlot::new(self.format)
    }

    /// Start the output stream, rendering `slot` on every callback.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::BuildStream`] or [`PlaybackError::PlayStream`] if the
    /// platform rejects the stream, [`PlaybackError::UnsupportedSampleFormat`]
    /// for exotic device formats.
    pub fn start(&self, slot: VoiceSlot) -> Result<StreamHandle, PlaybackError> {
        let stream = match self.sample_format {
            SampleFormat::F32 => self.build::<f32>(slot)?,
            SampleFormat::F64 => self.build::<f64>(slot)?,
            SampleFormat::I16 => self.build::<i16>(slot)?,
            SampleFormat::I32 => self.build::<i32>(slot)?,
            SampleFormat::U16 => self.build::<u16>(slot)?,
            SampleFormat::U8 => self.build::<u8>(slot)?,
            other => return Err(PlaybackError::UnsupportedSampleFormat(format!("{other:?}"))),
        };

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }

    fn build<T>(&self, slot: VoiceSlot) -> Result<cpal::Stream, PlaybackError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let mut scratch: Vec<f32> = Vec::new();
        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                slot.render(&mut scratch);
                for (dst, &src) in data.iter_mut().zip(scratch.iter()) {
                    *dst = T::from_sample(src);
                }
            },
            |err: cpal::StreamError| {
                log::error!("cpal stream error: {err}");
            },
            None,
        )?;
        Ok(stream)
    }
}
