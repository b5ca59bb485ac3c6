//! Whole-file decoding via `symphonia`.
//!
//! Sound clips are short, so [`decode_file`] reads the entire first audio
//! track into memory as interleaved `f32` in `[-1.0, 1.0]`.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use super::convert::AudioFormat;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: unsupported or corrupt audio: {message}")]
    Format { path: String, message: String },

    #[error("{0}: no audio track found")]
    NoTrack(String),

    #[error("{0}: decoded no samples")]
    Empty(String),
}

/// A fully decoded clip.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn format(&self) -> AudioFormat {
        AudioFormat::new(self.sample_rate, self.channels)
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        match self.channels {
            0 => 0,
            n => self.samples.len() / n as usize,
        }
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }
}

/// Decode the first audio track of `path` (MP3, WAV, OGG, FLAC, ...).
pub fn decode_file(path: &Path) -> Result<DecodedAudio, DecodeError> {
    let display = path.display().to_string();
    let format_err = |e: SymphoniaError| DecodeError::Format {
        path: display.clone(),
        message: e.to_string(),
    };

    let file = File::open(path).map_err(|source| DecodeError::Io {
        path: display.clone(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(format_err)?;
    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::NoTrack(display.clone()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(format_err)?;

    let mut samples = Vec::new();
    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(format_err(e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // A corrupt frame is skipped; the rest of the clip still plays.
            Err(SymphoniaError::DecodeError(e)) => {
                log::debug!("{display}: skipping undecodable packet: {e}");
            }
            Err(e) => return Err(format_err(e)),
        }
    }

    if samples.is_empty() || channels == 0 || sample_rate == 0 {
        return Err(DecodeError::Empty(display));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testutil::write_test_wav;
    use tempfile::tempdir;

    #[test]
    fn decodes_wav_fixture() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("tone.wav");
        write_test_wav(&path, 22_050, 2, 0.5, 0.25);

        let audio = decode_file(&path).expect("decode");
        assert_eq!(audio.sample_rate, 22_050);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frames(), 5_512);
        assert!((audio.duration_secs() - 0.25).abs() < 0.001);
        assert!(audio.samples.iter().all(|s| (s - 0.5).abs() < 1e-3));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().expect("temp dir");
        let err = decode_file(&dir.path().join("nope.mp3")).unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }), "{err}");
        assert!(err.to_string().contains("nope.mp3"));
    }

    #[test]
    fn garbage_is_format_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("junk.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let err = decode_file(&path).unwrap_err();
        assert!(!matches!(err, DecodeError::Io { .. }), "{err}");
    }
}
