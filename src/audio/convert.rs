//! Sample-rate and channel-layout conversion.
//!
//! Decoded clips arrive at whatever rate and layout the file was authored
//! in; the output device wants its own.  This module provides the two
//! conversion steps over interleaved `f32` audio:
//!
//! 1. [`remix_channels`] changes the number of interleaved channels.
//! 2. [`resample`] changes the sample rate.
//!
//! The resampler uses per-channel linear interpolation, which is plenty for
//! short sound effects.

// ---------------------------------------------------------------------------
// AudioFormat
// ---------------------------------------------------------------------------

/// Rate and layout of an interleaved `f32` buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }
}

// ---------------------------------------------------------------------------
// remix_channels
// ---------------------------------------------------------------------------

/// Convert interleaved audio from `from` channels to `to` channels.
///
/// * Same count: returned unchanged.
/// * Down to mono: every frame is averaged.
/// * Up from mono: the single channel is duplicated.
/// * Otherwise: output channel `i` takes input channel `i % from`.
///
/// A zero channel count on either side yields an empty vector.
///
/// ```rust
/// use soundboard::audio::remix_channels;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = remix_channels(&stereo, 2, 1);
/// assert_eq!(mono.len(), 2);
/// assert!(mono[0].abs() < 1e-6);
/// ```
pub fn remix_channels(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    if from == 0 || to == 0 {
        return Vec::new();
    }
    if from == to {
        return samples.to_vec();
    }

    let from = from as usize;
    let to = to as usize;
    let frames = samples.chunks_exact(from);
    let mut out = Vec::with_capacity(frames.len() * to);

    if to == 1 {
        out.extend(frames.map(|frame| frame.iter().sum::<f32>() / from as f32));
    } else {
        for frame in frames {
            out.extend((0..to).map(|i| frame[i % from]));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample interleaved audio from `source_rate` to `target_rate` using
/// linear interpolation on each channel.
///
/// * Equal rates: the input is cloned unchanged.
/// * Empty input or zero channels/rates: an empty vector is returned.
///
/// The output holds approximately `frames * target_rate / source_rate`
/// frames.
///
/// ```rust
/// use soundboard::audio::resample;
///
/// // 480 mono frames @ 48 kHz -> 160 frames @ 16 kHz
/// let hi = vec![0.5_f32; 480];
/// let lo = resample(&hi, 1, 48_000, 16_000);
/// assert_eq!(lo.len(), 160);
/// ```
pub fn resample(samples: &[f32], channels: u16, source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }
    if samples.is_empty() || channels == 0 || source_rate == 0 || target_rate == 0 {
        return Vec::new();
    }

    let channels = channels as usize;
    let in_frames = samples.len() / channels;
    let ratio = target_rate as f64 / source_rate as f64;
    let out_frames = (in_frames as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(out_frames * channels);

    for i in 0..out_frames {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        for ch in 0..channels {
            let at = |frame: usize| samples[frame * channels + ch];
            let sample = if idx + 1 < in_frames {
                at(idx) * (1.0 - frac) + at(idx + 1) * frac
            } else if idx < in_frames {
                at(idx)
            } else {
                0.0
            };
            output.push(sample);
        }
    }

    output
}

/// Convert `samples` in `source` format to `target` format.
pub fn convert(samples: &[f32], source: AudioFormat, target: AudioFormat) -> Vec<f32> {
    let remixed = remix_channels(samples, source.channels, target.channels);
    resample(
        &remixed,
        target.channels,
        source.sample_rate,
        target.sample_rate,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- remix_channels ----------------------------------------------------

    #[test]
    fn remix_same_layout_is_noop() {
        let input = vec![0.1_f32, 0.2, 0.3, 0.4];
        assert_eq!(remix_channels(&input, 2, 2), input);
    }

    #[test]
    fn remix_stereo_to_mono_averages() {
        let input = vec![1.0_f32, -1.0, 0.5, 0.5];
        let out = remix_channels(&input, 2, 1);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.0).abs() < 1e-6);
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn remix_mono_to_stereo_duplicates() {
        let out = remix_channels(&[0.25_f32, -0.75], 1, 2);
        assert_eq!(out, vec![0.25, 0.25, -0.75, -0.75]);
    }

    #[test]
    fn remix_stereo_to_quad_wraps_channels() {
        let out = remix_channels(&[0.1_f32, 0.2], 2, 4);
        assert_eq!(out, vec![0.1, 0.2, 0.1, 0.2]);
    }

    #[test]
    fn remix_zero_channels() {
        assert!(remix_channels(&[1.0_f32, 2.0], 0, 2).is_empty());
        assert!(remix_channels(&[1.0_f32, 2.0], 2, 0).is_empty());
    }

    // ---- resample ----------------------------------------------------------

    #[test]
    fn resample_same_rate_is_noop() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        let out = resample(&input, 1, 44_100, 44_100);
        assert_eq!(out, input);
    }

    #[test]
    fn resample_empty_input() {
        assert!(resample(&[], 2, 48_000, 44_100).is_empty());
    }

    #[test]
    fn resample_upsample_doubles_frames() {
        // 80 stereo frames @ 22.05 kHz -> 160 frames @ 44.1 kHz
        let input = vec![0.0_f32; 160];
        let out = resample(&input, 2, 22_050, 44_100);
        assert_eq!(out.len(), 320);
    }

    #[test]
    fn resample_44100_to_48000_output_length() {
        let input = vec![0.0_f32; 44_100];
        let out = resample(&input, 1, 44_100, 48_000);
        assert!(
            out.len().abs_diff(48_000) <= 1,
            "expected ~48000, got {}",
            out.len()
        );
    }

    #[test]
    fn resample_keeps_channels_separate() {
        // Left is constant 0.5, right constant -0.5.
        let input: Vec<f32> = (0..200).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let out = resample(&input, 2, 48_000, 44_100);
        for frame in out.chunks_exact(2) {
            assert!((frame[0] - 0.5).abs() < 1e-5, "left drift: {}", frame[0]);
            assert!((frame[1] + 0.5).abs() < 1e-5, "right drift: {}", frame[1]);
        }
    }

    #[test]
    fn convert_mono_22k_to_stereo_44k() {
        let input = vec![0.3_f32; 100];
        let out = convert(
            &input,
            AudioFormat::new(22_050, 1),
            AudioFormat::new(44_100, 2),
        );
        assert_eq!(out.len(), 400);
        assert!(out.iter().all(|s| (s - 0.3).abs() < 1e-5));
    }
}
