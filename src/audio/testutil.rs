//! WAV fixtures for tests.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Write a constant-amplitude 16-bit WAV of `secs` seconds.
///
/// A constant signal's RMS level equals its amplitude, so
/// `20 * log10(amplitude)` is the clip's loudness in dBFS.
pub fn write_test_wav(path: &Path, sample_rate: u32, channels: u16, amplitude: f32, secs: f32) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("create wav");
    let frames = (sample_rate as f32 * secs) as usize;
    let value = (amplitude * i16::MAX as f32).round() as i16;
    for _ in 0..frames * channels as usize {
        writer.write_sample(value).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}
