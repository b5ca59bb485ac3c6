//! WAV output via `hound`.

use std::path::Path;

use thiserror::Error;

use super::decode::DecodedAudio;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{path}: {source}")]
    Wav {
        path: String,
        #[source]
        source: hound::Error,
    },
}

/// Write `audio` to `path` as 16-bit PCM WAV, clamping samples to full scale.
pub fn write_wav(path: &Path, audio: &DecodedAudio) -> Result<(), EncodeError> {
    let wrap = |source: hound::Error| EncodeError::Wav {
        path: path.display().to_string(),
        source,
    };

    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(wrap)?;
    for &sample in &audio.samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer.write_sample(value).map_err(wrap)?;
    }
    writer.finalize().map_err(wrap)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn written_file_reads_back() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.wav");
        let audio = DecodedAudio {
            samples: vec![0.5, -0.5, 2.0, -2.0],
            sample_rate: 8_000,
            channels: 2,
        };

        write_wav(&path, &audio).expect("write");

        let mut reader = hound::WavReader::open(&path).expect("open");
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 8_000);
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![16_384, -16_384, i16::MAX, -i16::MAX]);
    }
}
