//! Offline audio processing: decode → measure → convert / encode.
//!
//! # Pipeline
//!
//! ```text
//! file → decode_file (symphonia) → DecodedAudio
//!      ├─ import:   loudness_dbfs → apply_gain_db → write_wav (hound)
//!      └─ playback: convert (remix + resample) → output device format
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use soundboard::audio::{decode_file, loudness_dbfs};
//!
//! let clip = decode_file(Path::new("sounds/boing.mp3")).unwrap();
//! println!("{:.1} dBFS over {:.2}s", loudness_dbfs(&clip.samples), clip.duration_secs());
//! ```

pub mod convert;
pub mod decode;
pub mod encode;
pub mod loudness;

#[cfg(test)]
pub(crate) mod testutil;

pub use convert::{convert, remix_channels, resample, AudioFormat};
pub use decode::{decode_file, DecodeError, DecodedAudio};
pub use encode::{write_wav, EncodeError};
pub use loudness::{
    apply_gain_db, db_to_gain, loudness_dbfs, normalization_gain_db, NORMALIZE_CEILING_DBFS,
    NORMALIZE_REDUCTION_DB,
};
