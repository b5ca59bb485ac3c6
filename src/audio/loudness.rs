//! Loudness measurement and gain for import-time normalization.
//!
//! Loudness is the RMS level of the whole clip relative to full scale,
//! in dBFS.  A clip louder than [`NORMALIZE_CEILING_DBFS`] is turned down by
//! a fixed [`NORMALIZE_REDUCTION_DB`]; quieter clips are left alone.
//!
//! ```rust
//! use soundboard::audio::{normalization_gain_db, NORMALIZE_REDUCTION_DB};
//!
//! assert_eq!(normalization_gain_db(-2.0), Some(NORMALIZE_REDUCTION_DB));
//! assert_eq!(normalization_gain_db(-10.0), None);
//! ```

/// Clips measuring above this level are attenuated on import.
pub const NORMALIZE_CEILING_DBFS: f32 = -3.0;

/// Gain applied to clips above the ceiling.
pub const NORMALIZE_REDUCTION_DB: f32 = -5.0;

/// RMS level of `samples` in dBFS.  Silence (or no samples) is `-inf`.
pub fn loudness_dbfs(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return f32::NEG_INFINITY;
    }
    let mean_square =
        samples.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>() / samples.len() as f64;
    if mean_square <= 0.0 {
        return f32::NEG_INFINITY;
    }
    (10.0 * mean_square.log10()) as f32
}

/// Linear amplitude factor for a gain in decibels.
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Scale every sample by `db` decibels.
pub fn apply_gain_db(samples: &mut [f32], db: f32) {
    let gain = db_to_gain(db);
    for sample in samples {
        *sample *= gain;
    }
}

/// Gain to apply to a clip measured at `loudness` dBFS, if any.
pub fn normalization_gain_db(loudness: f32) -> Option<f32> {
    (loudness > NORMALIZE_CEILING_DBFS).then_some(NORMALIZE_REDUCTION_DB)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Constant-amplitude signal measuring exactly `dbfs`.
    fn signal_at(dbfs: f32, len: usize) -> Vec<f32> {
        vec![db_to_gain(dbfs); len]
    }

    #[test]
    fn full_scale_is_zero_dbfs() {
        let level = loudness_dbfs(&[1.0, -1.0, 1.0, -1.0]);
        assert!(level.abs() < 1e-5, "{level}");
    }

    #[test]
    fn silence_is_negative_infinity() {
        assert_eq!(loudness_dbfs(&[0.0; 32]), f32::NEG_INFINITY);
        assert_eq!(loudness_dbfs(&[]), f32::NEG_INFINITY);
        assert_eq!(normalization_gain_db(f32::NEG_INFINITY), None);
    }

    #[test]
    fn measures_constructed_levels() {
        for target in [-2.0_f32, -3.0, -10.0, -20.0] {
            let level = loudness_dbfs(&signal_at(target, 1_000));
            assert!((level - target).abs() < 1e-3, "{target} measured as {level}");
        }
    }

    #[test]
    fn loud_clip_gets_reduction() {
        assert_eq!(normalization_gain_db(-2.0), Some(-5.0));
        assert_eq!(normalization_gain_db(0.0), Some(-5.0));
    }

    #[test]
    fn quiet_or_ceiling_clip_is_untouched() {
        assert_eq!(normalization_gain_db(-10.0), None);
        assert_eq!(normalization_gain_db(NORMALIZE_CEILING_DBFS), None);
    }

    #[test]
    fn applying_reduction_lowers_loudness_by_exactly_five_db() {
        let mut samples = signal_at(-2.0, 1_000);
        let before = loudness_dbfs(&samples);
        apply_gain_db(&mut samples, NORMALIZE_REDUCTION_DB);
        let after = loudness_dbfs(&samples);
        assert!((after - before - NORMALIZE_REDUCTION_DB).abs() < 1e-3, "{before} -> {after}");
    }
}
