//! Copying clips into the managed sound directory.
//!
//! With normalization on, each clip is decoded and measured first.  Clips
//! louder than [`NORMALIZE_CEILING_DBFS`] are turned down by
//! [`NORMALIZE_REDUCTION_DB`] and re-encoded as a WAV stream; everything else
//! is copied byte-for-byte.  Either way the clip keeps its original file name,
//! and a file whose name is already taken is skipped, never overwritten.
//!
//! [`NORMALIZE_CEILING_DBFS`]: crate::audio::NORMALIZE_CEILING_DBFS
//! [`NORMALIZE_REDUCTION_DB`]: crate::audio::NORMALIZE_REDUCTION_DB

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::{
    apply_gain_db, decode_file, loudness_dbfs, normalization_gain_db, write_wav, DecodeError,
    EncodeError,
};
use crate::library::{is_supported, SoundLibrary};

#[derive(Debug, Error)]
enum ImportError {
    #[error("unsupported file type")]
    Unsupported,

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Encode(#[from] EncodeError),

    #[error("copy failed: {0}")]
    Copy(#[from] std::io::Error),
}

/// What happened to one imported file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImportAction {
    /// Normalization off; bytes copied.
    Copied,
    /// Measured above the ceiling and re-encoded quieter.
    Attenuated { loudness_dbfs: f32 },
    /// Measured at or below the ceiling; bytes copied.
    KeptLevel { loudness_dbfs: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFile {
    pub source_name: String,
    pub stored_as: PathBuf,
    pub action: ImportAction,
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<ImportedFile>,
    /// File names that already existed in the library.
    pub skipped: Vec<String>,
    /// File names that could not be imported, with the reason.
    pub failed: Vec<(String, String)>,
}

impl ImportReport {
    /// Number of files newly added to the library.
    pub fn count(&self) -> usize {
        self.imported.len()
    }

    /// Log pane lines describing the batch.
    pub fn messages(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for file in &self.imported {
            if let ImportAction::Attenuated { loudness_dbfs } = file.action {
                lines.push(format!(
                    "{} is loud ({loudness_dbfs:.1} dB), lowering 5 dB",
                    file.source_name
                ));
            }
        }
        for (name, reason) in &self.failed {
            lines.push(format!("Failed to import {name}: {reason}"));
        }
        lines.push(format!("Imported {} file(s).", self.count()));
        lines
    }
}

#[derive(Debug, Clone)]
pub struct Importer {
    library: SoundLibrary,
    normalize: bool,
}

impl Importer {
    pub fn new(dir: impl Into<PathBuf>, normalize: bool) -> Self {
        Self {
            library: SoundLibrary::new(dir),
            normalize,
        }
    }

    /// Import every file in `sources`.  A failure on one file is recorded
    /// and the rest of the batch continues.
    pub fn import(&self, sources: &[PathBuf]) -> ImportReport {
        let mut report = ImportReport::default();

        for source in sources {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| source.display().to_string());

            if self.already_present(source) {
                log::info!("{name} is already in the library, skipping");
                report.skipped.push(name);
                continue;
            }

            match self.import_one(source, &name) {
                Ok(file) => {
                    log::info!("imported {name} as {}", file.stored_as.display());
                    report.imported.push(file);
                }
                Err(e) => {
                    log::warn!("failed to import {name}: {e}");
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        report
    }

    fn already_present(&self, source: &Path) -> bool {
        source
            .file_name()
            .is_some_and(|name| self.library.contains(&name.to_string_lossy()))
    }

    fn import_one(&self, source: &Path, name: &str) -> Result<ImportedFile, ImportError> {
        if !is_supported(source) {
            return Err(ImportError::Unsupported);
        }
        let dest = self.library.dir().join(name);

        if !self.normalize {
            std::fs::copy(source, &dest)?;
            return Ok(ImportedFile {
                source_name: name.to_string(),
                stored_as: dest,
                action: ImportAction::Copied,
            });
        }

        let mut clip = decode_file(source)?;
        let loudness = loudness_dbfs(&clip.samples);

        match normalization_gain_db(loudness) {
            Some(gain) => {
                log::info!("{name} is loud ({loudness:.1} dB), lowering {:.0} dB", -gain);
                apply_gain_db(&mut clip.samples, gain);
                // WAV stream under the original name; decoding probes content.
                write_wav(&dest, &clip)?;
                Ok(ImportedFile {
                    source_name: name.to_string(),
                    stored_as: dest,
                    action: ImportAction::Attenuated {
                        loudness_dbfs: loudness,
                    },
                })
            }
            None => {
                std::fs::copy(source, &dest)?;
                Ok(ImportedFile {
                    source_name: name.to_string(),
                    stored_as: dest,
                    action: ImportAction::KeptLevel {
                        loudness_dbfs: loudness,
                    },
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
