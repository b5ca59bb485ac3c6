//! The managed sound directory.
//!
//! Every clip that can be bound lives flat inside one directory owned by the
//! application.  [`SoundLibrary::list`] snapshots it into a [`SoundList`]
//! whose indices back the "choose a sound" step of binding a key.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// File extensions the decoder handles, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac"];

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`] (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to list sounds directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no sound files found in {0}")]
    Empty(String),

    #[error("invalid selection {index}, choose between 1 and {len}")]
    InvalidSelection { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// SoundList
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundEntry {
    /// File name shown to the user.
    pub name: String,
    pub path: PathBuf,
}

/// Clips in the managed directory, sorted by file name.
///
/// Indices are 0-based and stable for the lifetime of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundList {
    entries: Vec<SoundEntry>,
}

impl SoundList {
    pub fn entries(&self) -> &[SoundEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`, or [`LibraryError::InvalidSelection`].
    pub fn select(&self, index: usize) -> Result<&SoundEntry, LibraryError> {
        self.entries
            .get(index)
            .ok_or_else(|| LibraryError::InvalidSelection {
                index: index.saturating_add(1),
                len: self.entries.len(),
            })
    }
}

// ---------------------------------------------------------------------------
// SoundLibrary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SoundLibrary {
    dir: PathBuf,
}

impl SoundLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Whether a file called `file_name` is already in the library.
    pub fn contains(&self, file_name: &str) -> bool {
        self.dir.join(file_name).exists()
    }

    /// Snapshot the playable files in the directory.
    ///
    /// Subdirectories and unsupported files are ignored.  An empty library is
    /// [`LibraryError::Empty`], since there is nothing to choose from.
    pub fn list(&self) -> Result<SoundList, LibraryError> {
        let io_err = |source| LibraryError::Io {
            path: self.dir.display().to_string(),
            source,
        };

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if !entry.file_type().map_err(io_err)?.is_file() || !is_supported(&path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(SoundEntry { name, path });
        }

        if entries.is_empty() {
            return Err(LibraryError::Empty(self.dir.display().to_string()));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(SoundList { entries })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported(Path::new("boing.MP3")));
        assert!(is_supported(Path::new("a/b/c.flac")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no_extension")));
    }

    #[test]
    fn list_is_sorted_and_filtered() {
        let dir = tempdir().expect("temp dir");
        touch(dir.path(), "zap.wav");
        touch(dir.path(), "boing.mp3");
        touch(dir.path(), "readme.txt");
        std::fs::create_dir(dir.path().join("nested.mp3")).unwrap();

        let list = SoundLibrary::new(dir.path()).list().expect("list");
        let names: Vec<&str> = list.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["boing.mp3", "zap.wav"]);
        assert_eq!(list.entries()[1].path, dir.path().join("zap.wav"));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().expect("temp dir");
        touch(dir.path(), "readme.txt");

        let err = SoundLibrary::new(dir.path()).list().unwrap_err();
        assert!(matches!(err, LibraryError::Empty(_)));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let err = SoundLibrary::new(dir.path().join("gone")).list().unwrap_err();
        assert!(matches!(err, LibraryError::Io { .. }));
    }

    #[test]
    fn select_out_of_range() {
        let dir = tempdir().expect("temp dir");
        touch(dir.path(), "a.mp3");
        let list = SoundLibrary::new(dir.path()).list().unwrap();

        assert_eq!(list.select(0).unwrap().name, "a.mp3");
        assert!(matches!(
            list.select(1),
            Err(LibraryError::InvalidSelection { index: 2, len: 1 })
        ));
        assert!(matches!(
            list.select(usize::MAX),
            Err(LibraryError::InvalidSelection {
                index: usize::MAX,
                len: 1
            })
        ));
    }

    #[test]
    fn ensure_exists_and_contains() {
        let dir = tempdir().expect("temp dir");
        let library = SoundLibrary::new(dir.path().join("sounds"));
        library.ensure_exists().unwrap();
        assert!(library.dir().is_dir());

        assert!(!library.contains("a.mp3"));
        touch(library.dir(), "a.mp3");
        assert!(library.contains("a.mp3"));
    }
}
