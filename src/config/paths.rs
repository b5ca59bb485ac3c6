//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout (under the data root):
//!
//! ```text
//! <root>/settings.json
//! <root>/keybinds.json
//! <root>/sounds/
//! ```
//!
//! Default root:
//!   Windows: %APPDATA%\soundboard\
//!   macOS:   ~/Library/Application Support/soundboard/
//!   Linux:   ~/.config/soundboard/

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Root directory holding both JSON files and the sound directory.
    pub root: PathBuf,
    /// Full path to `settings.json`.
    pub settings_file: PathBuf,
    /// Full path to `keybinds.json`.
    pub keybinds_file: PathBuf,
    /// Managed directory that imported clips are copied into.
    pub sounds_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "soundboard";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let root = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        Self::in_dir(root)
    }

    /// Lay the files out under an explicit root (used by `--data-dir` and tests).
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            settings_file: root.join("settings.json"),
            keybinds_file: root.join("keybinds.json"),
            sounds_dir: root.join("sounds"),
            root,
        }
    }

    /// Create the root and the managed sound directory if they are missing.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.sounds_dir)
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.root.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.json"));
        assert!(paths
            .keybinds_file
            .file_name()
            .is_some_and(|n| n == "keybinds.json"));
        assert!(paths.sounds_dir.file_name().is_some_and(|n| n == "sounds"));
    }

    #[test]
    fn ensure_dirs_creates_sound_directory() {
        let dir = tempdir().expect("temp dir");
        let paths = AppPaths::in_dir(dir.path().join("nested"));
        assert!(!paths.sounds_dir.exists());

        paths.ensure_dirs().expect("create dirs");
        assert!(paths.sounds_dir.is_dir());

        // Second call is a no-op.
        paths.ensure_dirs().expect("create dirs again");
    }
}
