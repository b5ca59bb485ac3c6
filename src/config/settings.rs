//! User preferences and their JSON persistence.
//!
//! The document is a flat object with exactly two boolean fields:
//!
//! ```json
//! { "dark_theme": false, "normalize_volume": true }
//! ```

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Persisted user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Render the control panel with the dark palette.
    pub dark_theme: bool,
    /// Attenuate loud clips while importing them.
    pub normalize_volume: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_theme: false,
            normalize_volume: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`.
    ///
    /// Returns `Ok(Settings::default())` when the file does not exist yet.
    /// A file that exists but is not valid JSON is an error; callers treat it
    /// as fatal at startup.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save to `path`, creating parent directories as needed. The file is
    /// overwritten in place.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(!settings.dark_theme);
        assert!(settings.normalize_volume);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.json");

        let settings = Settings::load_from(&path).expect("should not error");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");

        let original = Settings {
            dark_theme: true,
            normalize_volume: false,
        };
        original.save_to(&path).expect("save");

        let loaded = Settings::load_from(&path).expect("load");
        assert_eq!(original, loaded);
    }

    #[test]
    fn file_uses_documented_field_names() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        Settings::default().save_to(&path).expect("save");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["dark_theme"], serde_json::Value::Bool(false));
        assert_eq!(value["normalize_volume"], serde_json::Value::Bool(true));
        assert_eq!(value.as_object().map(|o| o.len()), Some(2));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("a").join("b").join("settings.json");
        Settings::default().save_to(&path).expect("save");
        assert!(path.exists());
    }
}
