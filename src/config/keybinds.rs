//! Key-to-sound bindings and their JSON persistence.
//!
//! On disk the map is a flat JSON object from key identifier to file path:
//!
//! ```json
//! { "a": "/home/me/.config/soundboard/sounds/boing.mp3" }
//! ```
//!
//! Keys are always stored normalized (trimmed, lowercase).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hotkey::{normalize_key, parse_chord, KeyParseError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeybindError {
    #[error("no key was entered")]
    Empty,

    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyParseError),

    #[error("key '{0}' is not bound")]
    NotBound(String),
}

/// Mapping from normalized key identifier to sound file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeybindMap {
    bindings: BTreeMap<String, String>,
}

impl KeybindMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.bindings.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind `key` to `path`, replacing any existing binding for that key.
    ///
    /// Returns the normalized key.  The map is untouched on error.
    pub fn bind(&mut self, key: &str, path: &str) -> Result<String, KeybindError> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(KeybindError::Empty);
        }
        parse_chord(&key)?;
        self.bindings.insert(key.clone(), path.to_string());
        Ok(key)
    }

    /// Remove the binding for `key`, returning the path it pointed at.
    pub fn unbind(&mut self, key: &str) -> Result<String, KeybindError> {
        let key = normalize_key(key);
        self.bindings
            .remove(&key)
            .ok_or(KeybindError::NotBound(key))
    }

    /// Load from `path`; an absent file is an empty map.
    ///
    /// Keys are re-normalized so hand-edited files load consistently.  When
    /// two raw keys normalize to the same identifier, the one sorting last
    /// wins and the other is dropped with a warning.  A file that is not
    /// valid JSON is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let raw: BTreeMap<String, String> = serde_json::from_str(&content)?;
        let mut bindings = BTreeMap::new();
        for (raw_key, sound) in raw {
            let key = normalize_key(&raw_key);
            if let Some(dropped) = bindings.insert(key.clone(), sound) {
                log::warn!(
                    "{}: '{raw_key}' duplicates key '{key}', dropping binding to {dropped}",
                    path.display()
                );
            }
        }
        Ok(Self { bindings })
    }

    /// Overwrite `path` with the whole map, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Insert without validation, for building fixtures with bad keys.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, key: &str, path: &str) {
        self.bindings.insert(key.to_string(), path.to_string());
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
    fn bind_normalizes_key() {
        let mut map = KeybindMap::new();
        let key = map.bind(" A ", "boing.mp3").expect("bind");

        assert_eq!(key, "a");
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("a", "boing.mp3")]);
        assert_eq!(map.get("A"), Some("boing.mp3"));
    }

    #[test]
    fn bind_overwrites_existing_key() {
        let mut map = KeybindMap::new();
        map.bind("a", "old.mp3").unwrap();
        map.bind("A", "new.mp3").unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some("new.mp3"));
    }

    #[test]
    fn bind_rejects_empty_and_unknown_keys() {
        let mut map = KeybindMap::new();

        assert_eq!(map.bind("   ", "x.mp3"), Err(KeybindError::Empty));
        assert!(matches!(
            map.bind("not-a-key", "x.mp3"),
            Err(KeybindError::InvalidKey(_))
        ));
        assert!(map.is_empty());
    }

    #[test]
    fn bind_accepts_modifier_chords() {
        let mut map = KeybindMap::new();
        assert_eq!(map.bind("Ctrl+F9", "x.mp3").unwrap(), "ctrl+f9");
    }

    #[test]
    fn unbind_unknown_key_leaves_map_unchanged() {
        let mut map = KeybindMap::new();
        map.bind("a", "a.mp3").unwrap();
        let before = map.clone();

        assert_eq!(
            map.unbind("b"),
            Err(KeybindError::NotBound("b".to_string()))
        );
        assert_eq!(map, before);
    }

    #[test]
    fn unbind_returns_path() {
        let mut map = KeybindMap::new();
        map.bind("a", "a.mp3").unwrap();

        assert_eq!(map.unbind(" A").unwrap(), "a.mp3");
        assert!(map.is_empty());
    }

    #[test]
    fn round_trip() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("keybinds.json");

        let mut map = KeybindMap::new();
        map.bind("a", "/sounds/a.mp3").unwrap();
        map.bind("f9", "/sounds/f9.wav").unwrap();
        map.save_to(&path).expect("save");

        assert_eq!(KeybindMap::load_from(&path).expect("load"), map);
    }

    #[test]
    fn file_is_flat_object() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("keybinds.json");

        let mut map = KeybindMap::new();
        map.bind("a", "boing.mp3").unwrap();
        map.save_to(&path).expect("save");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "a": "boing.mp3" }));
    }

    #[test]
    fn load_missing_is_empty() {
        let dir = tempdir().expect("temp dir");
        let map = KeybindMap::load_from(&dir.path().join("missing.json")).expect("load");
        assert!(map.is_empty());
    }

    #[test]
    fn load_keeps_one_binding_for_colliding_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keybinds.json");
        std::fs::write(&path, r#"{ " A ": "first.mp3", "a": "second.mp3" }"#).unwrap();

        let map = KeybindMap::load_from(&path).expect("load");

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some("second.mp3"));
    }

    #[test]
    fn load_renormalizes_hand_edited_keys() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("keybinds.json");
        std::fs::write(&path, r#"{ " Q ": "q.mp3" }"#).unwrap();

        let map = KeybindMap::load_from(&path).expect("load");
        assert_eq!(map.get("q"), Some("q.mp3"));
        assert_eq!(map.iter().next(), Some(("q", "q.mp3")));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("keybinds.json");
        std::fs::write(&path, "[1, 2").unwrap();

        assert!(KeybindMap::load_from(&path).is_err());
    }
}
