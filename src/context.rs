//! Application state shared by the control panel actions.
//!
//! [`AppContext`] is built once in `main` and owned by the GUI thread.  Every
//! mutation of the keybinds or settings is written back to disk before the
//! method returns.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use thiserror::Error;

use crate::config::{AppPaths, KeybindError, KeybindMap, Settings};
use crate::hotkey::TriggerFn;
use crate::import::Importer;
use crate::library::{LibraryError, SoundEntry, SoundLibrary, SoundList};
use crate::playback::{PlaybackEngine, Volume};

/// Why a control panel action did not complete.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Bad key text or unknown key; nothing was changed.
    #[error(transparent)]
    Input(#[from] KeybindError),

    /// No sound to pick, or the pick is out of range; nothing was changed.
    #[error(transparent)]
    Selection(#[from] LibraryError),

    /// The change is live in memory but could not be written.
    #[error("failed to save {path}: {message}")]
    Persist { path: String, message: String },
}

impl ActionError {
    /// Whether this error came from user input and deserves a dialog.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Persist { .. })
    }
}

pub struct AppContext {
    pub paths: AppPaths,
    pub settings: Settings,
    pub keybinds: KeybindMap,
    pub library: SoundLibrary,
    pub volume: Volume,
    pub player: Arc<PlaybackEngine>,
}

impl AppContext {
    /// Load settings and keybinds from `paths`.
    ///
    /// Missing files load as defaults; malformed ones are an error.
    pub fn load(paths: AppPaths, volume: Volume, player: Arc<PlaybackEngine>) -> Result<Self> {
        let settings = Settings::load_from(&paths.settings_file)
            .with_context(|| format!("failed to load {}", paths.settings_file.display()))?;
        let keybinds = KeybindMap::load_from(&paths.keybinds_file)
            .with_context(|| format!("failed to load {}", paths.keybinds_file.display()))?;
        let library = SoundLibrary::new(&paths.sounds_dir);

        log::info!(
            "loaded {} keybind(s) and settings from {}",
            keybinds.len(),
            paths.root.display()
        );

        Ok(Self {
            paths,
            settings,
            keybinds,
            library,
            volume,
            player,
        })
    }

    /// Current contents of the sound library.
    pub fn sounds(&self) -> Result<SoundList, ActionError> {
        Ok(self.library.list()?)
    }

    /// Bind `key` to `sound` and persist.  Returns the normalized key.
    pub fn bind(&mut self, key: &str, sound: &SoundEntry) -> Result<String, ActionError> {
        let key = self
            .keybinds
            .bind(key, &sound.path.display().to_string())?;
        self.save_keybinds()?;
        Ok(key)
    }

    /// Remove the binding for `key` and persist.  Returns the normalized key.
    pub fn unbind(&mut self, key: &str) -> Result<String, ActionError> {
        let normalized = crate::hotkey::normalize_key(key);
        self.keybinds.unbind(&normalized)?;
        self.save_keybinds()?;
        Ok(normalized)
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<(), ActionError> {
        self.settings = settings;
        self.settings
            .save_to(&self.paths.settings_file)
            .map_err(|e| ActionError::Persist {
                path: self.paths.settings_file.display().to_string(),
                message: format!("{e:#}"),
            })
    }

    /// An importer honouring the current normalization setting.
    pub fn importer(&self) -> Importer {
        Importer::new(self.library.dir(), self.settings.normalize_volume)
    }

    /// Hook callback that plays a path at whatever the volume is when the
    /// key is pressed.
    pub fn trigger(&self) -> TriggerFn {
        let player = Arc::clone(&self.player);
        let volume = self.volume.clone();
        Arc::new(move |path: &str| player.play(path, volume.get()))
    }

    fn save_keybinds(&self) -> Result<(), ActionError> {
        self.keybinds
            .save_to(&self.paths.keybinds_file)
            .map_err(|e| ActionError::Persist {
                path: self.paths.keybinds_file.display().to_string(),
                message: format!("{e:#}"),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
