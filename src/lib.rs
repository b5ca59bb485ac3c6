//! Keyboard soundboard: bind keys to audio clips and play them on press.
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Settings, keybinds and data paths (JSON on disk) |
//! | [`library`] | The managed sound directory |
//! | [`audio`] | Decode, loudness, format conversion, WAV output |
//! | [`import`] | Copying clips into the library, with normalization |
//! | [`playback`] | Single-voice output on the default device |
//! | [`hotkey`] | Global key hooks and the start/stop coordinator |
//! | [`context`] | State shared by control panel actions |
//! | [`app`] | The eframe control panel |

pub mod app;
pub mod audio;
pub mod config;
pub mod context;
pub mod hotkey;
pub mod import;
pub mod library;
pub mod playback;
