//! Persistent soundboard state.
//!
//! Provides [`Settings`] (theme and import preferences), [`KeybindMap`]
//! (key → sound path), and [`AppPaths`] for the per-user data directory.
//! Both documents are flat JSON, loaded once at startup and rewritten after
//! every change.

pub mod keybinds;
pub mod paths;
pub mod settings;

pub use keybinds::{KeybindError, KeybindMap};
pub use paths::AppPaths;
pub use settings::Settings;
