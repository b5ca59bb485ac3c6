//! Global hotkeys for the soundboard, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive, and it reports every key event rather than letting
//! callers subscribe to single keys.  [`GlobalHookListener`] runs it once on
//! a dedicated thread and routes events through a [`HookRegistry`], exposing
//! the register/unregister API described by [`KeyHook`].
//!
//! [`HotkeyCoordinator`] sits on top: it turns a keybind snapshot into hooks
//! on start, removes them all on stop, and arms the ESC cancel listener that
//! reports back to the GUI through [`HotkeyEvent`].
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use soundboard::config::KeybindMap;
//! use soundboard::hotkey::{GlobalHookListener, HotkeyCoordinator, KeyHook};
//!
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let hook: Arc<dyn KeyHook> = Arc::new(GlobalHookListener::start());
//! let mut coordinator = HotkeyCoordinator::new(hook, tx, Arc::new(|| {}));
//!
//! let keybinds = KeybindMap::new();
//! coordinator.start(&keybinds, Arc::new(|path: &str| println!("play {path}")));
//!
//! // In the GUI loop:
//! // while let Ok(ev) = rx.try_recv() { ... }
//! ```

pub mod coordinator;
pub mod hook;
pub mod keys;
pub mod listener;
pub mod registry;

pub use coordinator::{
    CoordinatorState, HotkeyCoordinator, StartReport, TriggerFn, WakeFn, CANCEL_KEY,
};
pub use hook::{HookCallback, HookError, HookHandle, KeyHook};
pub use keys::{normalize_key, parse_chord, parse_key, KeyChord, KeyParseError, Modifiers};
pub use listener::GlobalHookListener;
pub use registry::HookRegistry;

#[cfg(test)]
pub use hook::MockKeyHook;

// ---------------------------------------------------------------------------
// HotkeyEvent
// ---------------------------------------------------------------------------

/// Events posted from hotkey threads to the GUI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// ESC was pressed during Active session `session`.
    CancelRequested { session: u64 },
}
