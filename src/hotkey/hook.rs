//! The OS key-hook seam.
//!
//! [`KeyHook`] is the interface the coordinator registers hooks through.
//! It is object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn KeyHook>`.  [`crate::hotkey::GlobalHookListener`] is the
//! production implementation backed by `rdev`; [`MockKeyHook`] (test only)
//! lets tests press keys without touching the OS.

use std::sync::Arc;

use thiserror::Error;

use super::keys::KeyChord;

/// Callback run on the hook subsystem's thread when a registered chord fires.
pub type HookCallback = Arc<dyn Fn() + Send + Sync>;

/// Opaque token for one hook registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookHandle(u64);

impl HookHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Error)]
pub enum HookError {
    /// The global keyboard listener could not be started (missing
    /// permissions, no display server, ...).
    #[error("global key hook unavailable: {0}")]
    Unavailable(String),

    /// The platform refuses hooks for this key.
    #[error("key {0:?} cannot be hooked")]
    Rejected(rdev::Key),
}

/// Register and deregister global key-press hooks.
pub trait KeyHook: Send + Sync {
    /// Run `callback` every time `chord` is pressed, until the returned
    /// handle is passed to [`KeyHook::unregister`].
    fn register(&self, chord: KeyChord, callback: HookCallback) -> Result<HookHandle, HookError>;

    /// Remove a hook.  Returns `false` if the handle was not registered.
    fn unregister(&self, handle: HookHandle) -> bool;
}

// Compile-time assertion: Box<dyn KeyHook> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn KeyHook>) {}
};

// ---------------------------------------------------------------------------
// MockKeyHook
// ---------------------------------------------------------------------------

/// In-memory hook subsystem for tests.
///
/// Dispatch goes through the same [`super::registry::HookRegistry`] the
/// real listener uses; [`MockKeyHook::press`] simulates a key stroke.
#[cfg(test)]
pub struct MockKeyHook {
    registry: std::sync::Mutex<super::registry::HookRegistry>,
    rejected: Vec<rdev::Key>,
}

#[cfg(test)]
impl MockKeyHook {
    pub fn new() -> Self {
        Self::rejecting(Vec::new())
    }

    /// A mock that refuses to register any of `keys`.
    pub fn rejecting(keys: Vec<rdev::Key>) -> Self {
        Self {
            registry: std::sync::Mutex::new(super::registry::HookRegistry::new()),
            rejected: keys,
        }
    }

    /// Press and release `key`, running every matching callback.
    pub fn press(&self, key: rdev::Key) {
        self.send(rdev::EventType::KeyPress(key));
        self.send(rdev::EventType::KeyRelease(key));
    }

    /// Feed a raw event through the registry.
    pub fn send(&self, event: rdev::EventType) {
        let callbacks = self.registry.lock().unwrap().dispatch(&event);
        for callback in callbacks {
            callback();
        }
    }

    /// Number of live registrations.
    pub fn registered(&self) -> usize {
        self.registry.lock().unwrap().len()
    }
}

#[cfg(test)]
impl KeyHook for MockKeyHook {
    fn register(&self, chord: KeyChord, callback: HookCallback) -> Result<HookHandle, HookError> {
        if self.rejected.contains(&chord.key) {
            return Err(HookError::Rejected(chord.key));
        }
        Ok(self.registry.lock().unwrap().insert(chord, callback))
    }

    fn unregister(&self, handle: HookHandle) -> bool {
        self.registry.lock().unwrap().remove(handle)
    }
}
