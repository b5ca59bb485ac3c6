//! Dedicated OS-thread key listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread and
//! offers no way to subscribe to individual keys.  [`GlobalHookListener`]
//! runs it once for the whole process and fans events out through a
//! [`HookRegistry`], which is what gives hooks their register/unregister
//! lifecycle.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  Once every hook is
//! unregistered the thread keeps running but every event is a no-op.  The
//! thread exits with the process.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use super::hook::{HookCallback, HookError, HookHandle, KeyHook};
use super::keys::KeyChord;
use super::registry::HookRegistry;

// ---------------------------------------------------------------------------
// GlobalHookListener
// ---------------------------------------------------------------------------

/// Process-wide keyboard hook subsystem.
///
/// Construct one with [`GlobalHookListener::start`] and share it as an
/// `Arc<dyn KeyHook>`.
pub struct GlobalHookListener {
    registry: Arc<Mutex<HookRegistry>>,
    /// Set when `rdev::listen` returned an error; registrations then fail.
    failed: Arc<AtomicBool>,
    /// Kept so the thread is not detached prematurely; never joined because
    /// `rdev::listen` never returns on success.
    _thread: Option<std::thread::JoinHandle<()>>,
}

impl GlobalHookListener {
    /// Spawn the `rdev-listener` thread.
    ///
    /// Failure to create the thread is logged and leaves the listener in the
    /// failed state rather than aborting startup.
    pub fn start() -> Self {
        let registry = Arc::new(Mutex::new(HookRegistry::new()));
        let failed = Arc::new(AtomicBool::new(false));

        let registry_clone = Arc::clone(&registry);
        let failed_clone = Arc::clone(&failed);

        let thread = std::thread::Builder::new()
            .name("rdev-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    // Collect under the lock, run outside it: callbacks may
                    // block briefly and must not stall registration.
                    let callbacks = registry_clone
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .dispatch(&event.event_type);
                    for callback in callbacks {
                        callback();
                    }
                });

                if let Err(e) = result {
                    log::error!("rdev-listener: rdev::listen exited with error: {:?}", e);
                    failed_clone.store(true, Ordering::SeqCst);
                }
            });

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("failed to spawn rdev-listener thread: {e}");
                failed.store(true, Ordering::SeqCst);
                None
            }
        };

        Self {
            registry,
            failed,
            _thread: thread,
        }
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, HookRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyHook for GlobalHookListener {
    fn register(&self, chord: KeyChord, callback: HookCallback) -> Result<HookHandle, HookError> {
        if self.failed.load(Ordering::SeqCst) {
            return Err(HookError::Unavailable(
                "keyboard listener is not running".into(),
            ));
        }
        if let rdev::Key::Unknown(code) = chord.key {
            log::debug!("refusing hook for unknown key code {code}");
            return Err(HookError::Rejected(chord.key));
        }
        let handle = self.registry().insert(chord, callback);
        log::debug!("registered hook {} for {:?}", handle.id(), chord);
        Ok(handle)
    }

    fn unregister(&self, handle: HookHandle) -> bool {
        let removed = self.registry().remove(handle);
        log::debug!("unregistered hook {} (present: {removed})", handle.id());
        removed
    }
}
