//! Start/stop state machine for the soundboard's global hotkeys.
//!
//! ```text
//!            start(bindings)                 stop() / ESC
//! Inactive ─────────────────▶ Active ─────────────────────▶ Inactive
//!                               │  start(bindings)
//!                               └──────▶ teardown, then Active again
//! ```
//!
//! The coordinator is owned by the GUI thread.  The only code that runs
//! elsewhere is the hook callbacks (on the hook subsystem's thread) and the
//! per-session `cancel-listener` thread, which never touches coordinator
//! state: it posts [`HotkeyEvent::CancelRequested`] and wakes the GUI, and
//! the GUI calls [`HotkeyCoordinator::handle_cancel`].

use std::sync::{mpsc as std_mpsc, Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use super::hook::{HookCallback, HookHandle, KeyHook};
use super::keys::{parse_chord, KeyChord};
use super::HotkeyEvent;
use crate::config::KeybindMap;

/// Invoked with the bound sound path when a hotkey fires.
pub type TriggerFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Nudges the GUI event loop so it drains its channels promptly.
pub type WakeFn = Arc<dyn Fn() + Send + Sync>;

/// The key that ends an Active session from anywhere.
pub const CANCEL_KEY: rdev::Key = rdev::Key::Escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No hooks registered.
    Inactive,
    /// Hooks registered and the cancel listener is waiting for ESC.
    Active,
}

/// Outcome of [`HotkeyCoordinator::start`].
#[derive(Debug, Default, Clone)]
pub struct StartReport {
    /// Keys whose hooks are now live, in registration order.
    pub registered: Vec<String>,
    /// Keys that were skipped, with the reason.
    pub rejected: Vec<(String, String)>,
    /// `false` when the ESC hook could not be registered.
    pub cancel_key_armed: bool,
}

pub struct HotkeyCoordinator {
    hook: Arc<dyn KeyHook>,
    handles: Vec<HookHandle>,
    events: mpsc::UnboundedSender<HotkeyEvent>,
    wake: WakeFn,
    session: u64,
    cancel_listener: Option<std::thread::JoinHandle<()>>,
}

impl HotkeyCoordinator {
    pub fn new(
        hook: Arc<dyn KeyHook>,
        events: mpsc::UnboundedSender<HotkeyEvent>,
        wake: WakeFn,
    ) -> Self {
        Self {
            hook,
            handles: Vec::new(),
            events,
            wake,
            session: 0,
            cancel_listener: None,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        if self.handles.is_empty() {
            CoordinatorState::Inactive
        } else {
            CoordinatorState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == CoordinatorState::Active
    }

    /// Identifier of the current (or most recent) Active session.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Whether the cancel listener of the latest session has exited.
    pub fn cancel_listener_finished(&self) -> bool {
        self.cancel_listener
            .as_ref()
            .map_or(true, std::thread::JoinHandle::is_finished)
    }

    /// Enter Active with the hooks described by `bindings`.
    ///
    /// Any hooks from a previous session are removed first.  A binding whose
    /// key cannot be parsed or hooked is skipped and reported; the rest are
    /// still registered.  The state stays Inactive only if nothing at all
    /// could be registered.
    pub fn start(&mut self, bindings: &KeybindMap, on_trigger: TriggerFn) -> StartReport {
        self.teardown();
        self.session += 1;

        let mut report = StartReport::default();

        for (key, path) in bindings.iter() {
            let chord = match parse_chord(key) {
                Ok(chord) => chord,
                Err(e) => {
                    log::warn!("skipping binding '{key}': {e}");
                    report.rejected.push((key.to_string(), e.to_string()));
                    continue;
                }
            };

            let trigger = Arc::clone(&on_trigger);
            let path = path.to_string();
            let callback: HookCallback = Arc::new(move || trigger(&path));

            match self.hook.register(chord, callback) {
                Ok(handle) => {
                    self.handles.push(handle);
                    report.registered.push(key.to_string());
                }
                Err(e) => {
                    log::warn!("skipping binding '{key}': {e}");
                    report.rejected.push((key.to_string(), e.to_string()));
                }
            }
        }

        report.cancel_key_armed = self.arm_cancel_listener();

        log::info!(
            "hotkey session {} started: {} registered, {} rejected",
            self.session,
            report.registered.len(),
            report.rejected.len()
        );
        report
    }

    /// Leave Active: deregister every hook and clear the handle set.
    pub fn stop(&mut self) {
        if self.is_active() {
            log::info!("hotkey session {} stopped", self.session);
        }
        self.teardown();
    }

    /// React to a [`HotkeyEvent::CancelRequested`] drained by the GUI.
    ///
    /// Requests from an older session are ignored.  Returns `true` when the
    /// coordinator transitioned to Inactive.
    pub fn handle_cancel(&mut self, session: u64) -> bool {
        if session != self.session || !self.is_active() {
            log::debug!("ignoring stale cancel request for session {session}");
            return false;
        }
        self.stop();
        true
    }

    fn teardown(&mut self) {
        for handle in self.handles.drain(..) {
            if !self.hook.unregister(handle) {
                log::warn!("hook {} was already gone", handle.id());
            }
        }
    }

    /// Register the one-shot ESC hook and spawn the thread waiting on it.
    ///
    /// The hook callback owns the only sender.  Unregistering the hook drops
    /// it, which ends the thread's `recv` even if ESC was never pressed.
    fn arm_cancel_listener(&mut self) -> bool {
        let (tx, rx) = std_mpsc::channel::<()>();
        let tx = Mutex::new(Some(tx));
        let callback: HookCallback = Arc::new(move || {
            let sender = tx.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(sender) = sender {
                let _ = sender.send(());
            }
        });

        let handle = match self.hook.register(KeyChord::plain(CANCEL_KEY), callback) {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("cancel key unavailable, use the Stop button: {e}");
                return false;
            }
        };

        let session = self.session;
        let events = self.events.clone();
        let wake = Arc::clone(&self.wake);
        let spawned = std::thread::Builder::new()
            .name("cancel-listener".into())
            .spawn(move || {
                if rx.recv().is_ok() {
                    log::info!("cancel key pressed, stopping session {session}");
                    let _ = events.send(HotkeyEvent::CancelRequested { session });
                    wake();
                }
            });

        match spawned {
            Ok(thread) => {
                self.handles.push(handle);
                self.cancel_listener = Some(thread);
                true
            }
            Err(e) => {
                log::error!("failed to spawn cancel-listener thread: {e}");
                self.hook.unregister(handle);
                false
            }
        }
    }
}

impl Drop for HotkeyCoordinator {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
