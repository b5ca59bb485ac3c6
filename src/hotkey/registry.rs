//! Hook table shared between registration calls and the event thread.
//!
//! [`HookRegistry`] is a plain data structure; callers wrap it in a
//! `Mutex`.  [`HookRegistry::dispatch`] returns the callbacks to run
//! instead of running them, so the lock is never held while user code
//! executes.

use std::collections::BTreeMap;

use super::hook::{HookCallback, HookHandle};
use super::keys::{KeyChord, Modifiers};

struct RegisteredHook {
    chord: KeyChord,
    callback: HookCallback,
}

/// Tracks which modifier keys are currently held down.
#[derive(Debug, Default, Clone, Copy)]
struct ModifierState {
    ctrl_left: bool,
    ctrl_right: bool,
    shift_left: bool,
    shift_right: bool,
    alt: bool,
    meta_left: bool,
    meta_right: bool,
}

impl ModifierState {
    /// Record a press (`down = true`) or release of `key`.
    fn update(&mut self, key: rdev::Key, down: bool) {
        match key {
            rdev::Key::ControlLeft => self.ctrl_left = down,
            rdev::Key::ControlRight => self.ctrl_right = down,
            rdev::Key::ShiftLeft => self.shift_left = down,
            rdev::Key::ShiftRight => self.shift_right = down,
            rdev::Key::Alt => self.alt = down,
            rdev::Key::MetaLeft => self.meta_left = down,
            rdev::Key::MetaRight => self.meta_right = down,
            _ => {}
        }
    }

    fn current(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl_left || self.ctrl_right,
            shift: self.shift_left || self.shift_right,
            alt: self.alt,
            meta: self.meta_left || self.meta_right,
        }
    }
}

/// Table of live hooks keyed by handle.
#[derive(Default)]
pub struct HookRegistry {
    next_id: u64,
    hooks: BTreeMap<HookHandle, RegisteredHook>,
    modifiers: ModifierState,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook and return its handle.  Handles are never reused.
    pub fn insert(&mut self, chord: KeyChord, callback: HookCallback) -> HookHandle {
        self.next_id += 1;
        let handle = HookHandle::new(self.next_id);
        self.hooks.insert(handle, RegisteredHook { chord, callback });
        handle
    }

    /// Remove a hook, dropping its callback.
    pub fn remove(&mut self, handle: HookHandle) -> bool {
        self.hooks.remove(&handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Update modifier state for `event` and collect the callbacks of every
    /// hook whose chord it triggers.  Only key presses trigger hooks.
    pub fn dispatch(&mut self, event: &rdev::EventType) -> Vec<HookCallback> {
        match event {
            &rdev::EventType::KeyPress(key) => {
                self.modifiers.update(key, true);
                let held = self.modifiers.current();
                self.hooks
                    .values()
                    .filter(|hook| hook.chord.matches(key, held))
                    .map(|hook| HookCallback::clone(&hook.callback))
                    .collect()
            }
            &rdev::EventType::KeyRelease(key) => {
                self.modifiers.update(key, false);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::keys::parse_chord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, HookCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, Arc::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }))
    }

    fn fire(registry: &mut HookRegistry, event: rdev::EventType) {
        for callback in registry.dispatch(&event) {
            callback();
        }
    }

    #[test]
    fn press_runs_matching_hook_only() {
        let mut registry = HookRegistry::new();
        let (a_count, a_cb) = counter();
        let (b_count, b_cb) = counter();
        registry.insert(parse_chord("a").unwrap(), a_cb);
        registry.insert(parse_chord("b").unwrap(), b_cb);

        fire(&mut registry, rdev::EventType::KeyPress(rdev::Key::KeyA));
        fire(&mut registry, rdev::EventType::KeyRelease(rdev::Key::KeyA));

        assert_eq!(a_count.load(Ordering::SeqCst), 1);
        assert_eq!(b_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn removed_hook_no_longer_fires() {
        let mut registry = HookRegistry::new();
        let (count, cb) = counter();
        let handle = registry.insert(parse_chord("a").unwrap(), cb);

        assert!(registry.remove(handle));
        assert!(!registry.remove(handle));
        assert!(registry.is_empty());

        fire(&mut registry, rdev::EventType::KeyPress(rdev::Key::KeyA));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handles_are_unique() {
        let mut registry = HookRegistry::new();
        let (_, cb) = counter();
        let first = registry.insert(parse_chord("a").unwrap(), Arc::clone(&cb));
        registry.remove(first);
        let second = registry.insert(parse_chord("a").unwrap(), cb);
        assert_ne!(first, second);
    }

    #[test]
    fn modifier_chords_follow_held_keys() {
        let mut registry = HookRegistry::new();
        let (plain_count, plain_cb) = counter();
        let (ctrl_count, ctrl_cb) = counter();
        registry.insert(parse_chord("a").unwrap(), plain_cb);
        registry.insert(parse_chord("ctrl+a").unwrap(), ctrl_cb);

        fire(&mut registry, rdev::EventType::KeyPress(rdev::Key::ControlRight));
        fire(&mut registry, rdev::EventType::KeyPress(rdev::Key::KeyA));
        fire(&mut registry, rdev::EventType::KeyRelease(rdev::Key::KeyA));
        fire(&mut registry, rdev::EventType::KeyRelease(rdev::Key::ControlRight));
        fire(&mut registry, rdev::EventType::KeyPress(rdev::Key::KeyA));

        assert_eq!(ctrl_count.load(Ordering::SeqCst), 1);
        assert_eq!(plain_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_keyboard_events_are_ignored() {
        let mut registry = HookRegistry::new();
        let (count, cb) = counter();
        registry.insert(parse_chord("a").unwrap(), cb);

        let callbacks = registry.dispatch(&rdev::EventType::MouseMove { x: 1.0, y: 2.0 });
        assert!(callbacks.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
