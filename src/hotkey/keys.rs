//! Key identifier parsing.
//!
//! Bindings are stored as user-typed strings normalized with
//! [`normalize_key`] (trimmed, lowercase).  [`parse_chord`] turns such a
//! string into a [`KeyChord`]: an optional `+`-separated list of modifiers
//! followed by exactly one key name, e.g. `"a"`, `"f9"`, `"ctrl+shift+1"`.

use thiserror::Error;

/// Trim and lowercase a user-typed key identifier.
///
/// ```
/// use soundboard::hotkey::normalize_key;
///
/// assert_eq!(normalize_key("  A "), "a");
/// assert_eq!(normalize_key("Ctrl+F9"), "ctrl+f9");
/// ```
pub fn normalize_key(input: &str) -> String {
    input.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier keys that must be held for a chord to match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// The same set with the modifier that `key` itself represents cleared.
    ///
    /// Lets a chord that binds a bare modifier key (`"shift"`) match even
    /// though pressing it sets the corresponding flag.
    pub fn without_key(mut self, key: rdev::Key) -> Self {
        match key {
            rdev::Key::ControlLeft | rdev::Key::ControlRight => self.ctrl = false,
            rdev::Key::ShiftLeft | rdev::Key::ShiftRight => self.shift = false,
            rdev::Key::Alt => self.alt = false,
            rdev::Key::MetaLeft | rdev::Key::MetaRight => self.meta = false,
            _ => {}
        }
        self
    }
}

// ---------------------------------------------------------------------------
// KeyChord
// ---------------------------------------------------------------------------

/// A key plus the exact set of modifiers that must be held with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyChord {
    pub key: rdev::Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    /// A chord with no modifiers.
    pub fn plain(key: rdev::Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Whether a press of `key` with `held` modifiers triggers this chord.
    pub fn matches(&self, key: rdev::Key, held: Modifiers) -> bool {
        self.key == key && self.modifiers == held.without_key(key)
    }
}

/// Reasons a key identifier cannot be turned into a [`KeyChord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("key identifier is empty")]
    Empty,

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
}

/// Parse a key identifier such as `"a"`, `"f9"` or `"ctrl+alt+space"`.
///
/// Input is normalized first, so `" Ctrl + A "` is accepted.
pub fn parse_chord(input: &str) -> Result<KeyChord, KeyParseError> {
    let normalized = normalize_key(input);
    if normalized.is_empty() {
        return Err(KeyParseError::Empty);
    }

    let mut parts: Vec<&str> = normalized.split('+').map(str::trim).collect();
    // `split` always yields at least one element.
    let key_name = parts.pop().unwrap_or_default();
    if key_name.is_empty() {
        return Err(KeyParseError::UnknownKey(normalized.clone()));
    }

    let mut modifiers = Modifiers::NONE;
    for part in parts {
        match part {
            "ctrl" | "control" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" | "option" => modifiers.alt = true,
            "meta" | "win" | "windows" | "cmd" | "command" | "super" => modifiers.meta = true,
            other => return Err(KeyParseError::UnknownModifier(other.to_string())),
        }
    }

    let key = parse_key(key_name).ok_or_else(|| KeyParseError::UnknownKey(key_name.to_string()))?;
    Ok(KeyChord { key, modifiers })
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Parse a single key name into an [`rdev::Key`].
///
/// Matching is case-insensitive.  Returns `None` for unrecognised names.
///
/// ```
/// use soundboard::hotkey::parse_key;
///
/// assert_eq!(parse_key("f9"),  Some(rdev::Key::F9));
/// assert_eq!(parse_key("Esc"), Some(rdev::Key::Escape));
/// assert_eq!(parse_key("a"),   Some(rdev::Key::KeyA));
/// assert_eq!(parse_key("xyz"), None);
/// ```
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    let key = match key_str.to_lowercase().as_str() {
        // Function keys
        "f1" => rdev::Key::F1,
        "f2" => rdev::Key::F2,
        "f3" => rdev::Key::F3,
        "f4" => rdev::Key::F4,
        "f5" => rdev::Key::F5,
        "f6" => rdev::Key::F6,
        "f7" => rdev::Key::F7,
        "f8" => rdev::Key::F8,
        "f9" => rdev::Key::F9,
        "f10" => rdev::Key::F10,
        "f11" => rdev::Key::F11,
        "f12" => rdev::Key::F12,

        // Navigation / control
        "escape" | "esc" => rdev::Key::Escape,
        "space" => rdev::Key::Space,
        "return" | "enter" => rdev::Key::Return,
        "tab" => rdev::Key::Tab,
        "backspace" => rdev::Key::Backspace,
        "delete" | "del" => rdev::Key::Delete,
        "insert" | "ins" => rdev::Key::Insert,
        "home" => rdev::Key::Home,
        "end" => rdev::Key::End,
        "pageup" | "page up" => rdev::Key::PageUp,
        "pagedown" | "page down" => rdev::Key::PageDown,
        "up" | "uparrow" => rdev::Key::UpArrow,
        "down" | "downarrow" => rdev::Key::DownArrow,
        "left" | "leftarrow" => rdev::Key::LeftArrow,
        "right" | "rightarrow" => rdev::Key::RightArrow,

        // Lock / special
        "capslock" | "caps lock" => rdev::Key::CapsLock,
        "numlock" | "num lock" => rdev::Key::NumLock,
        "scrolllock" | "scroll lock" => rdev::Key::ScrollLock,
        "printscreen" | "print screen" => rdev::Key::PrintScreen,
        "pause" => rdev::Key::Pause,

        // Bare modifiers
        "ctrl" | "control" => rdev::Key::ControlLeft,
        "right ctrl" => rdev::Key::ControlRight,
        "shift" => rdev::Key::ShiftLeft,
        "right shift" => rdev::Key::ShiftRight,
        "alt" => rdev::Key::Alt,
        "alt gr" | "altgr" => rdev::Key::AltGr,

        // Digit row
        "0" => rdev::Key::Num0,
        "1" => rdev::Key::Num1,
        "2" => rdev::Key::Num2,
        "3" => rdev::Key::Num3,
        "4" => rdev::Key::Num4,
        "5" => rdev::Key::Num5,
        "6" => rdev::Key::Num6,
        "7" => rdev::Key::Num7,
        "8" => rdev::Key::Num8,
        "9" => rdev::Key::Num9,

        // Numpad
        "num0" | "kp0" => rdev::Key::Kp0,
        "num1" | "kp1" => rdev::Key::Kp1,
        "num2" | "kp2" => rdev::Key::Kp2,
        "num3" | "kp3" => rdev::Key::Kp3,
        "num4" | "kp4" => rdev::Key::Kp4,
        "num5" | "kp5" => rdev::Key::Kp5,
        "num6" | "kp6" => rdev::Key::Kp6,
        "num7" | "kp7" => rdev::Key::Kp7,
        "num8" | "kp8" => rdev::Key::Kp8,
        "num9" | "kp9" => rdev::Key::Kp9,
        "numplus" | "kpplus" => rdev::Key::KpPlus,
        "num-" | "kpminus" => rdev::Key::KpMinus,
        "num*" | "kpmultiply" => rdev::Key::KpMultiply,
        "num/" | "kpdivide" => rdev::Key::KpDivide,
        "numenter" | "kpenter" => rdev::Key::KpReturn,

        // Punctuation
        "-" | "minus" => rdev::Key::Minus,
        "=" | "equal" => rdev::Key::Equal,
        "[" | "bracketleft" => rdev::Key::LeftBracket,
        "]" | "bracketright" => rdev::Key::RightBracket,
        ";" | "semicolon" => rdev::Key::SemiColon,
        "'" | "quote" => rdev::Key::Quote,
        "\\" | "backslash" => rdev::Key::BackSlash,
        "," | "comma" => rdev::Key::Comma,
        "." | "dot" | "period" => rdev::Key::Dot,
        "/" | "slash" => rdev::Key::Slash,
        "`" | "backquote" | "grave" => rdev::Key::BackQuote,

        // Letter keys
        "a" => rdev::Key::KeyA,
        "b" => rdev::Key::KeyB,
        "c" => rdev::Key::KeyC,
        "d" => rdev::Key::KeyD,
        "e" => rdev::Key::KeyE,
        "f" => rdev::Key::KeyF,
        "g" => rdev::Key::KeyG,
        "h" => rdev::Key::KeyH,
        "i" => rdev::Key::KeyI,
        "j" => rdev::Key::KeyJ,
        "k" => rdev::Key::KeyK,
        "l" => rdev::Key::KeyL,
        "m" => rdev::Key::KeyM,
        "n" => rdev::Key::KeyN,
        "o" => rdev::Key::KeyO,
        "p" => rdev::Key::KeyP,
        "q" => rdev::Key::KeyQ,
        "r" => rdev::Key::KeyR,
        "s" => rdev::Key::KeyS,
        "t" => rdev::Key::KeyT,
        "u" => rdev::Key::KeyU,
        "v" => rdev::Key::KeyV,
        "w" => rdev::Key::KeyW,
        "x" => rdev::Key::KeyX,
        "y" => rdev::Key::KeyY,
        "z" => rdev::Key::KeyZ,

        _ => return None,
    };
    Some(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
