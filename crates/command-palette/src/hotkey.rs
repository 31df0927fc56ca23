//! Key chords and the shared hotkey registry
//!
//! Chords use the familiar `modifier+modifier+key` notation, e.g.
//! `"ctrl+shift+p"` or `"command+k"`. The registry tracks which palettes
//! currently listen for which chords; each registration is held by a
//! [`HotKeyGuard`] and removed when the guard is dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Modifier keys held during a chord
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Command on macOS, Super/Windows elsewhere
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };
}

/// The non-modifier part of a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A printable character, stored lowercase
    Char(char),
    F(u8),
    Escape,
    Enter,
    Tab,
    Space,
    Backspace,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    fn parse(token: &str) -> Option<Key> {
        let key = match token {
            "esc" | "escape" => Key::Escape,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "space" => Key::Space,
            "backspace" => Key::Backspace,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    (Some('f'), Some(_)) => {
                        let n: u8 = token[1..].parse().ok()?;
                        if !(1..=24).contains(&n) {
                            return None;
                        }
                        Key::F(n)
                    }
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::F(n) => write!(f, "f{}", n),
            Key::Escape => write!(f, "esc"),
            Key::Enter => write!(f, "enter"),
            Key::Tab => write!(f, "tab"),
            Key::Space => write!(f, "space"),
            Key::Backspace => write!(f, "backspace"),
            Key::Up => write!(f, "up"),
            Key::Down => write!(f, "down"),
            Key::Left => write!(f, "left"),
            Key::Right => write!(f, "right"),
        }
    }
}

/// A key pressed together with a set of modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl KeyChord {
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        // Chars are compared lowercase; shift is carried by the modifier
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self { modifiers, key }
    }
}

impl FromStr for KeyChord {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigError::InvalidHotKey {
            chord: s.to_string(),
            reason: reason.to_string(),
        };

        let lowered = s.trim().to_lowercase();
        if lowered.is_empty() {
            return Err(invalid("empty chord"));
        }

        // "ctrl++" means ctrl and the plus key
        let (mods, key_token) = match lowered.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match lowered.rsplit_once('+') {
                Some((mods, key)) => (mods, key),
                None => ("", lowered.as_str()),
            },
        };

        let mut modifiers = Modifiers::NONE;
        for token in mods.split('+').filter(|t| !t.is_empty()) {
            match token {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "command" | "cmd" | "meta" | "super" => modifiers.meta = true,
                // Platform primary modifier
                "mod" => {
                    if cfg!(target_os = "macos") {
                        modifiers.meta = true;
                    } else {
                        modifiers.ctrl = true;
                    }
                }
                other => return Err(invalid(&format!("unknown modifier {:?}", other))),
            }
        }

        let key = Key::parse(key_token)
            .ok_or_else(|| invalid(&format!("unknown key {:?}", key_token)))?;

        Ok(KeyChord::new(modifiers, key))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.meta, "command"),
            (m.ctrl, "ctrl"),
            (m.alt, "alt"),
            (m.shift, "shift"),
        ] {
            if held {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// The `hot_keys` option: one chord or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HotKeys {
    Single(String),
    Multiple(Vec<String>),
}

impl HotKeys {
    /// Parse every configured chord
    pub fn chords(&self) -> Result<Vec<KeyChord>, ConfigError> {
        match self {
            HotKeys::Single(chord) => Ok(vec![chord.parse()?]),
            HotKeys::Multiple(chords) => chords.iter().map(|c| c.parse()).collect(),
        }
    }
}

impl Default for HotKeys {
    fn default() -> Self {
        HotKeys::Multiple(vec!["command+shift+p".into(), "ctrl+shift+p".into()])
    }
}

/// Identifies one registration in a [`HotKeyRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    listeners: BTreeMap<ListenerId, Vec<KeyChord>>,
}

/// Process-wide set of chord listeners
///
/// Cloning shares the same underlying registry.
#[derive(Debug, Clone, Default)]
pub struct HotKeyRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl HotKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening for `chords`; stops when the returned guard drops
    pub fn register(&self, chords: Vec<KeyChord>) -> HotKeyGuard {
        let mut inner = lock(&self.inner);

        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        log::debug!("Registering hotkey listener {:?} for {} chord(s)", id, chords.len());
        inner.listeners.insert(id, chords);

        HotKeyGuard {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Listeners interested in `chord`, in registration order
    pub fn listeners_for(&self, chord: &KeyChord) -> Vec<ListenerId> {
        lock(&self.inner)
            .listeners
            .iter()
            .filter(|(_, chords)| chords.contains(chord))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a hotkey registration alive
///
/// Dropping the guard removes the registration, even if the registry
/// itself has already been dropped.
#[derive(Debug)]
pub struct HotKeyGuard {
    id: ListenerId,
    registry: Weak<Mutex<RegistryInner>>,
}

impl HotKeyGuard {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The registry this guard belongs to, if it is still alive
    pub fn registry(&self) -> Option<HotKeyRegistry> {
        self.registry
            .upgrade()
            .map(|inner| HotKeyRegistry { inner })
    }
}

impl Drop for HotKeyGuard {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut inner = lock(&registry);
        inner.listeners.remove(&self.id);
        log::debug!("Removed hotkey listener {:?}", self.id);
    }
}

/// Lock the registry, recovering from poisoning
///
/// The listener map stays consistent even if a holder panicked, and a
/// guard must always be able to deregister.
fn lock(inner: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(s: &str) -> KeyChord {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_chord() {
        let c = chord("ctrl+shift+p");
        assert!(c.modifiers.ctrl);
        assert!(c.modifiers.shift);
        assert!(!c.modifiers.meta);
        assert_eq!(c.key, Key::Char('p'));

        let c = chord("Command+Shift+P");
        assert!(c.modifiers.meta);
        assert_eq!(c.key, Key::Char('p'));
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(chord("esc").key, Key::Escape);
        assert_eq!(chord("alt+f12").key, Key::F(12));
        assert_eq!(chord("ctrl+space").key, Key::Space);
        assert_eq!(chord("ctrl++").key, Key::Char('+'));
        assert_eq!(chord("f").key, Key::Char('f'));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "hyper+p".parse::<KeyChord>(),
            Err(ConfigError::InvalidHotKey { .. })
        ));
        assert!("ctrl+nope".parse::<KeyChord>().is_err());
        assert!("f99".parse::<KeyChord>().is_err());
        assert!("".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let c = chord("shift+ctrl+p");
        assert_eq!(c.to_string(), "ctrl+shift+p");
        assert_eq!(chord(&c.to_string()), c);
    }

    #[test]
    fn test_default_hot_keys() {
        let chords = HotKeys::default().chords().unwrap();
        assert_eq!(chords.len(), 2);
        assert!(chords.contains(&chord("command+shift+p")));
        assert!(chords.contains(&chord("ctrl+shift+p")));
    }

    #[test]
    fn test_registry_lookup() {
        let registry = HotKeyRegistry::new();
        let a = registry.register(vec![chord("ctrl+shift+p")]);
        let b = registry.register(vec![chord("ctrl+k"), chord("ctrl+shift+p")]);

        assert_eq!(
            registry.listeners_for(&chord("ctrl+shift+p")),
            vec![a.id(), b.id()]
        );
        assert_eq!(registry.listeners_for(&chord("ctrl+k")), vec![b.id()]);
        assert!(registry.listeners_for(&chord("ctrl+j")).is_empty());
    }

    #[test]
    fn test_guard_deregisters_on_drop() {
        let registry = HotKeyRegistry::new();
        let guard = registry.register(vec![chord("ctrl+shift+p")]);
        assert_eq!(registry.len(), 1);

        drop(guard);
        assert!(registry.is_empty());
        assert!(registry.listeners_for(&chord("ctrl+shift+p")).is_empty());
    }

    #[test]
    fn test_guard_outlives_registry() {
        let registry = HotKeyRegistry::new();
        let guard = registry.register(vec![chord("ctrl+p")]);
        drop(registry);
        // Must not panic
        drop(guard);
    }

    #[test]
    fn test_guard_deregisters_from_poisoned_registry() {
        let registry = HotKeyRegistry::new();
        let guard = registry.register(vec![chord("ctrl+shift+p")]);

        let shared = registry.clone();
        let _ = std::thread::spawn(move || {
            let _held = shared.inner.lock().unwrap();
            panic!("poison the registry");
        })
        .join();
        assert!(registry.inner.is_poisoned());

        assert_eq!(registry.listeners_for(&chord("ctrl+shift+p")).len(), 1);
        drop(guard);
        assert!(registry.is_empty());
    }
}
