//! Keys, modifier state and configurable key bindings.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Backspace,
    Tab,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Char(char),
    Shift,
    Control,
    Meta,
    Alt,
}

impl Key {
    /// The modifier this key drives, if it is a modifier key.
    pub fn modifier(self) -> Option<Modifier> {
        match self {
            Key::Shift => Some(Modifier::Shift),
            Key::Control => Some(Modifier::Control),
            Key::Meta => Some(Modifier::Meta),
            Key::Alt => Some(Modifier::Alt),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name.to_ascii_lowercase().as_str() {
            "space" => Key::Space,
            "backspace" => Key::Backspace,
            "tab" => Key::Tab,
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            "arrowup" | "up" => Key::ArrowUp,
            "arrowdown" | "down" => Key::ArrowDown,
            "arrowleft" | "left" => Key::ArrowLeft,
            "arrowright" | "right" => Key::ArrowRight,
            "shift" => Key::Shift,
            "control" | "ctrl" => Key::Control,
            "meta" | "cmd" => Key::Meta,
            "alt" | "option" => Key::Alt,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Shift,
    Control,
    Meta,
    Alt,
}

/// Snapshot of which modifier keys are held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        meta: false,
        alt: false,
    };

    /// Platform "Mod": Control or Meta.
    pub fn primary(&self) -> bool {
        self.control || self.meta
    }

    pub fn is_active(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Control => self.control,
            Modifier::Meta => self.meta,
            Modifier::Alt => self.alt,
        }
    }

    pub fn set(&mut self, modifier: Modifier, down: bool) {
        match modifier {
            Modifier::Shift => self.shift = down,
            Modifier::Control => self.control = down,
            Modifier::Meta => self.meta = down,
            Modifier::Alt => self.alt = down,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid key binding {binding:?}: {reason}")]
pub struct KeyBindingError {
    pub binding: String,
    pub reason: String,
}

/// A key plus the exact modifiers that must be held, e.g. `Mod+Enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: Key,
    pub shift: bool,
    pub primary: bool,
    pub alt: bool,
}

impl KeyBinding {
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            primary: false,
            alt: false,
        }
    }

    pub fn parse(binding: &str) -> Result<Self, KeyBindingError> {
        let err = |reason: &str| KeyBindingError {
            binding: binding.to_string(),
            reason: reason.to_string(),
        };

        let mut parts: Vec<&str> = binding.split('+').map(str::trim).collect();
        let key_name = parts.pop().filter(|k| !k.is_empty()).ok_or_else(|| err("missing key"))?;
        let key = Key::from_name(key_name).ok_or_else(|| err("unknown key"))?;
        if key.modifier().is_some() {
            return Err(err("a modifier cannot be the bound key"));
        }

        let mut binding = Self::plain(key);
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "shift" => binding.shift = true,
                "mod" | "ctrl" | "control" | "cmd" | "meta" => binding.primary = true,
                "alt" | "option" => binding.alt = true,
                _ => return Err(err("unknown modifier")),
            }
        }
        Ok(binding)
    }

    pub fn matches(&self, key: Key, mods: &Modifiers) -> bool {
        self.key == key
            && self.shift == mods.shift
            && self.primary == mods.primary()
            && self.alt == mods.alt
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.primary {
            f.write_str("Mod+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Overridable session actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Replace the query with the selected suggestion, keep the session open.
    Accept,
    /// Replace trigger and query with the formatted selection.
    Select,
    /// Select, then ask the host to open that day's note.
    DailyNote,
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub accept: Vec<KeyBinding>,
    pub select: Vec<KeyBinding>,
    pub daily_note: Vec<KeyBinding>,
    pub next: Vec<KeyBinding>,
    pub previous: Vec<KeyBinding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            accept: vec![KeyBinding::plain(Key::Tab)],
            select: vec![KeyBinding::plain(Key::Enter)],
            daily_note: vec![KeyBinding {
                primary: true,
                ..KeyBinding::plain(Key::Enter)
            }],
            next: vec![KeyBinding::plain(Key::ArrowDown)],
            previous: vec![KeyBinding::plain(Key::ArrowUp)],
        }
    }
}

impl Keymap {
    pub fn action_for(&self, key: Key, mods: &Modifiers) -> Option<KeyAction> {
        let table = [
            (KeyAction::DailyNote, &self.daily_note),
            (KeyAction::Select, &self.select),
            (KeyAction::Accept, &self.accept),
            (KeyAction::Next, &self.next),
            (KeyAction::Previous, &self.previous),
        ];
        table
            .into_iter()
            .find(|(_, bindings)| bindings.iter().any(|b| b.matches(key, mods)))
            .map(|(action, _)| action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_and_modified() {
        assert_eq!(KeyBinding::parse("Tab").unwrap(), KeyBinding::plain(Key::Tab));

        let b = KeyBinding::parse("Mod+Shift+Enter").unwrap();
        assert_eq!(b.key, Key::Enter);
        assert!(b.primary && b.shift && !b.alt);

        let b = KeyBinding::parse("alt + j").unwrap();
        assert_eq!(b.key, Key::Char('j'));
        assert!(b.alt);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(KeyBinding::parse("").is_err());
        assert!(KeyBinding::parse("Mod+").is_err());
        assert!(KeyBinding::parse("Hyper+Tab").is_err());
        assert!(KeyBinding::parse("Shift").is_err());
        assert!(KeyBinding::parse("F13x").is_err());
    }

    #[test]
    fn matching_is_exact_on_modifiers() {
        let tab = KeyBinding::plain(Key::Tab);
        assert!(tab.matches(Key::Tab, &Modifiers::NONE));
        let shifted = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        assert!(!tab.matches(Key::Tab, &shifted));

        let mod_enter = KeyBinding::parse("Mod+Enter").unwrap();
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        let ctrl = Modifiers {
            control: true,
            ..Modifiers::NONE
        };
        assert!(mod_enter.matches(Key::Enter, &meta));
        assert!(mod_enter.matches(Key::Enter, &ctrl));
        assert!(!mod_enter.matches(Key::Enter, &Modifiers::NONE));
    }

    #[test]
    fn default_keymap_actions() {
        let km = Keymap::default();
        let ctrl = Modifiers {
            control: true,
            ..Modifiers::NONE
        };
        assert_eq!(km.action_for(Key::Tab, &Modifiers::NONE), Some(KeyAction::Accept));
        assert_eq!(km.action_for(Key::Enter, &Modifiers::NONE), Some(KeyAction::Select));
        assert_eq!(km.action_for(Key::Enter, &ctrl), Some(KeyAction::DailyNote));
        assert_eq!(km.action_for(Key::ArrowDown, &Modifiers::NONE), Some(KeyAction::Next));
        assert_eq!(km.action_for(Key::Char('x'), &Modifiers::NONE), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let b = KeyBinding::parse("Mod+Alt+ArrowLeft").unwrap();
        assert_eq!(KeyBinding::parse(&b.to_string()).unwrap(), b);
    }
}
