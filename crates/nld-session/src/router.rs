//! Key routing while a suggestion session is open.
//!
//! Tracks which modifiers are held (from key-down/key-up pairs) and turns
//! raw key-downs into the session actions they trigger. A router lives
//! exactly as long as the open session that owns it.

use nld_core::keymap::{Key, KeyAction, Keymap, Modifier, Modifiers};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// What a routed key-down asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    Space,
    Backspace,
    Action(KeyAction),
}

#[derive(Debug, Default)]
pub struct KeyInputRouter {
    modifiers: Modifiers,
}

impl KeyInputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_active(&self, modifier: Modifier) -> bool {
        self.modifiers.is_active(modifier)
    }

    /// Forget held modifiers; the next row render starts from nothing.
    pub fn reset(&mut self) {
        self.modifiers = Modifiers::NONE;
    }

    /// Update modifier state and map a key-down to a session key.
    ///
    /// Bound actions win over the built-in Space/Backspace handling, so a
    /// `Shift+Space` binding shadows the spacer logic for that chord. Shift
    /// and Alt only style the output, so a binding still matches with them
    /// held when no exact chord is bound.
    pub fn route(&mut self, event: KeyEvent, keymap: &Keymap) -> Option<SessionKey> {
        let (key, down) = match event {
            KeyEvent::Down(key) => (key, true),
            KeyEvent::Up(key) => (key, false),
        };
        if let Some(modifier) = key.modifier() {
            self.modifiers.set(modifier, down);
            trace!(?modifier, down, "modifier");
            return None;
        }
        if !down {
            return None;
        }

        let styling_only = Modifiers {
            shift: false,
            alt: false,
            ..self.modifiers
        };
        if let Some(action) = keymap
            .action_for(key, &self.modifiers)
            .or_else(|| keymap.action_for(key, &styling_only))
        {
            return Some(SessionKey::Action(action));
        }
        let chord = self.modifiers.primary() || self.modifiers.alt;
        match key {
            Key::Space if !chord => Some(SessionKey::Space),
            Key::Backspace if !chord => Some(SessionKey::Backspace),
            _ => None,
        }
    }
}
