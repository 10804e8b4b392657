//! Keyboard Events
//!
//! Keydown events dispatched to document-level handlers.

pub use keyboard_types::{Key, Modifiers, NamedKey};

use crate::NodeId;

/// Keyboard event
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    /// Element the event was dispatched to
    pub target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl KeyboardEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn named(key: NamedKey) -> Self {
        Self::new(Key::Named(key))
    }

    pub fn character(c: &str) -> Self {
        Self::new(Key::Character(c.to_string()))
    }

    /// The space bar, which produces a `" "` character key
    pub fn space() -> Self {
        Self::character(" ")
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    pub fn with_shift(self) -> Self {
        self.with_modifiers(Modifiers::SHIFT)
    }

    pub fn with_ctrl(self) -> Self {
        self.with_modifiers(Modifiers::CONTROL)
    }

    pub fn with_alt(self) -> Self {
        self.with_modifiers(Modifiers::ALT)
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    #[inline]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    #[inline]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CONTROL)
    }

    #[inline]
    pub fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    #[inline]
    pub fn meta(&self) -> bool {
        self.modifiers.contains(Modifiers::META)
    }

    pub fn is(&self, key: NamedKey) -> bool {
        self.key == Key::Named(key)
    }

    pub fn is_space(&self) -> bool {
        matches!(&self.key, Key::Character(c) if c == " ")
    }

    /// Activation keys for buttons and links
    pub fn is_activation(&self) -> bool {
        self.is(NamedKey::Enter) || self.is_space()
    }

    /// Printable character without command modifiers
    pub fn printable(&self) -> Option<&str> {
        if self.ctrl() || self.alt() || self.meta() {
            return None;
        }
        match &self.key {
            Key::Character(c) if !c.trim().is_empty() => Some(c),
            _ => None,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
