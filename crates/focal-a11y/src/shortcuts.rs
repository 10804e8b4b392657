//! Landmark Shortcuts
//!
//! Key combinations that jump focus straight to a page landmark.

use std::collections::HashMap;

use focal_dom::{Document, Key, KeyboardEvent};

use crate::config::LandmarkShortcutConfig;
use crate::manager::FocusManager;
use crate::Politeness;

/// Keyboard shortcut
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyboardShortcut {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyboardShortcut {
    pub fn new(key: &str) -> Self {
        Self {
            key: normalize_key(key),
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Parse `"Alt+1"`, `"Ctrl+Shift+F"`, `"Escape"`...
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty())?;
        let mut shortcut = Self::new(key);
        for modifier in parts {
            shortcut = match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => shortcut.ctrl(),
                "alt" | "option" => shortcut.alt(),
                "shift" => shortcut.shift(),
                "meta" | "cmd" | "super" => shortcut.meta(),
                _ => return None,
            };
        }
        Some(shortcut)
    }

    /// The shortcut a keydown represents
    pub fn from_event(event: &KeyboardEvent) -> Option<Self> {
        let key = match &event.key {
            Key::Character(c) if !c.is_empty() => c.clone(),
            Key::Named(named) => format!("{named:?}"),
            _ => return None,
        };
        Some(Self {
            key: normalize_key(&key),
            ctrl: event.ctrl(),
            alt: event.alt(),
            shift: event.shift(),
            meta: event.meta(),
        })
    }

    pub fn matches(&self, event: &KeyboardEvent) -> bool {
        Self::from_event(event).is_some_and(|s| &s == self)
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            parts.push("Cmd");
        }
        let key = if self.key.chars().count() == 1 {
            self.key.to_uppercase()
        } else {
            self.key.clone()
        };
        parts.push(&key);
        parts.join("+")
    }
}

/// Single characters compare case-insensitively; named keys keep their name
fn normalize_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Where a shortcut sends focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkTarget {
    pub target_id: String,
    pub label: String,
}

/// Shortcut registry for landmarks
#[derive(Debug, Default)]
pub struct LandmarkShortcuts {
    shortcuts: HashMap<KeyboardShortcut, LandmarkTarget>,
}

impl LandmarkShortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry from configuration. Unparseable entries are skipped.
    pub fn from_config(entries: &[LandmarkShortcutConfig]) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            match KeyboardShortcut::parse(&entry.keys) {
                Some(shortcut) => registry.register(shortcut, &entry.target_id, &entry.label),
                None => tracing::warn!("Skipping unrecognised shortcut \"{}\"", entry.keys),
            }
        }
        registry
    }

    pub fn register(&mut self, shortcut: KeyboardShortcut, target_id: &str, label: &str) {
        self.shortcuts.insert(
            shortcut,
            LandmarkTarget {
                target_id: target_id.to_string(),
                label: label.to_string(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    pub fn lookup(&self, event: &KeyboardEvent) -> Option<&LandmarkTarget> {
        let shortcut = KeyboardShortcut::from_event(event)?;
        self.shortcuts.get(&shortcut)
    }

    /// Focus the landmark bound to this keydown. Returns whether the event
    /// was consumed.
    pub fn handle(&self, doc: &mut Document, manager: &mut FocusManager, event: &mut KeyboardEvent) -> bool {
        let Some(target) = self.lookup(event) else {
            return false;
        };
        let Some(node) = doc.get_element_by_id(&target.target_id) else {
            tracing::debug!("Landmark #{} not found", target.target_id);
            return false;
        };
        event.prevent_default();
        if manager.focus_with_grant(doc, node) {
            manager.announce(doc, &format!("Moved to {}", target.label), Politeness::Polite);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::A11yConfig;
    use focal_dom::NamedKey;

    #[test]
    fn test_parse_and_display() {
        let shortcut = KeyboardShortcut::parse("Alt+1").unwrap();
        assert_eq!(shortcut, KeyboardShortcut::new("1").alt());
        assert_eq!(shortcut.display(), "Alt+1");

        let shortcut = KeyboardShortcut::parse("ctrl+shift+F").unwrap();
        assert_eq!(shortcut.display(), "Ctrl+Shift+F");
        assert_eq!(KeyboardShortcut::parse("Tab").unwrap().display(), "Tab");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(KeyboardShortcut::parse("Alt+"), None);
        assert_eq!(KeyboardShortcut::parse(""), None);
        assert_eq!(KeyboardShortcut::parse("Hyper+1"), None);
    }

    #[test]
    fn test_matches_events() {
        let alt1 = KeyboardShortcut::parse("Alt+1").unwrap();
        assert!(alt1.matches(&KeyboardEvent::character("1").with_alt()));
        assert!(!alt1.matches(&KeyboardEvent::character("1")));
        assert!(!alt1.matches(&KeyboardEvent::character("1").with_alt().with_shift()));

        let esc = KeyboardShortcut::parse("Escape").unwrap();
        assert!(esc.matches(&KeyboardEvent::named(NamedKey::Escape)));
    }

    #[test]
    fn test_handle_focuses_landmark() {
        let mut doc = Document::default();
        let body = doc.body();
        let nav = doc.create_element_with("nav", &[("id", "main-navigation")], Some("Menu"));
        doc.append_child(body, nav).unwrap();

        let config = A11yConfig::default();
        let shortcuts = LandmarkShortcuts::from_config(&config.landmark_shortcuts);
        assert_eq!(shortcuts.len(), 3);
        let mut manager = FocusManager::mount(&mut doc, config).unwrap();

        let mut event = KeyboardEvent::character("2").with_alt();
        assert!(shortcuts.handle(&mut doc, &mut manager, &mut event));
        assert!(event.is_default_prevented());
        assert_eq!(doc.active_element(), nav);
        assert_eq!(doc.text_content(manager.announcer()), "Moved to navigation");

        // Footer missing: the keydown is left alone.
        let mut event = KeyboardEvent::character("3").with_alt();
        assert!(!shortcuts.handle(&mut doc, &mut manager, &mut event));
        assert!(!event.is_default_prevented());
    }
}
