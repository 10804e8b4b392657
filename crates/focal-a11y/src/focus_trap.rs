//! Focus Traps
//!
//! A trap confines Tab cycling to a container while active and restores
//! the previously focused element when released. Traps nest through
//! `TrapStack`: only the most recently activated session intercepts Tab.

use focal_dom::{Document, FocusOptions, KeyboardEvent, NamedKey, NodeId, Selector};

use crate::focusable::focusable_elements;
use crate::A11yError;

/// Options for a trap session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapOptions {
    /// Selector resolved inside the container for the initial focus target
    pub initial_focus: Option<String>,
    /// Escape releases the trap
    pub escape_deactivates: bool,
    /// Restore the previously focused element on release
    pub return_focus_on_deactivate: bool,
}

impl Default for TrapOptions {
    fn default() -> Self {
        Self {
            initial_focus: None,
            escape_deactivates: true,
            return_focus_on_deactivate: true,
        }
    }
}

impl TrapOptions {
    pub fn with_initial_focus(mut self, selector: &str) -> Self {
        self.initial_focus = Some(selector.to_string());
        self
    }

    pub fn escape_deactivates(mut self, on: bool) -> Self {
        self.escape_deactivates = on;
        self
    }

    pub fn return_focus(mut self, on: bool) -> Self {
        self.return_focus_on_deactivate = on;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapState {
    #[default]
    Inactive,
    Active,
}

/// What a keydown handler did with the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHandling {
    /// Not ours; the default action proceeds
    PassThrough,
    /// Default prevented and focus moved to the node
    Moved(NodeId),
    /// Default prevented with nowhere to move (empty trap)
    Swallowed,
    /// Escape released the trap
    Deactivated,
}

impl KeyHandling {
    pub fn is_handled(self) -> bool {
        self != Self::PassThrough
    }
}

/// One trap session over a container
#[derive(Debug, Clone)]
pub struct FocusTrap {
    container: NodeId,
    options: TrapOptions,
    state: TrapState,
    return_to: Option<NodeId>,
}

impl FocusTrap {
    pub fn new(container: NodeId, options: TrapOptions) -> Self {
        Self {
            container,
            options,
            state: TrapState::Inactive,
            return_to: None,
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn options(&self) -> &TrapOptions {
        &self.options
    }

    pub fn state(&self) -> TrapState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TrapState::Active
    }

    /// Element focus returns to on release
    pub fn return_target(&self) -> Option<NodeId> {
        self.return_to
    }

    /// Capture the active element and move focus into the container.
    /// A no-op while already active.
    pub fn activate(&mut self, doc: &mut Document) {
        if self.is_active() {
            return;
        }
        self.return_to = Some(doc.active_element());
        self.state = TrapState::Active;

        let focusables = focusable_elements(doc, self.container);
        let target = self.initial_target(doc, &focusables).or(focusables.first().copied());
        if let Some(target) = target {
            doc.focus(target, FocusOptions::default());
        }
        tracing::debug!(
            "Focus trap active on {} ({} focusable)",
            self.container,
            focusables.len()
        );
    }

    fn initial_target(&self, doc: &Document, focusables: &[NodeId]) -> Option<NodeId> {
        let raw = self.options.initial_focus.as_deref()?;
        let selector = match Selector::parse(raw) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::warn!("Ignoring initial focus selector: {}", e);
                return None;
            }
        };
        doc.select(self.container, &selector)
            .find(|n| focusables.contains(n) || doc.is_focusable(*n))
    }

    /// Stop intercepting and restore focus. Returns whether focus was
    /// restored. A no-op while inactive.
    pub fn deactivate(&mut self, doc: &mut Document) -> bool {
        self.release(doc, self.options.return_focus_on_deactivate)
    }

    fn release(&mut self, doc: &mut Document, restore: bool) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = TrapState::Inactive;
        let return_to = self.return_to.take();
        tracing::debug!("Focus trap released on {}", self.container);

        match return_to {
            Some(node) if restore && doc.is_connected(node) => doc.focus(node, FocusOptions::default()),
            Some(node) if restore => {
                tracing::debug!("Trap return target {} is detached, leaving focus", node);
                false
            }
            _ => false,
        }
    }

    /// Handle a document-level keydown while active
    pub fn handle_keydown(&mut self, doc: &mut Document, event: &mut KeyboardEvent) -> KeyHandling {
        if !self.is_active() {
            return KeyHandling::PassThrough;
        }
        if event.is(NamedKey::Escape) {
            if !self.options.escape_deactivates {
                return KeyHandling::PassThrough;
            }
            self.deactivate(doc);
            return KeyHandling::Deactivated;
        }
        if !event.is(NamedKey::Tab) {
            return KeyHandling::PassThrough;
        }

        // Recomputed per keypress so content changes inside the trap count.
        let focusables = focusable_elements(doc, self.container);
        let (Some(&first), Some(&last)) = (focusables.first(), focusables.last()) else {
            event.prevent_default();
            return KeyHandling::Swallowed;
        };

        let active = doc.active_element();
        let position = focusables.iter().position(|&n| n == active);
        let target = match (position, event.shift()) {
            (Some(0), true) | (None, true) => last,
            (Some(i), false) if i == focusables.len() - 1 => first,
            (None, false) => first,
            (Some(i), true) => focusables[i - 1],
            (Some(i), false) => focusables[i + 1],
        };
        event.prevent_default();
        doc.focus(target, FocusOptions::default());
        KeyHandling::Moved(target)
    }
}

/// Identifies a session in a `TrapStack`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrapId(u64);

impl std::fmt::Display for TrapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "trap-{}", self.0)
    }
}

/// Active trap sessions, most recent last
#[derive(Debug, Default)]
pub struct TrapStack {
    sessions: Vec<(TrapId, FocusTrap)>,
    next_id: u64,
}

impl TrapStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn top(&self) -> Option<TrapId> {
        self.sessions.last().map(|(id, _)| *id)
    }

    pub fn get(&self, id: TrapId) -> Option<&FocusTrap> {
        self.sessions.iter().find(|(i, _)| *i == id).map(|(_, t)| t)
    }

    pub fn contains(&self, id: TrapId) -> bool {
        self.get(id).is_some()
    }

    /// Activate a trap over `container` and make it the owner of Tab.
    ///
    /// Activating a container that already has a session returns that
    /// session unchanged.
    pub fn push(&mut self, doc: &mut Document, container: NodeId, options: TrapOptions) -> TrapId {
        if let Some((id, _)) = self.sessions.iter().find(|(_, t)| t.container() == container) {
            tracing::debug!("Container {} already trapped by {}", container, id);
            return *id;
        }
        let id = TrapId(self.next_id);
        self.next_id += 1;
        let mut trap = FocusTrap::new(container, options);
        trap.activate(doc);
        self.sessions.push((id, trap));
        id
    }

    /// Deactivate and remove the top session. Returns whether focus was
    /// restored.
    ///
    /// Only the top session may be removed; releasing an outer trap while
    /// an inner one is open is a usage error.
    pub fn pop(&mut self, doc: &mut Document, id: TrapId) -> Result<bool, A11yError> {
        let Some(top) = self.top() else {
            return Err(A11yError::UnknownTrap(id));
        };
        if top != id {
            if self.contains(id) {
                tracing::warn!("Refusing to release {} while {} is still active", id, top);
                return Err(A11yError::TrapNotOnTop { trap: id, top });
            }
            return Err(A11yError::UnknownTrap(id));
        }
        let restored = match self.sessions.pop() {
            Some((_, mut trap)) => trap.deactivate(doc),
            None => false,
        };
        Ok(restored)
    }

    /// Route a keydown to the top session. Escape that releases the top
    /// session also removes it from the stack.
    pub fn handle_keydown(&mut self, doc: &mut Document, event: &mut KeyboardEvent) -> KeyHandling {
        let Some((_, trap)) = self.sessions.last_mut() else {
            return KeyHandling::PassThrough;
        };
        let handling = trap.handle_keydown(doc, event);
        if handling == KeyHandling::Deactivated {
            self.sessions.pop();
        }
        handling
    }

    /// Drop every session, newest first, without restoring focus
    pub fn clear(&mut self, doc: &mut Document) {
        while let Some((_, mut trap)) = self.sessions.pop() {
            trap.release(doc, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Page {
        doc: Document,
        opener: NodeId,
        dialog: NodeId,
        buttons: Vec<NodeId>,
    }

    fn page(labels: &[&str]) -> Page {
        let mut doc = Document::default();
        let body = doc.body();
        let opener = doc.create_element_with("button", &[], Some("Open"));
        let dialog = doc.create_element_with("div", &[("role", "dialog")], None);
        doc.append_child(body, opener).unwrap();
        doc.append_child(body, dialog).unwrap();
        let buttons = labels
            .iter()
            .map(|label| {
                let b = doc.create_element_with("button", &[("class", label)], Some(label));
                doc.append_child(dialog, b).unwrap();
                b
            })
            .collect();
        doc.focus(opener, FocusOptions::default());
        Page { doc, opener, dialog, buttons }
    }

    fn tab(doc: &mut Document, trap: &mut FocusTrap, shift: bool) -> KeyHandling {
        let mut event = KeyboardEvent::named(NamedKey::Tab);
        if shift {
            event = event.with_shift();
        }
        let handling = trap.handle_keydown(doc, &mut event);
        assert_eq!(event.is_default_prevented(), handling != KeyHandling::PassThrough);
        handling
    }

    #[test]
    fn test_activate_focuses_first() {
        let mut p = page(&["cancel", "confirm"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default());
        trap.activate(&mut p.doc);
        assert!(trap.is_active());
        assert_eq!(p.doc.active_element(), p.buttons[0]);
        assert_eq!(trap.return_target(), Some(p.opener));
    }

    #[test]
    fn test_initial_focus_selector() {
        let mut p = page(&["cancel", "confirm"]);
        let options = TrapOptions::default().with_initial_focus(".confirm");
        let mut trap = FocusTrap::new(p.dialog, options);
        trap.activate(&mut p.doc);
        assert_eq!(p.doc.active_element(), p.buttons[1]);
    }

    #[test]
    fn test_tab_wraps_both_ways() {
        let mut p = page(&["a", "b", "c"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default());
        trap.activate(&mut p.doc);

        assert_eq!(tab(&mut p.doc, &mut trap, true), KeyHandling::Moved(p.buttons[2]));
        assert_eq!(tab(&mut p.doc, &mut trap, false), KeyHandling::Moved(p.buttons[0]));
        assert_eq!(tab(&mut p.doc, &mut trap, false), KeyHandling::Moved(p.buttons[1]));
        assert_eq!(p.doc.active_element(), p.buttons[1]);
    }

    #[test]
    fn test_other_keys_pass_through() {
        let mut p = page(&["a"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default());
        trap.activate(&mut p.doc);
        let mut event = KeyboardEvent::character("x");
        assert_eq!(trap.handle_keydown(&mut p.doc, &mut event), KeyHandling::PassThrough);
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_empty_trap_swallows_tab() {
        let mut p = page(&[]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default());
        trap.activate(&mut p.doc);
        assert_eq!(p.doc.active_element(), p.opener);
        assert_eq!(tab(&mut p.doc, &mut trap, false), KeyHandling::Swallowed);
        assert_eq!(tab(&mut p.doc, &mut trap, true), KeyHandling::Swallowed);
        assert_eq!(p.doc.active_element(), p.opener);
    }

    #[test]
    fn test_escape_restores_focus() {
        let mut p = page(&["a", "b"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default());
        trap.activate(&mut p.doc);
        let mut esc = KeyboardEvent::named(NamedKey::Escape);
        assert_eq!(trap.handle_keydown(&mut p.doc, &mut esc), KeyHandling::Deactivated);
        assert!(!trap.is_active());
        assert_eq!(p.doc.active_element(), p.opener);
    }

    #[test]
    fn test_escape_disabled() {
        let mut p = page(&["a"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default().escape_deactivates(false));
        trap.activate(&mut p.doc);
        let mut esc = KeyboardEvent::named(NamedKey::Escape);
        assert_eq!(trap.handle_keydown(&mut p.doc, &mut esc), KeyHandling::PassThrough);
        assert!(trap.is_active());
    }

    #[test]
    fn test_detached_return_target() {
        let mut p = page(&["a"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default());
        trap.activate(&mut p.doc);
        p.doc.remove(p.opener).unwrap();
        assert!(!trap.deactivate(&mut p.doc));
        assert_eq!(p.doc.active_element(), p.buttons[0]);
    }

    #[test]
    fn test_return_focus_disabled_leaves_focus() {
        let mut p = page(&["a", "b"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default().return_focus(false));
        trap.activate(&mut p.doc);
        assert_eq!(tab(&mut p.doc, &mut trap, false), KeyHandling::Moved(p.buttons[1]));
        assert!(!trap.deactivate(&mut p.doc));
        assert!(!trap.is_active());
        assert_eq!(p.doc.active_element(), p.buttons[1]);
        assert_eq!(trap.return_target(), None);
    }

    #[test]
    fn test_tab_from_outside_is_pulled_back() {
        let mut p = page(&["a", "b", "c"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default());
        trap.activate(&mut p.doc);

        p.doc.focus(p.opener, FocusOptions::default());
        assert_eq!(tab(&mut p.doc, &mut trap, false), KeyHandling::Moved(p.buttons[0]));
        assert_eq!(p.doc.active_element(), p.buttons[0]);

        p.doc.focus(p.opener, FocusOptions::default());
        assert_eq!(tab(&mut p.doc, &mut trap, true), KeyHandling::Moved(p.buttons[2]));
        assert_eq!(p.doc.active_element(), p.buttons[2]);
    }

    #[test]
    fn test_double_activation_is_noop() {
        let mut p = page(&["a", "b"]);
        let mut trap = FocusTrap::new(p.dialog, TrapOptions::default());
        trap.activate(&mut p.doc);
        p.doc.focus(p.buttons[1], FocusOptions::default());
        trap.activate(&mut p.doc);
        assert_eq!(trap.return_target(), Some(p.opener));
        assert_eq!(p.doc.active_element(), p.buttons[1]);

        assert!(trap.deactivate(&mut p.doc));
        assert!(!trap.deactivate(&mut p.doc));
    }

    #[test]
    fn test_stack_nesting() {
        let mut p = page(&["a", "b"]);
        let body = p.doc.body();
        let menu = p.doc.create_element("ul");
        p.doc.append_child(body, menu).unwrap();
        let item = p.doc.create_element_with("li", &[("tabindex", "0")], Some("Item"));
        p.doc.append_child(menu, item).unwrap();

        let mut stack = TrapStack::new();
        let outer = stack.push(&mut p.doc, p.dialog, TrapOptions::default());
        let inner = stack.push(&mut p.doc, menu, TrapOptions::default());
        assert_eq!(stack.top(), Some(inner));
        assert_eq!(p.doc.active_element(), item);

        let mut tab = KeyboardEvent::named(NamedKey::Tab);
        assert_eq!(stack.handle_keydown(&mut p.doc, &mut tab), KeyHandling::Moved(item));

        assert!(matches!(
            stack.pop(&mut p.doc, outer),
            Err(A11yError::TrapNotOnTop { .. })
        ));
        assert!(stack.pop(&mut p.doc, inner).unwrap());
        assert_eq!(p.doc.active_element(), p.buttons[0]);
        assert!(stack.pop(&mut p.doc, outer).unwrap());
        assert_eq!(p.doc.active_element(), p.opener);
        assert!(matches!(stack.pop(&mut p.doc, outer), Err(A11yError::UnknownTrap(_))));
    }

    #[test]
    fn test_stack_reuses_container_session() {
        let mut p = page(&["a"]);
        let mut stack = TrapStack::new();
        let first = stack.push(&mut p.doc, p.dialog, TrapOptions::default());
        let again = stack.push(&mut p.doc, p.dialog, TrapOptions::default());
        assert_eq!(first, again);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_stack_escape_pops() {
        let mut p = page(&["a"]);
        let mut stack = TrapStack::new();
        stack.push(&mut p.doc, p.dialog, TrapOptions::default());
        let mut esc = KeyboardEvent::named(NamedKey::Escape);
        assert_eq!(stack.handle_keydown(&mut p.doc, &mut esc), KeyHandling::Deactivated);
        assert!(stack.is_empty());
        assert_eq!(p.doc.active_element(), p.opener);
    }
}
