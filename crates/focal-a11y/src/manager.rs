//! Focus Manager
//!
//! Owns the focus save/restore stack, the screen-reader announcer node and
//! the stack of active focus traps. One manager exists per mounted
//! provider; it is created by `mount` and torn down by `unmount`.

use std::time::Duration;

use focal_dom::{Document, FocusOptions, KeyboardEvent, NodeId, Selector};

use crate::aria::{accessible_name, VISUALLY_HIDDEN_STYLE};
use crate::config::A11yConfig;
use crate::focus_trap::{KeyHandling, TrapId, TrapOptions, TrapStack};
use crate::grant::GrantPool;
use crate::scheduler::{Scheduler, TimerId};
use crate::{A11yResult, Politeness};

/// Id given to the announcer node
pub const ANNOUNCER_ID: &str = "focal-announcer";

/// Elements flagged as invalid by `focus_first_error`
const ERROR_SELECTOR: &str = "[aria-invalid=\"true\"], [data-error], .error, .is-invalid";

/// Options for `FocusManager::restore_focus`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    pub prevent_scroll: bool,
    /// Select the whole value when restoring into a text field
    pub select_text: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManagerTask {
    ClearAnnouncer,
}

/// Focus manager
#[derive(Debug)]
pub struct FocusManager {
    config: A11yConfig,
    stack: Vec<NodeId>,
    announcer: NodeId,
    traps: TrapStack,
    timers: Scheduler<ManagerTask>,
    clear_timer: Option<TimerId>,
    grants: GrantPool,
}

impl FocusManager {
    /// Create the manager and its announcer node at the end of `<body>`
    pub fn mount(doc: &mut Document, config: A11yConfig) -> A11yResult<Self> {
        let announcer = doc.create_element_with(
            "div",
            &[
                ("id", ANNOUNCER_ID),
                ("role", "status"),
                ("aria-live", Politeness::Polite.as_str()),
                ("aria-atomic", "true"),
                ("class", "sr-only"),
                ("style", VISUALLY_HIDDEN_STYLE),
            ],
            None,
        );
        doc.append_child(doc.body(), announcer)?;
        tracing::debug!("Focus manager mounted, announcer {}", announcer);

        let grants = GrantPool::new(config.skip_link_release_delay());
        Ok(Self {
            config,
            stack: Vec::new(),
            announcer,
            traps: TrapStack::new(),
            timers: Scheduler::new(),
            clear_timer: None,
            grants,
        })
    }

    /// Drop traps without restoring focus, release grants and remove the
    /// announcer
    pub fn unmount(mut self, doc: &mut Document) -> A11yResult<()> {
        self.traps.clear(doc);
        self.grants.release_all(doc);
        self.timers.drain();
        doc.remove(self.announcer)?;
        tracing::debug!("Focus manager unmounted");
        Ok(())
    }

    pub fn announcer(&self) -> NodeId {
        self.announcer
    }

    pub fn config(&self) -> &A11yConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Save / restore
    // ------------------------------------------------------------------

    /// Remember the focused element. Body focus is not worth restoring.
    pub fn save_focus(&mut self, doc: &Document) {
        let active = doc.active_element();
        if active == doc.body() {
            return;
        }
        self.stack.push(active);
    }

    /// Pop the most recent saved element and focus it.
    ///
    /// Returns `false` on underflow or when the element has left the
    /// document; focus is then left where it is.
    pub fn restore_focus(&mut self, doc: &mut Document, options: RestoreOptions) -> bool {
        let Some(node) = self.stack.pop() else {
            tracing::debug!("Focus stack empty, nothing to restore");
            return false;
        };
        if !doc.is_connected(node) {
            tracing::debug!("Saved focus target {} is detached", node);
            return false;
        }
        if !doc.focus(node, FocusOptions { prevent_scroll: options.prevent_scroll }) {
            return false;
        }
        if options.select_text {
            doc.select_text(node);
        }
        true
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn clear_stack(&mut self) {
        self.stack.clear();
    }

    // ------------------------------------------------------------------
    // Announcements
    // ------------------------------------------------------------------

    /// Push a message to assistive technology through the announcer.
    ///
    /// The text is cleared before being written so an identical message
    /// still mutates the node, and cleared again after the configured
    /// delay. `Politeness::Off` and empty messages are ignored.
    pub fn announce(&mut self, doc: &mut Document, message: &str, politeness: Politeness) {
        let message = message.trim();
        if message.is_empty() || politeness == Politeness::Off {
            return;
        }
        if let Some(timer) = self.clear_timer.take() {
            self.timers.cancel(timer);
        }
        if let Err(e) = self.write_announcement(doc, message, politeness) {
            tracing::warn!("Announcement failed: {}", e);
            return;
        }
        tracing::debug!("Announce ({}): {}", politeness.as_str(), message);
        self.clear_timer = Some(
            self.timers
                .schedule(self.config.announce_clear_delay(), ManagerTask::ClearAnnouncer),
        );
    }

    fn write_announcement(&self, doc: &mut Document, message: &str, politeness: Politeness) -> A11yResult<()> {
        doc.set_attribute(self.announcer, "aria-live", politeness.as_str())?;
        if let Some(role) = politeness.role() {
            doc.set_attribute(self.announcer, "role", role)?;
        }
        doc.set_text_content(self.announcer, "")?;
        doc.set_text_content(self.announcer, message)?;
        Ok(())
    }

    /// Text currently in the announcer
    pub fn announcement(&self, doc: &Document) -> String {
        doc.text_content(self.announcer)
    }

    // ------------------------------------------------------------------
    // Form errors
    // ------------------------------------------------------------------

    /// Focus the first invalid field in `container` (the whole document
    /// when `None`) and announce it assertively.
    pub fn focus_first_error(&mut self, doc: &mut Document, container: Option<NodeId>) -> bool {
        let scope = container.unwrap_or_else(|| doc.tree().root());
        let selector = match Selector::parse(ERROR_SELECTOR) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::warn!("Error selector rejected: {}", e);
                return false;
            }
        };
        let Some(field) = doc.select(scope, &selector).find(|&n| doc.is_rendered(n)) else {
            return false;
        };
        if !self.focus_with_grant(doc, field) {
            return false;
        }

        let name = accessible_name(doc, field).unwrap_or_else(|| "this field".to_string());
        let mut message = format!("Please correct the error in {name}");
        if let Some(detail) = error_detail(doc, field) {
            message.push_str(": ");
            message.push_str(&detail);
        }
        self.announce(doc, &message, Politeness::Assertive);
        true
    }

    /// Focus `node`, adding a temporary `tabindex="-1"` when it is not
    /// focusable on its own
    pub fn focus_with_grant(&mut self, doc: &mut Document, node: NodeId) -> bool {
        if doc.focus(node, FocusOptions::default()) {
            return true;
        }
        match self.grants.focus(doc, node, FocusOptions::default()) {
            Ok(focused) => focused,
            Err(e) => {
                tracing::warn!("Could not grant focus to {}: {}", node, e);
                false
            }
        }
    }

    pub fn grants(&mut self) -> &mut GrantPool {
        &mut self.grants
    }

    // ------------------------------------------------------------------
    // Traps
    // ------------------------------------------------------------------

    pub fn activate_trap(&mut self, doc: &mut Document, container: NodeId, options: TrapOptions) -> TrapId {
        self.traps.push(doc, container, options)
    }

    /// Release a trap. Only the most recently activated trap may be released.
    pub fn deactivate_trap(&mut self, doc: &mut Document, id: TrapId) -> A11yResult<()> {
        self.traps.pop(doc, id)?;
        Ok(())
    }

    pub fn top_trap(&self) -> Option<TrapId> {
        self.traps.top()
    }

    pub fn is_trap_active(&self, id: TrapId) -> bool {
        self.traps.contains(id)
    }

    pub fn trap_depth(&self) -> usize {
        self.traps.len()
    }

    /// Route a keydown to the top trap
    pub fn handle_keydown(&mut self, doc: &mut Document, event: &mut KeyboardEvent) -> KeyHandling {
        self.traps.handle_keydown(doc, event)
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    /// Advance the manager's clock, clearing the announcer and releasing
    /// focus grants that are due
    pub fn tick(&mut self, doc: &mut Document, elapsed: Duration) {
        for task in self.timers.advance(elapsed) {
            match task {
                ManagerTask::ClearAnnouncer => {
                    self.clear_timer = None;
                    if let Err(e) = doc.set_text_content(self.announcer, "") {
                        tracing::warn!("Failed to clear announcer: {}", e);
                    }
                }
            }
        }
        self.grants.tick(doc, elapsed);
    }

    /// Drop saved focus and traps, keeping focus where it is
    pub fn reset(&mut self, doc: &mut Document) {
        self.clear_stack();
        self.traps.clear(doc);
    }
}

/// Message linked through `aria-errormessage` or `aria-describedby`
fn error_detail(doc: &Document, field: NodeId) -> Option<String> {
    ["aria-errormessage", "aria-describedby"]
        .iter()
        .filter_map(|attr| doc.get_attribute(field, attr))
        .flat_map(str::split_ascii_whitespace)
        .filter_map(|id| doc.get_element_by_id(id))
        .map(|n| doc.text_content(n).trim().to_string())
        .find(|t| !t.is_empty())
}
