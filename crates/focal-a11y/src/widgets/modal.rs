//! Modal dialog

use focal_dom::{Document, DomResult, FocusOptions, KeyboardEvent, NamedKey, NodeId};

use super::ensure_id;
use crate::focus_trap::{KeyHandling, TrapId, TrapOptions};
use crate::manager::FocusManager;
use crate::{A11yResult, Politeness};

/// Modal dialog over an existing container
#[derive(Debug)]
pub struct Modal {
    dialog: NodeId,
    title: String,
    trigger: Option<NodeId>,
    trap: Option<TrapId>,
    initial_focus: Option<String>,
}

impl Modal {
    /// Prepare `dialog` as a hidden modal labelled by `heading`
    pub fn new(doc: &mut Document, dialog: NodeId, heading: NodeId) -> DomResult<Self> {
        let dialog_id = ensure_id(doc, dialog, &format!("dialog-{}", dialog.raw()))?;
        let heading_id = ensure_id(doc, heading, &format!("{dialog_id}-title"))?;
        doc.set_attribute(dialog, "role", "dialog")?;
        doc.set_attribute(dialog, "aria-modal", "true")?;
        doc.set_attribute(dialog, "aria-labelledby", &heading_id)?;
        doc.toggle_attribute(dialog, "hidden", true)?;
        Ok(Self {
            dialog,
            title: doc.text_content(heading).trim().to_string(),
            trigger: None,
            trap: None,
            initial_focus: None,
        })
    }

    /// Selector for the element focused on open
    pub fn with_initial_focus(mut self, selector: &str) -> Self {
        self.initial_focus = Some(selector.to_string());
        self
    }

    pub fn dialog(&self) -> NodeId {
        self.dialog
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_open(&self) -> bool {
        self.trap.is_some()
    }

    /// Show the dialog and trap focus in it. `trigger` receives focus when
    /// the dialog closes; by default focus returns to whatever had it.
    pub fn open(&mut self, doc: &mut Document, manager: &mut FocusManager, trigger: Option<NodeId>) -> DomResult<()> {
        if self.is_open() {
            return Ok(());
        }
        self.trigger = trigger;
        doc.toggle_attribute(self.dialog, "hidden", false)?;
        let options = TrapOptions {
            initial_focus: self.initial_focus.clone(),
            escape_deactivates: false,
            return_focus_on_deactivate: true,
        };
        self.trap = Some(manager.activate_trap(doc, self.dialog, options));
        manager.announce(doc, &format!("{} dialog opened", self.title), Politeness::Polite);
        Ok(())
    }

    /// Release the trap, hide the dialog and return focus
    pub fn close(&mut self, doc: &mut Document, manager: &mut FocusManager) -> A11yResult<()> {
        let Some(trap) = self.trap else {
            return Ok(());
        };
        manager.deactivate_trap(doc, trap)?;
        self.trap = None;
        doc.toggle_attribute(self.dialog, "hidden", true)?;
        if let Some(trigger) = self.trigger.take() {
            if doc.is_connected(trigger) && !doc.has_focus(trigger) {
                doc.focus(trigger, FocusOptions::default());
            }
        }
        manager.announce(doc, &format!("{} dialog closed", self.title), Politeness::Polite);
        Ok(())
    }

    /// Escape closes; Tab is confined by the trap
    pub fn handle_keydown(
        &mut self,
        doc: &mut Document,
        manager: &mut FocusManager,
        event: &mut KeyboardEvent,
    ) -> A11yResult<KeyHandling> {
        let Some(trap) = self.trap else {
            return Ok(KeyHandling::PassThrough);
        };
        if manager.top_trap() != Some(trap) {
            return Ok(KeyHandling::PassThrough);
        }
        if event.is(NamedKey::Escape) {
            event.prevent_default();
            self.close(doc, manager)?;
            return Ok(KeyHandling::Deactivated);
        }
        Ok(manager.handle_keydown(doc, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::A11yConfig;

    struct Page {
        doc: Document,
        manager: FocusManager,
        opener: NodeId,
        cancel: NodeId,
        confirm: NodeId,
        modal: Modal,
    }

    fn page() -> Page {
        let mut doc = Document::default();
        let body = doc.body();
        let opener = doc.create_element_with("button", &[], Some("Delete account"));
        let dialog = doc.create_element_with("div", &[("id", "confirm")], None);
        let heading = doc.create_element_with("h2", &[], Some("Delete account"));
        let cancel = doc.create_element_with("button", &[], Some("Cancel"));
        let confirm = doc.create_element_with("button", &[], Some("Confirm"));
        doc.append_child(body, opener).unwrap();
        doc.append_child(body, dialog).unwrap();
        for n in [heading, cancel, confirm] {
            doc.append_child(dialog, n).unwrap();
        }
        let manager = FocusManager::mount(&mut doc, A11yConfig::default()).unwrap();
        let modal = Modal::new(&mut doc, dialog, heading).unwrap();
        doc.focus(opener, FocusOptions::default());
        Page { doc, manager, opener, cancel, confirm, modal }
    }

    #[test]
    fn test_attributes() {
        let p = page();
        let dialog = p.modal.dialog();
        assert_eq!(p.doc.get_attribute(dialog, "role"), Some("dialog"));
        assert_eq!(p.doc.get_attribute(dialog, "aria-modal"), Some("true"));
        assert_eq!(p.doc.get_attribute(dialog, "aria-labelledby"), Some("confirm-title"));
        assert!(p.doc.has_attribute(dialog, "hidden"));
        assert_eq!(p.modal.title(), "Delete account");
    }

    #[test]
    fn test_open_tab_escape() {
        let mut p = page();
        p.modal.open(&mut p.doc, &mut p.manager, Some(p.opener)).unwrap();
        assert_eq!(p.doc.active_element(), p.cancel);
        assert_eq!(p.manager.announcement(&p.doc), "Delete account dialog opened");

        let mut back = KeyboardEvent::named(NamedKey::Tab).with_shift();
        let handling = p.modal.handle_keydown(&mut p.doc, &mut p.manager, &mut back).unwrap();
        assert_eq!(handling, KeyHandling::Moved(p.confirm));

        let mut esc = KeyboardEvent::named(NamedKey::Escape);
        let handling = p.modal.handle_keydown(&mut p.doc, &mut p.manager, &mut esc).unwrap();
        assert_eq!(handling, KeyHandling::Deactivated);
        assert!(!p.modal.is_open());
        assert_eq!(p.doc.active_element(), p.opener);
        assert!(p.doc.has_attribute(p.modal.dialog(), "hidden"));
        assert_eq!(p.manager.announcement(&p.doc), "Delete account dialog closed");
    }

    #[test]
    fn test_initial_focus() {
        let mut p = page();
        let mut modal = p.modal.with_initial_focus("button[data-primary]");
        p.doc.set_attribute(p.confirm, "data-primary", "").unwrap();
        modal.open(&mut p.doc, &mut p.manager, None).unwrap();
        assert_eq!(p.doc.active_element(), p.confirm);
        modal.close(&mut p.doc, &mut p.manager).unwrap();
        assert_eq!(p.doc.active_element(), p.opener);
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut p = page();
        p.modal.close(&mut p.doc, &mut p.manager).unwrap();
        assert_eq!(p.doc.active_element(), p.opener);
    }
}
