//! Dropdown: menu button with a single-select listbox

use focal_dom::{Document, DomResult, FocusOptions, KeyboardEvent, NamedKey, NodeId};

use super::{ensure_id, set_roving, wrap_step};
use crate::aria::{is_true, set_bool};
use crate::focus_trap::{KeyHandling, TrapId, TrapOptions};
use crate::manager::FocusManager;
use crate::{A11yResult, Politeness};

#[derive(Debug)]
pub struct Dropdown {
    button: NodeId,
    list: NodeId,
    options: Vec<NodeId>,
    labels: Vec<String>,
    selected: Option<usize>,
    active: usize,
    trap: Option<TrapId>,
}

impl Dropdown {
    /// Wire up `button` and the `list` whose element children are the options
    pub fn new(doc: &mut Document, button: NodeId, list: NodeId) -> DomResult<Self> {
        let list_id = ensure_id(doc, list, &format!("listbox-{}", list.raw()))?;
        doc.set_attribute(button, "aria-haspopup", "listbox")?;
        doc.set_attribute(button, "aria-controls", &list_id)?;
        set_bool(doc, button, "aria-expanded", false)?;
        doc.set_attribute(list, "role", "listbox")?;
        doc.toggle_attribute(list, "hidden", true)?;

        let options: Vec<NodeId> = doc
            .tree()
            .children(list)
            .filter(|(_, node)| node.is_element())
            .map(|(id, _)| id)
            .collect();
        let mut labels = Vec::with_capacity(options.len());
        let mut selected = None;
        for (i, &option) in options.iter().enumerate() {
            doc.set_attribute(option, "role", "option")?;
            if is_true(doc, option, "aria-selected") && selected.is_none() {
                selected = Some(i);
            } else {
                set_bool(doc, option, "aria-selected", false)?;
            }
            labels.push(doc.text_content(option).trim().to_string());
        }
        set_roving(doc, &options, selected.unwrap_or(0))?;
        Ok(Self {
            button,
            list,
            options,
            labels,
            selected,
            active: selected.unwrap_or(0),
            trap: None,
        })
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    pub fn options(&self) -> &[NodeId] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.trap.is_some()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected.map(|i| self.labels[i].as_str())
    }

    /// Show the list and focus the selected (or first) option
    pub fn open(&mut self, doc: &mut Document, manager: &mut FocusManager) -> DomResult<()> {
        if self.is_open() || self.options.is_empty() {
            return Ok(());
        }
        doc.toggle_attribute(self.list, "hidden", false)?;
        set_bool(doc, self.button, "aria-expanded", true)?;
        self.active = self.selected.unwrap_or(0);
        set_roving(doc, &self.options, self.active)?;
        // Only the active option is tabbable, so the trap lands on it.
        let options = TrapOptions::default().escape_deactivates(false);
        self.trap = Some(manager.activate_trap(doc, self.list, options));
        Ok(())
    }

    /// Hide the list and return focus to the button
    pub fn close(&mut self, doc: &mut Document, manager: &mut FocusManager) -> A11yResult<()> {
        let Some(trap) = self.trap else {
            return Ok(());
        };
        manager.deactivate_trap(doc, trap)?;
        self.trap = None;
        doc.toggle_attribute(self.list, "hidden", true)?;
        set_bool(doc, self.button, "aria-expanded", false)?;
        doc.focus(self.button, FocusOptions::default());
        Ok(())
    }

    /// Select an option, announce it and close
    pub fn select(&mut self, doc: &mut Document, manager: &mut FocusManager, index: usize) -> A11yResult<()> {
        if index >= self.options.len() {
            return Ok(());
        }
        for (i, &option) in self.options.iter().enumerate() {
            set_bool(doc, option, "aria-selected", i == index)?;
        }
        self.selected = Some(index);
        self.active = index;
        let label = self.labels[index].clone();
        self.close(doc, manager)?;
        manager.announce(doc, &format!("{label} selected"), Politeness::Polite);
        Ok(())
    }

    fn move_to(&mut self, doc: &mut Document, index: usize) -> DomResult<KeyHandling> {
        self.active = index;
        set_roving(doc, &self.options, index)?;
        let option = self.options[index];
        doc.focus(option, FocusOptions::default());
        Ok(KeyHandling::Moved(option))
    }

    /// Next option after the active one whose label starts with `prefix`
    fn typeahead(&self, prefix: &str) -> Option<usize> {
        let prefix = prefix.to_lowercase();
        let len = self.labels.len();
        (1..=len)
            .map(|offset| (self.active + offset) % len)
            .find(|&i| self.labels[i].to_lowercase().starts_with(&prefix))
    }

    pub fn handle_keydown(
        &mut self,
        doc: &mut Document,
        manager: &mut FocusManager,
        event: &mut KeyboardEvent,
    ) -> A11yResult<KeyHandling> {
        if !self.is_open() {
            let on_button = event.target.unwrap_or_else(|| doc.active_element()) == self.button;
            let opens = event.is(NamedKey::ArrowDown) || event.is(NamedKey::ArrowUp) || event.is_activation();
            if on_button && opens {
                event.prevent_default();
                self.open(doc, manager)?;
                return Ok(KeyHandling::Moved(doc.active_element()));
            }
            return Ok(KeyHandling::PassThrough);
        }

        let len = self.options.len();
        if event.is(NamedKey::Tab) {
            return Ok(manager.handle_keydown(doc, event));
        }
        if event.is_activation() || event.is(NamedKey::Escape) {
            event.prevent_default();
            if event.is(NamedKey::Escape) {
                self.close(doc, manager)?;
            } else {
                self.select(doc, manager, self.active)?;
            }
            return Ok(KeyHandling::Deactivated);
        }

        let target = if event.is(NamedKey::ArrowDown) {
            Some(wrap_step(self.active, len, true))
        } else if event.is(NamedKey::ArrowUp) {
            Some(wrap_step(self.active, len, false))
        } else if event.is(NamedKey::Home) {
            Some(0)
        } else if event.is(NamedKey::End) {
            Some(len - 1)
        } else {
            event.printable().and_then(|c| self.typeahead(c))
        };
        let Some(index) = target else {
            return Ok(KeyHandling::PassThrough);
        };
        event.prevent_default();
        Ok(self.move_to(doc, index)?)
    }
}
