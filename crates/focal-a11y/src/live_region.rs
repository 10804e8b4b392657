//! Live Region Support
//!
//! A visually hidden `aria-live` node whose text changes are read by
//! assistive technology. Writes can be debounced, held while the region is
//! busy, and preceded by a clear so repeated text is announced again.

use std::time::Duration;

use focal_dom::{Document, DomResult, NodeId};

use crate::aria::{set_bool, VISUALLY_HIDDEN_STYLE};
use crate::scheduler::{Scheduler, TimerId};
use crate::Politeness;

/// Gap between clearing the region and writing the new text
pub const CLEAR_GAP: Duration = Duration::from_millis(50);

/// Live region configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRegionOptions {
    pub politeness: Politeness,
    /// Announce the whole region rather than just the change
    pub atomic: bool,
    pub busy: bool,
    /// Debounce window; zero writes immediately
    pub delay: Duration,
    /// Empty the region before each write
    pub clear_before_set: bool,
    /// Role override; by default derived from the politeness
    pub role: Option<String>,
}

impl Default for LiveRegionOptions {
    fn default() -> Self {
        Self {
            politeness: Politeness::Polite,
            atomic: true,
            busy: false,
            delay: Duration::ZERO,
            clear_before_set: false,
            role: None,
        }
    }
}

impl LiveRegionOptions {
    pub fn polite() -> Self {
        Self::default()
    }

    pub fn assertive() -> Self {
        Self {
            politeness: Politeness::Assertive,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_clear_before_set(mut self, on: bool) -> Self {
        self.clear_before_set = on;
        self
    }

    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RegionTask {
    /// Debounce window elapsed
    Debounced(String),
    /// Clear gap elapsed
    Commit(String),
}

/// Live region
#[derive(Debug)]
pub struct LiveRegion {
    node: NodeId,
    options: LiveRegionOptions,
    timers: Scheduler<RegionTask>,
    pending: Option<TimerId>,
    held: Option<String>,
}

impl LiveRegion {
    /// Create the region node under `parent`
    pub fn mount(doc: &mut Document, parent: NodeId, options: LiveRegionOptions) -> DomResult<Self> {
        let node = doc.create_element_with("div", &[("class", "sr-only"), ("style", VISUALLY_HIDDEN_STYLE)], None);
        let region = Self {
            node,
            options,
            timers: Scheduler::new(),
            pending: None,
            held: None,
        };
        region.sync_attributes(doc)?;
        doc.append_child(parent, node)?;
        Ok(region)
    }

    fn sync_attributes(&self, doc: &mut Document) -> DomResult<()> {
        doc.set_attribute(self.node, "aria-live", self.options.politeness.as_str())?;
        set_bool(doc, self.node, "aria-atomic", self.options.atomic)?;
        set_bool(doc, self.node, "aria-busy", self.options.busy)?;
        let role = self.options.role.as_deref().or(self.options.politeness.role());
        match role {
            Some(role) => doc.set_attribute(self.node, "role", role)?,
            None => {
                doc.remove_attribute(self.node, "role")?;
            }
        }
        Ok(())
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn options(&self) -> &LiveRegionOptions {
        &self.options
    }

    /// Current text of the region
    pub fn message(&self, doc: &Document) -> String {
        doc.text_content(self.node)
    }

    pub fn is_busy(&self) -> bool {
        self.options.busy
    }

    /// Whether a write is waiting on a timer or on busy
    pub fn has_pending(&self) -> bool {
        self.pending.is_some() || self.held.is_some()
    }

    /// Update the region text. A newer message replaces any pending one.
    pub fn set_message(&mut self, doc: &mut Document, text: &str) -> DomResult<()> {
        self.cancel_pending();
        if self.options.busy {
            self.held = Some(text.to_string());
            return Ok(());
        }
        if self.options.delay.is_zero() {
            return self.write(doc, text.to_string());
        }
        self.pending = Some(
            self.timers
                .schedule(self.options.delay, RegionTask::Debounced(text.to_string())),
        );
        Ok(())
    }

    fn cancel_pending(&mut self) {
        if let Some(timer) = self.pending.take() {
            self.timers.cancel(timer);
        }
    }

    fn write(&mut self, doc: &mut Document, text: String) -> DomResult<()> {
        if !self.options.clear_before_set {
            return doc.set_text_content(self.node, &text);
        }
        doc.set_text_content(self.node, "")?;
        self.pending = Some(self.timers.schedule(CLEAR_GAP, RegionTask::Commit(text)));
        Ok(())
    }

    /// Mark the region busy. Writes made while busy are held and the
    /// latest is flushed when busy clears.
    pub fn set_busy(&mut self, doc: &mut Document, busy: bool) -> DomResult<()> {
        self.options.busy = busy;
        set_bool(doc, self.node, "aria-busy", busy)?;
        if !busy {
            if let Some(text) = self.held.take() {
                self.set_message(doc, &text)?;
            }
        }
        Ok(())
    }

    pub fn set_politeness(&mut self, doc: &mut Document, politeness: Politeness) -> DomResult<()> {
        self.options.politeness = politeness;
        self.sync_attributes(doc)
    }

    pub fn set_atomic(&mut self, doc: &mut Document, atomic: bool) -> DomResult<()> {
        self.options.atomic = atomic;
        set_bool(doc, self.node, "aria-atomic", atomic)
    }

    /// Run writes whose timers are due
    pub fn tick(&mut self, doc: &mut Document, elapsed: Duration) -> DomResult<()> {
        let until = self.timers.now() + elapsed;
        while let Some(task) = self.timers.next_due(until) {
            self.pending = None;
            match task {
                RegionTask::Debounced(text) => self.write(doc, text)?,
                RegionTask::Commit(text) => doc.set_text_content(self.node, &text)?,
            }
        }
        Ok(())
    }

    pub fn unmount(self, doc: &mut Document) -> DomResult<()> {
        doc.remove(self.node)?;
        Ok(())
    }
}
