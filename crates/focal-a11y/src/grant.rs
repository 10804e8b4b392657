//! Temporary focusability
//!
//! Landmarks such as `<main>` are not focusable, but skip links and
//! shortcuts need to move focus onto them. A `FocusGrant` adds
//! `tabindex="-1"` for as long as it is held and removes it again on
//! release, so the element never joins the tab order.
//!
//! Release is guaranteed on every exit path by one of:
//! - `ScopedGrant`, which releases when it drops
//! - `GrantPool::tick`, once the release delay has passed
//! - `GrantPool::release_all`, on teardown or unload

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use focal_dom::{Document, DomResult, FocusOptions, NodeId};

use crate::scheduler::Scheduler;

/// A held `tabindex="-1"` on one element
#[derive(Debug)]
#[must_use = "a focus grant must be released"]
pub struct FocusGrant {
    node: NodeId,
    added: bool,
}

impl FocusGrant {
    /// Make `node` focusable by script. Elements that already carry a
    /// tabindex are left untouched.
    pub fn acquire(doc: &mut Document, node: NodeId) -> DomResult<Self> {
        let added = !doc.has_attribute(node, "tabindex");
        if added {
            doc.set_attribute(node, "tabindex", "-1")?;
        }
        Ok(Self { node, added })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether this grant added the tabindex itself
    pub fn is_temporary(&self) -> bool {
        self.added
    }

    /// Remove the tabindex this grant added. A tabindex changed by someone
    /// else in the meantime is kept.
    pub fn release(self, doc: &mut Document) -> DomResult<()> {
        if self.added && doc.get_attribute(self.node, "tabindex") == Some("-1") {
            doc.remove_attribute(self.node, "tabindex")?;
        }
        Ok(())
    }
}

/// A grant tied to a borrow of the document, released on drop
pub struct ScopedGrant<'a> {
    doc: &'a mut Document,
    grant: Option<FocusGrant>,
}

impl<'a> ScopedGrant<'a> {
    pub fn new(doc: &'a mut Document, node: NodeId) -> DomResult<Self> {
        let grant = FocusGrant::acquire(doc, node)?;
        Ok(Self {
            doc,
            grant: Some(grant),
        })
    }

    pub fn node(&self) -> Option<NodeId> {
        self.grant.as_ref().map(FocusGrant::node)
    }
}

impl Deref for ScopedGrant<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        &*self.doc
    }
}

impl DerefMut for ScopedGrant<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        &mut *self.doc
    }
}

impl Drop for ScopedGrant<'_> {
    fn drop(&mut self) {
        if let Some(grant) = self.grant.take() {
            let node = grant.node();
            if let Err(e) = grant.release(&mut *self.doc) {
                tracing::warn!("Failed to release focus grant on {}: {}", node, e);
            }
        }
    }
}

/// Run `f` with `node` temporarily focusable
pub fn with_focus_grant<R>(
    doc: &mut Document,
    node: NodeId,
    f: impl FnOnce(&mut Document, NodeId) -> R,
) -> DomResult<R> {
    let mut scoped = ScopedGrant::new(doc, node)?;
    Ok(f(&mut *scoped, node))
}

/// Grants waiting for their deferred release
#[derive(Debug)]
pub struct GrantPool {
    timers: Scheduler<FocusGrant>,
    release_delay: Duration,
}

impl GrantPool {
    pub fn new(release_delay: Duration) -> Self {
        Self {
            timers: Scheduler::new(),
            release_delay,
        }
    }

    pub fn release_delay(&self) -> Duration {
        self.release_delay
    }

    /// Grant, focus, and schedule the release. Returns whether focus moved.
    pub fn focus(&mut self, doc: &mut Document, node: NodeId, options: FocusOptions) -> DomResult<bool> {
        let grant = FocusGrant::acquire(doc, node)?;
        if !doc.focus(node, options) {
            grant.release(doc)?;
            return Ok(false);
        }
        if grant.is_temporary() {
            self.timers.schedule(self.release_delay, grant);
        } else {
            grant.release(doc)?;
        }
        Ok(true)
    }

    /// Number of grants not yet released
    pub fn pending(&self) -> usize {
        self.timers.pending()
    }

    /// Release grants whose delay has passed
    pub fn tick(&mut self, doc: &mut Document, elapsed: Duration) -> usize {
        Self::release(doc, self.timers.advance(elapsed))
    }

    /// Release every outstanding grant now
    pub fn release_all(&mut self, doc: &mut Document) -> usize {
        Self::release(doc, self.timers.drain())
    }

    fn release(doc: &mut Document, grants: Vec<FocusGrant>) -> usize {
        let count = grants.len();
        for grant in grants {
            let node = grant.node();
            if let Err(e) = grant.release(doc) {
                tracing::warn!("Failed to release focus grant on {}: {}", node, e);
            }
        }
        count
    }
}
