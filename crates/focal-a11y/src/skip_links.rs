//! Skip Links
//!
//! Links rendered at the top of `<body>` that jump focus past repeated
//! content to a landmark. Targets are looked up when a link is activated,
//! so they may appear after the links are rendered.

use std::time::Duration;

use focal_dom::{Document, DomResult, FocusOptions, KeyboardEvent, NodeId};

use crate::config::A11yConfig;
use crate::grant::GrantPool;

/// Skip link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipLink {
    pub label: String,
    pub target_id: String,
}

impl SkipLink {
    pub fn new(label: &str, target: &str) -> Self {
        Self {
            label: label.to_string(),
            target_id: target.to_string(),
        }
    }

    pub fn href(&self) -> String {
        format!("#{}", self.target_id)
    }
}

const DEFAULT_RELEASE_DELAY: Duration = Duration::from_millis(100);

/// Skip links and the grants they hold on their targets
#[derive(Debug)]
pub struct SkipLinks {
    links: Vec<SkipLink>,
    nav: Option<NodeId>,
    anchors: Vec<NodeId>,
    grants: GrantPool,
}

impl SkipLinks {
    pub fn new(links: Vec<SkipLink>) -> Self {
        Self {
            links,
            nav: None,
            anchors: Vec::new(),
            grants: GrantPool::new(DEFAULT_RELEASE_DELAY),
        }
    }

    pub fn from_config(config: &A11yConfig) -> Self {
        let links = config
            .skip_links
            .iter()
            .map(|l| SkipLink::new(&l.label, &l.target_id))
            .collect();
        Self::new(links).with_release_delay(config.skip_link_release_delay())
    }

    pub fn with_release_delay(mut self, delay: Duration) -> Self {
        self.grants = GrantPool::new(delay);
        self
    }

    pub fn links(&self) -> &[SkipLink] {
        &self.links
    }

    /// Rendered `<a>` elements, in link order
    pub fn anchors(&self) -> &[NodeId] {
        &self.anchors
    }

    pub fn nav(&self) -> Option<NodeId> {
        self.nav
    }

    /// Insert `<nav aria-label="Skip links">` as the first child of
    /// `<body>`. Rendering twice returns the existing nav.
    pub fn render(&mut self, doc: &mut Document) -> DomResult<NodeId> {
        if let Some(nav) = self.nav.filter(|&n| doc.is_connected(n)) {
            return Ok(nav);
        }
        let nav = doc.create_element_with("nav", &[("aria-label", "Skip links"), ("class", "skip-links")], None);
        self.anchors.clear();
        for link in &self.links {
            let href = link.href();
            let anchor = doc.create_element_with(
                "a",
                &[("href", href.as_str()), ("class", "skip-link")],
                Some(link.label.as_str()),
            );
            doc.append_child(nav, anchor)?;
            self.anchors.push(anchor);
        }
        let body = doc.body();
        let first = doc.tree().children(body).next().map(|(id, _)| id);
        doc.insert_before(body, nav, first)?;
        self.nav = Some(nav);
        tracing::debug!("Rendered {} skip links", self.links.len());
        Ok(nav)
    }

    /// Jump to the landmark with `target_id`. Returns whether focus moved.
    pub fn activate(&mut self, doc: &mut Document, target_id: &str) -> bool {
        let Some(target) = doc.get_element_by_id(target_id) else {
            tracing::debug!("Skip link target #{} not found", target_id);
            return false;
        };
        let focused = if doc.has_attribute(target, "tabindex") {
            doc.focus(target, FocusOptions::default())
        } else {
            match self.grants.focus(doc, target, FocusOptions::default()) {
                Ok(focused) => focused,
                Err(e) => {
                    tracing::warn!("Could not grant focus to #{}: {}", target_id, e);
                    false
                }
            }
        };
        if focused {
            tracing::debug!("Skipped to #{}", target_id);
        }
        focused
    }

    /// Activate the link behind a rendered anchor
    pub fn handle_click(&mut self, doc: &mut Document, anchor: NodeId) -> bool {
        let Some(index) = self.anchors.iter().position(|&a| a == anchor) else {
            return false;
        };
        let target_id = self.links[index].target_id.clone();
        self.activate(doc, &target_id)
    }

    /// Enter or Space on a focused skip link. Returns whether the event
    /// was consumed.
    pub fn handle_keydown(&mut self, doc: &mut Document, event: &mut KeyboardEvent) -> bool {
        if !event.is_activation() {
            return false;
        }
        let anchor = event.target.unwrap_or_else(|| doc.active_element());
        if !self.anchors.contains(&anchor) {
            return false;
        }
        event.prevent_default();
        self.handle_click(doc, anchor);
        true
    }

    /// Grants not yet released
    pub fn pending_grants(&self) -> usize {
        self.grants.pending()
    }

    pub fn tick(&mut self, doc: &mut Document, elapsed: Duration) {
        self.grants.tick(doc, elapsed);
    }

    /// Release every grant now, for teardown or unload
    pub fn release_all(&mut self, doc: &mut Document) -> usize {
        self.grants.release_all(doc)
    }

    /// Release grants and remove the rendered links
    pub fn unmount(&mut self, doc: &mut Document) -> DomResult<()> {
        self.release_all(doc);
        if let Some(nav) = self.nav.take() {
            doc.remove(nav)?;
        }
        self.anchors.clear();
        Ok(())
    }
}

impl Default for SkipLinks {
    fn default() -> Self {
        Self::from_config(&A11yConfig::default())
    }
}
