//! Accessibility Provider
//!
//! The application root mounts one provider, which owns the focus
//! manager, skip links and landmark shortcuts. Components reach it through
//! an `A11yContext`; asking a context without a mounted provider is an
//! error rather than a silent fallback.

use std::time::Duration;

use focal_dom::{Document, KeyboardEvent, NamedKey};

use crate::config::A11yConfig;
use crate::focus_trap::KeyHandling;
use crate::focusable::move_focus_sequential;
use crate::manager::FocusManager;
use crate::shortcuts::LandmarkShortcuts;
use crate::skip_links::SkipLinks;
use crate::{A11yError, A11yResult, Politeness};

/// Page change reported by the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    pub path: String,
    pub title: String,
}

impl RouteChange {
    pub fn new(path: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
        }
    }
}

/// Accessibility services for one mounted application
#[derive(Debug)]
pub struct AccessibilityProvider {
    manager: FocusManager,
    skip_links: SkipLinks,
    shortcuts: LandmarkShortcuts,
}

impl AccessibilityProvider {
    pub fn mount(doc: &mut Document, config: A11yConfig) -> A11yResult<Self> {
        config.validate()?;
        let mut skip_links = SkipLinks::from_config(&config);
        if config.render_skip_links {
            skip_links.render(doc)?;
        }
        let shortcuts = LandmarkShortcuts::from_config(&config.landmark_shortcuts);
        let manager = FocusManager::mount(doc, config)?;
        tracing::info!(
            "Accessibility provider mounted ({} skip links, {} shortcuts)",
            skip_links.links().len(),
            shortcuts.len()
        );
        Ok(Self {
            manager,
            skip_links,
            shortcuts,
        })
    }

    pub fn focus_manager(&mut self) -> &mut FocusManager {
        &mut self.manager
    }

    pub fn skip_links(&mut self) -> &mut SkipLinks {
        &mut self.skip_links
    }

    pub fn shortcuts(&self) -> &LandmarkShortcuts {
        &self.shortcuts
    }

    /// Document-level keydown: the top trap first, then skip links, then
    /// landmark shortcuts, then the default Tab action.
    ///
    /// Skip links and landmark shortcuts are ignored while a trap is active,
    /// since their targets lie outside the trapped region. The default Tab
    /// action is performed here but reported as `PassThrough`, since nothing
    /// intercepted the event.
    pub fn dispatch_keydown(&mut self, doc: &mut Document, event: &mut KeyboardEvent) -> KeyHandling {
        let handling = self.manager.handle_keydown(doc, event);
        if handling.is_handled() {
            return handling;
        }
        if let Some(trap) = self.manager.top_trap() {
            tracing::trace!("{} active, landmark navigation suppressed", trap);
            return KeyHandling::PassThrough;
        }
        if self.skip_links.handle_keydown(doc, event) || self.shortcuts.handle(doc, &mut self.manager, event) {
            return KeyHandling::Moved(doc.active_element());
        }
        if event.is(NamedKey::Tab) && !event.is_default_prevented() {
            move_focus_sequential(doc, !event.shift());
        }
        KeyHandling::PassThrough
    }

    /// The router moved to a new page. Returns whether focus moved to the
    /// main landmark.
    pub fn on_route_change(&mut self, doc: &mut Document, route: &RouteChange) -> bool {
        tracing::debug!("Route change to {}", route.path);
        self.manager.reset(doc);
        self.manager
            .announce(doc, &format!("Navigated to {}", route.title), Politeness::Polite);

        if !self.manager.config().focus_main_on_navigation {
            return false;
        }
        let main_id = self.manager.config().main_landmark_id.clone();
        match doc.get_element_by_id(&main_id) {
            Some(main) => self.manager.focus_with_grant(doc, main),
            None => {
                tracing::debug!("Main landmark #{} not found", main_id);
                false
            }
        }
    }

    pub fn tick(&mut self, doc: &mut Document, elapsed: Duration) {
        self.manager.tick(doc, elapsed);
        self.skip_links.tick(doc, elapsed);
    }

    /// Release grants and remove every node the provider added
    pub fn unmount(mut self, doc: &mut Document) -> A11yResult<()> {
        self.skip_links.unmount(doc)?;
        self.manager.unmount(doc)?;
        tracing::info!("Accessibility provider unmounted");
        Ok(())
    }
}

/// Handle through which components reach the provider
#[derive(Debug, Default)]
pub struct A11yContext {
    provider: Option<AccessibilityProvider>,
}

impl A11yContext {
    /// A context with nothing mounted
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a provider. A context that already has one keeps it.
    pub fn mount(&mut self, doc: &mut Document, config: A11yConfig) -> A11yResult<&mut AccessibilityProvider> {
        if self.provider.is_some() {
            tracing::warn!("Accessibility provider already mounted");
        } else {
            self.provider = Some(AccessibilityProvider::mount(doc, config)?);
        }
        self.provider()
    }

    pub fn is_mounted(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider(&mut self) -> A11yResult<&mut AccessibilityProvider> {
        self.provider.as_mut().ok_or(A11yError::MissingProvider)
    }

    pub fn focus_manager(&mut self) -> A11yResult<&mut FocusManager> {
        Ok(self.provider()?.focus_manager())
    }

    pub fn unmount(&mut self, doc: &mut Document) -> A11yResult<()> {
        let provider = self.provider.take().ok_or(A11yError::MissingProvider)?;
        provider.unmount(doc)
    }
}
