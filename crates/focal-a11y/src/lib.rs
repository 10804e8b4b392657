//! focal Accessibility
//!
//! Focus management and accessibility coordination over the focal DOM.
//!
//! Features:
//! - Focusable-element queries in tab order
//! - Focus traps with an explicit stack of nested sessions
//! - Focus manager: save/restore stack, announcer, first-error focus
//! - Live regions with debounce and clear-before-set
//! - Skip links and landmark shortcuts with temporary focus grants
//! - Provider/context with an explicit mount/unmount lifecycle
//! - Composite widgets: modal, dropdown, data table, carousel, media player

pub mod aria;
pub mod config;
pub mod focus_trap;
pub mod focusable;
pub mod grant;
pub mod live_region;
pub mod manager;
pub mod provider;
pub mod scheduler;
pub mod shortcuts;
pub mod skip_links;
pub mod widgets;

pub use aria::{AriaSort, Politeness};
pub use config::{A11yConfig, ConfigError, LandmarkShortcutConfig, SkipLinkConfig};
pub use focus_trap::{FocusTrap, KeyHandling, TrapId, TrapOptions, TrapStack, TrapState};
pub use focusable::{focusable_elements, is_tabbable, move_focus_sequential};
pub use grant::{FocusGrant, GrantPool, ScopedGrant, with_focus_grant};
pub use live_region::{LiveRegion, LiveRegionOptions};
pub use manager::{FocusManager, RestoreOptions};
pub use provider::{A11yContext, AccessibilityProvider, RouteChange};
pub use scheduler::{Scheduler, TimerId};
pub use shortcuts::{KeyboardShortcut, LandmarkShortcuts, LandmarkTarget};
pub use skip_links::{SkipLink, SkipLinks};

use focal_dom::DomError;

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("Focus manager used outside of an accessibility provider")]
    MissingProvider,

    #[error("Focus trap {trap} is not the most recently activated trap (top is {top})")]
    TrapNotOnTop { trap: TrapId, top: TrapId },

    #[error("Unknown focus trap {0}")]
    UnknownTrap(TrapId),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type A11yResult<T> = Result<T, A11yError>;
