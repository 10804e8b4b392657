//! Composite Widgets
//!
//! Keyboard-operable widgets built on the focus manager. Each widget owns
//! only its own state and talks to the manager for traps and
//! announcements.

pub mod carousel;
pub mod data_table;
pub mod dropdown;
pub mod media_player;
pub mod modal;

pub use carousel::Carousel;
pub use data_table::{DataTable, GridPosition};
pub use dropdown::Dropdown;
pub use media_player::MediaPlayer;
pub use modal::Modal;

use focal_dom::{Document, DomResult, NodeId};

/// Roving tabindex: `0` on the active item, `-1` on the rest
pub(crate) fn set_roving(doc: &mut Document, items: &[NodeId], active: usize) -> DomResult<()> {
    for (i, &item) in items.iter().enumerate() {
        doc.set_attribute(item, "tabindex", if i == active { "0" } else { "-1" })?;
    }
    Ok(())
}

/// Step through `len` items with wrap-around
pub(crate) fn wrap_step(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

/// The element's id, assigning `fallback` when it has none
pub(crate) fn ensure_id(doc: &mut Document, node: NodeId, fallback: &str) -> DomResult<String> {
    if let Some(id) = doc.get_attribute(node, "id").filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }
    doc.set_attribute(node, "id", fallback)?;
    Ok(fallback.to_string())
}

/// `m:ss` for a position in seconds
pub(crate) fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_step() {
        assert_eq!(wrap_step(2, 3, true), 0);
        assert_eq!(wrap_step(0, 3, false), 2);
        assert_eq!(wrap_step(0, 0, true), 0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(65.4), "1:05");
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }
}
