//! DOM Events
//!
//! Mutation records produced by document changes. Assistive technology
//! reacts to these, so live-region behaviour is checked against them.

use crate::NodeId;

/// Kind of mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEventType {
    DOMNodeInserted,
    DOMNodeRemoved,
    DOMAttrModified,
    DOMCharacterDataModified,
}

/// One recorded mutation. `related_node` is the parent for insertions and
/// removals; the value fields are set for attribute and text changes.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub event_type: DomEventType,
    pub target: NodeId,
    pub related_node: Option<NodeId>,
    pub prev_value: Option<String>,
    pub new_value: Option<String>,
    pub attr_name: Option<String>,
}

impl DomEvent {
    fn new(event_type: DomEventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            related_node: None,
            prev_value: None,
            new_value: None,
            attr_name: None,
        }
    }

    pub fn node_inserted(target: NodeId, parent: NodeId) -> Self {
        Self {
            related_node: Some(parent),
            ..Self::new(DomEventType::DOMNodeInserted, target)
        }
    }

    pub fn node_removed(target: NodeId, parent: NodeId) -> Self {
        Self {
            related_node: Some(parent),
            ..Self::new(DomEventType::DOMNodeRemoved, target)
        }
    }

    /// Attribute set (`new_value` is `Some`) or removed (`None`). Names are
    /// stored lowercased.
    pub fn attr_modified(target: NodeId, name: &str, old_value: Option<&str>, new_value: Option<&str>) -> Self {
        Self {
            prev_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
            attr_name: Some(name.to_ascii_lowercase()),
            ..Self::new(DomEventType::DOMAttrModified, target)
        }
    }

    pub fn char_data_modified(target: NodeId, old_value: &str, new_value: &str) -> Self {
        Self {
            prev_value: Some(old_value.to_string()),
            new_value: Some(new_value.to_string()),
            ..Self::new(DomEventType::DOMCharacterDataModified, target)
        }
    }

    /// Text written by a character data event
    pub fn text(&self) -> Option<&str> {
        match self.event_type {
            DomEventType::DOMCharacterDataModified => self.new_value.as_deref(),
            _ => None,
        }
    }

    /// Whether this event wrote exactly `text`. Screen readers speak a live
    /// region once per such write, even when the text did not change.
    pub fn wrote_text(&self, text: &str) -> bool {
        self.text() == Some(text)
    }

    /// Whether this event changed attribute `name` (case-insensitive)
    pub fn touches_attribute(&self, name: &str) -> bool {
        self.event_type == DomEventType::DOMAttrModified
            && self.attr_name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name))
    }

    /// Whether this event inserted or removed a node
    pub fn is_structural(&self) -> bool {
        matches!(
            self.event_type,
            DomEventType::DOMNodeInserted | DomEventType::DOMNodeRemoved
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_inserted_event() {
        let event = DomEvent::node_inserted(NodeId(5), NodeId(1));

        assert_eq!(event.event_type, DomEventType::DOMNodeInserted);
        assert_eq!(event.target, NodeId(5));
        assert_eq!(event.related_node, Some(NodeId(1)));
        assert!(event.is_structural());
        assert_eq!(event.text(), None);
    }

    #[test]
    fn test_attr_modified_event() {
        let event = DomEvent::attr_modified(NodeId(1), "aria-live", Some("polite"), Some("assertive"));

        assert_eq!(event.attr_name.as_deref(), Some("aria-live"));
        assert_eq!(event.prev_value.as_deref(), Some("polite"));
        assert_eq!(event.new_value.as_deref(), Some("assertive"));
        assert!(event.touches_attribute("ARIA-LIVE"));
        assert!(!event.touches_attribute("aria-atomic"));
        assert!(!event.is_structural());
    }

    #[test]
    fn test_char_data_text() {
        let event = DomEvent::char_data_modified(NodeId(2), "", "Saved");
        assert!(event.wrote_text("Saved"));
        assert!(!event.wrote_text(""));
        assert!(!DomEvent::attr_modified(NodeId(2), "title", None, Some("Saved")).wrote_text("Saved"));
    }
}
