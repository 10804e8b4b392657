//! ARIA Support
//!
//! The ARIA values this crate writes, and small helpers for setting them.

use focal_dom::{Document, DomResult, NodeId};
use serde::{Deserialize, Serialize};

/// Live region politeness (`aria-live`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Politeness {
    Off,
    #[default]
    Polite,
    Assertive,
}

impl Politeness {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "polite" => Self::Polite,
            "assertive" => Self::Assertive,
            _ => Self::Off,
        }
    }

    /// Implicit role carrying this politeness
    pub fn role(self) -> Option<&'static str> {
        match self {
            Self::Off => None,
            Self::Polite => Some("status"),
            Self::Assertive => Some("alert"),
        }
    }
}

/// Column sort state (`aria-sort`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AriaSort {
    #[default]
    None,
    Ascending,
    Descending,
}

impl AriaSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// Next state when a sortable header is activated
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::None | Self::Descending => Self::Ascending,
        }
    }
}

/// Write an ARIA boolean (`"true"` / `"false"`)
pub fn set_bool(doc: &mut Document, node: NodeId, name: &str, value: bool) -> DomResult<()> {
    doc.set_attribute(node, name, if value { "true" } else { "false" })
}

pub fn is_true(doc: &Document, node: NodeId, name: &str) -> bool {
    doc.get_attribute(node, name)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Inline style that hides content visually but keeps it in the
/// accessibility tree
pub const VISUALLY_HIDDEN_STYLE: &str = "position: absolute; width: 1px; height: 1px; \
     padding: 0; margin: -1px; overflow: hidden; clip: rect(0, 0, 0, 0); white-space: nowrap; border: 0";

/// Best-effort accessible name: `aria-label`, `aria-labelledby`, an
/// associated `<label for>`, then `name`/`placeholder`/`title`
pub fn accessible_name(doc: &Document, node: NodeId) -> Option<String> {
    let element = doc.element(node)?;
    if let Some(label) = element.get_attr("aria-label").map(str::trim).filter(|l| !l.is_empty()) {
        return Some(label.to_string());
    }
    if let Some(ids) = element.get_attr("aria-labelledby") {
        let text: Vec<String> = ids
            .split_ascii_whitespace()
            .filter_map(|id| doc.get_element_by_id(id))
            .map(|n| doc.text_content(n).trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if !text.is_empty() {
            return Some(text.join(" "));
        }
    }
    if let Some(id) = element.id() {
        let tree = doc.tree();
        let label = tree
            .descendants(tree.root())
            .find(|&l| tree.tag_name(l) == Some("label") && doc.get_attribute(l, "for") == Some(id));
        if let Some(label) = label {
            let text = doc.text_content(label).trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    ["name", "placeholder", "title"]
        .iter()
        .filter_map(|attr| element.get_attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
