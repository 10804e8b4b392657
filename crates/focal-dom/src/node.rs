//! DOM Node
//!
//! Nodes link to each other through `NodeId` indices into the tree arena
//! instead of pointers.

use crate::{NamedNodeMap, NodeId};

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    pub attrs: NamedNodeMap,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: NamedNodeMap::new(),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").filter(|id| !id.is_empty())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attrs.tokens("class").any(|c| c == class)
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Parsed `tabindex`, `None` when absent or not an integer
    pub fn tab_index(&self) -> Option<i32> {
        self.attrs.get("tabindex")?.trim().parse().ok()
    }

    /// `input`'s type keyword, lowercased, defaulting to `text`
    pub fn input_type(&self) -> Option<String> {
        if !self.is("input") {
            return None;
        }
        Some(
            self.attrs
                .get("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string()),
        )
    }

    /// Controls that honour the `disabled` attribute
    pub fn is_form_control(&self) -> bool {
        matches!(
            self.tag.as_str(),
            "button" | "input" | "select" | "textarea" | "option" | "fieldset"
        )
    }

    pub fn is_disabled(&self) -> bool {
        self.is_form_control() && self.has_attr("disabled")
    }

    pub fn is_content_editable(&self) -> bool {
        match self.attrs.get("contenteditable") {
            Some(v) => !v.trim().eq_ignore_ascii_case("false"),
            None => false,
        }
    }

    /// Elements the platform makes focusable without a tabindex
    pub fn is_natively_focusable(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        match self.tag.as_str() {
            "button" | "select" | "textarea" => true,
            "input" => self.input_type().as_deref() != Some("hidden"),
            "a" | "area" => self.has_attr("href"),
            _ => self.is_content_editable(),
        }
    }

    /// Text-entry controls whose value can be selected
    pub fn is_text_field(&self) -> bool {
        match self.input_type().as_deref() {
            Some("text" | "search" | "email" | "url" | "tel" | "password" | "number") => true,
            Some(_) => false,
            None => self.is("textarea"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut e = ElementData::new(tag);
        for (k, v) in attrs {
            e.attrs.set(k, v);
        }
        e
    }

    #[test]
    fn test_tab_index_parse() {
        assert_eq!(element("div", &[("tabindex", "0")]).tab_index(), Some(0));
        assert_eq!(element("div", &[("tabindex", " -1 ")]).tab_index(), Some(-1));
        assert_eq!(element("div", &[("tabindex", "abc")]).tab_index(), None);
        assert_eq!(element("div", &[]).tab_index(), None);
    }

    #[test]
    fn test_native_focusability() {
        assert!(element("button", &[]).is_natively_focusable());
        assert!(!element("button", &[("disabled", "")]).is_natively_focusable());
        assert!(element("input", &[]).is_natively_focusable());
        assert!(!element("input", &[("type", "hidden")]).is_natively_focusable());
        assert!(element("a", &[("href", "#")]).is_natively_focusable());
        assert!(!element("a", &[]).is_natively_focusable());
        assert!(element("div", &[("contenteditable", "")]).is_natively_focusable());
        assert!(!element("div", &[("contenteditable", "false")]).is_natively_focusable());
        assert!(!element("div", &[]).is_natively_focusable());
    }

    #[test]
    fn test_text_field() {
        assert!(element("input", &[]).is_text_field());
        assert!(element("input", &[("type", "EMAIL")]).is_text_field());
        assert!(!element("input", &[("type", "checkbox")]).is_text_field());
        assert!(element("textarea", &[]).is_text_field());
        assert!(!element("div", &[]).is_text_field());
    }
}
