//! Focusable-element query
//!
//! The tab sequence inside a container: keyboard-operable descendants in
//! document order. Trap wrap-around depends on "first" and "last" here
//! matching the order Tab visits them.

use focal_dom::{Document, FocusOptions, NodeId};

/// Whether the element takes part in sequential (Tab) navigation
pub fn is_tabbable(doc: &Document, node: NodeId) -> bool {
    let Some(element) = doc.element(node) else {
        return false;
    };
    if element.has_attr("disabled") {
        return false;
    }
    let explicit = element.tab_index();
    if explicit.is_some_and(|t| t < 0) {
        return false;
    }
    if !(element.is_natively_focusable() || explicit.is_some()) {
        return false;
    }
    doc.is_rendered(node)
}

/// Keyboard-operable descendants of `container` in document order.
///
/// The container itself is not included. An empty result means there is
/// nothing to focus; callers treat it as a no-op.
pub fn focusable_elements(doc: &Document, container: NodeId) -> Vec<NodeId> {
    doc.tree()
        .descendants(container)
        .filter(|&n| is_tabbable(doc, n))
        .collect()
}

pub fn first_focusable(doc: &Document, container: NodeId) -> Option<NodeId> {
    doc.tree()
        .descendants(container)
        .find(|&n| is_tabbable(doc, n))
}

pub fn last_focusable(doc: &Document, container: NodeId) -> Option<NodeId> {
    focusable_elements(doc, container).pop()
}

/// The platform's default Tab action: move to the next (or previous)
/// tabbable element in the document, wrapping at the ends.
pub fn move_focus_sequential(doc: &mut Document, forward: bool) -> Option<NodeId> {
    let order = focusable_elements(doc, doc.tree().root());
    if order.is_empty() {
        return None;
    }
    let current = order.iter().position(|&n| n == doc.active_element());
    let target = match (current, forward) {
        (Some(i), true) => order[(i + 1) % order.len()],
        (Some(i), false) => order[(i + order.len() - 1) % order.len()],
        (None, true) => {
            // Continue from the focused node's position in the document.
            let active = doc.active_element();
            order
                .iter()
                .copied()
                .find(|&n| follows(doc, active, n))
                .unwrap_or(order[0])
        }
        (None, false) => order[order.len() - 1],
    };
    doc.focus(target, FocusOptions::default()).then_some(target)
}

/// Whether `candidate` comes after `anchor` in document order
fn follows(doc: &Document, anchor: NodeId, candidate: NodeId) -> bool {
    let mut seen_anchor = false;
    for n in doc.tree().descendants(doc.tree().root()) {
        if n == anchor {
            seen_anchor = true;
        } else if n == candidate {
            return seen_anchor;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let form = doc.create_element("form");
        doc.append_child(body, form).unwrap();
        (doc, form)
    }

    fn add(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let node = doc.create_element_with(tag, attrs, None);
        doc.append_child(parent, node).unwrap();
        node
    }

    #[test]
    fn test_document_order_and_filters() {
        let (mut doc, form) = page();
        let name = add(&mut doc, form, "input", &[]);
        add(&mut doc, form, "input", &[("type", "hidden")]);
        let fieldset = add(&mut doc, form, "div", &[]);
        let select = add(&mut doc, fieldset, "select", &[]);
        add(&mut doc, form, "button", &[("disabled", "")]);
        add(&mut doc, form, "a", &[]);
        let link = add(&mut doc, form, "a", &[("href", "/terms")]);
        add(&mut doc, form, "div", &[("tabindex", "-1")]);
        let card = add(&mut doc, form, "div", &[("tabindex", "0")]);
        let editor = add(&mut doc, form, "div", &[("contenteditable", "true")]);
        add(&mut doc, form, "button", &[("hidden", "")]);
        let submit = add(&mut doc, form, "button", &[]);

        assert_eq!(
            focusable_elements(&doc, form),
            [name, select, link, card, editor, submit]
        );
        assert_eq!(first_focusable(&doc, form), Some(name));
        assert_eq!(last_focusable(&doc, form), Some(submit));
    }

    #[test]
    fn test_empty_container() {
        let (mut doc, form) = page();
        add(&mut doc, form, "p", &[]);
        assert!(focusable_elements(&doc, form).is_empty());
        assert_eq!(first_focusable(&doc, form), None);
    }

    #[test]
    fn test_container_not_included() {
        let (mut doc, form) = page();
        doc.set_attribute(form, "tabindex", "0").unwrap();
        let inner = add(&mut doc, form, "button", &[]);
        assert_eq!(focusable_elements(&doc, form), [inner]);
    }

    #[test]
    fn test_sequential_navigation_wraps() {
        let (mut doc, form) = page();
        let a = add(&mut doc, form, "button", &[]);
        let b = add(&mut doc, form, "button", &[]);

        assert_eq!(move_focus_sequential(&mut doc, true), Some(a));
        assert_eq!(move_focus_sequential(&mut doc, true), Some(b));
        assert_eq!(move_focus_sequential(&mut doc, true), Some(a));
        assert_eq!(move_focus_sequential(&mut doc, false), Some(b));
    }
}
