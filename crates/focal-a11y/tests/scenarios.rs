//! End-to-end scenarios for focal-a11y
//!
//! A storefront page with skip links, a confirmation modal and a nested
//! dropdown, driven through the provider the way an application would.

use std::time::Duration;

use focal_a11y::widgets::{Dropdown, Modal};
use focal_a11y::{
    A11yConfig, A11yContext, A11yError, AccessibilityProvider, KeyHandling, Politeness, RestoreOptions,
    RouteChange, TrapOptions,
};
use focal_dom::{Document, FocusOptions, KeyboardEvent, NamedKey, NodeId};

struct Storefront {
    doc: Document,
    provider: AccessibilityProvider,
    opener: NodeId,
    main: NodeId,
    dialog: NodeId,
    heading: NodeId,
    buttons: Vec<NodeId>,
}

fn storefront() -> Storefront {
    let mut doc = Document::new("https://store.example/cart");
    let body = doc.body();
    let header = doc.create_element("header");
    let nav = doc.create_element_with("nav", &[("id", "main-navigation")], None);
    let shop = doc.create_element_with("a", &[("href", "/shop")], Some("Shop"));
    let main = doc.create_element_with("main", &[("id", "main-content")], None);
    let opener = doc.create_element_with("button", &[], Some("Clear cart"));
    let dialog = doc.create_element("div");
    let heading = doc.create_element_with("h2", &[], Some("Clear cart"));
    doc.append_child(body, header).unwrap();
    doc.append_child(header, nav).unwrap();
    doc.append_child(nav, shop).unwrap();
    doc.append_child(body, main).unwrap();
    doc.append_child(main, opener).unwrap();
    doc.append_child(body, dialog).unwrap();
    doc.append_child(dialog, heading).unwrap();
    let buttons = ["Cancel", "Details", "Confirm"]
        .iter()
        .map(|label| {
            let b = doc.create_element_with("button", &[], Some(label));
            doc.append_child(dialog, b).unwrap();
            b
        })
        .collect();

    let provider = AccessibilityProvider::mount(&mut doc, A11yConfig::default()).unwrap();
    Storefront { doc, provider, opener, main, dialog, heading, buttons }
}

fn key(named: NamedKey) -> KeyboardEvent {
    KeyboardEvent::named(named)
}

#[test]
fn test_modal_scenario() {
    let mut s = storefront();
    let mut modal = Modal::new(&mut s.doc, s.dialog, s.heading).unwrap();
    s.doc.focus(s.opener, FocusOptions::default());

    modal.open(&mut s.doc, s.provider.focus_manager(), Some(s.opener)).unwrap();
    assert_eq!(s.doc.active_element(), s.buttons[0]);

    let mut back = key(NamedKey::Tab).with_shift();
    let handling = s.provider.dispatch_keydown(&mut s.doc, &mut back);
    assert_eq!(handling, KeyHandling::Moved(s.buttons[2]));
    assert!(back.is_default_prevented());

    let mut forward = key(NamedKey::Tab);
    s.provider.dispatch_keydown(&mut s.doc, &mut forward);
    assert_eq!(s.doc.active_element(), s.buttons[0]);

    let mut esc = key(NamedKey::Escape);
    let handling = modal.handle_keydown(&mut s.doc, s.provider.focus_manager(), &mut esc).unwrap();
    assert_eq!(handling, KeyHandling::Deactivated);
    assert_eq!(s.doc.active_element(), s.opener);
    assert_eq!(s.provider.focus_manager().trap_depth(), 0);
}

#[test]
fn test_skip_link_scenario() {
    let mut s = storefront();
    let anchor = s.provider.skip_links().anchors()[0];
    assert_eq!(s.doc.text_content(anchor), "Skip to main content");

    // The skip links come first in the tab order.
    let mut tab = key(NamedKey::Tab);
    s.provider.dispatch_keydown(&mut s.doc, &mut tab);
    assert_eq!(s.doc.active_element(), anchor);

    let mut enter = key(NamedKey::Enter);
    s.provider.dispatch_keydown(&mut s.doc, &mut enter);
    assert!(enter.is_default_prevented());
    assert_eq!(s.doc.active_element(), s.main);
    assert_eq!(s.doc.get_attribute(s.main, "tabindex"), Some("-1"));
    assert_eq!(s.doc.scroll_log().last(), Some(&s.main));

    s.provider.tick(&mut s.doc, Duration::from_millis(100));
    assert!(!s.doc.has_attribute(s.main, "tabindex"));
    assert!(!s.doc.is_focusable(s.main));
}

#[test]
fn test_skip_link_grant_released_on_unmount() {
    let mut s = storefront();
    assert!(s.provider.skip_links().activate(&mut s.doc, "main-content"));
    assert!(s.doc.has_attribute(s.main, "tabindex"));
    s.provider.unmount(&mut s.doc).unwrap();
    assert!(!s.doc.has_attribute(s.main, "tabindex"));
}

#[test]
fn test_announce_twice_gives_two_mutations() {
    let mut s = storefront();
    s.doc.observe_mutations(true);
    let manager = s.provider.focus_manager();
    manager.announce(&mut s.doc, "Item added to cart", Politeness::Polite);
    manager.announce(&mut s.doc, "Item added to cart", Politeness::Polite);
    let writes = s
        .doc
        .mutations()
        .iter()
        .filter(|m| m.wrote_text("Item added to cart"))
        .count();
    assert_eq!(writes, 2);
}

#[test]
fn test_save_restore_round_trip() {
    let mut s = storefront();
    s.doc.focus(s.opener, FocusOptions::default());
    let manager = s.provider.focus_manager();
    manager.save_focus(&s.doc);
    s.doc.blur();
    assert!(manager.restore_focus(&mut s.doc, RestoreOptions::default()));
    assert_eq!(s.doc.active_element(), s.opener);
}

#[test]
fn test_nested_traps() {
    let mut s = storefront();
    let body = s.doc.body();
    let picker = s.doc.create_element_with("button", &[], Some("Reason"));
    let list = s.doc.create_element("ul");
    s.doc.append_child(s.dialog, picker).unwrap();
    s.doc.append_child(s.dialog, list).unwrap();
    for reason in ["Changed my mind", "Found it cheaper"] {
        let li = s.doc.create_element_with("li", &[], Some(reason));
        s.doc.append_child(list, li).unwrap();
    }
    let mut modal = Modal::new(&mut s.doc, s.dialog, s.heading).unwrap();
    let mut dropdown = Dropdown::new(&mut s.doc, picker, list).unwrap();
    assert!(s.doc.is_connected(body));

    s.doc.focus(s.opener, FocusOptions::default());
    modal.open(&mut s.doc, s.provider.focus_manager(), Some(s.opener)).unwrap();
    let outer = s.provider.focus_manager().top_trap().unwrap();
    s.doc.focus(picker, FocusOptions::default());
    dropdown.open(&mut s.doc, s.provider.focus_manager()).unwrap();
    let inner = s.provider.focus_manager().top_trap().unwrap();
    assert_ne!(outer, inner);

    // Only the innermost trap sees Tab.
    let first_option = dropdown.options()[0];
    let mut tab = key(NamedKey::Tab);
    assert_eq!(
        s.provider.dispatch_keydown(&mut s.doc, &mut tab),
        KeyHandling::Moved(first_option)
    );

    // Escape goes to the dropdown while the modal stays open.
    let mut esc = key(NamedKey::Escape);
    let handling = modal.handle_keydown(&mut s.doc, s.provider.focus_manager(), &mut esc).unwrap();
    assert_eq!(handling, KeyHandling::PassThrough);

    let manager = s.provider.focus_manager();
    assert!(matches!(
        manager.deactivate_trap(&mut s.doc, outer),
        Err(A11yError::TrapNotOnTop { trap, top }) if trap == outer && top == inner
    ));

    dropdown.handle_keydown(&mut s.doc, manager, &mut esc).unwrap();
    assert_eq!(s.doc.active_element(), picker);
    modal.close(&mut s.doc, manager).unwrap();
    assert_eq!(s.doc.active_element(), s.opener);
}

#[test]
fn test_missing_provider() {
    let mut context = A11yContext::new();
    assert!(matches!(context.focus_manager(), Err(A11yError::MissingProvider)));

    let mut doc = Document::default();
    let body = doc.body();
    context.mount(&mut doc, A11yConfig::default()).unwrap();
    let manager = context.focus_manager().unwrap();
    manager.activate_trap(&mut doc, body, TrapOptions::default());
    context.unmount(&mut doc).unwrap();
    assert!(matches!(context.focus_manager(), Err(A11yError::MissingProvider)));
}

#[test]
fn test_focus_first_error_without_errors() {
    let mut s = storefront();
    s.doc.focus(s.opener, FocusOptions::default());
    assert!(!s.provider.focus_manager().focus_first_error(&mut s.doc, Some(s.main)));
    assert_eq!(s.doc.active_element(), s.opener);
}

#[test]
fn test_route_change_resets_stack_and_traps() {
    let mut s = storefront();
    let mut modal = Modal::new(&mut s.doc, s.dialog, s.heading).unwrap();
    s.doc.focus(s.opener, FocusOptions::default());
    s.provider.focus_manager().save_focus(&s.doc);
    modal.open(&mut s.doc, s.provider.focus_manager(), None).unwrap();

    assert!(s.provider.on_route_change(&mut s.doc, &RouteChange::new("/checkout", "Checkout")));
    let manager = s.provider.focus_manager();
    assert_eq!(manager.stack_depth(), 0);
    assert_eq!(manager.trap_depth(), 0);
    assert_eq!(manager.announcement(&s.doc), "Navigated to Checkout");
    assert_eq!(s.doc.active_element(), s.main);
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("focal-a11y-{}.toml", std::process::id()));
    let config = A11yConfig {
        announce_clear_delay_ms: 1500,
        ..Default::default()
    };
    config.save_to_file(&path).unwrap();
    let loaded = A11yConfig::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, config);

    assert!(matches!(
        A11yConfig::from_toml_str("announce_clear_delay_ms = 0"),
        Err(focal_a11y::ConfigError::Invalid(_))
    ));
}
