//! focal demo - keyboard transcript of a storefront page
//!
//! Usage: `focal-demo [config.toml]`. Set `RUST_LOG=debug` for the
//! focus manager's own tracing output.

use std::time::Duration;

use anyhow::Context;
use focal_a11y::widgets::Modal;
use focal_a11y::{A11yConfig, AccessibilityProvider, RouteChange};
use focal_dom::{Document, KeyboardEvent, NamedKey, NodeId};
use tracing_subscriber::EnvFilter;

struct Page {
    doc: Document,
    opener: NodeId,
    dialog: NodeId,
    heading: NodeId,
}

fn build_page() -> anyhow::Result<Page> {
    let mut doc = Document::new("https://store.example/cart");
    let body = doc.body();
    let nav = doc.create_element_with("nav", &[("id", "main-navigation")], None);
    let shop = doc.create_element_with("a", &[("href", "/shop")], Some("Shop"));
    let main = doc.create_element_with("main", &[("id", "main-content")], None);
    let opener = doc.create_element_with("button", &[], Some("Clear cart"));
    let footer = doc.create_element_with("footer", &[("id", "site-footer")], Some("Store Inc."));
    let dialog = doc.create_element("div");
    let heading = doc.create_element_with("h2", &[], Some("Clear cart"));
    doc.append_child(body, nav)?;
    doc.append_child(nav, shop)?;
    doc.append_child(body, main)?;
    doc.append_child(main, opener)?;
    doc.append_child(body, footer)?;
    doc.append_child(body, dialog)?;
    doc.append_child(dialog, heading)?;
    for label in ["Cancel", "Confirm"] {
        let button = doc.create_element_with("button", &[], Some(label));
        doc.append_child(dialog, button)?;
    }
    Ok(Page { doc, opener, dialog, heading })
}

fn describe(doc: &Document, node: NodeId) -> String {
    let tag = doc.tree().tag_name(node).unwrap_or("#text");
    match doc.get_attribute(node, "id") {
        Some(id) => format!("<{tag}#{id}>"),
        None => format!("<{tag}> \"{}\"", doc.text_content(node)),
    }
}

fn press(provider: &mut AccessibilityProvider, doc: &mut Document, name: &str, mut event: KeyboardEvent) {
    let handling = provider.dispatch_keydown(doc, &mut event);
    println!(
        "{name:<10} -> {:<32} ({handling:?})",
        describe(doc, doc.active_element())
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => A11yConfig::load_from_file(&path).with_context(|| format!("loading {path}"))?,
        None => A11yConfig::default(),
    };

    let Page { mut doc, opener, dialog, heading } = build_page()?;
    let mut provider = AccessibilityProvider::mount(&mut doc, config)?;
    tracing::info!("Mounted on {}", doc.url());

    println!("== skip links");
    press(&mut provider, &mut doc, "Tab", KeyboardEvent::named(NamedKey::Tab));
    press(&mut provider, &mut doc, "Enter", KeyboardEvent::named(NamedKey::Enter));
    provider.tick(&mut doc, Duration::from_millis(100));
    press(&mut provider, &mut doc, "Alt+3", KeyboardEvent::character("3").with_alt());
    println!("announcer: {:?}", provider.focus_manager().announcement(&doc));

    println!("== modal");
    let mut modal = Modal::new(&mut doc, dialog, heading)?;
    doc.focus(opener, Default::default());
    modal.open(&mut doc, provider.focus_manager(), Some(opener))?;
    println!("{:<10} -> {}", "open", describe(&doc, doc.active_element()));
    press(&mut provider, &mut doc, "Shift+Tab", KeyboardEvent::named(NamedKey::Tab).with_shift());
    press(&mut provider, &mut doc, "Tab", KeyboardEvent::named(NamedKey::Tab));
    let mut escape = KeyboardEvent::named(NamedKey::Escape);
    let handling = modal.handle_keydown(&mut doc, provider.focus_manager(), &mut escape)?;
    println!(
        "{:<10} -> {:<32} ({handling:?})",
        "Escape",
        describe(&doc, doc.active_element())
    );
    println!("announcer: {:?}", provider.focus_manager().announcement(&doc));

    println!("== navigation");
    provider.on_route_change(&mut doc, &RouteChange::new("/checkout", "Checkout"));
    println!("{:<10} -> {}", "route", describe(&doc, doc.active_element()));
    println!("announcer: {:?}", provider.focus_manager().announcement(&doc));

    provider.unmount(&mut doc)?;
    Ok(())
}
