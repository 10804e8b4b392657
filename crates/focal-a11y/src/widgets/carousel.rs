//! Carousel with optional auto-rotation

use std::time::Duration;

use focal_dom::{Document, DomResult, KeyboardEvent, NamedKey, NodeId};

use super::wrap_step;
use crate::focus_trap::KeyHandling;
use crate::manager::FocusManager;
use crate::scheduler::{Scheduler, TimerId};
use crate::Politeness;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarouselTask {
    Rotate,
}

#[derive(Debug)]
pub struct Carousel {
    root: NodeId,
    viewport: NodeId,
    slides: Vec<NodeId>,
    labels: Vec<String>,
    current: usize,
    prev_button: NodeId,
    next_button: NodeId,
    rotation_button: NodeId,
    interval: Duration,
    rotating: bool,
    timers: Scheduler<CarouselTask>,
    rotation_timer: Option<TimerId>,
}

impl Carousel {
    /// Build a carousel under `parent` with one slide per label
    pub fn mount(
        doc: &mut Document,
        parent: NodeId,
        label: &str,
        slides: &[&str],
        interval: Duration,
    ) -> DomResult<Self> {
        let root = doc.create_element_with(
            "section",
            &[("aria-roledescription", "carousel"), ("aria-label", label)],
            None,
        );
        let rotation_button = doc.create_element_with("button", &[], Some("Start slide rotation"));
        let prev_button = doc.create_element_with("button", &[("aria-label", "Previous slide")], None);
        let next_button = doc.create_element_with("button", &[("aria-label", "Next slide")], None);
        let viewport = doc.create_element_with("div", &[("aria-live", "polite"), ("aria-atomic", "false")], None);
        for node in [rotation_button, prev_button, next_button, viewport] {
            doc.append_child(root, node)?;
        }

        let total = slides.len();
        let mut nodes = Vec::with_capacity(total);
        for (i, text) in slides.iter().enumerate() {
            let position = format!("{} of {}", i + 1, total);
            let slide = doc.create_element_with(
                "div",
                &[("role", "group"), ("aria-roledescription", "slide"), ("aria-label", position.as_str())],
                Some(*text),
            );
            doc.toggle_attribute(slide, "hidden", i != 0)?;
            doc.append_child(viewport, slide)?;
            nodes.push(slide);
        }
        doc.append_child(parent, root)?;

        Ok(Self {
            root,
            viewport,
            slides: nodes,
            labels: slides.iter().map(|s| s.to_string()).collect(),
            current: 0,
            prev_button,
            next_button,
            rotation_button,
            interval,
            rotating: false,
            timers: Scheduler::new(),
            rotation_timer: None,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slides(&self) -> &[NodeId] {
        &self.slides
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn buttons(&self) -> (NodeId, NodeId, NodeId) {
        (self.prev_button, self.next_button, self.rotation_button)
    }

    fn show(&mut self, doc: &mut Document, index: usize) -> DomResult<()> {
        self.current = index;
        for (i, &slide) in self.slides.iter().enumerate() {
            doc.toggle_attribute(slide, "hidden", i != index)?;
        }
        Ok(())
    }

    /// Show a slide and announce it
    pub fn go_to(&mut self, doc: &mut Document, manager: &mut FocusManager, index: usize) -> DomResult<()> {
        if index >= self.slides.len() {
            return Ok(());
        }
        self.show(doc, index)?;
        let message = format!("Slide {} of {}: {}", index + 1, self.slides.len(), self.labels[index]);
        manager.announce(doc, &message, Politeness::Polite);
        Ok(())
    }

    pub fn next(&mut self, doc: &mut Document, manager: &mut FocusManager) -> DomResult<()> {
        self.go_to(doc, manager, wrap_step(self.current, self.slides.len(), true))
    }

    pub fn previous(&mut self, doc: &mut Document, manager: &mut FocusManager) -> DomResult<()> {
        self.go_to(doc, manager, wrap_step(self.current, self.slides.len(), false))
    }

    /// Start auto-rotation. The viewport stops announcing while rotating.
    pub fn play(&mut self, doc: &mut Document) -> DomResult<()> {
        if self.rotating || self.slides.len() < 2 || self.interval.is_zero() {
            return Ok(());
        }
        self.rotating = true;
        doc.set_attribute(self.viewport, "aria-live", Politeness::Off.as_str())?;
        doc.set_text_content(self.rotation_button, "Stop slide rotation")?;
        self.rotation_timer = Some(self.timers.schedule(self.interval, CarouselTask::Rotate));
        Ok(())
    }

    pub fn pause(&mut self, doc: &mut Document) -> DomResult<()> {
        if !self.rotating {
            return Ok(());
        }
        self.rotating = false;
        if let Some(timer) = self.rotation_timer.take() {
            self.timers.cancel(timer);
        }
        doc.set_attribute(self.viewport, "aria-live", Politeness::Polite.as_str())?;
        doc.set_text_content(self.rotation_button, "Start slide rotation")
    }

    /// Advance the rotation clock. Rotated slides are not announced.
    pub fn tick(&mut self, doc: &mut Document, elapsed: Duration) -> DomResult<()> {
        let until = self.timers.now() + elapsed;
        while let Some(task) = self.timers.next_due(until) {
            match task {
                CarouselTask::Rotate => {
                    let next = wrap_step(self.current, self.slides.len(), true);
                    self.show(doc, next)?;
                    self.rotation_timer = Some(self.timers.schedule(self.interval, CarouselTask::Rotate));
                }
            }
        }
        Ok(())
    }

    /// Previous/next/rotation buttons. User navigation stops rotation.
    pub fn handle_click(&mut self, doc: &mut Document, manager: &mut FocusManager, target: NodeId) -> DomResult<bool> {
        if target == self.rotation_button {
            if self.rotating {
                self.pause(doc)?;
            } else {
                self.play(doc)?;
            }
        } else if target == self.prev_button {
            self.pause(doc)?;
            self.previous(doc, manager)?;
        } else if target == self.next_button {
            self.pause(doc)?;
            self.next(doc, manager)?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    pub fn handle_keydown(
        &mut self,
        doc: &mut Document,
        manager: &mut FocusManager,
        event: &mut KeyboardEvent,
    ) -> DomResult<KeyHandling> {
        let last = self.slides.len().saturating_sub(1);
        let target = if event.is(NamedKey::ArrowRight) {
            wrap_step(self.current, self.slides.len(), true)
        } else if event.is(NamedKey::ArrowLeft) {
            wrap_step(self.current, self.slides.len(), false)
        } else if event.is(NamedKey::Home) {
            0
        } else if event.is(NamedKey::End) {
            last
        } else {
            return Ok(KeyHandling::PassThrough);
        };
        event.prevent_default();
        self.pause(doc)?;
        self.go_to(doc, manager, target)?;
        Ok(KeyHandling::Swallowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::A11yConfig;

    const SECOND: Duration = Duration::from_secs(1);

    fn setup() -> (Document, FocusManager, Carousel) {
        let mut doc = Document::default();
        let body = doc.body();
        let manager = FocusManager::mount(&mut doc, A11yConfig::default()).unwrap();
        let carousel = Carousel::mount(
            &mut doc,
            body,
            "Featured products",
            &["Protein bundle", "Vitamin pack", "Starter kit"],
            5 * SECOND,
        )
        .unwrap();
        (doc, manager, carousel)
    }

    fn visible(doc: &Document, carousel: &Carousel) -> Vec<usize> {
        (0..carousel.slides().len())
            .filter(|&i| !doc.has_attribute(carousel.slides()[i], "hidden"))
            .collect()
    }

    #[test]
    fn test_slide_markup() {
        let (doc, _, carousel) = setup();
        let slide = carousel.slides()[1];
        assert_eq!(doc.get_attribute(slide, "role"), Some("group"));
        assert_eq!(doc.get_attribute(slide, "aria-roledescription"), Some("slide"));
        assert_eq!(doc.get_attribute(slide, "aria-label"), Some("2 of 3"));
        assert_eq!(visible(&doc, &carousel), [0]);
    }

    #[test]
    fn test_keyboard_wraps_and_announces() {
        let (mut doc, mut manager, mut carousel) = setup();
        let mut left = KeyboardEvent::named(NamedKey::ArrowLeft);
        carousel.handle_keydown(&mut doc, &mut manager, &mut left).unwrap();
        assert!(left.is_default_prevented());
        assert_eq!(carousel.current(), 2);
        assert_eq!(visible(&doc, &carousel), [2]);
        assert_eq!(manager.announcement(&doc), "Slide 3 of 3: Starter kit");

        let mut right = KeyboardEvent::named(NamedKey::ArrowRight);
        carousel.handle_keydown(&mut doc, &mut manager, &mut right).unwrap();
        assert_eq!(carousel.current(), 0);

        let mut end = KeyboardEvent::named(NamedKey::End);
        carousel.handle_keydown(&mut doc, &mut manager, &mut end).unwrap();
        assert_eq!(carousel.current(), 2);
    }

    #[test]
    fn test_buttons() {
        let (mut doc, mut manager, mut carousel) = setup();
        let (prev, next, _) = carousel.buttons();
        assert!(carousel.handle_click(&mut doc, &mut manager, next).unwrap());
        assert_eq!(manager.announcement(&doc), "Slide 2 of 3: Vitamin pack");
        assert!(carousel.handle_click(&mut doc, &mut manager, prev).unwrap());
        assert_eq!(carousel.current(), 0);
        assert!(!carousel.handle_click(&mut doc, &mut manager, carousel.root()).unwrap());
    }

    #[test]
    fn test_rotation_and_live_politeness() {
        let (mut doc, mut manager, mut carousel) = setup();
        let (_, _, toggle) = carousel.buttons();
        carousel.handle_click(&mut doc, &mut manager, toggle).unwrap();
        assert!(carousel.is_rotating());
        assert_eq!(doc.get_attribute(carousel.viewport, "aria-live"), Some("off"));

        carousel.tick(&mut doc, 5 * SECOND).unwrap();
        assert_eq!(carousel.current(), 1);
        carousel.tick(&mut doc, 5 * SECOND).unwrap();
        assert_eq!(carousel.current(), 2);
        assert_eq!(manager.announcement(&doc), "");

        let mut home = KeyboardEvent::named(NamedKey::Home);
        carousel.handle_keydown(&mut doc, &mut manager, &mut home).unwrap();
        assert!(!carousel.is_rotating());
        assert_eq!(doc.get_attribute(carousel.viewport, "aria-live"), Some("polite"));
        carousel.tick(&mut doc, 10 * SECOND).unwrap();
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn test_long_tick_rotates_every_interval() {
        let (mut doc, _, mut carousel) = setup();
        carousel.play(&mut doc).unwrap();
        carousel.tick(&mut doc, 10 * SECOND).unwrap();
        assert_eq!(carousel.current(), 2);
        assert_eq!(visible(&doc, &carousel), [2]);
        carousel.tick(&mut doc, 7 * SECOND).unwrap();
        assert_eq!(carousel.current(), 0);
        carousel.tick(&mut doc, 3 * SECOND).unwrap();
        assert_eq!(carousel.current(), 1);
    }

    #[test]
    fn test_zero_interval_never_rotates() {
        let mut doc = Document::default();
        let body = doc.body();
        let mut carousel = Carousel::mount(&mut doc, body, "Deals", &["One", "Two"], Duration::ZERO).unwrap();
        carousel.play(&mut doc).unwrap();
        assert!(!carousel.is_rotating());
        carousel.tick(&mut doc, SECOND).unwrap();
        assert_eq!(carousel.current(), 0);
    }
}
