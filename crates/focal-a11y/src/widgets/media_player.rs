//! Media player controls

use focal_dom::{Document, DomResult, KeyboardEvent, NamedKey, NodeId};

use super::format_time;
use crate::aria::set_bool;
use crate::focus_trap::{KeyHandling, TrapId, TrapOptions};
use crate::manager::FocusManager;
use crate::{A11yResult, Politeness};

/// Seek step for the arrow keys, in seconds
pub const SEEK_STEP: f64 = 5.0;
/// Volume step for the arrow keys, in percent
pub const VOLUME_STEP: u32 = 10;

#[derive(Debug)]
pub struct MediaPlayer {
    root: NodeId,
    play_button: NodeId,
    mute_button: NodeId,
    fullscreen_button: NodeId,
    seek_slider: NodeId,
    volume_slider: NodeId,
    duration: f64,
    position: f64,
    volume: u32,
    muted: bool,
    playing: bool,
    fullscreen: Option<TrapId>,
}

impl MediaPlayer {
    /// Build player controls under `parent` for media `duration` seconds long
    pub fn mount(doc: &mut Document, parent: NodeId, label: &str, duration: f64) -> DomResult<Self> {
        let duration = duration.max(0.0);
        let root = doc.create_element_with("div", &[("role", "region"), ("aria-label", label)], None);
        let play_button = doc.create_element_with("button", &[("aria-pressed", "false")], Some("Play"));
        let seek_slider = doc.create_element_with(
            "div",
            &[("role", "slider"), ("tabindex", "0"), ("aria-label", "Seek"), ("aria-valuemin", "0")],
            None,
        );
        let volume_slider = doc.create_element_with(
            "div",
            &[
                ("role", "slider"),
                ("tabindex", "0"),
                ("aria-label", "Volume"),
                ("aria-valuemin", "0"),
                ("aria-valuemax", "100"),
            ],
            None,
        );
        let mute_button = doc.create_element_with("button", &[("aria-pressed", "false")], Some("Mute"));
        let fullscreen_button = doc.create_element_with("button", &[("aria-pressed", "false")], Some("Fullscreen"));
        for node in [play_button, seek_slider, volume_slider, mute_button, fullscreen_button] {
            doc.append_child(root, node)?;
        }
        doc.set_attribute(seek_slider, "aria-valuemax", &format!("{}", duration.floor() as u64))?;
        doc.append_child(parent, root)?;

        let player = Self {
            root,
            play_button,
            mute_button,
            fullscreen_button,
            seek_slider,
            volume_slider,
            duration,
            position: 0.0,
            volume: 100,
            muted: false,
            playing: false,
            fullscreen: None,
        };
        player.sync_seek(doc)?;
        player.sync_volume(doc)?;
        Ok(player)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn play_button(&self) -> NodeId {
        self.play_button
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_some()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Volume in `0.0..=1.0`
    pub fn volume(&self) -> f64 {
        f64::from(self.volume) / 100.0
    }

    fn sync_seek(&self, doc: &mut Document) -> DomResult<()> {
        let now = self.position.floor() as u64;
        doc.set_attribute(self.seek_slider, "aria-valuenow", &now.to_string())?;
        let text = format!("{} of {}", format_time(self.position), format_time(self.duration));
        doc.set_attribute(self.seek_slider, "aria-valuetext", &text)
    }

    fn sync_volume(&self, doc: &mut Document) -> DomResult<()> {
        doc.set_attribute(self.volume_slider, "aria-valuenow", &self.volume.to_string())?;
        doc.set_attribute(self.volume_slider, "aria-valuetext", &format!("{}%", self.volume))
    }

    pub fn toggle_play(&mut self, doc: &mut Document, manager: &mut FocusManager) -> DomResult<()> {
        self.playing = !self.playing;
        set_bool(doc, self.play_button, "aria-pressed", self.playing)?;
        doc.set_text_content(self.play_button, if self.playing { "Pause" } else { "Play" })?;
        let message = if self.playing { "Playing" } else { "Paused" };
        manager.announce(doc, message, Politeness::Polite);
        Ok(())
    }

    /// Seek by `delta` seconds, clamped to the media
    pub fn seek_by(&mut self, doc: &mut Document, manager: &mut FocusManager, delta: f64) -> DomResult<()> {
        self.position = (self.position + delta).clamp(0.0, self.duration);
        self.sync_seek(doc)?;
        let message = format!("Seeked to {}", format_time(self.position));
        manager.announce(doc, &message, Politeness::Polite);
        Ok(())
    }

    /// Change volume by `delta` percent, clamped to `0..=100`
    pub fn change_volume(&mut self, doc: &mut Document, manager: &mut FocusManager, delta: i32) -> DomResult<()> {
        self.volume = self.volume.saturating_add_signed(delta).min(100);
        self.sync_volume(doc)?;
        manager.announce(doc, &format!("Volume {}%", self.volume), Politeness::Polite);
        Ok(())
    }

    pub fn toggle_mute(&mut self, doc: &mut Document, manager: &mut FocusManager) -> DomResult<()> {
        self.muted = !self.muted;
        set_bool(doc, self.mute_button, "aria-pressed", self.muted)?;
        doc.set_text_content(self.mute_button, if self.muted { "Unmute" } else { "Mute" })?;
        let message = if self.muted { "Muted" } else { "Unmuted" };
        manager.announce(doc, message, Politeness::Polite);
        Ok(())
    }

    /// Enter or leave fullscreen. Fullscreen traps focus in the player.
    pub fn toggle_fullscreen(&mut self, doc: &mut Document, manager: &mut FocusManager) -> A11yResult<()> {
        match self.fullscreen {
            Some(trap) => {
                manager.deactivate_trap(doc, trap)?;
                self.fullscreen = None;
            }
            None => {
                let options = TrapOptions::default().escape_deactivates(false);
                self.fullscreen = Some(manager.activate_trap(doc, self.root, options));
            }
        }
        let on = self.fullscreen.is_some();
        set_bool(doc, self.fullscreen_button, "aria-pressed", on)?;
        let message = if on { "Fullscreen on" } else { "Fullscreen off" };
        manager.announce(doc, message, Politeness::Polite);
        Ok(())
    }

    /// Player shortcuts while focus is inside the player
    pub fn handle_keydown(
        &mut self,
        doc: &mut Document,
        manager: &mut FocusManager,
        event: &mut KeyboardEvent,
    ) -> A11yResult<KeyHandling> {
        let focus = event.target.unwrap_or_else(|| doc.active_element());
        if !doc.tree().contains(self.root, focus) {
            return Ok(KeyHandling::PassThrough);
        }
        if event.is(NamedKey::Tab) {
            // Only the player's own fullscreen trap confines Tab.
            if self.fullscreen.is_some() && self.fullscreen == manager.top_trap() {
                return Ok(manager.handle_keydown(doc, event));
            }
            return Ok(KeyHandling::PassThrough);
        }

        let key = event.printable().map(str::to_lowercase);
        match key.as_deref() {
            Some("k") => self.toggle_play(doc, manager)?,
            Some("m") => self.toggle_mute(doc, manager)?,
            Some("f") => self.toggle_fullscreen(doc, manager)?,
            _ if event.is_space() => {
                // Space on a button activates the button itself.
                if doc.tree().tag_name(focus) == Some("button") {
                    return Ok(KeyHandling::PassThrough);
                }
                self.toggle_play(doc, manager)?;
            }
            _ if event.is(NamedKey::ArrowLeft) => self.seek_by(doc, manager, -SEEK_STEP)?,
            _ if event.is(NamedKey::ArrowRight) => self.seek_by(doc, manager, SEEK_STEP)?,
            _ if event.is(NamedKey::ArrowUp) => self.change_volume(doc, manager, VOLUME_STEP as i32)?,
            _ if event.is(NamedKey::ArrowDown) => self.change_volume(doc, manager, -(VOLUME_STEP as i32))?,
            _ if event.is(NamedKey::Escape) && self.is_fullscreen() => self.toggle_fullscreen(doc, manager)?,
            _ => return Ok(KeyHandling::PassThrough),
        }
        event.prevent_default();
        Ok(KeyHandling::Swallowed)
    }
}
