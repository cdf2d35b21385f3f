// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard controller and key event dispatch.
//!
//! [`KeyboardController`] owns all keyboard state: the [`LayoutSelector`],
//! the PC modifier flags, and the meta mask. Each key code passed to
//! [`KeyboardController::on_key_event`] is processed to completion, and at
//! most one repaint request reaches the host per event.
//!
//! # Dispatch
//!
//! | Key                  | Result                                           |
//! |----------------------|--------------------------------------------------|
//! | Arrow                | key down + up of the direction key, no meta bits |
//! | Cancel / Done        | `request_hide`                                   |
//! | Delete               | key down + up of Backspace                       |
//! | Shift / AltGr / Fn   | layout transition, `apply_variant`               |
//! | PC Alt / Ctrl / Shift| meta bit flipped, `request_redraw`               |
//! | Language             | next language, `apply_variant`                   |
//! | Character, no meta   | `commit_text`                                    |
//! | Character, meta held | key down with the meta mask, or text if unmapped |
//!
//! Uppercase characters sent as key events also carry the Shift bit.

use std::fmt;
use std::rc::Rc;

use crate::config::Config;
use crate::host::KeyboardHost;
use crate::input::keycodes;
use crate::input::{
    classify, Direction, EvdevTable, KeyAction, KeyEvent, KeyTranslator, LayoutToggle, MetaMask,
    Modifier, ModifierIndicator, ModifierState,
};
use crate::layout::{
    ActiveLayout, Language, LayoutRegistry, LayoutSelector, OverlayChange, Variant,
};

/// Drives layout and modifier state from key events.
pub struct KeyboardController<H: KeyboardHost> {
    /// Output side of the controller
    host: H,
    /// Resolves layout resources per language
    registry: LayoutRegistry,
    /// Language a session starts with
    default_language: Language,
    /// Active variant, language and overlay restore target
    selector: LayoutSelector,
    /// PC-style modifier flags
    modifiers: ModifierState,
    /// Physical meta bits for synthesized key events
    meta: MetaMask,
    /// Character to keycode translation used while meta bits are held
    translator: Box<dyn KeyTranslator>,
}

impl<H: KeyboardHost + fmt::Debug> fmt::Debug for KeyboardController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardController")
            .field("host", &self.host)
            .field("selector", &self.selector)
            .field("modifiers", &self.modifiers)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl<H: KeyboardHost> KeyboardController<H> {
    /// Creates a controller showing the lowercase variant of the configured
    /// default language.
    ///
    /// Nothing is sent to the host until [`start`](Self::start) is called.
    pub fn new(host: H, config: &Config) -> Self {
        let registry = LayoutRegistry::from_config(config);
        let selector = LayoutSelector::new(config.default_language, &registry);

        Self {
            host,
            registry,
            default_language: config.default_language,
            selector,
            modifiers: ModifierState::new(),
            meta: MetaMask::empty(),
            translator: Box::new(EvdevTable),
        }
    }

    /// Replaces the character translator.
    #[must_use]
    pub fn with_translator(mut self, translator: Box<dyn KeyTranslator>) -> Self {
        self.translator = translator;
        self
    }

    /// Shows the current variant on the host.
    pub fn start(&mut self) {
        tracing::info!(language = %self.selector.language(), "Keyboard session started");
        self.apply_active_layout();
    }

    /// Resets to session-start state and shows it on the host.
    ///
    /// The default language's lowercase variant becomes active, and every
    /// flag and meta bit is cleared.
    pub fn reset(&mut self) {
        self.selector.reset(self.default_language, &self.registry);
        self.modifiers.clear_all();
        self.meta = MetaMask::empty();
        self.apply_active_layout();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn active_variant(&self) -> Variant {
        self.selector.active()
    }

    #[must_use]
    pub fn active_layout(&self) -> ActiveLayout {
        self.selector.active_layout()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.selector.language()
    }

    /// Variant the overlay returns to, while the overlay is shown.
    #[must_use]
    pub fn restore_target(&self) -> Option<Variant> {
        self.selector.restore_target()
    }

    #[must_use]
    pub fn meta_mask(&self) -> MetaMask {
        self.meta
    }

    #[must_use]
    pub fn modifiers(&self) -> &ModifierState {
        &self.modifiers
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the controller, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Binds a visual indicator to a modifier flag.
    pub fn bind_indicator(&mut self, modifier: Modifier, indicator: Rc<dyn ModifierIndicator>) {
        self.modifiers.bind_indicator(modifier, indicator);
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Handles one key press.
    ///
    /// # Arguments
    ///
    /// * `primary_code` - The pressed key: a virtual key code (negative) or
    ///   a Unicode scalar value
    /// * `alternate_codes` - The host's touch-correction candidates, not used
    pub fn on_key_event(&mut self, primary_code: i32, alternate_codes: &[i32]) {
        let action = classify(primary_code);
        tracing::debug!(
            primary_code,
            alternates = alternate_codes.len(),
            ?action,
            meta = %self.meta,
            "Key event"
        );

        match action {
            KeyAction::Cursor(direction) => self.send_down_up(cursor_keycode(direction)),
            KeyAction::Close => self.host.request_hide(),
            KeyAction::Backspace => self.send_down_up(keycodes::KEY_BACKSPACE),
            KeyAction::Layout(toggle) => self.handle_layout_toggle(toggle),
            KeyAction::Meta(bit) => {
                self.meta.toggle(bit);
                self.host.request_redraw();
            }
            KeyAction::SwitchLanguage => {
                self.selector.switch_language(&self.registry);
                self.sync_layout_flags();
                self.apply_active_layout();
            }
            KeyAction::Character(c) => self.handle_character(c),
            KeyAction::Ignored(code) => {
                tracing::warn!(code, "Ignoring key code without a mapping");
            }
        }
    }

    fn handle_layout_toggle(&mut self, toggle: LayoutToggle) {
        let changed = match toggle {
            LayoutToggle::Shift => self.selector.toggle_shift(),
            LayoutToggle::AltGr => self.selector.toggle_altgr(),
            LayoutToggle::Overlay => {
                match self.selector.toggle_overlay() {
                    OverlayChange::Entered(previous) => {
                        tracing::debug!(restore = %previous, "Overlay shown");
                    }
                    OverlayChange::Restored(variant) => {
                        tracing::debug!(%variant, "Overlay hidden");
                    }
                }
                true
            }
        };

        if changed {
            self.sync_layout_flags();
            self.apply_active_layout();
        }
    }

    /// Keeps the Fn and AltGr flags (and their indicators) in line with the
    /// active variant.
    fn sync_layout_flags(&mut self) {
        let active = self.selector.active();
        self.modifiers.set_state(Modifier::Fn, active.is_overlay());
        self.modifiers.set_state(Modifier::AltGr, active.is_altgr());
    }

    fn handle_character(&mut self, c: char) {
        if self.meta.is_empty() {
            self.host.commit_text(c.encode_utf8(&mut [0; 4]));
            return;
        }

        // Keycodes carry no case, so uppercase letters add the Shift bit.
        let mut meta = self.meta;
        if c.is_uppercase() {
            meta |= MetaMask::SHIFT;
        }

        match self.translator.translate(c) {
            Some(keycode) => self.host.emit_key_event(KeyEvent::press(keycode, meta)),
            None => {
                tracing::debug!(?c, meta = %self.meta, "No keycode for character, committing text");
                self.host.commit_text(c.encode_utf8(&mut [0; 4]));
            }
        }
    }

    fn send_down_up(&mut self, keycode: u32) {
        self.host
            .emit_key_event(KeyEvent::press(keycode, MetaMask::empty()));
        self.host
            .emit_key_event(KeyEvent::release(keycode, MetaMask::empty()));
    }

    fn apply_active_layout(&mut self) {
        let layout = self.selector.active_layout();
        self.host.apply_variant(&layout);
    }
}

fn cursor_keycode(direction: Direction) -> u32 {
    match direction {
        Direction::Up => keycodes::KEY_UP,
        Direction::Down => keycodes::KEY_DOWN,
        Direction::Left => keycodes::KEY_LEFT,
        Direction::Right => keycodes::KEY_RIGHT,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
