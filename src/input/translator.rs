// SPDX-License-Identifier: GPL-3.0-only

//! Translation of characters into platform key event codes.
//!
//! When a meta key is held, characters are sent as synthesized key events
//! instead of committed text, so the character has to be mapped to a
//! hardware (evdev) keycode first. Two translators are provided:
//!
//! - [`EvdevTable`]: a fixed table for printable ASCII on the US base level
//! - [`XkbTranslator`]: a lookup in the system XKB keymap
//!
//! A failed translation is not an error for the caller; the controller falls
//! back to committing the character as text.

use std::fmt;

use xkbcommon::xkb::Keysym;

use super::modifier::MetaMask;

/// Converts a character into a hardware keycode.
///
/// The keycode names a physical key, so `'a'` and `'A'` map to the same
/// code. Adding the Shift bit for uppercase input is left to the caller.
pub trait KeyTranslator {
    /// Returns the evdev keycode that types `c`, or `None` if unmapped.
    fn translate(&self, c: char) -> Option<u32>;
}

/// Key event state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Key was pressed down.
    Pressed,
    /// Key was released.
    Released,
}

/// A synthesized key event delivered to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The hardware keycode (evdev keycode).
    pub keycode: u32,
    /// Meta bits held while the event is delivered.
    pub meta: MetaMask,
    /// Whether the key was pressed or released.
    pub state: KeyState,
}

impl KeyEvent {
    /// Creates a new key press event.
    #[must_use]
    pub fn press(keycode: u32, meta: MetaMask) -> Self {
        Self {
            keycode,
            meta,
            state: KeyState::Pressed,
        }
    }

    /// Creates a new key release event.
    #[must_use]
    pub fn release(keycode: u32, meta: MetaMask) -> Self {
        Self {
            keycode,
            meta,
            state: KeyState::Released,
        }
    }

    #[must_use]
    pub fn is_down(&self) -> bool {
        self.state == KeyState::Pressed
    }
}

// ============================================================================
// Static table
// ============================================================================

/// Translates printable ASCII using a built-in evdev table.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvdevTable;

impl KeyTranslator for EvdevTable {
    fn translate(&self, c: char) -> Option<u32> {
        use keycodes::*;

        let keycode = match c.to_ascii_lowercase() {
            'a' => KEY_A,
            'b' => KEY_B,
            'c' => KEY_C,
            'd' => KEY_D,
            'e' => KEY_E,
            'f' => KEY_F,
            'g' => KEY_G,
            'h' => KEY_H,
            'i' => KEY_I,
            'j' => KEY_J,
            'k' => KEY_K,
            'l' => KEY_L,
            'm' => KEY_M,
            'n' => KEY_N,
            'o' => KEY_O,
            'p' => KEY_P,
            'q' => KEY_Q,
            'r' => KEY_R,
            's' => KEY_S,
            't' => KEY_T,
            'u' => KEY_U,
            'v' => KEY_V,
            'w' => KEY_W,
            'x' => KEY_X,
            'y' => KEY_Y,
            'z' => KEY_Z,
            '1' => KEY_1,
            '2' => KEY_2,
            '3' => KEY_3,
            '4' => KEY_4,
            '5' => KEY_5,
            '6' => KEY_6,
            '7' => KEY_7,
            '8' => KEY_8,
            '9' => KEY_9,
            '0' => KEY_0,
            ' ' => KEY_SPACE,
            '\n' | '\r' => KEY_ENTER,
            '\t' => KEY_TAB,
            '\u{1b}' => KEY_ESC,
            '-' => KEY_MINUS,
            '=' => KEY_EQUAL,
            '[' => KEY_LEFTBRACE,
            ']' => KEY_RIGHTBRACE,
            ';' => KEY_SEMICOLON,
            '\'' => KEY_APOSTROPHE,
            '`' => KEY_GRAVE,
            '\\' => KEY_BACKSLASH,
            ',' => KEY_COMMA,
            '.' => KEY_DOT,
            '/' => KEY_SLASH,
            _ => return None,
        };
        Some(keycode)
    }
}

// ============================================================================
// XKB keymap lookup
// ============================================================================

/// Errors raised while setting up the XKB translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatorError {
    /// No keymap could be compiled from the system defaults.
    KeymapUnavailable(String),
}

impl fmt::Display for TranslatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslatorError::KeymapUnavailable(msg) => write!(f, "XKB keymap unavailable: {}", msg),
        }
    }
}

impl std::error::Error for TranslatorError {}

/// Translates characters through the system XKB keymap.
pub struct XkbTranslator {
    /// XKB keymap loaded from the system.
    keymap: xkbcommon::xkb::Keymap,
}

impl fmt::Debug for XkbTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XkbTranslator")
            .field("layouts", &self.keymap.num_layouts())
            .finish_non_exhaustive()
    }
}

impl XkbTranslator {
    /// Loads the default keymap from environment variables (`XKB_DEFAULT_LAYOUT`,
    /// ...) or system defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TranslatorError::KeymapUnavailable`] if no keymap can be
    /// compiled, e.g. on a system without XKB data.
    pub fn new() -> Result<Self, TranslatorError> {
        let context = xkbcommon::xkb::Context::new(xkbcommon::xkb::CONTEXT_NO_FLAGS);

        let keymap = xkbcommon::xkb::Keymap::new_from_names(
            &context,
            &"", // rules (empty = default)
            &"", // model (empty = default)
            &"", // layout (empty = default from env)
            &"", // variant (empty = default)
            None, // options
            xkbcommon::xkb::KEYMAP_COMPILE_NO_FLAGS,
        )
        .ok_or_else(|| {
            TranslatorError::KeymapUnavailable(
                "failed to create XKB keymap from system defaults".to_string(),
            )
        })?;

        tracing::info!("Key translator initialized with system XKB keymap");
        Ok(Self { keymap })
    }

    /// Finds the keycode that produces the given keysym at any level.
    fn find_keycode_for_keysym(&self, target_keysym: Keysym) -> Option<u32> {
        let min_keycode = self.keymap.min_keycode();
        let max_keycode = self.keymap.max_keycode();

        for keycode_raw in min_keycode.raw()..=max_keycode.raw() {
            let keycode = xkbcommon::xkb::Keycode::new(keycode_raw);
            let num_layouts = self.keymap.num_layouts_for_key(keycode);
            for layout in 0..num_layouts {
                let num_levels = self.keymap.num_levels_for_key(keycode, layout);
                for level in 0..num_levels {
                    let keysyms = self.keymap.key_get_syms_by_level(keycode, layout, level);
                    if keysyms.contains(&target_keysym) {
                        // XKB keycodes are evdev keycodes offset by 8
                        return keycode_raw.checked_sub(8);
                    }
                }
            }
        }

        None
    }
}

impl KeyTranslator for XkbTranslator {
    fn translate(&self, c: char) -> Option<u32> {
        let code = c as u32;
        let keysym_raw = match c {
            '\n' | '\r' => xkbcommon::xkb::keysyms::KEY_Return,
            '\t' => xkbcommon::xkb::keysyms::KEY_Tab,
            // Printable ASCII and Latin-1 keysyms equal the codepoint
            _ if (0x20..=0x7E).contains(&code) || (0xA0..=0xFF).contains(&code) => code,
            // Other Unicode keysyms are 0x01000000 + codepoint
            _ if code > 0xFF => 0x0100_0000 | code,
            _ => return None,
        };

        let keysym: Keysym = keysym_raw.into();
        self.find_keycode_for_keysym(keysym)
    }
}

// ============================================================================
// Common Keycodes (evdev)
// ============================================================================

/// Linux evdev keycodes used by the translators and the controller.
pub mod keycodes {
    pub const KEY_ESC: u32 = 1;
    pub const KEY_1: u32 = 2;
    pub const KEY_2: u32 = 3;
    pub const KEY_3: u32 = 4;
    pub const KEY_4: u32 = 5;
    pub const KEY_5: u32 = 6;
    pub const KEY_6: u32 = 7;
    pub const KEY_7: u32 = 8;
    pub const KEY_8: u32 = 9;
    pub const KEY_9: u32 = 10;
    pub const KEY_0: u32 = 11;
    pub const KEY_MINUS: u32 = 12;
    pub const KEY_EQUAL: u32 = 13;
    /// Backspace key
    pub const KEY_BACKSPACE: u32 = 14;
    pub const KEY_TAB: u32 = 15;
    pub const KEY_Q: u32 = 16;
    pub const KEY_W: u32 = 17;
    pub const KEY_E: u32 = 18;
    pub const KEY_R: u32 = 19;
    pub const KEY_T: u32 = 20;
    pub const KEY_Y: u32 = 21;
    pub const KEY_U: u32 = 22;
    pub const KEY_I: u32 = 23;
    pub const KEY_O: u32 = 24;
    pub const KEY_P: u32 = 25;
    pub const KEY_LEFTBRACE: u32 = 26;
    pub const KEY_RIGHTBRACE: u32 = 27;
    /// Enter/Return key
    pub const KEY_ENTER: u32 = 28;
    pub const KEY_A: u32 = 30;
    pub const KEY_S: u32 = 31;
    pub const KEY_D: u32 = 32;
    pub const KEY_F: u32 = 33;
    pub const KEY_G: u32 = 34;
    pub const KEY_H: u32 = 35;
    pub const KEY_J: u32 = 36;
    pub const KEY_K: u32 = 37;
    pub const KEY_L: u32 = 38;
    pub const KEY_SEMICOLON: u32 = 39;
    pub const KEY_APOSTROPHE: u32 = 40;
    pub const KEY_GRAVE: u32 = 41;
    pub const KEY_BACKSLASH: u32 = 43;
    pub const KEY_Z: u32 = 44;
    pub const KEY_X: u32 = 45;
    pub const KEY_C: u32 = 46;
    pub const KEY_V: u32 = 47;
    pub const KEY_B: u32 = 48;
    pub const KEY_N: u32 = 49;
    pub const KEY_M: u32 = 50;
    pub const KEY_COMMA: u32 = 51;
    pub const KEY_DOT: u32 = 52;
    pub const KEY_SLASH: u32 = 53;
    /// Space key
    pub const KEY_SPACE: u32 = 57;
    /// Cursor up
    pub const KEY_UP: u32 = 103;
    /// Cursor left
    pub const KEY_LEFT: u32 = 105;
    /// Cursor right
    pub const KEY_RIGHT: u32 = 106;
    /// Cursor down
    pub const KEY_DOWN: u32 = 108;
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::keycodes::*;
    use super::*;

    #[test]
    fn test_evdev_table_letters_ignore_case() {
        let table = EvdevTable;
        assert_eq!(table.translate('a'), Some(KEY_A));
        assert_eq!(table.translate('A'), Some(KEY_A));
        assert_eq!(table.translate('q'), Some(KEY_Q));
        assert_eq!(table.translate('z'), Some(KEY_Z));
    }

    #[test]
    fn test_evdev_table_digits_and_punctuation() {
        let table = EvdevTable;
        assert_eq!(table.translate('1'), Some(KEY_1));
        assert_eq!(table.translate('0'), Some(KEY_0));
        assert_eq!(table.translate(' '), Some(KEY_SPACE));
        assert_eq!(table.translate('\n'), Some(KEY_ENTER));
        assert_eq!(table.translate('/'), Some(KEY_SLASH));
    }

    #[test]
    fn test_evdev_table_unmapped() {
        let table = EvdevTable;
        assert_eq!(table.translate('ß'), None);
        assert_eq!(table.translate('€'), None);
        assert_eq!(table.translate('!'), None);
    }

    #[test]
    fn test_key_event_constructors() {
        let press = KeyEvent::press(KEY_A, MetaMask::CTRL);
        assert!(press.is_down());
        assert_eq!(press.meta, MetaMask::CTRL);

        let release = KeyEvent::release(KEY_A, MetaMask::empty());
        assert!(!release.is_down());
        assert_eq!(release.keycode, KEY_A);
    }

    #[test]
    fn test_xkb_translator_letters() {
        // Skip when no XKB data is installed (e.g. headless CI)
        let Ok(translator) = XkbTranslator::new() else {
            eprintln!("Skipping test: XKB initialization failed");
            return;
        };

        let keycode = translator.translate('a');
        assert!(keycode.is_some(), "Every Latin keymap has an 'a' key");
        assert_eq!(translator.translate('\u{1}'), None);
    }

    #[test]
    fn test_translator_error_display() {
        let err = TranslatorError::KeymapUnavailable("no rules".to_string());
        assert_eq!(err.to_string(), "XKB keymap unavailable: no rules");
    }
}
