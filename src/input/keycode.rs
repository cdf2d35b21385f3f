// SPDX-License-Identifier: GPL-3.0-only

//! Key code classification.
//!
//! The host reports each key press as a single integer. Non-negative codes are
//! Unicode scalar values; negative codes denote virtual keys such as
//! modifiers, arrows and layout toggles.
//!
//! # Priority
//!
//! [`classify`] resolves a code in this order:
//!
//! 1. Arrow keys
//! 2. Cancel / Done (close)
//! 3. Delete
//! 4. Shift, AltGr and Fn layout toggles
//! 5. PC Alt / Ctrl / Shift meta keys
//! 6. Language switch
//! 7. Characters

use super::modifier::MetaMask;

/// Virtual key codes delivered by the layouts.
pub mod codes {
    /// Shift: toggles the layout case
    pub const SHIFT: i32 = -1;
    /// Mode change (Fn): toggles the overlay
    pub const MODE_CHANGE: i32 = -2;
    /// Cancel: closes the keyboard
    pub const CANCEL: i32 = -3;
    /// Done: closes the keyboard
    pub const DONE: i32 = -4;
    /// Delete: backspace
    pub const DELETE: i32 = -5;
    /// Alt: toggles the AltGr layouts
    pub const ALT: i32 = -6;
    /// PC Alt meta key
    pub const PC_ALT: i32 = -128;
    /// PC Ctrl meta key
    pub const PC_CTRL: i32 = -129;
    /// PC Shift meta key
    pub const PC_SHIFT: i32 = -130;
    /// Language switch
    pub const LANGUAGE: i32 = -164;
    /// Arrow down
    pub const ARROW_DOWN: i32 = -256;
    /// Arrow left
    pub const ARROW_LEFT: i32 = -257;
    /// Arrow right
    pub const ARROW_RIGHT: i32 = -258;
    /// Arrow up
    pub const ARROW_UP: i32 = -259;
}

/// Cursor movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Layout toggles handled by the layout selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutToggle {
    /// Switch between lowercase and uppercase
    Shift,
    /// Switch between plain and AltGr variants
    AltGr,
    /// Show or leave the overlay
    Overlay,
}

/// What a key code asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Move the cursor
    Cursor(Direction),
    /// Dismiss the keyboard
    Close,
    /// Delete the character before the cursor
    Backspace,
    /// Toggle a layout variant
    Layout(LayoutToggle),
    /// Flip a physical meta bit
    Meta(MetaMask),
    /// Rotate to the next language
    SwitchLanguage,
    /// Type a character
    Character(char),
    /// Code that maps to nothing (zero, unknown virtual codes, invalid scalars)
    Ignored(i32),
}

/// Classifies a primary key code.
///
/// # Examples
///
/// ```rust,ignore
/// use vkboard::input::{classify, codes, KeyAction, LayoutToggle};
///
/// assert_eq!(classify(97), KeyAction::Character('a'));
/// assert_eq!(classify(codes::SHIFT), KeyAction::Layout(LayoutToggle::Shift));
/// ```
#[must_use]
pub fn classify(code: i32) -> KeyAction {
    match code {
        codes::ARROW_DOWN => KeyAction::Cursor(Direction::Down),
        codes::ARROW_LEFT => KeyAction::Cursor(Direction::Left),
        codes::ARROW_RIGHT => KeyAction::Cursor(Direction::Right),
        codes::ARROW_UP => KeyAction::Cursor(Direction::Up),
        codes::CANCEL | codes::DONE => KeyAction::Close,
        codes::DELETE => KeyAction::Backspace,
        codes::SHIFT => KeyAction::Layout(LayoutToggle::Shift),
        codes::ALT => KeyAction::Layout(LayoutToggle::AltGr),
        codes::MODE_CHANGE => KeyAction::Layout(LayoutToggle::Overlay),
        codes::PC_ALT => KeyAction::Meta(MetaMask::ALT),
        codes::PC_CTRL => KeyAction::Meta(MetaMask::CTRL),
        codes::PC_SHIFT => KeyAction::Meta(MetaMask::SHIFT),
        codes::LANGUAGE => KeyAction::SwitchLanguage,
        _ => parse_character(code),
    }
}

/// Converts an ordinary code into a character.
fn parse_character(code: i32) -> KeyAction {
    // Zero is reported when a touch does not hit a key.
    if code <= 0 {
        return KeyAction::Ignored(code);
    }

    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map_or(KeyAction::Ignored(code), KeyAction::Character)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_virtual_codes() {
        assert_eq!(classify(codes::ARROW_UP), KeyAction::Cursor(Direction::Up));
        assert_eq!(classify(codes::ARROW_DOWN), KeyAction::Cursor(Direction::Down));
        assert_eq!(classify(codes::ARROW_LEFT), KeyAction::Cursor(Direction::Left));
        assert_eq!(
            classify(codes::ARROW_RIGHT),
            KeyAction::Cursor(Direction::Right)
        );
        assert_eq!(classify(codes::CANCEL), KeyAction::Close);
        assert_eq!(classify(codes::DONE), KeyAction::Close);
        assert_eq!(classify(codes::DELETE), KeyAction::Backspace);
        assert_eq!(classify(codes::SHIFT), KeyAction::Layout(LayoutToggle::Shift));
        assert_eq!(classify(codes::ALT), KeyAction::Layout(LayoutToggle::AltGr));
        assert_eq!(
            classify(codes::MODE_CHANGE),
            KeyAction::Layout(LayoutToggle::Overlay)
        );
        assert_eq!(classify(codes::PC_ALT), KeyAction::Meta(MetaMask::ALT));
        assert_eq!(classify(codes::PC_CTRL), KeyAction::Meta(MetaMask::CTRL));
        assert_eq!(classify(codes::PC_SHIFT), KeyAction::Meta(MetaMask::SHIFT));
        assert_eq!(classify(codes::LANGUAGE), KeyAction::SwitchLanguage);
    }

    #[test]
    fn test_classify_characters() {
        assert_eq!(classify(97), KeyAction::Character('a'));
        assert_eq!(classify(0x00DF), KeyAction::Character('ß'));
        assert_eq!(classify(0x20AC), KeyAction::Character('€'));
        assert_eq!(classify(0x1F600), KeyAction::Character('😀'));
    }

    #[test]
    fn test_classify_ignores_invalid_codes() {
        assert_eq!(classify(0), KeyAction::Ignored(0));
        assert_eq!(classify(-42), KeyAction::Ignored(-42));
        assert_eq!(classify(0xD800), KeyAction::Ignored(0xD800));
        assert_eq!(classify(0x11_0000), KeyAction::Ignored(0x11_0000));
    }
}
