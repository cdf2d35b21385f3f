// SPDX-License-Identifier: GPL-3.0-only

//! Input handling for the on-screen keyboard.
//!
//! This module classifies key codes, tracks modifier state and turns
//! characters into hardware key events.
//!
//! # Features
//!
//! - **Key code classification**: Map raw key codes to [`KeyAction`]s
//! - **Modifier state management**: PC flags with indicator binding, plus the
//!   physical meta mask used for synthesized key events
//! - **Key translation**: Characters to evdev keycodes via a static table or
//!   the system XKB keymap
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use vkboard::input::{classify, codes, EvdevTable, KeyAction, KeyTranslator, MetaMask};
//!
//! match classify(codes::PC_CTRL) {
//!     KeyAction::Meta(bit) => assert_eq!(bit, MetaMask::CTRL),
//!     other => panic!("unexpected {:?}", other),
//! }
//!
//! assert_eq!(EvdevTable.translate('a'), Some(30));
//! ```

// Sub-modules
pub mod keycode;
pub mod modifier;
pub mod translator;

// Re-export public API
pub use keycode::{classify, codes, Direction, KeyAction, LayoutToggle};
pub use modifier::{MetaMask, Modifier, ModifierIndicator, ModifierState};
pub use translator::{
    keycodes, EvdevTable, KeyEvent, KeyState, KeyTranslator, TranslatorError, XkbTranslator,
};

// ============================================================================
// Module Tests
// ============================================================================
