// SPDX-License-Identifier: GPL-3.0-only

//! Modifier state management for keyboard input.
//!
//! Two separate tracks of modifier state are kept:
//!
//! - **PC flags** ([`ModifierState`]): logical on/off state of Alt, Ctrl,
//!   Shift, Fn and AltGr, mimicking a PC keyboard. Each flag can be bound to
//!   a visual key indicator which is told about every state change.
//! - **Meta mask** ([`MetaMask`]): the physical Alt/Ctrl/Shift bits attached
//!   to synthesized key events.
//!
//! The meta keys flip bits in the meta mask without touching the PC flags.
//! The two tracks are only loosely coupled and are intentionally not merged.
//!
//! # Example
//!
//! ```rust,ignore
//! use vkboard::input::{MetaMask, Modifier, ModifierState};
//!
//! let mut state = ModifierState::new();
//! state.set_state(Modifier::Fn, true);
//! assert!(state.is_active(Modifier::Fn));
//!
//! let mut mask = MetaMask::empty();
//! mask.toggle(MetaMask::CTRL);
//! assert!(mask.contains(MetaMask::CTRL));
//! ```

use bitflags::bitflags;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

/// PC-style modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    /// Alt modifier
    Alt,
    /// Control modifier
    Ctrl,
    /// Shift modifier
    Shift,
    /// Function modifier, shown while the overlay is active
    Fn,
    /// AltGr modifier
    AltGr,
}

impl Modifier {
    /// All modifiers in declaration order.
    pub const ALL: [Modifier; 5] = [
        Modifier::Alt,
        Modifier::Ctrl,
        Modifier::Shift,
        Modifier::Fn,
        Modifier::AltGr,
    ];
}

/// A visual key indicator bound to a modifier flag.
///
/// Implemented by the host. The indicator is pushed the flag value on every
/// state update, whether or not the value changed.
pub trait ModifierIndicator {
    /// Sets the highlighted state of the indicator.
    fn set_on(&self, on: bool);
}

// ============================================================================
// PC flags
// ============================================================================

/// Tracks the PC-style modifier flags.
#[derive(Default)]
pub struct ModifierState {
    /// Set of currently active modifiers
    active: HashSet<Modifier>,

    /// Indicators bound to modifiers
    indicators: HashMap<Modifier, Rc<dyn ModifierIndicator>>,
}

impl fmt::Debug for ModifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<Modifier> = self.indicators.keys().copied().collect();
        bound.sort();
        f.debug_struct("ModifierState")
            .field("active", &self.get_active_modifiers())
            .field("bound_indicators", &bound)
            .finish()
    }
}

impl ModifierState {
    /// Creates a new `ModifierState` with no active modifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a modifier flag.
    ///
    /// The bound indicator (if any) is updated on every call.
    ///
    /// # Arguments
    ///
    /// * `modifier` - The flag to set
    /// * `on` - The new flag value
    ///
    /// # Returns
    ///
    /// `true` if the flag value changed, `false` if it already had that value.
    pub fn set_state(&mut self, modifier: Modifier, on: bool) -> bool {
        if let Some(indicator) = self.indicators.get(&modifier) {
            indicator.set_on(on);
        }

        let changed = if on {
            self.active.insert(modifier)
        } else {
            self.active.remove(&modifier)
        };

        if changed {
            tracing::debug!(?modifier, on, "Modifier flag changed");
        }
        changed
    }

    /// Flips a modifier flag. Always reports a change.
    pub fn toggle(&mut self, modifier: Modifier) -> bool {
        let on = !self.is_active(modifier);
        self.set_state(modifier, on)
    }

    /// Checks if a modifier is currently active.
    #[must_use]
    pub fn is_active(&self, modifier: Modifier) -> bool {
        self.active.contains(&modifier)
    }

    /// Binds a visual indicator to a modifier, replacing any previous one.
    ///
    /// The indicator immediately receives the current flag value.
    pub fn bind_indicator(&mut self, modifier: Modifier, indicator: Rc<dyn ModifierIndicator>) {
        indicator.set_on(self.is_active(modifier));
        self.indicators.insert(modifier, indicator);
    }

    /// Removes the indicator bound to a modifier.
    pub fn unbind_indicator(&mut self, modifier: Modifier) {
        self.indicators.remove(&modifier);
    }

    /// Returns all active modifiers, sorted by enum order.
    #[must_use]
    pub fn get_active_modifiers(&self) -> Vec<Modifier> {
        let mut modifiers: Vec<Modifier> = self.active.iter().copied().collect();
        modifiers.sort();
        modifiers
    }

    /// Clears every flag, updating bound indicators.
    pub fn clear_all(&mut self) {
        for modifier in Modifier::ALL {
            self.set_state(modifier, false);
        }
    }

    /// Checks if any modifiers are currently active.
    #[must_use]
    pub fn has_active_modifiers(&self) -> bool {
        !self.active.is_empty()
    }
}

// ============================================================================
// Meta mask
// ============================================================================

bitflags! {
    /// Physical modifier bits attached to synthesized key events.
    ///
    /// Bit positions follow the XKB modifier layout used by Wayland virtual
    /// keyboards.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MetaMask: u32 {
        const SHIFT = 0x1;
        const CTRL = 0x4;
        /// Mod1
        const ALT = 0x8;
    }
}

impl fmt::Display for MetaMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (MetaMask::SHIFT, "Shift"),
            (MetaMask::CTRL, "Ctrl"),
            (MetaMask::ALT, "Alt"),
        ]
        .into_iter()
        .filter(|(bit, _)| self.contains(*bit))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("+"))
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Indicator that records every pushed value.
    #[derive(Default)]
    struct TestIndicator {
        on: Cell<bool>,
        updates: RefCell<Vec<bool>>,
    }

    impl ModifierIndicator for TestIndicator {
        fn set_on(&self, on: bool) {
            self.on.set(on);
            self.updates.borrow_mut().push(on);
        }
    }

    #[test]
    fn test_toggle() {
        let mut state = ModifierState::new();

        assert!(state.toggle(Modifier::Alt));
        assert!(state.is_active(Modifier::Alt));

        assert!(state.toggle(Modifier::Alt));
        assert!(!state.is_active(Modifier::Alt));
    }

    #[test]
    fn test_set_state_reports_change_only_once() {
        let mut state = ModifierState::new();

        assert!(state.set_state(Modifier::Ctrl, true));
        assert!(!state.set_state(Modifier::Ctrl, true));
        assert!(state.set_state(Modifier::Ctrl, false));
        assert!(!state.set_state(Modifier::Ctrl, false));
    }

    #[test]
    fn test_unbound_modifier_still_updates() {
        let mut state = ModifierState::new();
        assert!(state.set_state(Modifier::AltGr, true));
        assert!(state.is_active(Modifier::AltGr));
    }

    #[test]
    fn test_indicator_is_pushed_on_every_update() {
        let mut state = ModifierState::new();
        let indicator = Rc::new(TestIndicator::default());
        state.bind_indicator(Modifier::Fn, indicator.clone());

        state.set_state(Modifier::Fn, true);
        state.set_state(Modifier::Fn, true);
        state.set_state(Modifier::Fn, false);

        assert!(!indicator.on.get());
        // Initial sync on bind, then one push per call.
        assert_eq!(*indicator.updates.borrow(), vec![false, true, true, false]);
    }

    #[test]
    fn test_bind_indicator_syncs_current_state() {
        let mut state = ModifierState::new();
        state.set_state(Modifier::Shift, true);

        let indicator = Rc::new(TestIndicator::default());
        state.bind_indicator(Modifier::Shift, indicator.clone());
        assert!(indicator.on.get());

        state.unbind_indicator(Modifier::Shift);
        state.set_state(Modifier::Shift, false);
        assert!(indicator.on.get(), "Unbound indicator must not be updated");
    }

    #[test]
    fn test_clear_all() {
        let mut state = ModifierState::new();
        state.set_state(Modifier::Shift, true);
        state.set_state(Modifier::Fn, true);
        assert_eq!(
            state.get_active_modifiers(),
            vec![Modifier::Shift, Modifier::Fn]
        );

        state.clear_all();
        assert!(!state.has_active_modifiers());
    }

    #[test]
    fn test_meta_mask_toggle_twice_restores() {
        for bit in [MetaMask::ALT, MetaMask::CTRL, MetaMask::SHIFT] {
            let mut mask = MetaMask::SHIFT;
            let original = mask;
            mask.toggle(bit);
            mask.toggle(bit);
            assert_eq!(mask, original);
        }
    }

    #[test]
    fn test_meta_mask_alt_ctrl_alt_leaves_ctrl() {
        let mut mask = MetaMask::empty();
        mask.toggle(MetaMask::ALT);
        mask.toggle(MetaMask::CTRL);
        mask.toggle(MetaMask::ALT);
        assert_eq!(mask, MetaMask::CTRL);
        assert_eq!(mask.bits(), 0x4);
    }

    #[test]
    fn test_meta_mask_rejects_unknown_bits() {
        assert_eq!(MetaMask::from_bits(0x5), Some(MetaMask::SHIFT | MetaMask::CTRL));
        assert_eq!(MetaMask::from_bits(0x2), None);
        assert_eq!(MetaMask::from_bits_truncate(0xF), MetaMask::all());
    }

    #[test]
    fn test_meta_mask_display() {
        assert_eq!(MetaMask::empty().to_string(), "none");
        assert_eq!((MetaMask::CTRL | MetaMask::ALT).to_string(), "Ctrl+Alt");
    }
}
