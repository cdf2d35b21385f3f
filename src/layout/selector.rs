// SPDX-License-Identifier: GPL-3.0-only

//! The layout selector state machine.
//!
//! The selector owns the active [`Variant`], the current [`Language`] with its
//! materialized layouts, and the variant to restore when the overlay is left.
//!
//! | Input          | From                     | To                        |
//! |----------------|--------------------------|---------------------------|
//! | Shift toggle   | lower / upper            | upper / lower             |
//! | Shift toggle   | lower AltGr / upper AltGr| upper AltGr / lower AltGr |
//! | Shift toggle   | overlay                  | (no-op)                   |
//! | AltGr toggle   | lower / lower AltGr      | lower AltGr / lower       |
//! | AltGr toggle   | upper / upper AltGr      | upper AltGr / upper       |
//! | AltGr toggle   | overlay                  | lower AltGr               |
//! | Overlay toggle | any language variant `v` | overlay, remembering `v`  |
//! | Overlay toggle | overlay                  | remembered `v`            |
//!
//! A language switch regenerates the language layouts and always lands on
//! the new language's lowercase variant, leaving the overlay if it was shown.

use super::registry::{self, LayoutRegistry};
use super::types::{ActiveLayout, Language, LanguageLayouts, LayoutResourceId, Variant};

/// Outcome of an overlay toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayChange {
    /// The overlay is now shown; the given variant will be restored.
    Entered(Variant),
    /// The overlay was left for the given variant.
    Restored(Variant),
}

/// Decides which keyboard variant is active.
#[derive(Debug, Clone)]
pub struct LayoutSelector {
    /// The current language and its four variants
    layouts: LanguageLayouts,
    /// Overlay resource
    overlay: LayoutResourceId,
    /// The variant currently shown
    active: Variant,
    /// Variant to return to when the overlay is toggled off.
    ///
    /// Only `Some` while the overlay is active, and never the overlay itself.
    restore_target: Option<Variant>,
}

impl LayoutSelector {
    /// Creates a selector showing the lowercase variant of `language`.
    #[must_use]
    pub fn new(language: Language, registry: &LayoutRegistry) -> Self {
        Self {
            layouts: registry.materialize(language),
            overlay: registry.overlay().clone(),
            active: Variant::Lower,
            restore_target: None,
        }
    }

    /// Returns the active variant.
    #[must_use]
    pub fn active(&self) -> Variant {
        self.active
    }

    /// Returns the current language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.layouts.language
    }

    /// Returns the variant the overlay restores to, if the overlay is active.
    #[must_use]
    pub fn restore_target(&self) -> Option<Variant> {
        self.restore_target
    }

    /// Returns the active variant together with its resource.
    #[must_use]
    pub fn active_layout(&self) -> ActiveLayout {
        let resource = self
            .layouts
            .get(self.active)
            .unwrap_or(&self.overlay)
            .clone();

        ActiveLayout {
            language: self.layouts.language,
            variant: self.active,
            resource,
        }
    }

    /// Applies a Shift toggle.
    ///
    /// Returns `true` if the active variant changed. Shift while the overlay
    /// is shown has no transition and is ignored.
    pub fn toggle_shift(&mut self) -> bool {
        match self.active.shifted() {
            Some(next) => {
                self.transition(next);
                true
            }
            None => {
                tracing::warn!("Shift toggle ignored while the overlay is active");
                false
            }
        }
    }

    /// Applies an AltGr toggle. Always changes the active variant.
    pub fn toggle_altgr(&mut self) -> bool {
        let next = self.active.altgr_toggled();
        // Leaving the overlay through AltGr drops the remembered variant.
        self.restore_target = None;
        self.transition(next);
        true
    }

    /// Applies an overlay (Fn) toggle.
    ///
    /// # Returns
    ///
    /// * [`OverlayChange::Entered`] with the variant that will be restored,
    ///   when the overlay is now shown
    /// * [`OverlayChange::Restored`] with the variant now shown, when the
    ///   overlay was left. Lowercase is used if nothing was remembered.
    pub fn toggle_overlay(&mut self) -> OverlayChange {
        if self.active.is_overlay() {
            let target = self.restore_target.take().unwrap_or_else(|| {
                tracing::warn!("Overlay active without a restore target, using lowercase");
                Variant::Lower
            });
            self.transition(target);
            OverlayChange::Restored(target)
        } else {
            let previous = self.active;
            self.restore_target = Some(previous);
            self.transition(Variant::Overlay);
            OverlayChange::Entered(previous)
        }
    }

    /// Switches to the next language and resets to its lowercase variant.
    ///
    /// Returns the new language.
    pub fn switch_language(&mut self, registry: &LayoutRegistry) -> Language {
        let language = registry::rotate(self.layouts.language);
        self.reset(language, registry);
        tracing::info!(%language, "Switched keyboard language");
        language
    }

    /// Regenerates the layouts for `language` and shows its lowercase variant.
    pub fn reset(&mut self, language: Language, registry: &LayoutRegistry) {
        self.layouts = registry.materialize(language);
        self.overlay = registry.overlay().clone();
        self.restore_target = None;
        self.active = Variant::Lower;
    }

    fn transition(&mut self, next: Variant) {
        tracing::debug!(from = %self.active, to = %next, language = %self.layouts.language, "Layout transition");
        self.active = next;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
