// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for keyboard layout variants.
//!
//! A keyboard is always showing exactly one [`Variant`]. Four of the variants
//! belong to the current [`Language`]; the overlay is shared by all languages.
//! Variants are plain values and are compared by value, never by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Language
// ============================================================================

/// Display languages, in rotation order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    /// Germany (German)
    #[default]
    De,
    /// United Kingdom (English)
    Uk,
    /// France (French)
    Fr,
}

impl Language {
    /// All languages in rotation order.
    pub const ALL: [Language; 3] = [Language::De, Language::Uk, Language::Fr];

    /// Returns the next language in rotation order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Language::De => Language::Uk,
            Language::Uk => Language::Fr,
            Language::Fr => Language::De,
        }
    }

    /// Prefix of the layout resource identifiers for this language.
    #[must_use]
    pub fn resource_prefix(self) -> &'static str {
        match self {
            Language::De => "de_de",
            Language::Uk => "en_uk",
            Language::Fr => "fr_fr",
        }
    }

    /// Short uppercase code, e.g. `"DE"`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::De => "DE",
            Language::Uk => "UK",
            Language::Fr => "FR",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Variant
// ============================================================================

/// A renderable keyboard variant.
///
/// The first four variants are scoped to the current language, which is
/// tracked separately by the selector. `Overlay` is language independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Lowercase
    Lower,
    /// Uppercase
    Upper,
    /// Lowercase with AltGr
    LowerAltGr,
    /// Uppercase with AltGr
    UpperAltGr,
    /// Function/math overlay
    Overlay,
}

impl Variant {
    /// The four per-language variants.
    pub const LANGUAGE_VARIANTS: [Variant; 4] = [
        Variant::Lower,
        Variant::Upper,
        Variant::LowerAltGr,
        Variant::UpperAltGr,
    ];

    #[must_use]
    pub fn is_overlay(self) -> bool {
        self == Variant::Overlay
    }

    #[must_use]
    pub fn is_altgr(self) -> bool {
        matches!(self, Variant::LowerAltGr | Variant::UpperAltGr)
    }

    /// Result of a Shift toggle, or `None` when Shift has no transition
    /// from this variant (the overlay).
    #[must_use]
    pub fn shifted(self) -> Option<Variant> {
        match self {
            Variant::Lower => Some(Variant::Upper),
            Variant::Upper => Some(Variant::Lower),
            Variant::LowerAltGr => Some(Variant::UpperAltGr),
            Variant::UpperAltGr => Some(Variant::LowerAltGr),
            Variant::Overlay => None,
        }
    }

    /// Result of an AltGr toggle. AltGr from the overlay lands on
    /// lowercase AltGr.
    #[must_use]
    pub fn altgr_toggled(self) -> Variant {
        match self {
            Variant::Lower | Variant::Overlay => Variant::LowerAltGr,
            Variant::LowerAltGr => Variant::Lower,
            Variant::Upper => Variant::UpperAltGr,
            Variant::UpperAltGr => Variant::Upper,
        }
    }

    /// Suffix of the layout resource identifier, e.g. `"lc_alt_gr"`.
    #[must_use]
    pub(crate) fn resource_suffix(self) -> Option<&'static str> {
        match self {
            Variant::Lower => Some("lc"),
            Variant::Upper => Some("uc"),
            Variant::LowerAltGr => Some("lc_alt_gr"),
            Variant::UpperAltGr => Some("uc_alt_gr"),
            Variant::Overlay => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Lower => "lowercase",
            Variant::Upper => "uppercase",
            Variant::LowerAltGr => "lowercase AltGr",
            Variant::UpperAltGr => "uppercase AltGr",
            Variant::Overlay => "overlay",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Layout resources
// ============================================================================

/// Opaque identifier of a layout resource, resolved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutResourceId(String);

impl LayoutResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resource identifiers for the four variants of one language, as they
/// appear in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageLayoutIds {
    pub lower: LayoutResourceId,
    pub upper: LayoutResourceId,
    pub lower_altgr: LayoutResourceId,
    pub upper_altgr: LayoutResourceId,
}

/// The four materialized variants of a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageLayouts {
    /// Language these layouts belong to
    pub language: Language,
    /// Resource identifiers of the four variants
    pub ids: LanguageLayoutIds,
}

impl LanguageLayouts {
    /// Returns the resource for a per-language variant, or `None` for the
    /// overlay.
    #[must_use]
    pub fn get(&self, variant: Variant) -> Option<&LayoutResourceId> {
        match variant {
            Variant::Lower => Some(&self.ids.lower),
            Variant::Upper => Some(&self.ids.upper),
            Variant::LowerAltGr => Some(&self.ids.lower_altgr),
            Variant::UpperAltGr => Some(&self.ids.upper_altgr),
            Variant::Overlay => None,
        }
    }
}

/// The variant the host is asked to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLayout {
    /// Current language (also set while the overlay is shown)
    pub language: Language,
    /// Active variant
    pub variant: Variant,
    /// Resource the host renders
    pub resource: LayoutResourceId,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_rotation_order() {
        assert_eq!(Language::De.next(), Language::Uk);
        assert_eq!(Language::Uk.next(), Language::Fr);
        assert_eq!(Language::Fr.next(), Language::De);
    }

    #[test]
    fn test_language_serde_uses_uppercase_codes() {
        let json = serde_json::to_string(&Language::Uk).unwrap();
        assert_eq!(json, "\"UK\"");

        let parsed: Language = serde_json::from_str("\"FR\"").unwrap();
        assert_eq!(parsed, Language::Fr);
    }

    #[test]
    fn test_shift_is_an_involution() {
        for variant in Variant::LANGUAGE_VARIANTS {
            let once = variant.shifted().unwrap();
            assert_ne!(once, variant);
            assert_eq!(once.shifted(), Some(variant));
        }
        assert_eq!(Variant::Overlay.shifted(), None);
    }

    #[test]
    fn test_altgr_is_an_involution() {
        for variant in Variant::LANGUAGE_VARIANTS {
            assert_eq!(variant.altgr_toggled().altgr_toggled(), variant);
        }
        assert_eq!(Variant::Overlay.altgr_toggled(), Variant::LowerAltGr);
    }

    #[test]
    fn test_variant_predicates() {
        assert!(Variant::UpperAltGr.is_altgr());
        assert!(!Variant::Upper.is_altgr());
        assert!(!Variant::Overlay.is_altgr());
        assert!(Variant::Overlay.is_overlay());
    }
}
