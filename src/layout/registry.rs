// SPDX-License-Identifier: GPL-3.0-only

//! Layout registry and language rotation.
//!
//! The registry resolves the opaque resource identifiers for each language's
//! four variants and for the overlay. Resolution is deterministic: the same
//! language always yields the same identifiers.

use std::collections::HashMap;

use super::types::{Language, LanguageLayoutIds, LanguageLayouts, LayoutResourceId, Variant};
use crate::app_settings;
use crate::config::Config;

/// Advances to the next language in the fixed order DE -> UK -> FR -> DE.
#[must_use]
pub fn rotate(current: Language) -> Language {
    current.next()
}

/// Resolves layout resource identifiers for languages and the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRegistry {
    /// Resource of the language-independent overlay
    overlay: LayoutResourceId,
    /// Per-language identifiers that replace the built-in naming scheme
    overrides: HashMap<Language, LanguageLayoutIds>,
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self {
            overlay: LayoutResourceId::new(app_settings::DEFAULT_OVERLAY_LAYOUT),
            overrides: HashMap::new(),
        }
    }
}

impl LayoutRegistry {
    /// Creates a registry using the built-in resource naming scheme.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry from the user configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            overlay: config.overlay_layout.clone(),
            overrides: config.layouts.clone(),
        }
    }

    /// Replaces the identifiers used for one language.
    #[must_use]
    pub fn with_override(mut self, language: Language, ids: LanguageLayoutIds) -> Self {
        self.overrides.insert(language, ids);
        self
    }

    /// Returns the overlay resource.
    #[must_use]
    pub fn overlay(&self) -> &LayoutResourceId {
        &self.overlay
    }

    /// Produces the four variants of a language.
    ///
    /// Built-in identifiers follow `<prefix>_<lc|uc>[_alt_gr]`, for example
    /// `de_de_lc` or `en_uk_uc_alt_gr`.
    #[must_use]
    pub fn materialize(&self, language: Language) -> LanguageLayouts {
        let ids = match self.overrides.get(&language) {
            Some(ids) => ids.clone(),
            None => Self::builtin_ids(language),
        };

        tracing::debug!(%language, lower = %ids.lower, "Materialized language layouts");

        LanguageLayouts { language, ids }
    }

    fn builtin_ids(language: Language) -> LanguageLayoutIds {
        let id = |variant: Variant| {
            let suffix = variant.resource_suffix().unwrap_or_default();
            LayoutResourceId::new(format!("{}_{}", language.resource_prefix(), suffix))
        };

        LanguageLayoutIds {
            lower: id(Variant::Lower),
            upper: id(Variant::Upper),
            lower_altgr: id(Variant::LowerAltGr),
            upper_altgr: id(Variant::UpperAltGr),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
