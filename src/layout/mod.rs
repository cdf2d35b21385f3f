// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard layout variants, languages and the layout state machine.
//!
//! # Overview
//!
//! - **Types**: [`Language`], [`Variant`] and the opaque [`LayoutResourceId`]
//!   the host resolves into something renderable
//! - **Registry**: [`LayoutRegistry`] materializes the four variants of a
//!   language; [`rotate`] advances DE -> UK -> FR -> DE
//! - **Selector**: [`LayoutSelector`] applies Shift, AltGr and overlay
//!   toggles and remembers where to return from the overlay
//!
//! # Example
//!
//! ```rust,ignore
//! use vkboard::layout::{Language, LayoutRegistry, LayoutSelector, Variant};
//!
//! let registry = LayoutRegistry::new();
//! let mut selector = LayoutSelector::new(Language::De, &registry);
//!
//! selector.toggle_altgr();
//! selector.toggle_shift();
//! assert_eq!(selector.active(), Variant::UpperAltGr);
//!
//! selector.toggle_overlay();
//! selector.toggle_overlay();
//! assert_eq!(selector.active(), Variant::UpperAltGr);
//! ```

pub mod registry;
pub mod selector;
pub mod types;

pub use registry::{rotate, LayoutRegistry};
pub use selector::{LayoutSelector, OverlayChange};
pub use types::{
    ActiveLayout, Language, LanguageLayoutIds, LanguageLayouts, LayoutResourceId, Variant,
};
