// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

/// Application ID in RDNN (reverse domain name notation) format.
pub const APP_ID: &str = "de.hs_bremen.vkb";

/// Name of the JSON configuration file.
pub const CONFIG_FILE_NAME: &str = "vkboard.json";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "VKBOARD_CONFIG";

/// Default tracing directive for the crate.
pub const DEFAULT_LOG_DIRECTIVE: &str = "vkboard=info";

/// Tracing directive used when the config enables debug mode.
pub const DEBUG_LOG_DIRECTIVE: &str = "vkboard=debug";

/// Capacity of the key event queue between event sources and the controller.
pub const EVENT_QUEUE_CAPACITY: usize = 64;

/// Resource identifier of the language-independent overlay layout.
pub const DEFAULT_OVERLAY_LAYOUT: &str = "math";
