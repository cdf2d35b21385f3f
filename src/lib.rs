// SPDX-License-Identifier: GPL-3.0-only

//! VKB - layout and modifier state controller for an on-screen keyboard
//!
//! This crate decides which keyboard variant is shown (lowercase, uppercase,
//! their AltGr forms, or the function/math overlay), which modifiers are held,
//! which language is selected, and how each pressed key becomes committed text
//! or a synthesized key event.
//!
//! # Architecture
//!
//! Rendering, touch hit-testing and editor access belong to the host. The
//! host implements [`host::KeyboardHost`] and feeds key codes into a
//! [`controller::KeyboardController`], either directly or through the
//! ordered queue in [`session`].
//!
//! # Modules
//!
//! - `app_settings`: Centralized application constants
//! - `config`: User configuration loaded from JSON
//! - `controller`: Key event dispatch and state ownership
//! - `host`: Host capability interface
//! - `input`: Key code classification, modifier state, key translation
//! - `layout`: Languages, variants, registry and the layout state machine
//! - `session`: Serialized key event queue

pub mod app_settings;
pub mod config;
pub mod controller;
pub mod host;
pub mod input;
pub mod layout;
pub mod session;

pub use controller::KeyboardController;
pub use host::KeyboardHost;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use crate::config::Config;
    use crate::controller::KeyboardController;
    use crate::host::{HostCall, RecordingHost};
    use crate::input::{codes, keycodes, KeyEvent, MetaMask};
    use crate::layout::{Language, Variant};
    use crate::session;

    fn controller() -> KeyboardController<RecordingHost> {
        let mut controller = KeyboardController::new(RecordingHost::new(), &Config::default());
        controller.start();
        controller.host_mut().take_calls();
        controller
    }

    fn applied_resource(controller: &mut KeyboardController<RecordingHost>) -> String {
        let calls = controller.host_mut().take_calls();
        assert_eq!(calls.len(), 1, "Expected exactly one host call, got {:?}", calls);
        match &calls[0] {
            HostCall::ApplyVariant(layout) => layout.resource.to_string(),
            other => panic!("Expected ApplyVariant, got {:?}", other),
        }
    }

    /// Integration Test 1: AltGr, Shift, then Fn twice on the German layout
    #[test]
    fn test_german_altgr_shift_overlay_round_trip() {
        let mut controller = controller();
        assert_eq!(controller.language(), Language::De);
        assert_eq!(controller.active_variant(), Variant::Lower);

        controller.on_key_event(codes::ALT, &[]);
        assert_eq!(controller.active_variant(), Variant::LowerAltGr);
        assert_eq!(applied_resource(&mut controller), "de_de_lc_alt_gr");

        controller.on_key_event(codes::SHIFT, &[]);
        assert_eq!(controller.active_variant(), Variant::UpperAltGr);
        assert_eq!(applied_resource(&mut controller), "de_de_uc_alt_gr");

        controller.on_key_event(codes::MODE_CHANGE, &[]);
        assert_eq!(controller.active_variant(), Variant::Overlay);
        assert_eq!(controller.restore_target(), Some(Variant::UpperAltGr));
        assert_eq!(applied_resource(&mut controller), "math");

        controller.on_key_event(codes::MODE_CHANGE, &[]);
        assert_eq!(controller.active_variant(), Variant::UpperAltGr);
        assert_eq!(controller.restore_target(), None);
        assert_eq!(applied_resource(&mut controller), "de_de_uc_alt_gr");
    }

    /// Integration Test 2: 'a' commits text without meta bits and becomes a
    /// Ctrl key event with Ctrl held
    #[test]
    fn test_character_with_and_without_ctrl() {
        let mut controller = controller();

        controller.on_key_event(97, &[]);
        assert_eq!(
            controller.host_mut().take_calls(),
            vec![HostCall::CommitText("a".to_string())]
        );

        controller.on_key_event(codes::PC_CTRL, &[]);
        controller.on_key_event(97, &[]);
        assert_eq!(
            controller.host_mut().take_calls(),
            vec![
                HostCall::RequestRedraw,
                HostCall::EmitKeyEvent(KeyEvent::press(keycodes::KEY_A, MetaMask::CTRL)),
            ]
        );
    }

    /// Integration Test 3: Language rotation always lands on lowercase
    #[test]
    fn test_language_rotation_resets_to_lowercase() {
        let mut controller = controller();
        let expected = [Language::Uk, Language::Fr, Language::De, Language::Uk];

        for (step, language) in expected.into_iter().enumerate() {
            // Move away from lowercase before each switch.
            match step % 3 {
                0 => controller.on_key_event(codes::SHIFT, &[]),
                1 => controller.on_key_event(codes::ALT, &[]),
                _ => controller.on_key_event(codes::MODE_CHANGE, &[]),
            }
            controller.host_mut().take_calls();

            controller.on_key_event(codes::LANGUAGE, &[]);
            assert_eq!(controller.language(), language);
            assert_eq!(controller.active_variant(), Variant::Lower);
            assert_eq!(controller.restore_target(), None);
            assert_eq!(controller.host().redraw_count(), 1);
            controller.host_mut().take_calls();
        }
    }

    /// Integration Test 4: Every state-changing event repaints exactly once
    #[test]
    fn test_one_repaint_per_visible_change() {
        let mut controller = controller();
        let sequence = [
            codes::ALT,
            codes::PC_ALT,
            codes::SHIFT,
            codes::PC_CTRL,
            codes::MODE_CHANGE,
            codes::PC_SHIFT,
            codes::MODE_CHANGE,
            codes::LANGUAGE,
        ];

        for code in sequence {
            controller.on_key_event(code, &[]);
            assert_eq!(
                controller.host().redraw_count(),
                1,
                "Code {} should repaint exactly once",
                code
            );
            controller.host_mut().take_calls();
        }
    }

    /// Integration Test 5: Meta mask survives layout changes
    #[test]
    fn test_meta_mask_persists_across_variants() {
        let mut controller = controller();
        controller.on_key_event(codes::PC_ALT, &[]);
        controller.on_key_event(codes::MODE_CHANGE, &[]);
        controller.on_key_event(codes::LANGUAGE, &[]);

        assert_eq!(controller.meta_mask(), MetaMask::ALT);

        controller.host_mut().take_calls();
        controller.on_key_event('x' as i32, &[]);
        assert_eq!(
            controller.host_mut().take_calls(),
            vec![HostCall::EmitKeyEvent(KeyEvent::press(
                keycodes::KEY_X,
                MetaMask::ALT
            ))]
        );
    }

    /// Integration Test 6: Config selects the start language and resources
    #[test]
    fn test_config_drives_initial_layout() {
        let config = Config::from_json(
            r#"{
                "default_language": "FR",
                "overlay_layout": "fn_symbols",
                "layouts": {
                    "FR": {
                        "lower": "bepo_lc",
                        "upper": "bepo_uc",
                        "lower_altgr": "bepo_lc_alt_gr",
                        "upper_altgr": "bepo_uc_alt_gr"
                    }
                }
            }"#,
        )
        .unwrap();

        let mut controller = KeyboardController::new(RecordingHost::new(), &config);
        controller.start();
        assert_eq!(applied_resource(&mut controller), "bepo_lc");

        controller.on_key_event(codes::MODE_CHANGE, &[]);
        assert_eq!(applied_resource(&mut controller), "fn_symbols");

        controller.on_key_event(codes::LANGUAGE, &[]);
        assert_eq!(applied_resource(&mut controller), "de_de_lc");
    }

    /// Integration Test 7: Queue-driven session with a reset in between
    #[tokio::test]
    async fn test_queued_session_then_reset() {
        let (mut tx, rx) = session::channel(8);
        tx.send(codes::ALT, Vec::new()).await.unwrap();
        tx.send(codes::PC_SHIFT, Vec::new()).await.unwrap();
        tx.send(codes::DONE, Vec::new()).await.unwrap();
        drop(tx);

        let mut controller = session::run(controller(), rx).await;
        assert_eq!(
            controller.host().calls().last(),
            Some(&HostCall::RequestHide)
        );
        assert_eq!(controller.active_variant(), Variant::LowerAltGr);
        assert_eq!(controller.meta_mask(), MetaMask::SHIFT);

        controller.reset();
        assert_eq!(controller.active_variant(), Variant::Lower);
        assert!(controller.meta_mask().is_empty());
    }
}
