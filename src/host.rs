// SPDX-License-Identifier: GPL-3.0-only

//! The host capability interface.
//!
//! The controller never renders or talks to an editor itself. Everything it
//! produces goes through a [`KeyboardHost`] implemented by the host adapter
//! and injected into the controller.

use crate::input::KeyEvent;
use crate::layout::ActiveLayout;

/// Operations the controller may request from the host.
pub trait KeyboardHost {
    /// Re-render the keyboard using `layout`.
    fn apply_variant(&mut self, layout: &ActiveLayout);

    /// Repaint modifier indicators without changing the variant.
    fn request_redraw(&mut self);

    /// Commit text to the focused editor.
    fn commit_text(&mut self, text: &str);

    /// Deliver a synthesized key event to the focused editor.
    fn emit_key_event(&mut self, event: KeyEvent);

    /// Dismiss the input surface.
    fn request_hide(&mut self);
}

/// A single call made on a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ApplyVariant(ActiveLayout),
    RequestRedraw,
    CommitText(String),
    EmitKeyEvent(KeyEvent),
    RequestHide,
}

/// Host that records every call, for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded calls.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Returns the recorded calls and clears the record.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Counts calls that asked the host to repaint (variant or indicators).
    #[must_use]
    pub fn redraw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::ApplyVariant(_) | HostCall::RequestRedraw))
            .count()
    }
}

impl KeyboardHost for RecordingHost {
    fn apply_variant(&mut self, layout: &ActiveLayout) {
        self.calls.push(HostCall::ApplyVariant(layout.clone()));
    }

    fn request_redraw(&mut self) {
        self.calls.push(HostCall::RequestRedraw);
    }

    fn commit_text(&mut self, text: &str) {
        self.calls.push(HostCall::CommitText(text.to_string()));
    }

    fn emit_key_event(&mut self, event: KeyEvent) {
        self.calls.push(HostCall::EmitKeyEvent(event));
    }

    fn request_hide(&mut self) {
        self.calls.push(HostCall::RequestHide);
    }
}
