// SPDX-License-Identifier: GPL-3.0-only

//! Serialized key event queue for a keyboard session.
//!
//! The controller is single-threaded and processes one event at a time.
//! Hosts with several event sources (touch surface, hardware buttons, IPC)
//! send through cloned [`KeyEventSender`]s; [`run`] drains the shared queue
//! strictly in arrival order.
//!
//! # Example
//!
//! ```rust,ignore
//! use vkboard::session;
//!
//! let (mut tx, rx) = session::channel(64);
//! tx.send(97, Vec::new()).await?;
//! drop(tx);
//!
//! let controller = session::run(controller, rx).await;
//! ```

use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use std::fmt;

use crate::controller::KeyboardController;
use crate::host::KeyboardHost;

/// One key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// The code of the pressed key
    pub primary: i32,
    /// Touch-correction alternatives, ignored by the controller
    pub alternates: Vec<i32>,
}

/// Errors returned when queuing key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The session stopped receiving events.
    Closed,
    /// The queue is full (only from [`KeyEventSender::try_send`]).
    Full,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Closed => write!(f, "Keyboard session is closed"),
            SessionError::Full => write!(f, "Key event queue is full"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Sending side of the key event queue.
#[derive(Debug, Clone)]
pub struct KeyEventSender {
    tx: mpsc::Sender<KeyInput>,
}

impl KeyEventSender {
    /// Queues a key press, waiting for space in the queue.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has ended.
    pub async fn send(&mut self, primary: i32, alternates: Vec<i32>) -> Result<(), SessionError> {
        self.tx
            .send(KeyInput {
                primary,
                alternates,
            })
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Queues a key press without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Full`] if the queue has no space and
    /// [`SessionError::Closed`] if the session has ended.
    pub fn try_send(&mut self, primary: i32, alternates: Vec<i32>) -> Result<(), SessionError> {
        self.tx
            .try_send(KeyInput {
                primary,
                alternates,
            })
            .map_err(|e| {
                if e.is_full() {
                    SessionError::Full
                } else {
                    SessionError::Closed
                }
            })
    }
}

/// Receiving side of the key event queue.
#[derive(Debug)]
pub struct KeyEventReceiver {
    rx: mpsc::Receiver<KeyInput>,
}

/// Creates a key event queue.
#[must_use]
pub fn channel(capacity: usize) -> (KeyEventSender, KeyEventReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (KeyEventSender { tx }, KeyEventReceiver { rx })
}

/// Feeds queued events into the controller until every sender is dropped.
///
/// Returns the controller so the caller can inspect its final state.
pub async fn run<H: KeyboardHost>(
    mut controller: KeyboardController<H>,
    mut receiver: KeyEventReceiver,
) -> KeyboardController<H> {
    let mut processed = 0usize;
    while let Some(input) = receiver.rx.next().await {
        controller.on_key_event(input.primary, &input.alternates);
        processed += 1;
    }

    tracing::info!(processed, "Key event queue closed");
    controller
}

// ============================================================================
// Unit Tests
// ============================================================================
