//! User-facing cart notifications.
//!
//! Cart operations never return errors to their caller. Anything the user
//! should see is pushed through a [`Notifier`] instead, fire-and-forget.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

/// A user-facing warning emitted by a cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// Requested quantity is more than the remote stock.
    OutOfStock,
    /// Adding a product failed (remote lookup or storage).
    AddFailed,
    /// Removing a product failed (not in the cart, or storage).
    RemoveFailed,
    /// Changing a product's amount failed (remote lookup, absent product, or storage).
    UpdateFailed,
}

impl Notification {
    /// Message shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::OutOfStock => "Quantidade solicitada fora de estoque",
            Self::AddFailed => "Erro na adição do produto",
            Self::RemoveFailed => "Erro na remoção do produto",
            Self::UpdateFailed => "Erro na alteração de quantidade do produto",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Must not block.
    fn notify(&self, notification: Notification);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::warn!(kind = ?notification, "{notification}");
    }
}

/// Notifier that forwards into an unbounded channel for a UI to drain.
///
/// Notifications are also logged. If the receiving side is gone the
/// notification is dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver the UI drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification);
        if self.tx.send(notification).is_err() {
            tracing::debug!(kind = ?notification, "Notification receiver dropped");
        }
    }
}

/// Collect everything currently queued on a notification receiver.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut drained = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        drained.push(notification);
    }
    drained
}
