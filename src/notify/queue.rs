//! Change-notification tokens and the producer half of the queue.

use tokio::sync::mpsc;

/// An opaque "the network changed" signal.
///
/// Carries no payload: consumers always re-read current network state rather
/// than trusting a token as a delta, so duplicate tokens are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeToken;

/// Cloneable producer handle for the notification queue.
///
/// Pushing never blocks and never fails; the channel is unbounded and
/// order-preserving. Tokens sent while no worker is draining simply
/// accumulate until one starts.
#[derive(Debug, Clone)]
pub struct ChangeSender {
    tx: mpsc::UnboundedSender<ChangeToken>,
}

impl ChangeSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ChangeToken>) -> Self {
        Self { tx }
    }

    /// Queue a change token. Errors (receiver dropped) are ignored: a
    /// notification with nobody listening is a no-op by contract.
    pub fn notify(&self) {
        let _ = self.tx.send(ChangeToken);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokens_delivered_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = ChangeSender::new(tx);

        for _ in 0..3 {
            sender.notify();
        }

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(ChangeToken));
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_notify_without_receiver_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = ChangeSender::new(tx);
        drop(rx);

        // Must not panic or error.
        sender.notify();
    }
}
