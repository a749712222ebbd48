//! Background worker draining the notification queue into a callback.

use crate::notify::queue::{ChangeSender, ChangeToken};
use crate::topology::NetworkTopology;
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Callback invoked with the current network state on every drained token.
///
/// Runs on the worker task, so it must not block indefinitely. The token
/// itself carries no payload; the callback re-reads whatever it needs from
/// the topology it is handed.
pub type ChangeCallback = Arc<dyn Fn(&NetworkTopology) + Send + Sync>;

/// Owns the notification channel and the task that drains it.
///
/// Exactly one worker consumes the queue, strictly in FIFO order. The
/// callback is optional and replaceable at any time (last write wins; an
/// in-flight invocation keeps whichever callback was current when it was
/// dispatched). With no callback set, tokens are drained and discarded.
pub struct NotificationWorker {
    tx: mpsc::UnboundedSender<ChangeToken>,
    /// Receiver parked here while the worker is not running; the worker task
    /// hands it back on exit so the worker can be restarted.
    rx: Mutex<Option<mpsc::UnboundedReceiver<ChangeToken>>>,
    callback: Arc<RwLock<Option<ChangeCallback>>>,
    running: Arc<AtomicBool>,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
    handle: Mutex<Option<JoinHandle<mpsc::UnboundedReceiver<ChangeToken>>>>,
}

impl NotificationWorker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
            callback: Arc::new(RwLock::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    /// Producer handle feeding this worker's queue.
    pub fn sender(&self) -> ChangeSender {
        ChangeSender::new(self.tx.clone())
    }

    /// Replace the registered callback. Last write wins.
    pub fn set_callback(&self, callback: ChangeCallback) {
        *self.callback.write() = Some(callback);
    }

    /// Unset the callback; subsequent tokens are drained and discarded.
    pub fn clear_callback(&self) {
        *self.callback.write() = None;
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the drain task. No-op if already running.
    ///
    /// Each drained token invokes the callback with `topology` as the current
    /// network state. Callback panics are caught and logged so one faulty
    /// observer cannot stop the worker.
    pub fn start(&self, topology: Arc<NetworkTopology>) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let Some(mut rx) = self.rx.lock().take() else {
            // Receiver still held by a task that has not returned it yet.
            self.running.store(false, Ordering::SeqCst);
            tracing::warn!("notification worker receiver unavailable; start skipped");
            return;
        };

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let callback = Arc::clone(&self.callback);
        let running = Arc::clone(&self.running);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    token = rx.recv() => match token {
                        Some(ChangeToken) => {
                            let current = callback.read().clone();
                            if let Some(cb) = current {
                                let outcome =
                                    catch_unwind(AssertUnwindSafe(|| cb(&topology)));
                                if outcome.is_err() {
                                    tracing::warn!("network change callback panicked");
                                }
                            }
                        }
                        // All senders dropped; nothing left to drain.
                        None => break,
                    },
                }
            }
            running.store(false, Ordering::SeqCst);
            rx
        });

        *self.shutdown.lock() = Some(stop_tx);
        *self.handle.lock() = Some(handle);
    }

    /// Signal the drain task to exit and wait for it to terminate.
    ///
    /// Race-free by construction: the shutdown signal is observed by the
    /// `select!` immediately, and the join completes before this returns.
    /// No-op if the worker is not running.
    pub async fn stop(&self) {
        if let Some(stop_tx) = self.shutdown.lock().take() {
            let _ = stop_tx.send(true);
        }

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            match handle.await {
                Ok(rx) => *self.rx.lock() = Some(rx),
                Err(e) => tracing::warn!("notification worker task failed: {e}"),
            }
        }

        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for NotificationWorker {
    fn default() -> Self {
        Self::new()
    }
}
