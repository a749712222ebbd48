//! Lifecycle wrapper around one simulated endpoint process.

use crate::node::error::{NodeError, NodeResult};
use crate::node::service;
use crate::node::types::NodeState;
use crate::notify::ChangeSender;
use crate::port::{DEFAULT_BIND_ADDRESS, DEFAULT_START_PORT};
use parking_lot::{Mutex, RwLock};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct ServerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// One simulated network endpoint: identity, bind target, simulated latency,
/// and the background server that serves its requests.
///
/// The name is immutable and serves as the registry primary key. The bind
/// target may only change while offline. `start`/`stop` own the server task;
/// `stop` does not return until that task has fully terminated.
pub struct NodeProcess {
    name: String,
    host: RwLock<SocketAddr>,
    latency: RwLock<Duration>,
    state: AtomicU8,
    active: AtomicBool,
    notifier: RwLock<Option<ChangeSender>>,
    server: Mutex<Option<ServerHandle>>,
}

impl NodeProcess {
    /// Create an offline node with the default bind target and zero latency.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: RwLock::new(SocketAddr::new(DEFAULT_BIND_ADDRESS, DEFAULT_START_PORT)),
            latency: RwLock::new(Duration::ZERO),
            state: AtomicU8::new(NodeState::Offline as u8),
            active: AtomicBool::new(false),
            notifier: RwLock::new(None),
            server: Mutex::new(None),
        }
    }

    pub fn builder(name: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> NodeState {
        NodeState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: NodeState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// Whether the background server is running.
    pub fn is_online(&self) -> bool {
        self.state() == NodeState::Online
    }

    /// Whether a request is currently in flight.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        *self.host.read()
    }

    pub fn address(&self) -> IpAddr {
        self.host.read().ip()
    }

    pub fn port(&self) -> u16 {
        self.host.read().port()
    }

    pub fn latency(&self) -> Duration {
        *self.latency.read()
    }

    /// Change the bind target. Only legal while the node is offline.
    pub fn set_host(&self, address: IpAddr, port: u16) -> NodeResult<()> {
        if self.state() != NodeState::Offline {
            return Err(NodeError::HostLocked(self.name.clone()));
        }
        *self.host.write() = SocketAddr::new(address, port);
        Ok(())
    }

    /// Set the simulated per-request latency. Takes effect on the next
    /// served request.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write() = latency;
    }

    /// Wire the notification channel this node reports activity on.
    pub fn set_notifier(&self, sender: ChangeSender) {
        *self.notifier.write() = Some(sender);
    }

    /// Request-intercept hook: a request is about to be handled.
    pub fn begin_request(&self) {
        self.active.store(true, Ordering::SeqCst);
        self.notify();
    }

    /// Request-intercept hook: a request finished (successfully or not).
    pub fn end_request(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.notify();
    }

    fn notify(&self) {
        if let Some(sender) = self.notifier.read().as_ref() {
            sender.notify();
        }
    }

    /// Start the endpoint server on the configured bind target.
    ///
    /// No-op if the node is not offline. Binds the listener before spawning,
    /// so a returned `Ok` means the node is listening; a bind failure leaves
    /// the node offline and is surfaced to the caller. Binding port 0 records
    /// the actual assigned port back into the host configuration.
    pub async fn start(self: &Arc<Self>) -> NodeResult<()> {
        if self.state() != NodeState::Offline {
            return Ok(());
        }
        self.set_state(NodeState::Starting);

        let addr = self.bind_addr();
        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(source) => {
                self.set_state(NodeState::Offline);
                return Err(NodeError::Bind {
                    name: self.name.clone(),
                    addr,
                    source,
                });
            }
        };

        if let Ok(local) = listener.local_addr() {
            *self.host.write() = local;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let app = service::router(Arc::clone(self));
        let name = self.name.clone();

        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            });
            if let Err(e) = serve.await {
                tracing::warn!("node '{name}' server exited with error: {e}");
            }
        });

        *self.server.lock() = Some(ServerHandle {
            shutdown: shutdown_tx,
            task,
        });
        self.set_state(NodeState::Online);
        tracing::debug!("node '{}' online at {}", self.name, self.bind_addr());
        Ok(())
    }

    /// Gracefully stop the endpoint server and wait for its task to
    /// terminate. In-flight requests are allowed to finish; no background
    /// work survives a returned `stop()`. No-op if the node is not online.
    pub async fn stop(&self) -> NodeResult<()> {
        if self.state() != NodeState::Online {
            return Ok(());
        }
        self.set_state(NodeState::Stopping);

        let handle = self.server.lock().take();
        let joined = match handle {
            Some(handle) => {
                let _ = handle.shutdown.send(true);
                handle.task.await
            }
            None => Ok(()),
        };

        self.set_state(NodeState::Offline);
        tracing::debug!("node '{}' offline", self.name);

        joined.map_err(|e| NodeError::Shutdown {
            name: self.name.clone(),
            reason: e.to_string(),
        })
    }
}

/// Builder for node processes.
pub struct NodeBuilder {
    name: String,
    address: IpAddr,
    port: u16,
    latency: Duration,
}

impl NodeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: DEFAULT_BIND_ADDRESS,
            port: DEFAULT_START_PORT,
            latency: Duration::ZERO,
        }
    }

    pub fn address(mut self, address: IpAddr) -> Self {
        self.address = address;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn build(self) -> NodeProcess {
        let node = NodeProcess::new(self.name);
        *node.host.write() = SocketAddr::new(self.address, self.port);
        *node.latency.write() = self.latency;
        node
    }
}
