//! Composition root: topology, notification worker, and port allocation
//! orchestrated as one unit.

use crate::network::error::{NetworkError, NetworkResult};
use crate::network::types::NetworkConfig;
use crate::node::NodeError;
use crate::notify::{ChangeCallback, NotificationWorker};
use crate::port::PortAllocator;
use crate::topology::NetworkTopology;
use std::sync::Arc;

/// A simulated network: the node/connection registry, the change-notification
/// pipeline, and start/stop orchestration over all of it.
pub struct Network {
    config: NetworkConfig,
    topology: Arc<NetworkTopology>,
    worker: Arc<NotificationWorker>,
    allocator: PortAllocator,
}

impl Network {
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }

    pub fn with_config(config: NetworkConfig) -> Self {
        let worker = Arc::new(NotificationWorker::new());
        let topology = Arc::new(NetworkTopology::new(worker.sender()));
        let allocator =
            PortAllocator::new(config.bind_address, config.base_port, config.port_window);

        Self {
            config,
            topology,
            worker,
            allocator,
        }
    }

    pub fn topology(&self) -> &Arc<NetworkTopology> {
        &self.topology
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Whether the notification worker is draining the queue.
    pub fn is_running(&self) -> bool {
        self.worker.is_running()
    }

    /// Register the observer callback. Replaceable at any time, running or
    /// not; last write wins. An in-flight invocation keeps whichever callback
    /// was current when it was dispatched.
    pub fn set_callback(&self, callback: impl Fn(&NetworkTopology) + Send + Sync + 'static) {
        self.worker.set_callback(Arc::new(callback) as ChangeCallback);
    }

    pub fn clear_callback(&self) {
        self.worker.clear_callback();
    }

    /// Start the notification worker, then every registered node in name
    /// order, allocating a port per node when configured to.
    ///
    /// The first node failure propagates immediately. Nodes already started
    /// stay started and the worker stays up; callers reach a clean state by
    /// calling [`stop`](Self::stop).
    pub async fn start(&self) -> NetworkResult<()> {
        self.worker.start(Arc::clone(&self.topology));

        for node in self.topology.nodes() {
            if node.is_online() {
                continue;
            }

            if self.config.auto_assign_ports {
                // Earlier nodes hold their binds, so probing from the base
                // port again lands each node on a distinct port.
                let port = self
                    .allocator
                    .allocate()
                    .map_err(|e| NetworkError::NodeStart {
                        name: node.name().to_string(),
                        source: NodeError::from(e),
                    })?;
                node.set_host(self.config.bind_address, port)
                    .map_err(|e| NetworkError::NodeStart {
                        name: node.name().to_string(),
                        source: e,
                    })?;
            }

            node.start().await.map_err(|e| NetworkError::NodeStart {
                name: node.name().to_string(),
                source: e,
            })?;
        }

        Ok(())
    }

    /// Stop every node, then the notification worker.
    ///
    /// Best-effort: nodes are stopped concurrently, an individual failure
    /// never blocks the others, and all failures are reported together at the
    /// end. Calling `stop` on a stopped network is a no-op.
    pub async fn stop(&self) -> NetworkResult<()> {
        let nodes = self.topology.nodes();
        let results = futures::future::join_all(nodes.iter().map(|node| node.stop())).await;

        let errors: Vec<(String, NodeError)> = nodes
            .iter()
            .zip(results)
            .filter_map(|(node, result)| {
                result.err().map(|e| (node.name().to_string(), e))
            })
            .collect();

        self.worker.stop().await;

        if errors.is_empty() {
            Ok(())
        } else {
            Err(NetworkError::Shutdown {
                failed: errors.len(),
                errors,
            })
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
