//! Registry of nodes and connections plus the derived layout.

use crate::node::NodeProcess;
use crate::notify::ChangeSender;
use crate::topology::error::{TopologyError, TopologyResult};
use crate::topology::layout;
use crate::topology::types::{Connection, Position};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// The node-and-connection graph plus derived layout positions.
///
/// Mutations are driven by a single orchestration thread; the position map is
/// recomputed synchronously inside each mutating call (while the edge write
/// lock is held), so concurrent readers never observe a half-updated layout
/// and the position key set always matches the node set once a mutation
/// returns. Node state itself (online/active flags) is read concurrently from
/// the notification worker.
pub struct NetworkTopology {
    nodes: DashMap<String, Arc<NodeProcess>>,
    edges: RwLock<HashSet<Connection>>,
    positions: RwLock<HashMap<String, Position>>,
    notifier: ChangeSender,
}

impl NetworkTopology {
    pub fn new(notifier: ChangeSender) -> Self {
        Self {
            nodes: DashMap::new(),
            edges: RwLock::new(HashSet::new()),
            positions: RwLock::new(HashMap::new()),
            notifier,
        }
    }

    /// Add a default node, synthesizing `"Node {count}"` when no name is
    /// given. Requested connections are applied atomically with the add: if
    /// any target is invalid, nothing is mutated.
    pub fn add_node(
        &self,
        name: Option<&str>,
        connections: &[&str],
    ) -> TopologyResult<Arc<NodeProcess>> {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Node {}", self.nodes.len()),
        };
        self.insert_node(NodeProcess::new(name), connections)
    }

    /// Register a pre-built node, wiring it into the notification channel.
    /// All-or-nothing with respect to the requested connections.
    pub fn insert_node(
        &self,
        node: NodeProcess,
        connections: &[&str],
    ) -> TopologyResult<Arc<NodeProcess>> {
        let name = node.name().to_string();
        if self.nodes.contains_key(&name) {
            return Err(TopologyError::DuplicateName(name));
        }

        // Validate every requested connection before touching the registry.
        for target in connections {
            if *target == name {
                return Err(TopologyError::SelfConnection(name));
            }
            if !self.nodes.contains_key(*target) {
                return Err(TopologyError::NodeNotFound(target.to_string()));
            }
        }

        node.set_notifier(self.notifier.clone());
        let node = Arc::new(node);
        self.nodes.insert(name.clone(), Arc::clone(&node));

        let mut edges = self.edges.write();
        for target in connections {
            edges.insert(Connection::new(name.as_str(), *target));
        }
        self.recompute_layout(&edges);
        drop(edges);

        self.notifier.notify();
        Ok(node)
    }

    /// Remove a node and every connection touching it. Nodes are destroyed
    /// only while offline.
    pub fn remove_node(&self, name: &str) -> TopologyResult<Arc<NodeProcess>> {
        let node = self
            .nodes
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| TopologyError::NodeNotFound(name.to_string()))?;

        if node.is_online() {
            return Err(TopologyError::NodeOnline(name.to_string()));
        }

        self.nodes.remove(name);

        let mut edges = self.edges.write();
        edges.retain(|edge| !edge.touches(name));
        self.recompute_layout(&edges);
        drop(edges);

        self.notifier.notify();
        Ok(node)
    }

    /// Connect two existing, distinct nodes. Idempotent: adding an existing
    /// edge is a no-op.
    pub fn add_connection(&self, a: &str, b: &str) -> TopologyResult<()> {
        if a == b {
            return Err(TopologyError::SelfConnection(a.to_string()));
        }
        for endpoint in [a, b] {
            if !self.nodes.contains_key(endpoint) {
                return Err(TopologyError::NodeNotFound(endpoint.to_string()));
            }
        }

        let mut edges = self.edges.write();
        if !edges.insert(Connection::new(a, b)) {
            return Ok(());
        }
        self.recompute_layout(&edges);
        drop(edges);

        self.notifier.notify();
        Ok(())
    }

    pub fn remove_connection(&self, a: &str, b: &str) -> TopologyResult<()> {
        let mut edges = self.edges.write();
        if !edges.remove(&Connection::new(a, b)) {
            return Err(TopologyError::ConnectionNotFound(
                a.to_string(),
                b.to_string(),
            ));
        }
        self.recompute_layout(&edges);
        drop(edges);

        self.notifier.notify();
        Ok(())
    }

    pub fn node(&self, name: &str) -> Option<Arc<NodeProcess>> {
        self.nodes.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of all nodes, sorted by name for deterministic iteration.
    pub fn nodes(&self) -> Vec<Arc<NodeProcess>> {
        let mut nodes: Vec<_> = self
            .nodes
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        nodes.sort_by(|a, b| a.name().cmp(b.name()));
        nodes
    }

    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.nodes.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn connections(&self) -> Vec<Connection> {
        self.edges.read().iter().cloned().collect()
    }

    pub fn has_connection(&self, a: &str, b: &str) -> bool {
        self.edges.read().contains(&Connection::new(a, b))
    }

    pub fn connection_count(&self) -> usize {
        self.edges.read().len()
    }

    /// Current layout snapshot. Consistent with the node set as of the last
    /// completed mutation.
    pub fn positions(&self) -> HashMap<String, Position> {
        self.positions.read().clone()
    }

    pub fn position(&self, name: &str) -> Option<Position> {
        self.positions.read().get(name).copied()
    }

    fn recompute_layout(&self, edges: &HashSet<Connection>) {
        let names = self.node_names();
        *self.positions.write() = layout::spring_layout(&names, edges);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationWorker;

    fn topology() -> NetworkTopology {
        NetworkTopology::new(NotificationWorker::new().sender())
    }

    #[test]
    fn test_synthesized_names() {
        let topo = topology();

        let first = topo.add_node(None, &[]).unwrap();
        let second = topo.add_node(None, &[]).unwrap();

        assert_eq!(first.name(), "Node 0");
        assert_eq!(second.name(), "Node 1");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let topo = topology();
        topo.add_node(Some("A"), &[]).unwrap();

        let result = topo.add_node(Some("A"), &[]);
        assert!(matches!(result, Err(TopologyError::DuplicateName(_))));
        assert_eq!(topo.node_count(), 1);
    }

    #[test]
    fn test_add_node_with_connections() {
        let topo = topology();
        topo.add_node(Some("A"), &[]).unwrap();
        topo.add_node(Some("B"), &["A"]).unwrap();

        assert!(topo.has_connection("A", "B"));
        assert_eq!(topo.connection_count(), 1);
    }

    #[test]
    fn test_add_node_with_bad_target_is_all_or_nothing() {
        let topo = topology();
        topo.add_node(Some("A"), &[]).unwrap();

        let result = topo.add_node(Some("B"), &["A", "missing"]);
        assert!(matches!(result, Err(TopologyError::NodeNotFound(_))));

        // Nothing was left behind.
        assert!(!topo.contains_node("B"));
        assert_eq!(topo.connection_count(), 0);
        assert_eq!(topo.positions().len(), 1);
    }

    #[test]
    fn test_add_connection_requires_existing_endpoints() {
        let topo = topology();
        topo.add_node(Some("A"), &[]).unwrap();

        let result = topo.add_connection("A", "B");
        assert!(matches!(result, Err(TopologyError::NodeNotFound(_))));
    }

    #[test]
    fn test_self_connection_rejected() {
        let topo = topology();
        topo.add_node(Some("A"), &[]).unwrap();

        let result = topo.add_connection("A", "A");
        assert!(matches!(result, Err(TopologyError::SelfConnection(_))));
    }

    #[test]
    fn test_add_connection_is_idempotent() {
        let topo = topology();
        topo.add_node(Some("A"), &[]).unwrap();
        topo.add_node(Some("B"), &[]).unwrap();

        topo.add_connection("A", "B").unwrap();
        topo.add_connection("B", "A").unwrap();

        assert_eq!(topo.connection_count(), 1);
    }

    #[test]
    fn test_remove_connection() {
        let topo = topology();
        topo.add_node(Some("A"), &[]).unwrap();
        topo.add_node(Some("B"), &["A"]).unwrap();

        topo.remove_connection("A", "B").unwrap();
        assert_eq!(topo.connection_count(), 0);

        let result = topo.remove_connection("A", "B");
        assert!(matches!(result, Err(TopologyError::ConnectionNotFound(..))));
    }

    #[test]
    fn test_remove_node_cascades_connections() {
        let topo = topology();
        topo.add_node(Some("A"), &[]).unwrap();
        topo.add_node(Some("B"), &["A"]).unwrap();
        topo.add_node(Some("C"), &["B"]).unwrap();

        topo.remove_node("B").unwrap();

        assert_eq!(topo.node_names(), vec!["A", "C"]);
        assert_eq!(topo.connection_count(), 0);
    }

    #[test]
    fn test_remove_missing_node() {
        let topo = topology();
        let result = topo.remove_node("ghost");
        assert!(matches!(result, Err(TopologyError::NodeNotFound(_))));
    }

    #[test]
    fn test_positions_track_node_set_through_mutations() {
        let topo = topology();

        topo.add_node(Some("A"), &[]).unwrap();
        topo.add_node(Some("B"), &["A"]).unwrap();
        topo.add_node(Some("C"), &[]).unwrap();
        topo.add_connection("B", "C").unwrap();
        topo.remove_connection("A", "B").unwrap();
        topo.remove_node("A").unwrap();

        let mut keys: Vec<_> = topo.positions().into_keys().collect();
        keys.sort();
        assert_eq!(keys, topo.node_names());
    }

    #[test]
    fn test_insert_prebuilt_node() {
        let topo = topology();
        let node = NodeProcess::builder("custom").port(9100).build();

        let registered = topo.insert_node(node, &[]).unwrap();
        assert_eq!(registered.port(), 9100);
        assert!(topo.contains_node("custom"));
    }
}
