use meshwatch::{Network, NetworkConfig};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, Duration};

fn free_base_port() -> u16 {
    let probe = TcpListener::bind("127.0.0.1:0").unwrap();
    probe.local_addr().unwrap().port()
}

fn test_network(window: u16) -> Network {
    Network::with_config(NetworkConfig {
        base_port: free_base_port(),
        port_window: window,
        ..NetworkConfig::default()
    })
}

async fn http_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

/// Full lifecycle: topology with connections, start, live HTTP traffic
/// driving the activity/notification pipeline, stop.
#[tokio::test]
async fn test_full_network_lifecycle() {
    let network = test_network(10);
    let topology = network.topology();

    topology.add_node(Some("A"), &[]).unwrap();
    topology.add_node(Some("B"), &["A"]).unwrap();
    topology.add_node(Some("C"), &["B"]).unwrap();

    let notifications = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&notifications);
    network.set_callback(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });

    network.start().await.unwrap();
    assert!(network.is_running());
    for node in topology.nodes() {
        assert!(node.is_online());
    }

    // Positions cover exactly the node set.
    let mut keys: Vec<_> = topology.positions().into_keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["A", "B", "C"]);

    // Drive a real request through one node's endpoint.
    let a = topology.node("A").unwrap();
    sleep(Duration::from_millis(20)).await;
    let before = notifications.load(Ordering::SeqCst);

    let response = http_get(a.bind_addr(), "/").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"node\":\"A\""));

    // One request produced a begin/end activity pair.
    sleep(Duration::from_millis(50)).await;
    assert_eq!(notifications.load(Ordering::SeqCst) - before, 2);
    assert!(!a.is_active());

    network.stop().await.unwrap();
    assert!(!network.is_running());
    for node in topology.nodes() {
        assert!(!node.is_online());
    }
}

#[tokio::test]
async fn test_nodes_receive_distinct_ports_within_window() {
    let network = test_network(10);
    for i in 0..5 {
        network
            .topology()
            .add_node(Some(&format!("n{i}")), &[])
            .unwrap();
    }

    network.start().await.unwrap();

    let base = network.config().base_port;
    let mut ports: Vec<u16> = network
        .topology()
        .nodes()
        .iter()
        .map(|node| node.port())
        .collect();
    ports.sort_unstable();
    ports.dedup();

    assert_eq!(ports.len(), 5);
    for port in ports {
        assert!(port >= base && port < base + 10);
    }

    network.stop().await.unwrap();
}

#[tokio::test]
async fn test_port_exhaustion_fails_only_the_colliding_node() {
    let base = free_base_port();
    let _blocker = TcpListener::bind(("127.0.0.1", base + 1)).unwrap();

    let network = Network::with_config(NetworkConfig {
        base_port: base,
        port_window: 2,
        ..NetworkConfig::default()
    });
    network.topology().add_node(Some("A"), &[]).unwrap();
    network.topology().add_node(Some("B"), &[]).unwrap();

    assert!(network.start().await.is_err());
    assert!(network.topology().node("A").unwrap().is_online());
    assert!(!network.topology().node("B").unwrap().is_online());

    network.stop().await.unwrap();
}

#[tokio::test]
async fn test_remove_hub_node_empties_connections() {
    let network = test_network(10);
    let topology = network.topology();

    topology.add_node(Some("A"), &[]).unwrap();
    topology.add_node(Some("B"), &["A"]).unwrap();
    topology.add_node(Some("C"), &["B"]).unwrap();

    topology.remove_node("B").unwrap();

    assert_eq!(topology.node_names(), vec!["A", "C"]);
    assert_eq!(topology.connection_count(), 0);

    let mut keys: Vec<_> = topology.positions().into_keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["A", "C"]);
}

#[tokio::test]
async fn test_latency_applied_to_live_requests() {
    let network = test_network(10);
    let node = network.topology().add_node(Some("slow"), &[]).unwrap();
    node.set_latency(Duration::from_millis(150));

    network.start().await.unwrap();

    let started = std::time::Instant::now();
    let response = http_get(node.bind_addr(), "/").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(started.elapsed() >= Duration::from_millis(150));

    network.stop().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_requests_always_settle_inactive() {
    let network = test_network(10);
    let node = network.topology().add_node(Some("busy"), &[]).unwrap();
    node.set_latency(Duration::from_millis(30));

    let notifications = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&notifications);
    network.set_callback(move |_| {
        counted.fetch_add(1, Ordering::SeqCst);
    });

    network.start().await.unwrap();
    sleep(Duration::from_millis(20)).await;
    let before = notifications.load(Ordering::SeqCst);

    let addr = node.bind_addr();
    let mut handles = Vec::new();
    for _ in 0..6 {
        handles.push(tokio::spawn(async move { http_get(addr, "/").await }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().starts_with("HTTP/1.1 200"));
    }

    sleep(Duration::from_millis(50)).await;
    assert!(!node.is_active());
    assert_eq!(notifications.load(Ordering::SeqCst) - before, 12);

    network.stop().await.unwrap();
}

#[tokio::test]
async fn test_status_endpoint_reflects_lifecycle() {
    let network = test_network(10);
    let node = network.topology().add_node(Some("probe"), &[]).unwrap();

    network.start().await.unwrap();

    let response = http_get(node.bind_addr(), "/status").await;
    assert!(response.contains("\"online\":true"));
    assert!(response.contains("\"name\":\"probe\""));

    network.stop().await.unwrap();
}
