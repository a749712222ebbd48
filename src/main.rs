use meshwatch::{Network, NetworkConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("meshwatch - simulated endpoint network");
    println!("======================================\n");

    let network = Network::with_config(NetworkConfig::default());

    // Demo topology: A-B and B-C.
    let topology = network.topology();
    topology.add_node(Some("A"), &[])?;
    topology.add_node(Some("B"), &["A"])?;
    topology.add_node(Some("C"), &["B"])?;
    if let Some(b) = topology.node("B") {
        b.set_latency(Duration::from_millis(500));
    }

    network.set_callback(|topology| {
        let active: Vec<String> = topology
            .nodes()
            .iter()
            .filter(|node| node.is_active())
            .map(|node| node.name().to_string())
            .collect();
        println!(
            "network changed: {} node(s), {} connection(s), active: {:?}",
            topology.node_count(),
            topology.connection_count(),
            active
        );
    });

    network.start().await?;

    println!("✓ Network started:");
    for node in network.topology().nodes() {
        println!("  - {} listening on http://{}", node.name(), node.bind_addr());
    }
    println!("\nSend requests to any node to see activity notifications.");
    println!("Press Ctrl+C to stop.\n");

    tokio::signal::ctrl_c().await?;

    println!("\nStopping network...");
    network.stop().await?;
    println!("✓ All nodes offline, notification worker joined.");

    Ok(())
}
