//! The HTTP endpoint service a node lifecycle wrapper starts and stops.
//!
//! The service invokes the node's request-intercept hooks around every
//! request it handles and applies the node's configured simulated latency;
//! the business logic itself is a stand-in (nodes do not call each other).

use crate::node::process::NodeProcess;
use crate::node::types::{NodeReply, NodeStatus};
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the request router for one node.
pub fn router(node: Arc<NodeProcess>) -> Router {
    Router::new()
        .route("/", get(serve_request))
        .route("/status", get(node_status))
        .route("/health", get(health_check))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&node),
            track_activity,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(node)
}

/// Flip the node's activity flag around every handled request, emitting a
/// change notification on each transition. The after-hook runs regardless of
/// the handler's outcome.
async fn track_activity(
    State(node): State<Arc<NodeProcess>>,
    request: Request,
    next: Next,
) -> Response {
    node.begin_request();
    let response = next.run(request).await;
    node.end_request();
    response
}

async fn serve_request(State(node): State<Arc<NodeProcess>>) -> Json<NodeReply> {
    let latency = node.latency();
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }

    Json(NodeReply {
        node: node.name().to_string(),
        message: "Generic node.".to_string(),
    })
}

async fn node_status(State(node): State<Arc<NodeProcess>>) -> Json<NodeStatus> {
    Json(NodeStatus {
        name: node.name().to_string(),
        address: node.address().to_string(),
        port: node.port(),
        online: node.is_online(),
        active: node.is_active(),
        latency_ms: node.latency().as_millis() as u64,
    })
}

async fn health_check() -> &'static str {
    "OK"
}
