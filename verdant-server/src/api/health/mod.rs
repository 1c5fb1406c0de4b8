use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::core::ServerState;

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "verdant-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}
