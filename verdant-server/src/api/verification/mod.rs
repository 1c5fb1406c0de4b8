use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

mod handler;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/verification/status", get(handler::status))
        .route("/api/admin/verify", post(handler::verify))
        .route("/api/admin/verifications", get(handler::list_verifications))
}
