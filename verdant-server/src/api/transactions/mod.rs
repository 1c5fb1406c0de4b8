use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

mod handler;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/transactions",
            post(handler::create).get(handler::list_own),
        )
        .route("/api/transactions/{id}/items", get(handler::list_items))
}
