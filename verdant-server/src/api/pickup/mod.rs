use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

mod handler;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/pickup", put(handler::pickup))
        .route(
            "/api/admin/transactions/{payment_code}",
            get(handler::lookup),
        )
        .route(
            "/api/admin/transactions/{payment_code}/cancel",
            post(handler::cancel),
        )
        .route(
            "/api/admin/transactions/{payment_code}/notes",
            post(handler::add_note),
        )
}
