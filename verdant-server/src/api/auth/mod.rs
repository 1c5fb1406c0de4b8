use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

mod handler;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/admin/login", post(handler::admin_login))
        .route("/api/auth/me", get(handler::me))
}
