//! Shared types for the Verdant platform
//!
//! Domain models, request/response DTOs and small utilities used by both
//! the server and any client crates. No I/O lives here.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
