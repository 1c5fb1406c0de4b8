//! API route modules
//!
//! # Structure
//!
//! - [`auth`] - registration and login
//! - [`health`] - liveness check
//! - [`verification`] - member status view + admin review
//! - [`transactions`] - member transaction creation/history
//! - [`pickup`] - admin reconciliation endpoints

pub mod auth;
pub mod health;
pub mod pickup;
pub mod transactions;
pub mod verification;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
