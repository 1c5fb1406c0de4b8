//! Gated transaction lifecycle
//!
//! - [`coordinator`] - cart validation, pricing, code allocation
//! - [`reconciler`] - admin pickup/cash reconciliation and cancellation
//! - [`payment_code`] - code family generation
//! - [`money`] - decimal arithmetic helpers

pub mod coordinator;
pub mod money;
pub mod payment_code;
pub mod reconciler;

pub use coordinator::create_transaction;
pub use reconciler::{cancel, reconcile};
