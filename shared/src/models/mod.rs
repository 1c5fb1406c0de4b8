//! Domain models
//!
//! Entities mirror the SQLite schema; enum fields are stored as
//! snake_case TEXT.

mod admin;
mod member;
mod product;
mod transaction;

pub use admin::{Admin, AdminRole};
pub use member::{IdentityRecord, Member, MembershipTier, VerificationStatus};
pub use product::Product;
pub use transaction::{
    LineItem, PaymentMethod, PickupAction, Transaction, TransactionStatus,
};
