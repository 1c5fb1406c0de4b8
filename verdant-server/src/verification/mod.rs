//! Identity verification
//!
//! - [`gate`] - registration-time verification gate
//! - [`review`] - admin approve/reject process
//! - [`age`] - exact-age arithmetic

pub mod age;
pub mod gate;
pub mod review;

pub use gate::{RegisterSubmission, RegisteredMember, hash_password, register, verify_password};
