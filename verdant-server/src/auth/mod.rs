//! Authentication and authorization
//!
//! - [`JwtService`] - token service
//! - [`CurrentUser`] / [`CurrentMember`] / [`CurrentAdmin`] - request principals
//! - [`require_auth`] - router-level authentication middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::{CurrentAdmin, CurrentMember};
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, Principal};
pub use middleware::require_auth;
