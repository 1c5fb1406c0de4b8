//! Client-related types shared between server and client
//!
//! Common request/response types used in API communication.

use serde::{Deserialize, Serialize};

use crate::models::{PaymentMethod, PickupAction, TransactionStatus, VerificationStatus};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request (member and admin variants share the shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Principal information embedded in auth responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    /// "member" or "admin"
    pub principal: String,
    pub role: String,
}

/// Registration outcome. The token is scoped to the new member; the
/// verification status tells the client whether it must wait for review
/// or also upload medical paperwork.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
    pub member_id: i64,
    pub status: VerificationStatus,
    pub requires_medical: bool,
}

// =============================================================================
// Verification API DTOs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Admin review request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub member_id: i64,
    pub decision: ReviewDecision,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A member's own view of their verification state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationStatusResponse {
    pub status: VerificationStatus,
    pub requires_medical: bool,
    pub rejected_reason: Option<String>,
    pub verified_at: Option<i64>,
}

// =============================================================================
// Transaction API DTOs
// =============================================================================

/// One cart line as submitted by the client. Prices are never accepted
/// from the client; only the product reference and quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub items: Vec<CartItemInput>,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    pub payment_code: String,
    pub total: f64,
    pub status: TransactionStatus,
}

/// Admin pickup reconciliation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupRequest {
    pub payment_code: String,
    pub action: PickupAction,
    #[serde(default)]
    pub notes: Option<String>,
}
