//! Member and identity verification models

use serde::{Deserialize, Serialize};

/// Verification state of a member's identity record.
///
/// Only `Approved` members may transact. The transition into `Approved`
/// or `Rejected` always goes through an explicit admin review; registration
/// never yields `Approved` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum VerificationStatus {
    Pending,
    NeedsMedical,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::NeedsMedical => "needs_medical",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership tier. Affects catalog feature access, not verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum MembershipTier {
    Basic,
    Premium,
}

impl MembershipTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
        }
    }
}

/// Member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    /// ISO calendar date, `YYYY-MM-DD`
    pub date_of_birth: String,
    pub membership_tier: MembershipTier,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-member verification record (1:1 with [`Member`]).
///
/// Never deleted; mutated only by the admin review flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct IdentityRecord {
    pub member_id: i64,
    pub status: VerificationStatus,
    /// Age computed from date of birth at registration time
    pub age_verified: i64,
    pub requires_medical: bool,
    /// Opaque blob-store reference, ID document front
    pub id_front_ref: String,
    /// Opaque blob-store reference, ID document back
    pub id_back_ref: String,
    /// Opaque blob-store reference, medical document (required iff `requires_medical`)
    pub medical_ref: Option<String>,
    /// Guardian contact (required iff `requires_medical`)
    pub guardian_email: Option<String>,
    pub rejected_reason: Option<String>,
    pub verified_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}
