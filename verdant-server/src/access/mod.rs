//! Access gate
//!
//! Authorization check consulted before any operation that spends money.
//! Always reads the live identity record; the result is never cached in
//! the session token, because an admin decision must take effect on the
//! very next attempt without re-authentication.

use sqlx::SqlitePool;

use crate::db::repository::identity;
use crate::utils::{AppError, AppResult};
use shared::models::VerificationStatus;

/// Denial message for rejected members: their remediation path is to
/// resubmit documents, not to wait.
pub const DENY_REJECTED: &str = "verification rejected, resubmission required";

/// Denial message for members still in review.
pub const DENY_PENDING: &str = "verification pending";

/// Pass only when the member's live verification status is `approved`.
pub async fn ensure_member_approved(pool: &SqlitePool, member_id: i64) -> AppResult<()> {
    let status = identity::status_of(pool, member_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {member_id}")))?;

    match status {
        VerificationStatus::Approved => Ok(()),
        VerificationStatus::Rejected => Err(AppError::policy(DENY_REJECTED)),
        VerificationStatus::Pending | VerificationStatus::NeedsMedical => {
            Err(AppError::policy(DENY_PENDING))
        }
    }
}
