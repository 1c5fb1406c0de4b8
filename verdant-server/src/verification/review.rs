//! Admin review process
//!
//! Transitions a pending/needs-medical record to approved or rejected.
//! Approving an already-approved record (or rejecting an already-rejected
//! one) is a safe no-op; approving a rejected record is allowed and means
//! re-review. The status write is a conditional UPDATE, so concurrent
//! reviews cannot interleave a read-then-write.

use sqlx::SqlitePool;

use crate::db::repository::identity;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::IdentityRecord;

/// Approve a member's identity record.
pub async fn approve(pool: &SqlitePool, admin_id: i64, member_id: i64) -> AppResult<IdentityRecord> {
    let existing = identity::find_by_member(pool, member_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {member_id}")))?;

    let changed = identity::mark_approved(pool, member_id).await?;
    if changed == 0 {
        // Already approved; idempotent no-op
        tracing::debug!(member_id, admin_id, "Approve: record already approved");
        return Ok(existing);
    }

    tracing::info!(member_id, admin_id, "Identity record approved");

    identity::find_by_member(pool, member_id)
        .await?
        .ok_or_else(|| AppError::internal("Identity record vanished after approval"))
}

/// Reject a member's identity record with a reason.
pub async fn reject(
    pool: &SqlitePool,
    admin_id: i64,
    member_id: i64,
    reason: &str,
) -> AppResult<IdentityRecord> {
    validate_required_text(reason, "rejection reason", MAX_NOTE_LEN)?;

    let existing = identity::find_by_member(pool, member_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {member_id}")))?;

    let changed = identity::mark_rejected(pool, member_id, reason).await?;
    if changed == 0 {
        tracing::debug!(member_id, admin_id, "Reject: record already rejected");
        return Ok(existing);
    }

    tracing::info!(member_id, admin_id, reason, "Identity record rejected");

    identity::find_by_member(pool, member_id)
        .await?
        .ok_or_else(|| AppError::internal("Identity record vanished after rejection"))
}
