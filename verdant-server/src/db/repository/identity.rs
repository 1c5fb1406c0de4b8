//! Identity Record Repository
//!
//! The review transitions are conditional UPDATEs: "approve only if not
//! already approved" is decided by the database, not by a read-then-write
//! pair, so two admins racing on the same member cannot interleave.

use super::RepoResult;
use shared::models::{IdentityRecord, VerificationStatus};
use shared::util::now_millis;
use sqlx::SqlitePool;

const IDENTITY_SELECT: &str = "SELECT member_id, status, age_verified, requires_medical, id_front_ref, id_back_ref, medical_ref, guardian_email, rejected_reason, verified_at, created_at, updated_at FROM identity_record";

pub async fn find_by_member(
    pool: &SqlitePool,
    member_id: i64,
) -> RepoResult<Option<IdentityRecord>> {
    let sql = format!("{IDENTITY_SELECT} WHERE member_id = ?");
    let row = sqlx::query_as::<_, IdentityRecord>(&sql)
        .bind(member_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Fetch only the live verification status (access-gate hot path).
pub async fn status_of(
    pool: &SqlitePool,
    member_id: i64,
) -> RepoResult<Option<VerificationStatus>> {
    let status = sqlx::query_scalar::<_, VerificationStatus>(
        "SELECT status FROM identity_record WHERE member_id = ?",
    )
    .bind(member_id)
    .fetch_optional(pool)
    .await?;
    Ok(status)
}

/// Mark a record approved. Returns the number of rows changed: 0 means the
/// record was already approved (idempotent no-op for the caller to detect).
pub async fn mark_approved(pool: &SqlitePool, member_id: i64) -> RepoResult<u64> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE identity_record SET status = 'approved', verified_at = ?1, rejected_reason = NULL, updated_at = ?1 WHERE member_id = ?2 AND status != 'approved'",
    )
    .bind(now)
    .bind(member_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Mark a record rejected with a reason. Returns rows changed; 0 means it
/// was already rejected.
pub async fn mark_rejected(pool: &SqlitePool, member_id: i64, reason: &str) -> RepoResult<u64> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE identity_record SET status = 'rejected', rejected_reason = ?1, verified_at = NULL, updated_at = ?2 WHERE member_id = ?3 AND status != 'rejected'",
    )
    .bind(reason)
    .bind(now)
    .bind(member_id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// List records in a given status (admin review queue), oldest first.
pub async fn list_by_status(
    pool: &SqlitePool,
    status: VerificationStatus,
) -> RepoResult<Vec<IdentityRecord>> {
    let sql = format!("{IDENTITY_SELECT} WHERE status = ? ORDER BY created_at ASC");
    let rows = sqlx::query_as::<_, IdentityRecord>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
