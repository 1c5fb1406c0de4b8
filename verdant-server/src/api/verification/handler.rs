use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::client::{ReviewDecision, VerificationStatusResponse, VerifyRequest};
use shared::models::{IdentityRecord, VerificationStatus};

use crate::auth::{CurrentAdmin, CurrentMember};
use crate::core::ServerState;
use crate::db::repository::identity;
use crate::utils::{AppError, AppResult};
use crate::verification::review;

/// GET /api/verification/status
pub async fn status(
    member: CurrentMember,
    State(state): State<ServerState>,
) -> AppResult<Json<VerificationStatusResponse>> {
    let record = identity::find_by_member(state.pool(), member.0.id)
        .await?
        .ok_or_else(|| AppError::not_found("No verification record on file"))?;

    Ok(Json(VerificationStatusResponse {
        status: record.status,
        requires_medical: record.requires_medical,
        rejected_reason: record.rejected_reason,
        verified_at: record.verified_at,
    }))
}

/// POST /api/admin/verify
pub async fn verify(
    admin: CurrentAdmin,
    State(state): State<ServerState>,
    Json(payload): Json<VerifyRequest>,
) -> AppResult<Json<IdentityRecord>> {
    let record = match payload.decision {
        ReviewDecision::Approve => {
            review::approve(state.pool(), admin.id, payload.member_id).await?
        }
        ReviewDecision::Reject => {
            let reason = payload.reason.as_deref().unwrap_or_default();
            review::reject(state.pool(), admin.id, payload.member_id, reason).await?
        }
    };

    Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<VerificationStatus>,
}

/// GET /api/admin/verifications?status=pending
///
/// Defaults to the pending queue when no status filter is given.
pub async fn list_verifications(
    _admin: CurrentAdmin,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<IdentityRecord>>> {
    let status = query.status.unwrap_or(VerificationStatus::Pending);
    let records = identity::list_by_status(state.pool(), status).await?;
    Ok(Json(records))
}
