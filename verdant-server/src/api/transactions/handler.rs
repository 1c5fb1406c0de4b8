use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::client::{CreateTransactionRequest, CreateTransactionResponse};
use shared::models::{LineItem, Transaction};

use crate::access;
use crate::auth::CurrentMember;
use crate::core::ServerState;
use crate::db::repository::txn;
use crate::transactions::create_transaction;
use crate::utils::{AppError, AppResult};

/// POST /api/transactions
///
/// Access gate runs first: only approved members can reach the
/// coordinator.
pub async fn create(
    member: CurrentMember,
    State(state): State<ServerState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> AppResult<(StatusCode, Json<CreateTransactionResponse>)> {
    access::ensure_member_approved(state.pool(), member.0.id).await?;

    let created = create_transaction(
        state.pool(),
        member.0.id,
        &payload.items,
        payload.payment_method,
    )
    .await?;

    tracing::info!(
        member_id = member.0.id,
        txn_id = created.id,
        total = created.total,
        method = created.payment_method.as_str(),
        "Transaction created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateTransactionResponse {
            payment_code: created.payment_code,
            total: created.total,
            status: created.status,
        }),
    ))
}

/// GET /api/transactions
pub async fn list_own(
    member: CurrentMember,
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Transaction>>> {
    let rows = txn::list_by_member(state.pool(), member.0.id).await?;
    Ok(Json(rows))
}

/// GET /api/transactions/{id}/items
pub async fn list_items(
    member: CurrentMember,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<LineItem>>> {
    let owned = txn::list_by_member(state.pool(), member.0.id)
        .await?
        .into_iter()
        .any(|t| t.id == id);
    if !owned {
        return Err(AppError::not_found("Transaction"));
    }

    let items = txn::list_items(state.pool(), id).await?;
    Ok(Json(items))
}
