use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::client::PickupRequest;
use shared::models::{LineItem, Transaction};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::db::repository::txn;
use crate::transactions;
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// PUT /api/admin/pickup
pub async fn pickup(
    admin: CurrentAdmin,
    State(state): State<ServerState>,
    Json(payload): Json<PickupRequest>,
) -> AppResult<Json<Transaction>> {
    let updated = transactions::reconcile(
        state.pool(),
        admin.id,
        &payload.payment_code,
        payload.action,
        payload.notes,
    )
    .await?;

    tracing::info!(
        admin_id = admin.id,
        payment_code = %updated.payment_code,
        status = %updated.status,
        "Pickup reconciled"
    );

    Ok(Json(updated))
}

#[derive(Debug, Serialize)]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub items: Vec<LineItem>,
}

/// GET /api/admin/transactions/{payment_code}
pub async fn lookup(
    _admin: CurrentAdmin,
    State(state): State<ServerState>,
    Path(payment_code): Path<String>,
) -> AppResult<Json<TransactionDetail>> {
    let found = txn::find_by_code(state.pool(), &payment_code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment code {payment_code}")))?;

    let items = txn::list_items(state.pool(), found.id).await?;

    Ok(Json(TransactionDetail {
        transaction: found,
        items,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

/// POST /api/admin/transactions/{payment_code}/notes
///
/// Notes are the one field a terminal transaction may still change, so
/// this works at any point in the lifecycle.
pub async fn add_note(
    admin: CurrentAdmin,
    State(state): State<ServerState>,
    Path(payment_code): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> AppResult<Json<Transaction>> {
    validate_required_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let changed = txn::append_note(state.pool(), &payment_code, &payload.note).await?;
    if changed == 0 {
        return Err(AppError::not_found(format!("Payment code {payment_code}")));
    }

    tracing::info!(admin_id = admin.id, payment_code = %payment_code, "Note appended");

    txn::find_by_code(state.pool(), &payment_code)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Payment code {payment_code}")))
}

#[derive(Debug, Deserialize, Default)]
pub struct CancelRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// POST /api/admin/transactions/{payment_code}/cancel
pub async fn cancel(
    admin: CurrentAdmin,
    State(state): State<ServerState>,
    Path(payment_code): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<Transaction>> {
    let cancelled =
        transactions::cancel(state.pool(), admin.id, &payment_code, payload.notes).await?;

    tracing::info!(
        admin_id = admin.id,
        payment_code = %cancelled.payment_code,
        "Transaction cancelled"
    );

    Ok(Json(cancelled))
}
